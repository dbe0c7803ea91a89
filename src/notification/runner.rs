//! 声音播放的 shell 命令执行

use super::error::PlaybackError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// 单次命令的默认超时
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// 命令执行器
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<(), PlaybackError>;
}

/// 通过平台 shell 执行命令
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    fn build(command: &str) -> Command {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<(), PlaybackError> {
        debug!(command = %command, "Executing sound command");

        let child = Self::build(command)
            .spawn()
            .map_err(|e| PlaybackError::command_failed(command, e.to_string()))?;

        // 超时后 future 被丢弃，kill_on_drop 负责结束子进程
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| PlaybackError::command_failed(command, e.to_string()))?,
            Err(_) => {
                return Err(PlaybackError::CommandTimedOut {
                    command: command.to_string(),
                    timeout,
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            debug!(command = %command, stdout = %stdout.trim(), "Command stdout");
        }
        if !stderr.trim().is_empty() {
            debug!(command = %command, stderr = %stderr.trim(), "Command stderr");
        }

        if output.status.success() {
            Ok(())
        } else {
            let reason = match output.status.code() {
                Some(code) if stderr.trim().is_empty() => format!("exit code {}", code),
                Some(code) => format!("exit code {}: {}", code, stderr.trim()),
                None => "terminated by signal".to_string(),
            };
            Err(PlaybackError::command_failed(command, reason))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_command() {
        let runner = ShellRunner::new();
        assert!(runner.execute("true", Duration::from_secs(5)).await.is_ok());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let runner = ShellRunner::new();
        let err = runner
            .execute("echo boom >&2; exit 3", Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            PlaybackError::CommandExecutionFailed { reason, .. } => {
                assert_eq!(reason, "exit code 3: boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let runner = ShellRunner::new();
        let err = runner
            .execute("sleep 5", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, PlaybackError::CommandTimedOut { .. }));
    }
}

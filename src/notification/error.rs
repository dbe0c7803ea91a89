//! 播放错误 - 全部在策略边界内处理

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    /// 自定义声音文件不存在
    #[error("sound file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 不支持的声音文件格式
    #[error("unsupported audio format '{extension}' for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// 命令无法启动或退出码非零
    #[error("command failed: {command}: {reason}")]
    CommandExecutionFailed { command: String, reason: String },

    /// 命令超时，已被结束
    #[error("command timed out after {}ms: {command}", .timeout.as_millis())]
    CommandTimedOut { command: String, timeout: Duration },

    /// 当前平台没有内置命令
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl PlaybackError {
    pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        PlaybackError::CommandExecutionFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PlaybackError::UnsupportedFormat {
            path: PathBuf::from("/tmp/done.txt"),
            extension: ".txt".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported audio format '.txt' for /tmp/done.txt"
        );

        let err = PlaybackError::CommandTimedOut {
            command: "paplay x.wav".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "command timed out after 5000ms: paplay x.wav");
    }
}

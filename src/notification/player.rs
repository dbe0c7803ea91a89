//! 声音播放器 - 通过策略链播放完成通知

use super::error::PlaybackError;
use super::runner::{CommandRunner, ShellRunner, DEFAULT_COMMAND_TIMEOUT};
use super::strategy::{default_chain, PlaybackContext, PlaybackStrategy, COMPLETION_MESSAGE};
use crate::config::{snapshot, ConfigStore, NotifierConfig};
use crate::infra::fs::{FileSystem, StdFileSystem};
use crate::infra::host::{HostUi, NotificationKind};
use crate::infra::platform::Platform;
use crate::monitor::CompletionEvent;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 交互式测试声音后显示的状态消息
pub const TEST_SOUND_MESSAGE: &str = "Test sound played!";

/// 运行上下文（决定是否向用户展示错误）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunContext {
    /// 用户手动触发
    Interactive,
    /// 测试或 CI，不展示错误
    Automated,
}

impl RunContext {
    /// 环境变量 `ASN_AUTOMATED` 或 `CI` 非空时为自动化环境
    pub fn from_env() -> Self {
        let automated = ["ASN_AUTOMATED", "CI"]
            .iter()
            .any(|key| std::env::var_os(key).is_some_and(|v| !v.is_empty()));
        if automated {
            RunContext::Automated
        } else {
            RunContext::Interactive
        }
    }
}

/// 一次策略链执行的结果
#[derive(Debug)]
pub struct PlaybackReport {
    /// 最终成功的策略
    pub strategy: &'static str,
    /// 依次失败的策略及其错误
    pub failures: Vec<(&'static str, PlaybackError)>,
}

impl PlaybackReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 完成通知播放器（从不向调用方返回错误）
pub struct NotificationPlayer {
    config: Arc<dyn ConfigStore>,
    runner: Arc<dyn CommandRunner>,
    host: Arc<dyn HostUi>,
    fs: Arc<dyn FileSystem>,
    platform: Platform,
    command_timeout: Duration,
    run_context: RunContext,
    chain: Vec<Box<dyn PlaybackStrategy>>,
}

impl NotificationPlayer {
    pub fn new(config: Arc<dyn ConfigStore>, host: Arc<dyn HostUi>) -> Self {
        Self {
            config,
            runner: Arc::new(ShellRunner::new()),
            host,
            fs: Arc::new(StdFileSystem),
            platform: Platform::current(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            run_context: RunContext::from_env(),
            chain: default_chain(),
        }
    }

    /// 设置命令执行器
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_run_context(mut self, run_context: RunContext) -> Self {
        self.run_context = run_context;
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// 播放完成提示音；未启用时返回 None
    pub async fn play_completion_sound(&self) -> Option<PlaybackReport> {
        let config = snapshot(self.config.as_ref());
        if !config.enabled {
            debug!("Completion sound disabled");
            return None;
        }

        let report = self.play_sound(&config).await;
        for (strategy, error) in &report.failures {
            warn!(strategy, error = %error, "Failed to play completion sound");
        }
        Some(report)
    }

    /// 播放测试声音（忽略 `enabled`），交互模式下展示错误
    pub async fn test_sound(&self) -> PlaybackReport {
        let config = snapshot(self.config.as_ref());
        let report = self.play_sound(&config).await;

        for (strategy, error) in &report.failures {
            warn!(strategy, error = %error, "Failed to play test sound");
        }

        if self.run_context == RunContext::Interactive {
            if let Some((_, error)) = report.failures.first() {
                self.host.show_notification(
                    &format!("Failed to play sound: {}", error),
                    NotificationKind::Error,
                );
            }
            self.host
                .set_status_message(TEST_SOUND_MESSAGE, Duration::from_secs(3));
        }
        report
    }

    /// 处理完成事件：先播放声音，再按配置弹出通知
    pub async fn notify_completion(&self, event: &CompletionEvent) {
        info!(source = %event.source, "Agent task completion detected");
        self.play_completion_sound().await;

        if snapshot(self.config.as_ref()).show_notification {
            self.host
                .show_notification(COMPLETION_MESSAGE, NotificationKind::Info);
        }
    }

    /// 依次执行策略直到成功
    async fn play_sound(&self, config: &NotifierConfig) -> PlaybackReport {
        let ctx = PlaybackContext {
            config,
            platform: &self.platform,
            runner: self.runner.as_ref(),
            host: self.host.as_ref(),
            fs: self.fs.as_ref(),
            timeout: self.command_timeout,
        };

        let mut failures = Vec::new();
        for strategy in &self.chain {
            if !strategy.applies(&ctx) {
                continue;
            }
            match strategy.play(&ctx).await {
                Ok(()) => {
                    debug!(strategy = strategy.name(), "Notification delivered");
                    return PlaybackReport {
                        strategy: strategy.name(),
                        failures,
                    };
                }
                Err(e) => {
                    debug!(strategy = strategy.name(), error = %e, "Strategy failed, falling through");
                    failures.push((strategy.name(), e));
                }
            }
        }

        // default_chain 以 HostFallbackStrategy 结尾，正常不会走到这里
        self.host
            .show_notification(COMPLETION_MESSAGE, NotificationKind::Info);
        PlaybackReport {
            strategy: "host_fallback",
            failures,
        }
    }
}

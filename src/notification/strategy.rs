//! 播放策略 - 通知回退链的各个环节
//!
//! 每个策略先判断是否适用于当前配置，再尝试发出通知。
//! 失败时交给下一个策略；最后的 host 通知兜底一定成功。

use super::commands::{
    beep_command, check_format, file_player_command, render_template, system_sound_commands,
};
use super::error::PlaybackError;
use super::runner::CommandRunner;
use crate::config::NotifierConfig;
use crate::infra::fs::FileSystem;
use crate::infra::host::{HostUi, NotificationKind};
use crate::infra::platform::Platform;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// 通过 host 通知完成时显示的文本
pub const COMPLETION_MESSAGE: &str = "Agent task completed!";

/// 单次播放尝试所需的上下文
pub struct PlaybackContext<'a> {
    pub config: &'a NotifierConfig,
    pub platform: &'a Platform,
    pub runner: &'a dyn CommandRunner,
    pub host: &'a dyn HostUi,
    pub fs: &'a dyn FileSystem,
    pub timeout: Duration,
}

impl PlaybackContext<'_> {
    async fn run(&self, command: &str) -> Result<(), PlaybackError> {
        self.runner.execute(command, self.timeout).await
    }

    /// 依次尝试系统声音，直到某条命令成功退出
    async fn play_system_sounds(&self) -> Result<(), PlaybackError> {
        let commands = system_sound_commands(self.platform)?;
        let mut last_error = None;

        for command in commands {
            match self.run(command).await {
                Ok(()) => {
                    debug!(command = %command, "System sound played");
                    return Ok(());
                }
                Err(e) => {
                    debug!(command = %command, error = %e, "System sound command failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            PlaybackError::command_failed("system sounds", "no commands available")
        }))
    }
}

/// 播放策略 trait
#[async_trait]
pub trait PlaybackStrategy: Send + Sync {
    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;

    /// 当前配置下是否适用
    fn applies(&self, ctx: &PlaybackContext<'_>) -> bool;

    async fn play(&self, ctx: &PlaybackContext<'_>) -> Result<(), PlaybackError>;
}

/// host 通知模式（附带尽力而为的提示音）
pub struct HostNotificationStrategy;

#[async_trait]
impl PlaybackStrategy for HostNotificationStrategy {
    fn name(&self) -> &'static str {
        "host_notification"
    }

    fn applies(&self, ctx: &PlaybackContext<'_>) -> bool {
        ctx.config.use_host_notification
    }

    async fn play(&self, ctx: &PlaybackContext<'_>) -> Result<(), PlaybackError> {
        ctx.host
            .show_notification(COMPLETION_MESSAGE, NotificationKind::Info);

        if let Some(beep) = beep_command(ctx.platform) {
            if let Err(e) = ctx.run(beep).await {
                debug!(error = %e, "Beep failed, notification already shown");
            }
        }
        Ok(())
    }
}

/// 用户自定义声音文件
pub struct CustomSoundFileStrategy;

#[async_trait]
impl PlaybackStrategy for CustomSoundFileStrategy {
    fn name(&self) -> &'static str {
        "custom_sound_file"
    }

    fn applies(&self, ctx: &PlaybackContext<'_>) -> bool {
        ctx.config.sound_file(ctx.platform).is_some()
    }

    async fn play(&self, ctx: &PlaybackContext<'_>) -> Result<(), PlaybackError> {
        let Some(file) = ctx.config.sound_file(ctx.platform) else {
            return Err(PlaybackError::FileNotFound(PathBuf::new()));
        };
        let path = Path::new(file);
        if !ctx.fs.exists(path) {
            return Err(PlaybackError::FileNotFound(path.to_path_buf()));
        }
        check_format(path)?;

        let volume = ctx.config.effective_volume();
        let command = match ctx.config.sound_command(ctx.platform) {
            Some(template) => render_template(template, Some(file), volume),
            None => file_player_command(ctx.platform, file, volume)?,
        };
        ctx.run(&command).await?;
        info!(file = %file, "Custom sound played");
        Ok(())
    }
}

/// 系统内置声音
pub struct SystemSoundStrategy;

#[async_trait]
impl PlaybackStrategy for SystemSoundStrategy {
    fn name(&self) -> &'static str {
        "system_sound"
    }

    fn applies(&self, ctx: &PlaybackContext<'_>) -> bool {
        ctx.config.use_default_system_sound
    }

    async fn play(&self, ctx: &PlaybackContext<'_>) -> Result<(), PlaybackError> {
        ctx.play_system_sounds().await
    }
}

/// 配置的默认命令，失败后使用系统声音
pub struct DefaultCommandStrategy;

#[async_trait]
impl PlaybackStrategy for DefaultCommandStrategy {
    fn name(&self) -> &'static str {
        "default_command"
    }

    fn applies(&self, ctx: &PlaybackContext<'_>) -> bool {
        !ctx.config.use_default_system_sound
    }

    async fn play(&self, ctx: &PlaybackContext<'_>) -> Result<(), PlaybackError> {
        if let Some(template) = ctx.config.default_sound_command(ctx.platform) {
            let command = render_template(template, None, ctx.config.effective_volume());
            match ctx.run(&command).await {
                Ok(()) => return Ok(()),
                Err(e) => debug!(error = %e, "Default sound command failed, trying system sounds"),
            }
        }
        ctx.play_system_sounds().await
    }
}

/// 最终兜底：host 通知，不会失败
pub struct HostFallbackStrategy;

#[async_trait]
impl PlaybackStrategy for HostFallbackStrategy {
    fn name(&self) -> &'static str {
        "host_fallback"
    }

    fn applies(&self, _ctx: &PlaybackContext<'_>) -> bool {
        true
    }

    async fn play(&self, ctx: &PlaybackContext<'_>) -> Result<(), PlaybackError> {
        ctx.host
            .show_notification(COMPLETION_MESSAGE, NotificationKind::Info);
        Ok(())
    }
}

/// 按优先级排列的策略链
pub fn default_chain() -> Vec<Box<dyn PlaybackStrategy>> {
    vec![
        Box::new(HostNotificationStrategy),
        Box::new(CustomSoundFileStrategy),
        Box::new(SystemSoundStrategy),
        Box::new(DefaultCommandStrategy),
        Box::new(HostFallbackStrategy),
    ]
}

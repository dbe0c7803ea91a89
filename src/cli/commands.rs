//! 单次命令：play、test、toggle-notification、config

use super::output::format_config;
use crate::config::{snapshot, toggle_host_notification, FileConfigStore};
use crate::infra::host::HostUi;
use crate::notification::NotificationPlayer;
use anyhow::Result;
use clap::Args;
use std::time::Duration;
use tracing::info;

/// Config 命令参数
#[derive(Args)]
pub struct ConfigArgs {
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 立即播放完成提示音
pub async fn handle_play(player: &NotificationPlayer) -> Result<()> {
    match player.play_completion_sound().await {
        Some(report) => info!(strategy = report.strategy, "Completion sound played"),
        None => info!("Completion sound is disabled (soundNotifier.enabled = false)"),
    }
    Ok(())
}

/// 播放测试声音
pub async fn handle_test(player: &NotificationPlayer) -> Result<()> {
    let report = player.test_sound().await;
    info!(
        strategy = report.strategy,
        failures = report.failures.len(),
        "Test sound finished"
    );
    Ok(())
}

/// 切换 host 通知模式
pub fn handle_toggle_notification(store: &FileConfigStore, host: &dyn HostUi) -> Result<()> {
    let enabled = toggle_host_notification(store)?;
    let message = if enabled {
        "Host notification mode enabled"
    } else {
        "Host notification mode disabled, using sounds"
    };
    host.set_status_message(message, Duration::from_secs(3));
    Ok(())
}

/// 输出当前生效配置
pub fn handle_config(store: &FileConfigStore, args: ConfigArgs) -> Result<()> {
    let config = snapshot(store);
    println!("{}", format_config(&config, store.path(), args.json));
    Ok(())
}

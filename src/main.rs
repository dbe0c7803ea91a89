//! Agent Sound Notifier 命令行入口
//!
//! 检测 AI 编码代理任务完成并播放提示音

use agent_sound_notifier::cli::{
    handle_config, handle_play, handle_test, handle_toggle_notification, handle_watch,
    ConfigArgs, WatchArgs,
};
use agent_sound_notifier::{
    ConsoleHost, DesktopHost, FileConfigStore, HostUi, NotificationPlayer,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "asn")]
#[command(about = "Agent Sound Notifier - 代理任务完成时播放提示音")]
#[command(version)]
struct Cli {
    /// 配置文件路径 (默认: ~/.config/agent-sound-notifier/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 使用桌面通知代替终端输出
    #[arg(long, global = true)]
    desktop: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 立即播放完成提示音
    Play,
    /// 播放测试提示音
    Test,
    /// 切换 host 通知模式
    ToggleNotification,
    /// 显示当前配置
    Config(ConfigArgs),
    /// 从 stdin 读取编辑器事件并在任务完成时通知
    Watch(WatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("agent_sound_notifier=info,asn=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let store = cli
        .config
        .map(FileConfigStore::new)
        .unwrap_or_default();
    let host: Arc<dyn HostUi> = if cli.desktop {
        Arc::new(DesktopHost::default())
    } else {
        Arc::new(ConsoleHost::new())
    };
    let player = NotificationPlayer::new(Arc::new(store.clone()), Arc::clone(&host));

    match cli.command {
        Commands::Play => handle_play(&player).await,
        Commands::Test => handle_test(&player).await,
        Commands::ToggleNotification => handle_toggle_notification(&store, host.as_ref()),
        Commands::Config(args) => handle_config(&store, args),
        Commands::Watch(args) => handle_watch(args, &player).await,
    }
}

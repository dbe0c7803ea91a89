//! Agent Sound Notifier - 检测 AI 编码代理任务完成并播放提示音
//!
//! 数据单向流动：[`EventBus`] -> [`ActivityMonitor`]（启发式 + 防抖）
//! -> [`NotificationPlayer`]（策略链）

pub mod cli;
pub mod config;
pub mod infra;
pub mod monitor;
pub mod notification;

pub use config::{ConfigStore, FileConfigStore, MemoryConfigStore, NotifierConfig};
pub use infra::events::{ContentChange, EditorEvent, EventBus, EventKind, Subscription};
pub use infra::fs::{FileSystem, StdFileSystem};
pub use infra::host::{ConsoleHost, DesktopHost, HostUi, NotificationKind};
pub use infra::platform::Platform;
pub use monitor::{ActivityMonitor, CandidateSource, CompletionEvent, Debouncer, MonitorOptions};
pub use notification::{
    CommandRunner, NotificationPlayer, PlaybackError, PlaybackReport, RunContext, ShellRunner,
};

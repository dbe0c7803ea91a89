//! 通知层 - 完成提示音播放
//!
//! [`NotificationPlayer`] 按顺序尝试 [`PlaybackStrategy`]，直到某个成功：
//! 1. host 通知（`useVSCodeNotification` 开启时）
//! 2. 自定义声音文件（自定义命令或平台默认播放器）
//! 3. 系统内置声音（`useDefaultSystemSound` 开启时）
//! 4. 配置的默认命令，失败后再试系统声音
//! 5. host 通知兜底
//!
//! 所有错误都在策略边界内处理。

pub mod commands;
pub mod error;
pub mod player;
pub mod runner;
pub mod strategy;

pub use error::PlaybackError;
pub use player::{NotificationPlayer, PlaybackReport, RunContext, TEST_SOUND_MESSAGE};
pub use runner::{CommandRunner, ShellRunner, DEFAULT_COMMAND_TIMEOUT};
pub use strategy::{PlaybackContext, PlaybackStrategy, COMPLETION_MESSAGE};

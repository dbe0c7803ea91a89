//! CLI 命令处理

pub mod commands;
pub mod output;
pub mod watch;

pub use commands::*;
pub use output::*;
pub use watch::*;

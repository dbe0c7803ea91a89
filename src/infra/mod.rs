//! 基础设施层 - host surfaces the notifier talks to

pub mod events;
pub mod fs;
pub mod host;
pub mod platform;

pub use events::{EditorEvent, EventBus, EventKind, Subscription};
pub use fs::{FileSystem, StdFileSystem};
pub use host::{ConsoleHost, DesktopHost, HostUi, NotificationKind};
pub use platform::Platform;

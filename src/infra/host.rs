//! Host UI - 通知与临时状态消息

use chrono::Local;
#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::{Command, Stdio};
#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::time::Instant;
use std::time::Duration;
use tracing::debug;

/// 桌面通知命令的最长等待时间
#[cfg(any(target_os = "macos", target_os = "linux"))]
const NATIVE_NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

/// 通知器使用的 host 界面
pub trait HostUi: Send + Sync {
    /// 向用户显示通知
    fn show_notification(&self, text: &str, kind: NotificationKind);

    /// 显示持续 `duration` 的状态消息
    fn set_status_message(&self, text: &str, duration: Duration);
}

/// 在终端输出通知
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl ConsoleHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostUi for ConsoleHost {
    fn show_notification(&self, text: &str, kind: NotificationKind) {
        let time = Local::now().format("%H:%M:%S");
        match kind {
            NotificationKind::Info => println!("[{}] [通知] {}", time, text),
            NotificationKind::Warning => eprintln!("[{}] [警告] {}", time, text),
            NotificationKind::Error => eprintln!("[{}] [错误] {}", time, text),
        }
    }

    fn set_status_message(&self, text: &str, duration: Duration) {
        debug!(duration_ms = duration.as_millis() as u64, "Status message");
        eprintln!("{}", text);
    }
}

/// 桌面通知（macOS: terminal-notifier / osascript，Linux: notify-send），
/// 不可用时回退到终端输出
#[derive(Debug)]
pub struct DesktopHost {
    title: String,
    console: ConsoleHost,
}

impl DesktopHost {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            console: ConsoleHost::new(),
        }
    }

    #[cfg(target_os = "macos")]
    fn notify_native(&self, text: &str) -> bool {
        if which::which("terminal-notifier").is_ok()
            && run_with_timeout(
                Command::new("terminal-notifier").args(["-title", &self.title, "-message", text]),
                NATIVE_NOTIFY_TIMEOUT,
            )
        {
            return true;
        }

        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            text.replace('"', "\\\""),
            self.title.replace('"', "\\\"")
        );
        run_with_timeout(
            Command::new("osascript").args(["-e", &script]),
            NATIVE_NOTIFY_TIMEOUT,
        )
    }

    #[cfg(target_os = "linux")]
    fn notify_native(&self, text: &str) -> bool {
        which::which("notify-send").is_ok()
            && run_with_timeout(
                Command::new("notify-send").args([self.title.as_str(), text]),
                NATIVE_NOTIFY_TIMEOUT,
            )
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn notify_native(&self, _text: &str) -> bool {
        false
    }
}

impl Default for DesktopHost {
    fn default() -> Self {
        Self::new("Agent Sound Notifier")
    }
}

impl HostUi for DesktopHost {
    fn show_notification(&self, text: &str, kind: NotificationKind) {
        if !self.notify_native(text) {
            self.console.show_notification(text, kind);
        }
    }

    fn set_status_message(&self, text: &str, duration: Duration) {
        self.console.set_status_message(text, duration);
    }
}

/// 运行命令并最多等待 `timeout`；超时则结束进程并返回 false
#[cfg(any(target_os = "macos", target_os = "linux"))]
fn run_with_timeout(command: &mut Command, timeout: Duration) -> bool {
    let mut child = match command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            debug!(error = %e, "Failed to spawn notifier");
            return false;
        }
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status.success(),
            Ok(None) if Instant::now() >= deadline => {
                debug!(timeout_ms = timeout.as_millis() as u64, "Notifier timed out");
                let _ = child.kill();
                let _ = child.wait();
                return false;
            }
            Ok(None) => std::thread::sleep(Duration::from_millis(20)),
            Err(e) => {
                debug!(error = %e, "Failed to wait for notifier");
                return false;
            }
        }
    }
}

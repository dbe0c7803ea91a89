//! Watch 命令 - 从 stdin 读取编辑器事件，任务完成时通知
//!
//! 编辑器一侧每行写入一个 JSON 格式的 [`EditorEvent`]，例如
//! `{"type":"activeTerminalChanged","name":"Copilot Agent"}`。

use crate::infra::events::{EditorEvent, EventBus};
use crate::monitor::{ActivityMonitor, MonitorOptions};
use crate::notification::NotificationPlayer;
use anyhow::Result;
use clap::Args;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Watch 命令参数
#[derive(Args)]
pub struct WatchArgs {
    /// 防抖窗口（秒）
    #[arg(long, default_value = "5")]
    pub debounce: u64,
    /// 终端输出轮询间隔（毫秒）
    #[arg(long, default_value = "1000")]
    pub poll_interval: u64,
    /// Agent 配置命名空间
    #[arg(long, default_value = "github.copilot")]
    pub agent_namespace: String,
}

impl WatchArgs {
    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            debounce_window: Duration::from_secs(self.debounce),
            poll_interval: Duration::from_millis(self.poll_interval.max(1)),
            agent_namespace: self.agent_namespace.clone(),
            ..MonitorOptions::default()
        }
    }
}

/// Watch 循环的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    /// 事件流结束
    EndOfInput,
    /// 收到停止信号
    Interrupted,
    /// 读取事件流失败
    ReadError,
}

/// Watch 循环的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    pub exit: WatchExit,
    /// 已完成通知的事件数
    pub notified: usize,
}

/// 解析一行事件；空行或格式错误返回 None
pub fn parse_event_line(line: &str) -> Option<EditorEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, line = %line, "Skipping malformed editor event");
            None
        }
    }
}

/// 运行监控，直到 stdin 关闭或 Ctrl+C
pub async fn handle_watch(args: WatchArgs, player: &NotificationPlayer) -> Result<()> {
    info!("Watching editor events on stdin (Ctrl+C to stop)");
    let summary = run_watch(
        BufReader::new(tokio::io::stdin()),
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        },
        args.monitor_options(),
        player,
    )
    .await;
    info!(exit = ?summary.exit, notified = summary.notified, "Watch finished");
    Ok(())
}

/// Watch 主循环
///
/// `shutdown` 只创建一次，在读取事件和播放提示音期间都保持监听；
/// 播放中途收到停止信号会放弃本次播放。
pub async fn run_watch<R, F>(
    reader: R,
    shutdown: F,
    options: MonitorOptions,
    player: &NotificationPlayer,
) -> WatchSummary
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let bus = EventBus::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let monitor = ActivityMonitor::with_options(bus.clone(), tx, options);
    monitor.start();

    tokio::pin!(shutdown);
    let mut lines = reader.lines();
    let mut notified = 0;

    let exit = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted");
                break WatchExit::Interrupted;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(event) = parse_event_line(&line) {
                        debug!(kind = ?event.kind(), "Editor event received");
                        bus.publish(&event);
                    }
                }
                Ok(None) => {
                    info!("Event stream closed");
                    break WatchExit::EndOfInput;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read editor events");
                    break WatchExit::ReadError;
                }
            },
            Some(event) = rx.recv() => {
                tokio::select! {
                    _ = player.notify_completion(&event) => notified += 1,
                    _ = &mut shutdown => {
                        info!("Interrupted during playback");
                        break WatchExit::Interrupted;
                    }
                }
            }
        }
    };

    monitor.stop();

    // 输入结束时，已接受的事件仍然通知；中断时直接退出
    if exit != WatchExit::Interrupted {
        while let Ok(event) = rx.try_recv() {
            player.notify_completion(&event).await;
            notified += 1;
        }
    }

    WatchSummary { exit, notified }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_line() {
        let event = parse_event_line(r#" {"type":"configurationChanged","sections":["github.copilot"]} "#);
        assert_eq!(
            event,
            Some(EditorEvent::ConfigurationChanged {
                sections: vec!["github.copilot".to_string()]
            })
        );
        assert_eq!(parse_event_line(""), None);
        assert_eq!(parse_event_line("not json"), None);
        assert_eq!(parse_event_line(r#"{"type":"unknown"}"#), None);
    }

    #[test]
    fn test_monitor_options_from_args() {
        let args = WatchArgs {
            debounce: 2,
            poll_interval: 0,
            agent_namespace: "agent.tools".to_string(),
        };
        let options = args.monitor_options();
        assert_eq!(options.debounce_window, Duration::from_secs(2));
        assert_eq!(options.poll_interval, Duration::from_millis(1));
        assert_eq!(options.settle_delay, Duration::from_millis(500));
        assert_eq!(options.agent_namespace, "agent.tools");
    }
}

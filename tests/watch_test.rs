//! Watch 循环测试：事件流结束、中断、播放中途中断

mod common;

use agent_sound_notifier::cli::{run_watch, WatchExit};
use agent_sound_notifier::{CommandRunner, MonitorOptions, NotifierConfig, PlaybackError};
use async_trait::async_trait;
use common::{Harness, MockFs, MockRunner};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::time::{sleep, Instant};

/// 每条命令都挂起很久的执行器
#[derive(Default)]
struct HangingRunner {
    started: AtomicUsize,
}

#[async_trait]
impl CommandRunner for HangingRunner {
    async fn execute(&self, _command: &str, _timeout: Duration) -> Result<(), PlaybackError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

const AGENT_TERMINAL: &str = r#"{"type":"activeTerminalChanged","name":"Copilot Agent"}"#;

#[tokio::test]
async fn test_watch_notifies_until_end_of_input() {
    let h = Harness::new(NotifierConfig::default(), MockRunner::succeeding(), MockFs::default());
    let input = format!("not json\n\n{}\n", AGENT_TERMINAL);

    let summary = run_watch(
        BufReader::new(input.as_bytes()),
        std::future::pending::<()>(),
        MonitorOptions::default(),
        &h.player,
    )
    .await;

    assert_eq!(summary.exit, WatchExit::EndOfInput);
    assert_eq!(summary.notified, 1);
    assert_eq!(h.runner.commands().len(), 1);
}

#[tokio::test]
async fn test_watch_debounces_repeated_events() {
    let h = Harness::new(NotifierConfig::default(), MockRunner::succeeding(), MockFs::default());
    let input = format!("{0}\n{0}\n{0}\n", AGENT_TERMINAL);

    let summary = run_watch(
        BufReader::new(input.as_bytes()),
        std::future::pending::<()>(),
        MonitorOptions::default(),
        &h.player,
    )
    .await;

    assert_eq!(summary.notified, 1);
}

#[tokio::test(start_paused = true)]
async fn test_watch_stops_on_shutdown_while_idle() {
    let h = Harness::new(NotifierConfig::default(), MockRunner::succeeding(), MockFs::default());
    let (reader, _writer) = tokio::io::duplex(1024);

    let summary = run_watch(
        BufReader::new(reader),
        sleep(Duration::from_secs(1)),
        MonitorOptions::default(),
        &h.player,
    )
    .await;

    assert_eq!(summary.exit, WatchExit::Interrupted);
    assert_eq!(summary.notified, 0);
}

#[tokio::test(start_paused = true)]
async fn test_watch_shutdown_interrupts_playback() {
    let h = Harness::new(NotifierConfig::default(), MockRunner::succeeding(), MockFs::default());
    let runner = Arc::new(HangingRunner::default());
    let player = h.player.with_runner(runner.clone());

    let (reader, mut writer) = tokio::io::duplex(1024);
    writer
        .write_all(format!("{}\n", AGENT_TERMINAL).as_bytes())
        .await
        .unwrap();

    let started = Instant::now();
    let summary = run_watch(
        BufReader::new(reader),
        sleep(Duration::from_secs(1)),
        MonitorOptions::default(),
        &player,
    )
    .await;

    assert_eq!(summary.exit, WatchExit::Interrupted);
    assert_eq!(summary.notified, 0);
    assert_eq!(runner.started.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_secs(60));
    // 播放被放弃，不会走到 host 兜底通知
    assert!(h.host.notifications().is_empty());

    drop(writer);
}

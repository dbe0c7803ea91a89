//! 活动监控 - 将编辑器事件转换为防抖后的完成事件
//!
//! 激活期间订阅编辑器事件总线，并周期性轮询缓冲的终端输出。
//! 每个回调先检查 active 标志；`stop()` 释放全部订阅并中止所有定时器，
//! 停止后不会再触发任何事件。

use super::debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
use super::heuristics::{
    affects_namespace, is_agent_terminal, is_code_language, is_completion_message,
    last_lines, looks_like_generation, tail_bytes, OUTPUT_SCAN_LINES,
};
use super::{CandidateSource, CompletionEvent};
use crate::infra::events::{EditorEvent, EventBus, EventKind, Subscription};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// 两次轮询之间保留的终端输出上限（字节）
const MAX_PENDING_OUTPUT: usize = 64 * 1024;

/// 监控器的时间与匹配参数
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// 两次完成事件之间的最小间隔
    pub debounce_window: Duration,
    /// 终端输出轮询间隔
    pub poll_interval: Duration,
    /// Agent 配置变更生效前的等待时间
    pub settle_delay: Duration,
    /// Agent 所属的配置命名空间
    pub agent_namespace: String,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            poll_interval: Duration::from_millis(1000),
            settle_delay: Duration::from_millis(500),
            agent_namespace: "github.copilot".to_string(),
        }
    }
}

struct MonitorState {
    is_active: bool,
    debouncer: Debouncer,
    subscriptions: Vec<Subscription>,
    /// 轮询任务和待触发的配置定时器
    tasks: Vec<JoinHandle<()>>,
    pending_output: String,
    /// 最近一次写入缓冲区的终端
    last_output_terminal: Option<String>,
}

struct Shared {
    options: MonitorOptions,
    sink: mpsc::UnboundedSender<CompletionEvent>,
    state: Mutex<MonitorState>,
}

/// 监听编辑器活动，并向 `sink` 发送 [`CompletionEvent`]
pub struct ActivityMonitor {
    bus: EventBus,
    shared: Arc<Shared>,
}

impl ActivityMonitor {
    pub fn new(bus: EventBus, sink: mpsc::UnboundedSender<CompletionEvent>) -> Self {
        Self::with_options(bus, sink, MonitorOptions::default())
    }

    pub fn with_options(
        bus: EventBus,
        sink: mpsc::UnboundedSender<CompletionEvent>,
        options: MonitorOptions,
    ) -> Self {
        let debouncer = Debouncer::new(options.debounce_window);
        Self {
            bus,
            shared: Arc::new(Shared {
                options,
                sink,
                state: Mutex::new(MonitorState {
                    is_active: false,
                    debouncer,
                    subscriptions: Vec::new(),
                    tasks: Vec::new(),
                    pending_output: String::new(),
                    last_output_terminal: None,
                }),
            }),
        }
    }

    /// 开始监控（已激活时不做任何事）
    ///
    /// 定时器运行在当前 tokio runtime 上；没有 runtime 时事件监听仍然有效，
    /// 但终端输出轮询和配置延迟不可用。
    pub fn start(&self) {
        let mut state = self.shared.lock();
        if state.is_active {
            return;
        }

        state.is_active = true;
        state.debouncer.reset();
        state.pending_output.clear();
        state.last_output_terminal = None;

        for kind in [
            EventKind::ActiveTerminalChanged,
            EventKind::ConfigurationChanged,
            EventKind::TextDocumentChanged,
            EventKind::TerminalData,
        ] {
            let weak = Arc::downgrade(&self.shared);
            let subscription = self.bus.subscribe(
                kind,
                Arc::new(move |event: &EditorEvent| {
                    if let Some(shared) = weak.upgrade() {
                        shared.handle_event(event);
                    }
                }),
            );
            state.subscriptions.push(subscription);
        }

        match Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.shared);
                let period = self.shared.options.poll_interval;
                state.tasks.push(handle.spawn(poll_loop(weak, period)));
            }
            Err(_) => warn!("No tokio runtime, terminal output poll disabled"),
        }

        info!(
            listeners = state.subscriptions.len(),
            "Activity monitor started"
        );
    }

    /// 停止监控，释放所有监听器和定时器（可重复调用）
    pub fn stop(&self) {
        let (subscriptions, tasks, was_active) = {
            let mut state = self.shared.lock();
            let was_active = state.is_active;
            state.is_active = false;
            state.pending_output.clear();
            state.last_output_terminal = None;
            (
                std::mem::take(&mut state.subscriptions),
                std::mem::take(&mut state.tasks),
                was_active,
            )
        };

        for subscription in &subscriptions {
            subscription.dispose();
        }
        for task in tasks {
            task.abort();
        }

        if was_active {
            info!("Activity monitor stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.lock().is_active
    }

    /// 当前持有的事件订阅数
    pub fn subscription_count(&self) -> usize {
        self.shared.lock().subscriptions.len()
    }
}

impl Drop for ActivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn is_active(&self) -> bool {
        self.lock().is_active
    }

    fn handle_event(self: &Arc<Self>, event: &EditorEvent) {
        if !self.is_active() {
            return;
        }

        match event {
            EditorEvent::ActiveTerminalChanged { name: Some(name) } => {
                if is_agent_terminal(name) {
                    debug!(terminal = %name, "Agent terminal focused");
                    self.candidate(CandidateSource::TerminalName);
                }
            }
            EditorEvent::ActiveTerminalChanged { name: None } => {}
            EditorEvent::ConfigurationChanged { sections } => {
                let namespace = &self.options.agent_namespace;
                if sections.iter().any(|s| affects_namespace(s, namespace)) {
                    self.schedule_settled_candidate();
                }
            }
            EditorEvent::TextDocumentChanged {
                language_id,
                changes,
            } => {
                if is_code_language(language_id) && looks_like_generation(changes) {
                    debug!(language = %language_id, "Large insertion detected");
                    self.candidate(CandidateSource::DocumentEdit);
                }
            }
            EditorEvent::TerminalData { terminal, data } => self.buffer_output(terminal, data),
        }
    }

    /// Agent 配置变更在延迟之后才算候选
    fn schedule_settled_candidate(self: &Arc<Self>) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No tokio runtime, configuration change ignored");
                return;
            }
        };

        let weak = Arc::downgrade(self);
        let delay = self.options.settle_delay;
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.candidate(CandidateSource::Configuration);
            }
        });

        let mut state = self.lock();
        if state.is_active {
            state.tasks.retain(|t| !t.is_finished());
            state.tasks.push(task);
        } else {
            task.abort();
        }
    }

    /// 缓冲终端输出；不同终端的输出之间以换行分隔
    fn buffer_output(&self, terminal: &str, data: &str) {
        let mut state = self.lock();
        let switched = state.last_output_terminal.as_deref() != Some(terminal);
        if switched {
            if !state.pending_output.is_empty() && !state.pending_output.ends_with('\n') {
                state.pending_output.push('\n');
            }
            state.last_output_terminal = Some(terminal.to_string());
        }
        state.pending_output.push_str(data);

        if state.pending_output.len() > MAX_PENDING_OUTPUT {
            let trimmed = last_lines(&state.pending_output, OUTPUT_SCAN_LINES);
            state.pending_output = tail_bytes(&trimmed, MAX_PENDING_OUTPUT).to_string();
        }
    }

    /// 单次轮询；监控停止后返回 false
    fn poll(&self) -> bool {
        let output = {
            let mut state = self.lock();
            if !state.is_active {
                return false;
            }
            std::mem::take(&mut state.pending_output)
        };

        if !output.is_empty() && is_completion_message(&output) {
            self.candidate(CandidateSource::TerminalOutput);
        }
        true
    }

    /// 对候选事件做防抖，通过则发送
    fn candidate(&self, source: CandidateSource) -> bool {
        {
            let mut state = self.lock();
            if !state.is_active {
                return false;
            }
            if !state.debouncer.try_fire(Instant::now()) {
                debug!(%source, "Candidate suppressed by debounce window");
                return false;
            }
        }

        info!(%source, "Completion candidate accepted");
        if self.sink.send(CompletionEvent { source }).is_err() {
            warn!("Completion receiver dropped");
        }
        true
    }
}

async fn poll_loop(shared: Weak<Shared>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.poll() {
            break;
        }
    }
}

//! 编辑器事件总线 - host 发布编辑器活动的观察者注册表
//!
//! 监听器按 [`EventKind`] 注册，按注册顺序接收事件。每次注册返回一个
//! [`Subscription`]；显式 dispose 或 drop 时恰好移除一次监听器。

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, error};

/// 文档编辑中的一处内容变更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChange {
    /// 插入的文本
    pub text: String,
    /// 被替换范围的长度（纯插入为 0）
    #[serde(rename = "rangeLength", default)]
    pub range_length: usize,
}

impl ContentChange {
    pub fn insertion(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            range_length: 0,
        }
    }

    pub fn replacement(text: impl Into<String>, range_length: usize) -> Self {
        Self {
            text: text.into(),
            range_length,
        }
    }
}

/// host 发送的编辑器事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// 当前终端切换（没有终端时 `name` 为 None）
    ActiveTerminalChanged {
        #[serde(default)]
        name: Option<String>,
    },
    /// 配置节变更
    ConfigurationChanged {
        #[serde(default)]
        sections: Vec<String>,
    },
    /// 文本文档被编辑
    TextDocumentChanged {
        #[serde(rename = "languageId")]
        language_id: String,
        #[serde(default)]
        changes: Vec<ContentChange>,
    },
    /// 终端输出
    TerminalData { terminal: String, data: String },
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::ActiveTerminalChanged { .. } => EventKind::ActiveTerminalChanged,
            EditorEvent::ConfigurationChanged { .. } => EventKind::ConfigurationChanged,
            EditorEvent::TextDocumentChanged { .. } => EventKind::TextDocumentChanged,
            EditorEvent::TerminalData { .. } => EventKind::TerminalData,
        }
    }
}

/// 可订阅的事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ActiveTerminalChanged,
    ConfigurationChanged,
    TextDocumentChanged,
    TerminalData,
}

/// 监听器回调
pub type Listener = Arc<dyn Fn(&EditorEvent) + Send + Sync>;

struct Registration {
    id: u64,
    kind: EventKind,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

/// 进程内事件总线（clone 共享同一注册表）
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册某类事件的监听器
    pub fn subscribe(&self, kind: EventKind, listener: Listener) -> Subscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.registrations.push(Registration { id, kind, listener });
        debug!(id, ?kind, "Listener registered");

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
            disposed: AtomicBool::new(false),
        }
    }

    /// 将事件分发给该类型的所有监听器
    ///
    /// 分发前先复制监听器列表，回调中可以注册或 dispose 而不会死锁。
    /// panic 的监听器会被记录并跳过。
    pub fn publish(&self, event: &EditorEvent) {
        let kind = event.kind();
        let listeners: Vec<(u64, Listener)> = lock(&self.registry)
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| (r.id, Arc::clone(&r.listener)))
            .collect();

        for (id, listener) in listeners {
            if !self.is_registered(id) {
                continue;
            }
            if panic::catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!(id, ?kind, "Listener panicked; event ignored");
            }
        }
    }

    /// 当前监听器数量
    pub fn listener_count(&self) -> usize {
        lock(&self.registry).registrations.len()
    }

    fn is_registered(&self, id: u64) -> bool {
        lock(&self.registry).registrations.iter().any(|r| r.id == id)
    }
}

/// 已注册监听器的句柄
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    disposed: AtomicBool,
}

impl Subscription {
    /// 移除监听器；重复调用无效果
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).registrations.retain(|r| r.id != self.id);
            debug!(id = self.id, "Listener disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// 监听器不会在持锁时运行；锁中毒时仍然恢复
fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

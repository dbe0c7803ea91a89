//! 共享的测试替身

#![allow(dead_code)]

use agent_sound_notifier::{
    CommandRunner, FileSystem, HostUi, MemoryConfigStore, NotificationKind, NotificationPlayer,
    NotifierConfig, PlaybackError, Platform, RunContext,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 记录命令；只有包含 `accept` 中片段的命令成功
pub struct MockRunner {
    accept: Vec<String>,
    accept_all: bool,
    commands: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn succeeding() -> Self {
        Self {
            accept: Vec::new(),
            accept_all: true,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            accept: Vec::new(),
            accept_all: false,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(fragments: &[&str]) -> Self {
        Self {
            accept: fragments.iter().map(|s| s.to_string()).collect(),
            accept_all: false,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn execute(&self, command: &str, _timeout: Duration) -> Result<(), PlaybackError> {
        self.commands.lock().unwrap().push(command.to_string());
        if self.accept_all || self.accept.iter().any(|f| command.contains(f.as_str())) {
            Ok(())
        } else {
            Err(PlaybackError::command_failed(command, "exit code 1"))
        }
    }
}

/// 记录所有通知和状态消息
#[derive(Default)]
pub struct MockHost {
    notifications: Mutex<Vec<(String, NotificationKind)>>,
    statuses: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn notifications(&self) -> Vec<(String, NotificationKind)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.notifications().len() + self.statuses().len()
    }
}

impl HostUi for MockHost {
    fn show_notification(&self, text: &str, kind: NotificationKind) {
        self.notifications.lock().unwrap().push((text.to_string(), kind));
    }

    fn set_status_message(&self, text: &str, _duration: Duration) {
        self.statuses.lock().unwrap().push(text.to_string());
    }
}

/// 只有列出的路径存在的文件系统
#[derive(Default)]
pub struct MockFs {
    files: HashSet<PathBuf>,
}

impl MockFs {
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(PathBuf::from).collect(),
        }
    }
}

impl FileSystem for MockFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}

/// 使用 mock 组装的 Linux 播放器（自动化上下文）
pub struct Harness {
    pub store: Arc<MemoryConfigStore>,
    pub runner: Arc<MockRunner>,
    pub host: Arc<MockHost>,
    pub player: NotificationPlayer,
}

impl Harness {
    pub fn new(config: NotifierConfig, runner: MockRunner, fs: MockFs) -> Self {
        Self::on(Platform::Linux, config, runner, fs)
    }

    pub fn on(platform: Platform, config: NotifierConfig, runner: MockRunner, fs: MockFs) -> Self {
        let store = Arc::new(MemoryConfigStore::new(config));
        let runner = Arc::new(runner);
        let host = Arc::new(MockHost::default());
        let player = NotificationPlayer::new(store.clone(), host.clone())
            .with_runner(runner.clone())
            .with_fs(Arc::new(fs))
            .with_platform(platform)
            .with_run_context(RunContext::Automated);
        Self {
            store,
            runner,
            host,
            player,
        }
    }
}

/// 配置了 Linux 自定义声音文件的配置
pub fn linux_file_config(file: &str) -> NotifierConfig {
    let mut config = NotifierConfig::default();
    config
        .sound_files
        .insert("linux".to_string(), file.to_string());
    config
}

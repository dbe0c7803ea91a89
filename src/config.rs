//! 配置 - 通知器的用户偏好
//!
//! 配置位于 JSON 文件的 `soundNotifier` 键下
//! （默认 `~/.config/agent-sound-notifier/config.json`），每次播放时重新读取，不缓存。

use crate::infra::platform::Platform;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// 配置文件中的命名空间
pub const CONFIG_NAMESPACE: &str = "soundNotifier";

/// 通知器配置快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifierConfig {
    /// 总开关
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 使用 host 通知代替声音
    #[serde(rename = "useVSCodeNotification", default)]
    pub use_host_notification: bool,
    /// 使用系统内置声音
    #[serde(default = "default_true")]
    pub use_default_system_sound: bool,
    /// 各平台的自定义声音文件
    #[serde(default)]
    pub sound_files: HashMap<String, String>,
    /// 各平台的播放命令模板（替换 `{file}`）
    #[serde(default)]
    pub sound_commands: HashMap<String, String>,
    /// 未配置自定义文件时使用的命令模板
    #[serde(default)]
    pub default_sound_commands: HashMap<String, String>,
    /// 音量 0.0 - 1.0
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// 检测到完成时额外显示通知
    #[serde(default)]
    pub show_notification: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_host_notification: false,
            use_default_system_sound: true,
            sound_files: HashMap::new(),
            sound_commands: HashMap::new(),
            default_sound_commands: HashMap::new(),
            volume: 1.0,
            show_notification: false,
        }
    }
}

impl NotifierConfig {
    /// 当前平台的自定义声音文件
    pub fn sound_file(&self, platform: &Platform) -> Option<&str> {
        non_empty(self.sound_files.get(platform.config_key()))
    }

    /// 当前平台的自定义命令模板
    pub fn sound_command(&self, platform: &Platform) -> Option<&str> {
        non_empty(self.sound_commands.get(platform.config_key()))
    }

    /// 当前平台的默认命令模板
    pub fn default_sound_command(&self, platform: &Platform) -> Option<&str> {
        non_empty(self.default_sound_commands.get(platform.config_key()))
    }

    /// 限制在 [0.0, 1.0] 内的音量
    pub fn effective_volume(&self) -> f64 {
        if self.volume.is_nan() {
            return 1.0;
        }
        self.volume.clamp(0.0, 1.0)
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f64 {
    1.0
}

/// 配置存储
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<NotifierConfig>;
    fn save(&self, config: &NotifierConfig) -> Result<()>;
}

/// 读取当前配置快照，读取失败时使用默认值
pub fn snapshot(store: &dyn ConfigStore) -> NotifierConfig {
    match store.load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load notifier config, using defaults");
            NotifierConfig::default()
        }
    }
}

/// 切换 host 通知模式并保存，返回新值
pub fn toggle_host_notification(store: &dyn ConfigStore) -> Result<bool> {
    let mut config = store.load()?;
    config.use_host_notification = !config.use_host_notification;
    store.save(&config)?;
    Ok(config.use_host_notification)
}

/// JSON 配置文件存储
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/agent-sound-notifier/config.json`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("agent-sound-notifier")
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<serde_json::Value>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;
        let document = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", self.path.display()))?;
        Ok(Some(document))
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<NotifierConfig> {
        let Some(document) = self.read_document()? else {
            debug!(path = %self.path.display(), "Config file missing, using defaults");
            return Ok(NotifierConfig::default());
        };

        match document.get(CONFIG_NAMESPACE) {
            Some(section) => serde_json::from_value(section.clone()).with_context(|| {
                format!(
                    "Invalid '{}' section in {}",
                    CONFIG_NAMESPACE,
                    self.path.display()
                )
            }),
            None => Ok(NotifierConfig::default()),
        }
    }

    fn save(&self, config: &NotifierConfig) -> Result<()> {
        let mut document = match self.read_document()? {
            Some(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        document.insert(CONFIG_NAMESPACE.to_string(), serde_json::to_value(config)?);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(&serde_json::Value::Object(document))?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;
        Ok(())
    }
}

/// 内存配置存储（用于嵌入和测试）
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: Mutex<NotifierConfig>,
}

impl MemoryConfigStore {
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }

    /// 替换存储的配置
    pub fn set(&self, config: NotifierConfig) {
        *self.config.lock().unwrap_or_else(|p| p.into_inner()) = config;
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<NotifierConfig> {
        Ok(self.config.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    fn save(&self, config: &NotifierConfig) -> Result<()> {
        self.set(config.clone());
        Ok(())
    }
}

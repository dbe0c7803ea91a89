//! CLI 输出格式化

use crate::config::NotifierConfig;
use serde::Serialize;
use std::path::Path;

/// 根据 --json 参数输出 JSON 或纯文本
pub fn format_output<T: Serialize>(data: &T, json: bool) -> String {
    if json {
        serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
    } else {
        serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string())
    }
}

/// 当前生效配置的文本摘要
pub fn format_config(config: &NotifierConfig, path: &Path, json: bool) -> String {
    if json {
        return format_output(config, true);
    }

    let mut lines = vec![
        format!("config: {}", path.display()),
        format!("enabled: {}", config.enabled),
        format!("useVSCodeNotification: {}", config.use_host_notification),
        format!("useDefaultSystemSound: {}", config.use_default_system_sound),
        format!("volume: {:.2}", config.effective_volume()),
        format!("showNotification: {}", config.show_notification),
    ];
    for (label, map) in [
        ("soundFiles", &config.sound_files),
        ("soundCommands", &config.sound_commands),
        ("defaultSoundCommands", &config.default_sound_commands),
    ] {
        let mut keys: Vec<_> = map.keys().collect();
        keys.sort();
        for key in keys {
            lines.push(format!("{}.{}: {}", label, key, map[key]));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_config_text() {
        let mut config = NotifierConfig::default();
        config
            .sound_files
            .insert("linux".to_string(), "/s/done.wav".to_string());

        let text = format_config(&config, Path::new("/tmp/config.json"), false);
        assert!(text.starts_with("config: /tmp/config.json"));
        assert!(text.contains("enabled: true"));
        assert!(text.contains("soundFiles.linux: /s/done.wav"));
    }

    #[test]
    fn test_format_config_json() {
        let text = format_config(&NotifierConfig::default(), Path::new("/tmp/c.json"), true);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["useVSCodeNotification"], false);
        assert_eq!(value["useDefaultSystemSound"], true);
    }
}

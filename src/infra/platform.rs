//! 平台检测 - 将当前系统映射为配置中的平台键

use std::fmt;

/// 运行平台
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    /// 其他系统，没有内置声音命令
    Other(String),
}

impl Platform {
    /// 检测当前平台
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// 从 `std::env::consts::OS` 映射
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }

    /// `soundFiles` / `soundCommands` / `defaultSoundCommands` 中使用的键
    pub fn config_key(&self) -> &str {
        match self {
            Platform::Windows => "win32",
            Platform::MacOs => "darwin",
            Platform::Linux => "linux",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os_known() {
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
    }

    #[test]
    fn test_config_keys() {
        assert_eq!(Platform::Windows.config_key(), "win32");
        assert_eq!(Platform::MacOs.config_key(), "darwin");
        assert_eq!(Platform::Linux.config_key(), "linux");
        assert_eq!(Platform::from_os("freebsd").config_key(), "freebsd");
    }
}

//! 内置声音命令与命令模板

use super::error::PlaybackError;
use crate::infra::platform::Platform;
use std::path::Path;

/// 自定义声音文件支持的扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".mp4", ".wav", ".wma", ".webm"];

/// 将 `{file}` 和 `{volume}` 代入命令模板
pub fn render_template(template: &str, file: Option<&str>, volume: f64) -> String {
    let rendered = template.replace("{volume}", &format!("{:.2}", volume));
    match file {
        Some(file) => rendered.replace("{file}", file),
        None => rendered,
    }
}

/// 检查声音文件扩展名（不区分大小写）
pub fn check_format(path: &Path) -> Result<(), PlaybackError> {
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(PlaybackError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }
}

/// 使用平台默认播放器播放自定义声音文件的命令
pub fn file_player_command(
    platform: &Platform,
    file: &str,
    volume: f64,
) -> Result<String, PlaybackError> {
    let command = match platform {
        Platform::Windows => format!(
            "powershell -c \"Add-Type -AssemblyName presentationCore; \
             $p = New-Object System.Windows.Media.MediaPlayer; \
             $p.Open([uri]'{}'); $p.Volume = {:.2}; $p.Play(); Start-Sleep -Seconds 3\"",
            file.replace('\'', "''"),
            volume
        ),
        Platform::MacOs => format!("afplay \"{}\"", file),
        Platform::Linux => format!("paplay \"{}\"", file),
        Platform::Other(name) => return Err(PlaybackError::UnsupportedPlatform(name.clone())),
    };
    Ok(command)
}

const WINDOWS_SYSTEM_SOUNDS: &[&str] = &[
    "powershell -c \"[System.Media.SystemSounds]::Exclamation.Play()\"",
    "powershell -c \"[console]::beep(800,200)\"",
    "powershell -c \"echo `a\"",
];

const MACOS_SYSTEM_SOUNDS: &[&str] = &[
    "afplay /System/Library/Sounds/Glass.aiff",
    "osascript -e beep",
];

const LINUX_SYSTEM_SOUNDS: &[&str] = &[
    "paplay /usr/share/sounds/freedesktop/stereo/complete.oga",
    "paplay /usr/share/sounds/alsa/Front_Left.wav",
    "aplay -q /usr/share/sounds/alsa/Front_Left.wav",
];

/// 系统声音命令（按尝试顺序）
pub fn system_sound_commands(platform: &Platform) -> Result<&'static [&'static str], PlaybackError> {
    match platform {
        Platform::Windows => Ok(WINDOWS_SYSTEM_SOUNDS),
        Platform::MacOs => Ok(MACOS_SYSTEM_SOUNDS),
        Platform::Linux => Ok(LINUX_SYSTEM_SOUNDS),
        Platform::Other(name) => Err(PlaybackError::UnsupportedPlatform(name.clone())),
    }
}

/// host 通知附带的提示音（部分平台没有）
pub fn beep_command(platform: &Platform) -> Option<&'static str> {
    match platform {
        Platform::Windows => Some("powershell -c \"[console]::beep(800,200)\""),
        Platform::MacOs => Some("osascript -e beep"),
        Platform::Linux | Platform::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_replaces_all_placeholders() {
        let rendered = render_template("play {file} --vol {volume} # {file}", Some("/a.wav"), 0.5);
        assert_eq!(rendered, "play /a.wav --vol 0.50 # /a.wav");
    }

    #[test]
    fn test_render_template_without_file_keeps_file_placeholder() {
        assert_eq!(render_template("beep {file}", None, 1.0), "beep {file}");
    }

    #[test]
    fn test_check_format() {
        assert!(check_format(Path::new("/sounds/done.wav")).is_ok());
        assert!(check_format(Path::new("/sounds/done.WMA")).is_ok());
        assert!(check_format(Path::new("/sounds/done.webm")).is_ok());
        assert!(check_format(Path::new("C:\\sounds\\done.mp4")).is_ok());

        match check_format(Path::new("/sounds/done.txt")) {
            Err(PlaybackError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, ".txt"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(check_format(Path::new("/sounds/done")).is_err());
    }

    #[test]
    fn test_file_player_commands() {
        assert_eq!(
            file_player_command(&Platform::MacOs, "/s/done.wav", 1.0).unwrap(),
            "afplay \"/s/done.wav\""
        );
        assert_eq!(
            file_player_command(&Platform::Linux, "/s/done.wav", 1.0).unwrap(),
            "paplay \"/s/done.wav\""
        );
        let windows = file_player_command(&Platform::Windows, "C:\\it's.wav", 0.25).unwrap();
        assert!(windows.contains("MediaPlayer"));
        assert!(windows.contains("C:\\it''s.wav"));
        assert!(windows.contains("$p.Volume = 0.25"));
        assert!(matches!(
            file_player_command(&Platform::from_os("haiku"), "x.wav", 1.0),
            Err(PlaybackError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_system_sound_lists() {
        assert_eq!(system_sound_commands(&Platform::Windows).unwrap().len(), 3);
        assert_eq!(system_sound_commands(&Platform::MacOs).unwrap()[0], "afplay /System/Library/Sounds/Glass.aiff");
        assert!(system_sound_commands(&Platform::from_os("haiku")).is_err());
        assert!(beep_command(&Platform::Linux).is_none());
    }
}

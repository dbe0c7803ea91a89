//! 完成检测启发式规则 - 粗略判断，并非可靠信号

use crate::infra::events::ContentChange;
use regex::Regex;
use std::sync::LazyLock;

/// 表示 agent 终端的名称片段
const AGENT_TERMINAL_MARKERS: &[&str] = &["copilot", "agent", "github"];

/// 视为代码文档的语言
pub const CODE_LANGUAGES: &[&str] = &[
    "typescript", "javascript", "python", "java", "csharp", "cpp", "c", "go", "rust", "php",
    "ruby", "swift",
];

/// 插入文本超过该字符数时视为机器生成
pub const GENERATION_MIN_CHARS: usize = 50;

/// 每次轮询扫描的终端输出行数
pub const OUTPUT_SCAN_LINES: usize = 30;

static COMPLETION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)coding agent will continue work",
        r"(?i)task completed",
        r"(?i)implementation complete",
        r"(?i)pull request created",
        r"(?i)github copilot.*complete",
        r"(?i)agent.*finished",
        r"(?i)copilot.*done",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("completion pattern is valid"))
    .collect()
});

/// 终端名称包含 copilot / agent / github（不区分大小写）
pub fn is_agent_terminal(name: &str) -> bool {
    let name = name.to_lowercase();
    AGENT_TERMINAL_MARKERS.iter().any(|m| name.contains(m))
}

/// 变更的配置节是否影响 `namespace`
///
/// 配置节等于命名空间本身、是其子节或父节时返回 true
pub fn affects_namespace(section: &str, namespace: &str) -> bool {
    section == namespace
        || is_child_section(section, namespace)
        || is_child_section(namespace, section)
}

fn is_child_section(child: &str, parent: &str) -> bool {
    child
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('.'))
}

pub fn is_code_language(language_id: &str) -> bool {
    CODE_LANGUAGES.contains(&language_id)
}

/// 是否存在超过 [`GENERATION_MIN_CHARS`] 个字符的纯插入
pub fn looks_like_generation(changes: &[ContentChange]) -> bool {
    changes
        .iter()
        .any(|c| c.range_length == 0 && c.text.chars().count() > GENERATION_MIN_CHARS)
}

/// 终端输出是否包含 agent 完成消息
pub fn is_completion_message(output: &str) -> bool {
    let context = last_lines(output, OUTPUT_SCAN_LINES);
    COMPLETION_PATTERNS.iter().any(|p| p.is_match(&context))
}

/// 获取最后 N 行
pub fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// 获取最后不超过 `max` 字节的内容（按字符边界截断）
pub fn tail_bytes(text: &str, max: usize) -> &str {
    let mut start = text.len().saturating_sub(max);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

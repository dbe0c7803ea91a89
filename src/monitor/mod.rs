//! Agent 活动监控 - 从编辑器事件推断任务完成

mod activity;
mod debounce;
pub mod heuristics;

pub use activity::{ActivityMonitor, MonitorOptions};
pub use debounce::Debouncer;

use std::fmt;

/// 候选事件的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// 当前终端像是 agent 终端
    TerminalName,
    /// Agent 配置变更（延迟后）
    Configuration,
    /// 代码文档中的大段纯插入
    DocumentEdit,
    /// 终端输出匹配完成消息
    TerminalOutput,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandidateSource::TerminalName => "terminal_name",
            CandidateSource::Configuration => "configuration",
            CandidateSource::DocumentEdit => "document_edit",
            CandidateSource::TerminalOutput => "terminal_output",
        };
        f.write_str(name)
    }
}

/// 经过防抖的 agent 完成事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    pub source: CandidateSource,
}

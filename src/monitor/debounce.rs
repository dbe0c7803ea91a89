//! 防抖 - 每个窗口内最多接受一次完成事件

use std::time::Duration;
use tokio::time::Instant;

/// 默认防抖窗口
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_secs(5);

/// 防抖器：距上次接受超过窗口时间才接受新候选，被拒绝的候选直接丢弃
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_fire: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fire: None,
        }
    }

    /// 候选被接受时记录 `now` 并返回 true
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let accepted = match self.last_fire {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.window,
        };
        if accepted {
            self.last_fire = Some(now);
        }
        accepted
    }

    pub fn last_fire(&self) -> Option<Instant> {
        self.last_fire
    }

    pub fn reset(&mut self) {
        self.last_fire = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_fires() {
        let mut debouncer = Debouncer::default();
        assert!(debouncer.last_fire().is_none());
        assert!(debouncer.try_fire(Instant::now()));
        assert!(debouncer.last_fire().is_some());
    }

    #[test]
    fn test_candidates_inside_window_are_dropped() {
        let mut debouncer = Debouncer::new(Duration::from_secs(5));
        let t0 = Instant::now();

        assert!(debouncer.try_fire(t0));
        for ms in [1, 100, 2_000, 4_999] {
            assert!(!debouncer.try_fire(t0 + Duration::from_millis(ms)));
        }
        // 被丢弃的候选不会刷新窗口
        assert_eq!(debouncer.last_fire(), Some(t0));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let mut debouncer = Debouncer::new(Duration::from_secs(5));
        let t0 = Instant::now();

        assert!(debouncer.try_fire(t0));
        assert!(debouncer.try_fire(t0 + Duration::from_secs(5)));
        assert!(!debouncer.try_fire(t0 + Duration::from_secs(6)));
        assert!(debouncer.try_fire(t0 + Duration::from_millis(10_001)));
    }

    #[test]
    fn test_reset_clears_last_fire() {
        let mut debouncer = Debouncer::default();
        let t0 = Instant::now();
        assert!(debouncer.try_fire(t0));
        debouncer.reset();
        assert!(debouncer.try_fire(t0 + Duration::from_millis(1)));
    }
}

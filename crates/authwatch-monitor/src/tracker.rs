//! ID별 실패 윈도우 추적.

use authwatch_core::LogEntry;
use std::collections::{HashMap, VecDeque};

/// ID별로 최근 실패 엔트리를 제한된 길이로 보관하는 추적기.
///
/// 윈도우 길이는 임계값을 절대 넘지 않으며, 초과 시 가장 오래된 엔트리가
/// FIFO로 밀려납니다. 성공 엔트리는 이 컴포넌트에 도달하지 않습니다 -
/// 실패 엔트리만 상류에서 전달됩니다.
pub struct FailureWindowTracker {
    threshold: usize,
    windows: HashMap<String, VecDeque<LogEntry>>,
}

impl FailureWindowTracker {
    /// 주어진 임계값으로 추적기를 생성합니다.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            windows: HashMap::new(),
        }
    }

    /// 실패 엔트리를 해당 ID의 윈도우에 기록합니다.
    ///
    /// 윈도우는 첫 실패 시 lazy하게 생성되며, 임계값을 초과하면 가장
    /// 오래된 엔트리가 제거됩니다.
    pub fn record_failure(&mut self, entry: LogEntry) {
        let window = self
            .windows
            .entry(entry.identity.clone())
            .or_insert_with(|| VecDeque::with_capacity(self.threshold));

        window.push_back(entry);
        if window.len() > self.threshold {
            window.pop_front();
        }
    }

    /// 해당 ID의 윈도우가 임계값에 도달했는지 확인합니다.
    pub fn is_tripped(&self, identity: &str) -> bool {
        self.windows
            .get(identity)
            .map(|window| window.len() == self.threshold)
            .unwrap_or(false)
    }

    /// 해당 ID의 윈도우를 비웁니다 (윈도우 자체는 유지).
    pub fn reset(&mut self, identity: &str) {
        if let Some(window) = self.windows.get_mut(identity) {
            window.clear();
        }
    }

    /// 해당 ID의 현재 윈도우 길이.
    pub fn window_len(&self, identity: &str) -> usize {
        self.windows.get(identity).map(VecDeque::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authwatch_core::LoginOutcome;

    fn failure(identity: &str, timestamp: &str) -> LogEntry {
        LogEntry {
            timestamp: timestamp.to_string(),
            identity: identity.to_string(),
            outcome: LoginOutcome::Failure,
            raw: format!("{} - raw", timestamp),
        }
    }

    #[test]
    fn test_window_never_exceeds_threshold() {
        let mut tracker = FailureWindowTracker::new(3);
        for i in 0..10 {
            tracker.record_failure(failure("UID-AAAA1111", &format!("t{}", i)));
            assert!(tracker.window_len("UID-AAAA1111") <= 3);
        }
        assert_eq!(tracker.window_len("UID-AAAA1111"), 3);
    }

    #[test]
    fn test_trips_at_exactly_threshold() {
        let mut tracker = FailureWindowTracker::new(3);
        tracker.record_failure(failure("UID-AAAA1111", "t1"));
        assert!(!tracker.is_tripped("UID-AAAA1111"));
        tracker.record_failure(failure("UID-AAAA1111", "t2"));
        assert!(!tracker.is_tripped("UID-AAAA1111"));
        tracker.record_failure(failure("UID-AAAA1111", "t3"));
        assert!(tracker.is_tripped("UID-AAAA1111"));
    }

    #[test]
    fn test_identities_are_tracked_independently() {
        let mut tracker = FailureWindowTracker::new(3);
        tracker.record_failure(failure("UID-AAAA1111", "t1"));
        tracker.record_failure(failure("UID-BBBB2222", "t1"));
        tracker.record_failure(failure("UID-AAAA1111", "t2"));
        tracker.record_failure(failure("UID-AAAA1111", "t3"));

        assert!(tracker.is_tripped("UID-AAAA1111"));
        assert!(!tracker.is_tripped("UID-BBBB2222"));
    }

    #[test]
    fn test_reset_clears_window() {
        let mut tracker = FailureWindowTracker::new(3);
        for t in ["t1", "t2", "t3"] {
            tracker.record_failure(failure("UID-AAAA1111", t));
        }
        assert!(tracker.is_tripped("UID-AAAA1111"));

        tracker.reset("UID-AAAA1111");
        assert!(!tracker.is_tripped("UID-AAAA1111"));
        assert_eq!(tracker.window_len("UID-AAAA1111"), 0);
    }

    #[test]
    fn test_unknown_identity_is_not_tripped() {
        let tracker = FailureWindowTracker::new(3);
        assert!(!tracker.is_tripped("UID-ZZZZ9999"));
        assert_eq!(tracker.window_len("UID-ZZZZ9999"), 0);
    }
}

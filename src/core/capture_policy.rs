use crate::hardware::camera::CaptureStats;

/// ループの最短待ち時間。0ms 指定でも他タスクに CPU を譲る
pub const MIN_LOOP_DELAY_MS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthAction {
    Continue,
    /// 連続失敗が上限に達した。チップを再起動する
    Restart,
}

/// 連続キャプチャ失敗の監視
///
/// 失敗の種類は区別しません。種類ごとのログはマネージャ側で出しています。
#[derive(Debug, Clone)]
pub struct CaptureHealth {
    max_consecutive_failures: u32,
    consecutive_failures: u32,
}

impl CaptureHealth {
    pub fn new(max_consecutive_failures: u32) -> Self {
        Self {
            max_consecutive_failures: max_consecutive_failures.max(1),
            consecutive_failures: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self) -> HealthAction {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures >= self.max_consecutive_failures {
            HealthAction::Restart
        } else {
            HealthAction::Continue
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

pub fn loop_delay_ms(capture_interval_ms: u32) -> u32 {
    capture_interval_ms.max(MIN_LOOP_DELAY_MS)
}

/// `every` 回の試行ごとに true
pub fn should_log_stats(stats: &CaptureStats, every: u32) -> bool {
    let attempts = stats.attempts();
    every > 0 && attempts > 0 && attempts % u64::from(every) == 0
}

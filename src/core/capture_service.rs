use log::{debug, error, info};

use crate::core::capture_policy::{should_log_stats, CaptureHealth, HealthAction};
use crate::core::config::AppConfig;
use crate::hardware::camera::{CameraDriver, CaptureStats, FrameCaptureManager};

/// キャプチャサービス - 初期化済みカメラからフレームを取り出して消費者へ渡す
pub struct CaptureService<D: CameraDriver> {
    manager: FrameCaptureManager<D>,
    health: CaptureHealth,
    stats_log_every: u32,
    debug_mode: bool,
}

impl<D: CameraDriver> CaptureService<D> {
    pub fn new(manager: FrameCaptureManager<D>, app_config: &AppConfig) -> Self {
        Self {
            manager,
            health: CaptureHealth::new(app_config.max_consecutive_failures),
            stats_log_every: app_config.stats_log_every,
            debug_mode: app_config.debug_mode,
        }
    }

    /// カメラウォームアップ（指定回数分フレームを捨てる）
    ///
    /// 取得できたフレーム数を返します。ヘルス監視には含めません。
    pub fn warm_up(&mut self, frames: u8) -> u8 {
        let mut captured = 0;
        for i in 0..frames {
            match self.manager.capture_frame() {
                Ok(_frame) => captured += 1,
                Err(e) => debug!("ウォームアップキャプチャ失敗: {}", e),
            }
            info!("ウォームアップキャプチャ {} / {}", i + 1, frames);
        }
        captured
    }

    /// 1フレームを取得して `consume` に渡し、返却まで行います
    pub fn run_cycle<F>(&mut self, consume: F) -> HealthAction
    where
        F: FnOnce(&[u8]),
    {
        let action = match self.manager.capture_frame() {
            Ok(frame) => {
                if self.debug_mode {
                    info!(
                        "フレーム取得: {}x{} {} {} bytes",
                        frame.width(),
                        frame.height(),
                        frame.format(),
                        frame.len()
                    );
                }
                consume(&frame);
                drop(frame);
                self.health.record_success();
                HealthAction::Continue
            }
            Err(e) => {
                let action = self.health.record_failure();
                if action == HealthAction::Restart {
                    error!(
                        "キャプチャが{}回連続で失敗しました: {}",
                        self.health.consecutive_failures(),
                        e
                    );
                }
                action
            }
        };

        let stats = self.manager.capture_stats();
        if should_log_stats(&stats, self.stats_log_every) {
            info!("キャプチャ統計: {}", stats);
        }
        action
    }

    pub fn stats(&self) -> CaptureStats {
        self.manager.capture_stats()
    }

    pub fn manager(&self) -> &FrameCaptureManager<D> {
        &self.manager
    }

    pub fn into_manager(self) -> FrameCaptureManager<D> {
        self.manager
    }
}

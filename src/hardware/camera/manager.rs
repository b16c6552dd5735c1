use std::ops::Deref;

use log::{debug, error, info, warn};

use crate::hardware::board::BoardPlatform;
use crate::hardware::camera::config::{DeviceConfig, PixelFormat};
use crate::hardware::camera::driver::{CameraDriver, FrameData};
use crate::hardware::camera::error::{CaptureError, InitError};

/// キャプチャ成功・失敗の累積カウンタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub ok: u32,
    pub fail: u32,
}

impl CaptureStats {
    /// `(ok_count, fail_count)`
    pub fn as_tuple(&self) -> (u32, u32) {
        (self.ok, self.fail)
    }

    pub fn attempts(&self) -> u64 {
        u64::from(self.ok) + u64::from(self.fail)
    }

    fn record_success(&mut self) {
        self.ok = self.ok.saturating_add(1);
    }

    fn record_failure(&mut self) {
        self.fail = self.fail.saturating_add(1);
    }
}

impl std::fmt::Display for CaptureStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ok={} fail={}", self.ok, self.fail)
    }
}

/// フレームキャプチャ管理
///
/// ドライバから借りたフレームバッファを最大1つだけ保持し、
/// `release()` でドライバへ返却します。`init()` で構築され、
/// drop 時に未返却のバッファを返してからドライバを停止します。
pub struct FrameCaptureManager<D: CameraDriver> {
    driver: D,
    config: DeviceConfig,
    outstanding: Option<D::Frame>,
    stats: CaptureStats,
}

impl<D: CameraDriver> FrameCaptureManager<D> {
    /// カメラ電源を投入し、安定待ちの後にドライバを初期化します
    ///
    /// SCCB は電源が安定するまで応答しないため、この順序は変えられません。
    /// 失敗した場合は再試行しません。
    pub fn init<B: BoardPlatform>(
        mut driver: D,
        board: &mut B,
        config: DeviceConfig,
    ) -> Result<Self, InitError> {
        let power = config.power;
        info!(
            "カメラ電源をオンにします (GPIO{} -> {:?})",
            power.pin, power.active_level
        );
        board.configure_output(power.pin)?;
        board.set_level(power.pin, power.active_level)?;
        board.delay_ms(power.settle_ms);

        info!(
            "カメラドライバを初期化中: {:?} {:?}, fb_count={}",
            config.pixel_format, config.frame_size, config.fb_count
        );
        if let Err(status) = driver.init(&config) {
            error!("カメラドライバの初期化に失敗しました: {}", status);
            return Err(InitError::Driver { status });
        }
        info!("カメラ初期化完了");

        Ok(Self {
            driver,
            config,
            outstanding: None,
            stats: CaptureStats::default(),
        })
    }

    /// フレームを1枚取得し、ドライバ所有のメモリをそのまま借用で返します
    ///
    /// 返したスライスは次の `release()` まで有効です。前のフレームが
    /// 未返却の場合はドライバに触れず `AlreadyOutstanding` を返します。
    pub fn capture(&mut self) -> Result<&[u8], CaptureError> {
        if self.outstanding.is_some() {
            self.stats.record_failure();
            warn!("前回のフレームが未返却のためキャプチャを拒否しました");
            return Err(CaptureError::AlreadyOutstanding);
        }

        let Some(frame) = self.driver.acquire_frame() else {
            self.stats.record_failure();
            warn!("カメラキャプチャに失敗しました");
            return Err(CaptureError::NoBuffer);
        };

        let expected = self.config.pixel_format;
        let actual = frame.format();
        if actual != expected {
            // 不一致のバッファは即座に返却してリークさせない
            self.driver.release_frame(frame);
            self.stats.record_failure();
            warn!("想定外のピクセルフォーマット: {} (expected {})", actual, expected);
            return Err(CaptureError::FormatMismatch { expected, actual });
        }

        self.stats.record_success();
        debug!(
            "フレーム取得: {}x{} {} bytes",
            frame.width(),
            frame.height(),
            frame.len()
        );
        Ok(self.outstanding.insert(frame).data())
    }

    /// 保持中のフレームをドライバへ返却します。保持していなければ何もしません
    pub fn release(&mut self) {
        if let Some(frame) = self.outstanding.take() {
            self.driver.release_frame(frame);
        }
    }

    /// `capture()` を行い、drop 時に `release()` するガードを返します
    pub fn capture_frame(&mut self) -> Result<FrameGuard<'_, D>, CaptureError> {
        self.capture()?;
        Ok(FrameGuard { manager: self })
    }

    pub fn capture_stats(&self) -> CaptureStats {
        self.stats
    }

    pub fn has_outstanding(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }
}

impl<D: CameraDriver> Drop for FrameCaptureManager<D> {
    fn drop(&mut self) {
        self.release();
        self.driver.deinit();
        info!("カメラを停止しました ({})", self.stats);
    }
}

/// 取得済みフレームへのスコープ付きアクセス
///
/// どの経路でスコープを抜けてもフレームはドライバへ返却されます。
pub struct FrameGuard<'a, D: CameraDriver> {
    manager: &'a mut FrameCaptureManager<D>,
}

impl<D: CameraDriver> FrameGuard<'_, D> {
    pub fn data(&self) -> &[u8] {
        self.manager
            .outstanding
            .as_ref()
            .map(|frame| frame.data())
            .unwrap_or_default()
    }

    pub fn format(&self) -> PixelFormat {
        self.manager.config.pixel_format
    }

    pub fn width(&self) -> usize {
        self.manager.outstanding.as_ref().map_or(0, |frame| frame.width())
    }

    pub fn height(&self) -> usize {
        self.manager.outstanding.as_ref().map_or(0, |frame| frame.height())
    }
}

impl<D: CameraDriver> Deref for FrameGuard<'_, D> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data()
    }
}

impl<D: CameraDriver> Drop for FrameGuard<'_, D> {
    fn drop(&mut self) {
        self.manager.release();
    }
}

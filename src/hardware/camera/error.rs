use crate::hardware::board::PlatformError;
use crate::hardware::camera::config::PixelFormat;

/// カメラドライバが返すステータスコード（`esp_err_t`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverStatus(pub i32);

impl DriverStatus {
    pub const INVALID_ARG: Self = Self(0x102);
    /// esp32-camera: SCCB でセンサーを検出できない
    pub const CAMERA_NOT_DETECTED: Self = Self(0x20001);
    /// esp32-camera: 未対応のピクセルフォーマット
    pub const CAMERA_NOT_SUPPORTED: Self = Self(0x20004);

    pub fn code(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:x})", self.0, self.0)
    }
}

#[cfg(feature = "esp")]
impl From<esp_idf_sys::EspError> for DriverStatus {
    fn from(error: esp_idf_sys::EspError) -> Self {
        DriverStatus(error.code())
    }
}

/// カメラ初期化エラー
///
/// 初期化は1回きりで、失敗した場合デバイスとしては致命的です。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("カメラ電源の制御に失敗しました: {0}")]
    Power(#[from] PlatformError),
    #[error("カメラドライバの初期化に失敗しました: esp_err_t {status}")]
    Driver { status: DriverStatus },
}

/// キャプチャエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// ドライバがフレームを返さなかった（露光タイミング、バスのハング等）
    #[error("カメラからフレームを取得できませんでした")]
    NoBuffer,
    /// 設定と異なるエンコーディングのフレームが返された（バッファは返却済み）
    #[error("想定外のピクセルフォーマット: expected {expected}, got {actual}")]
    FormatMismatch {
        expected: PixelFormat,
        actual: PixelFormat,
    },
    /// 前回のフレームがまだ返却されていない
    #[error("前回のフレームバッファが未返却です")]
    AlreadyOutstanding,
}

/// カメラデバイス設定（ピン、クロック、フォーマット）
pub mod config;
/// ドライバ境界のトレイト
pub mod driver;
pub mod error;
/// フレームバッファ所有権の管理
pub mod manager;

#[cfg(feature = "esp")]
pub mod esp;

// Mock実装（テストとnon-espビルドで使用可能）
#[cfg(not(feature = "esp"))]
pub mod mock;

pub use config::{DeviceConfig, FbLocation, FrameSize, GrabMode, PixelFormat, PowerEnable};
pub use driver::{CameraDriver, FrameData};
pub use error::{CaptureError, DriverStatus, InitError};
pub use manager::{CaptureStats, FrameCaptureManager, FrameGuard};

#[cfg(feature = "esp")]
pub use esp::{EspCameraDriver, EspFrame};

/*!
 * # AtomS3R GC0308 Camera Library
 *
 * M5Stack AtomS3R-CAM の GC0308 カメラを初期化し、RGB565 フレームを
 * 取り出すためのライブラリ
 *
 * ## モジュール構成
 * - `core`: アプリケーション設定、キャプチャループのポリシーとサービス
 * - `hardware`: ハードウェア制御（カメラ電源、ピン設定、フレームバッファ管理）
 *
 * `esp` フィーチャーを無効にしたホストビルドでは、ESP-IDF の代わりに
 * `hardware::camera::mock` のモックドライバが使えます。
 */

// 公開モジュール
pub mod core;
pub mod hardware;

// 内部で使用する型をまとめてエクスポート
pub use crate::core::{AppConfig, CaptureService, ConfigError, HealthAction};
pub use hardware::camera::{
    CameraDriver, CaptureError, CaptureStats, DeviceConfig, DriverStatus, FrameCaptureManager,
    FrameData, FrameGuard, InitError, PixelFormat,
};
pub use hardware::{BoardPlatform, CameraPins, PinLevel, PlatformError};

/// ライブラリのバージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

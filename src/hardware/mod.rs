/// ハードウェア制御モジュール
pub mod board;
pub mod camera;
pub mod pins;

pub use board::{BoardPlatform, PinLevel, PlatformError};
pub use pins::CameraPins;

#[cfg(feature = "esp")]
pub use board::EspIdfBoard;

/// カメラデバイス設定
///
/// ボードごとにコンパイル時に固定される設定値。実行時には変更しません。
use crate::hardware::board::PinLevel;
use crate::hardware::pins::{self, CameraPins};

/// ピクセルフォーマット（esp32-camera の `pixformat_t` に対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb565,
    Yuv422,
    Grayscale,
    Jpeg,
    Rgb888,
    /// ドライバが返した未知のフォーマット値
    Unknown(u32),
}

impl PixelFormat {
    /// 1ピクセルあたりのバイト数（圧縮フォーマットは `None`）
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Rgb565 | PixelFormat::Yuv422 => Some(2),
            PixelFormat::Grayscale => Some(1),
            PixelFormat::Rgb888 => Some(3),
            PixelFormat::Jpeg | PixelFormat::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Rgb565 => write!(f, "RGB565"),
            PixelFormat::Yuv422 => write!(f, "YUV422"),
            PixelFormat::Grayscale => write!(f, "GRAYSCALE"),
            PixelFormat::Jpeg => write!(f, "JPEG"),
            PixelFormat::Rgb888 => write!(f, "RGB888"),
            PixelFormat::Unknown(raw) => write!(f, "UNKNOWN({})", raw),
        }
    }
}

/// フレームサイズ（GC0308 の最大は VGA）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSize {
    /// 160x120
    Qqvga,
    /// 320x240
    Qvga,
    /// 480x320
    Hvga,
    /// 640x480
    Vga,
}

impl FrameSize {
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            FrameSize::Qqvga => (160, 120),
            FrameSize::Qvga => (320, 240),
            FrameSize::Hvga => (480, 320),
            FrameSize::Vga => (640, 480),
        }
    }
}

/// フレームバッファの配置先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FbLocation {
    Psram,
    Dram,
}

/// 複数フレームがキューにある場合にどれを渡すか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabMode {
    /// バッファが空いたときだけ取り込む
    WhenEmpty,
    /// 常に最新フレームを渡す
    Latest,
}

/// カメラ電源イネーブル線の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerEnable {
    pub pin: i32,
    /// 電源オン時に出力するレベル
    pub active_level: PinLevel,
    /// 電源オンから SCCB プローブまでの待ち時間（ミリ秒）
    pub settle_ms: u32,
}

/// 電源安定待ち時間。これより早く SCCB をプローブすると GC0308 が応答しない
pub const POWER_SETTLE_MS: u32 = 100;

/// デバイス設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub power: PowerEnable,
    pub pins: CameraPins,
    pub xclk_freq_hz: u32,
    pub ledc_timer: u8,
    pub ledc_channel: u8,
    pub pixel_format: PixelFormat,
    pub frame_size: FrameSize,
    /// JPEG 以外では未使用
    pub jpeg_quality: u8,
    pub fb_count: u8,
    pub fb_location: FbLocation,
    pub grab_mode: GrabMode,
    pub sccb_i2c_port: u8,
}

impl DeviceConfig {
    /// M5Stack AtomS3R-CAM (GC0308) 用の固定設定
    pub const ATOMS3R_GC0308: Self = Self {
        power: PowerEnable {
            pin: pins::CAMERA_POWER_N,
            active_level: PinLevel::Low,
            settle_ms: POWER_SETTLE_MS,
        },
        pins: CameraPins::ATOMS3R,
        xclk_freq_hz: 20_000_000,
        ledc_timer: 0,
        ledc_channel: 0,
        pixel_format: PixelFormat::Rgb565,
        frame_size: FrameSize::Qvga,
        jpeg_quality: 12,
        fb_count: 2,
        fb_location: FbLocation::Psram,
        grab_mode: GrabMode::Latest,
        sccb_i2c_port: 0,
    };

    /// 1フレームの想定バイト数（圧縮フォーマットは `None`）
    pub fn expected_frame_len(&self) -> Option<usize> {
        let (width, height) = self.frame_size.dimensions();
        self.pixel_format
            .bytes_per_pixel()
            .map(|bpp| width * height * bpp)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::ATOMS3R_GC0308
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms3r_uses_active_low_power_on_gpio18() {
        let config = DeviceConfig::ATOMS3R_GC0308;
        assert_eq!(config.power.pin, 18);
        assert_eq!(config.power.active_level, PinLevel::Low);
        assert_eq!(config.power.settle_ms, 100);
    }

    #[test]
    fn atoms3r_captures_qvga_rgb565() {
        let config = DeviceConfig::default();
        assert_eq!(config.pixel_format, PixelFormat::Rgb565);
        assert_eq!(config.frame_size.dimensions(), (320, 240));
        assert_eq!(config.expected_frame_len(), Some(153_600));
    }

    #[test]
    fn atoms3r_double_buffers_in_psram_and_grabs_latest() {
        let config = DeviceConfig::default();
        assert_eq!(config.fb_count, 2);
        assert_eq!(config.fb_location, FbLocation::Psram);
        assert_eq!(config.grab_mode, GrabMode::Latest);
        assert_eq!(config.xclk_freq_hz, 20_000_000);
        assert_eq!(config.sccb_i2c_port, 0);
    }

    #[test]
    fn jpeg_has_no_fixed_frame_length() {
        let config = DeviceConfig {
            pixel_format: PixelFormat::Jpeg,
            ..DeviceConfig::default()
        };
        assert_eq!(config.expected_frame_len(), None);
    }

    #[test]
    fn unknown_format_is_displayed_with_raw_value() {
        assert_eq!(PixelFormat::Unknown(42).to_string(), "UNKNOWN(42)");
        assert_eq!(PixelFormat::Rgb565.to_string(), "RGB565");
    }
}

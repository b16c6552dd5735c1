//! M5Stack AtomS3R-CAM のカメラ関連ピン番号
//!
//! AtomS3R-CAM ドキュメントのピンマップ (GC0308) に準拠。
//! `-1` はピンが接続されていないことを示します（esp32-camera の規約）。

/// カメラ電源イネーブル (POWER_N, アクティブLOW)
///
/// センサーの PWDN ピンではなく外部電源レールの制御ピン。
pub const CAMERA_POWER_N: i32 = 18;

/// センサー PWDN（未配線）
pub const PWDN: i32 = -1;
/// センサー RESET（未配線）
pub const RESET: i32 = -1;

pub const XCLK: i32 = 21;
/// CAM_SDA
pub const SCCB_SDA: i32 = 12;
/// CAM_SCL
pub const SCCB_SCL: i32 = 9;

pub const Y9: i32 = 13;
pub const Y8: i32 = 11;
pub const Y7: i32 = 17;
pub const Y6: i32 = 4;
pub const Y5: i32 = 48;
pub const Y4: i32 = 46;
pub const Y3: i32 = 42;
pub const Y2: i32 = 3;

pub const VSYNC: i32 = 10;
pub const HREF: i32 = 14;
pub const PCLK: i32 = 40;

/// カメラピン設定構造体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraPins {
    pub pwdn: i32,
    pub reset: i32,
    pub xclk: i32,
    pub sccb_sda: i32,
    pub sccb_scl: i32,
    /// D0..D7 の順
    pub data: [i32; 8],
    pub vsync: i32,
    pub href: i32,
    pub pclk: i32,
}

impl CameraPins {
    /// AtomS3R-CAM のピン配置
    pub const ATOMS3R: Self = Self {
        pwdn: PWDN,
        reset: RESET,
        xclk: XCLK,
        sccb_sda: SCCB_SDA,
        sccb_scl: SCCB_SCL,
        data: [Y2, Y3, Y4, Y5, Y6, Y7, Y8, Y9],
        vsync: VSYNC,
        href: HREF,
        pclk: PCLK,
    };

    /// D0..D7 が重複なく、他の信号線とも衝突していないか
    #[cfg(test)]
    fn has_unique_assignments(&self) -> bool {
        let mut used: Vec<i32> = self.data.to_vec();
        used.extend([
            self.xclk,
            self.sccb_sda,
            self.sccb_scl,
            self.vsync,
            self.href,
            self.pclk,
        ]);
        used.extend([self.pwdn, self.reset].into_iter().filter(|&p| p >= 0));

        let total = used.len();
        used.sort_unstable();
        used.dedup();
        used.len() == total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms3r_data_pins_follow_y2_to_y9() {
        assert_eq!(CameraPins::ATOMS3R.data, [3, 42, 46, 48, 4, 17, 11, 13]);
    }

    #[test]
    fn atoms3r_pins_do_not_collide() {
        assert!(CameraPins::ATOMS3R.has_unique_assignments());
    }

    #[test]
    fn power_pin_is_not_a_camera_signal() {
        let pins = CameraPins::ATOMS3R;
        assert!(!pins.data.contains(&CAMERA_POWER_N));
        assert_ne!(pins.pwdn, CAMERA_POWER_N);
    }

    #[test]
    fn duplicated_data_pin_is_detected() {
        let mut pins = CameraPins::ATOMS3R;
        pins.data[0] = pins.pclk;
        assert!(!pins.has_unique_assignments());
    }
}

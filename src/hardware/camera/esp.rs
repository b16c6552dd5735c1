//! esp32-camera backed driver.
//!
//! Frame handles wrap the raw `camera_fb_t` pointer handed out by
//! `esp_camera_fb_get`, so they are neither `Send` nor `Clone`.

use std::ptr::NonNull;

use esp_idf_sys::{self as sys, camera, esp};
use log::{info, warn};

use crate::hardware::camera::config::{DeviceConfig, FbLocation, FrameSize, GrabMode, PixelFormat};
use crate::hardware::camera::driver::{CameraDriver, FrameData};
use crate::hardware::camera::error::DriverStatus;

/// `esp_camera_fb_get` で取得したフレームバッファ
pub struct EspFrame {
    fb: NonNull<camera::camera_fb_t>,
}

impl FrameData for EspFrame {
    fn data(&self) -> &[u8] {
        let fb = unsafe { self.fb.as_ref() };
        if fb.buf.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(fb.buf, fb.len) }
    }

    fn format(&self) -> PixelFormat {
        pixel_format_from_raw(unsafe { self.fb.as_ref() }.format)
    }

    fn width(&self) -> usize {
        unsafe { self.fb.as_ref() }.width
    }

    fn height(&self) -> usize {
        unsafe { self.fb.as_ref() }.height
    }
}

/// ESP-IDF specific camera driver implementation.
#[derive(Default)]
pub struct EspCameraDriver {
    initialized: bool,
}

impl EspCameraDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraDriver for EspCameraDriver {
    type Frame = EspFrame;

    fn init(&mut self, config: &DeviceConfig) -> Result<(), DriverStatus> {
        let raw = camera_config(config)?;
        esp!(unsafe { camera::esp_camera_init(&raw) })?;
        self.initialized = true;
        Ok(())
    }

    fn acquire_frame(&mut self) -> Option<EspFrame> {
        NonNull::new(unsafe { camera::esp_camera_fb_get() }).map(|fb| EspFrame { fb })
    }

    fn release_frame(&mut self, frame: EspFrame) {
        unsafe { camera::esp_camera_fb_return(frame.fb.as_ptr()) }
    }

    fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        self.initialized = false;
        match esp!(unsafe { camera::esp_camera_deinit() }) {
            Ok(()) => info!("esp_camera_deinit 完了"),
            Err(e) => warn!("esp_camera_deinit に失敗しました: {}", e),
        }
    }
}

fn camera_config(config: &DeviceConfig) -> Result<camera::camera_config_t, DriverStatus> {
    let pins = &config.pins;
    let [d0, d1, d2, d3, d4, d5, d6, d7] = pins.data;
    let xclk_freq_hz =
        i32::try_from(config.xclk_freq_hz).map_err(|_| DriverStatus::INVALID_ARG)?;

    Ok(camera::camera_config_t {
        pin_pwdn: pins.pwdn,
        pin_reset: pins.reset,
        pin_xclk: pins.xclk,
        __bindgen_anon_1: camera::camera_config_t__bindgen_ty_1 {
            pin_sccb_sda: pins.sccb_sda,
        },
        __bindgen_anon_2: camera::camera_config_t__bindgen_ty_2 {
            pin_sccb_scl: pins.sccb_scl,
        },

        pin_d7: d7,
        pin_d6: d6,
        pin_d5: d5,
        pin_d4: d4,
        pin_d3: d3,
        pin_d2: d2,
        pin_d1: d1,
        pin_d0: d0,
        pin_vsync: pins.vsync,
        pin_href: pins.href,
        pin_pclk: pins.pclk,

        xclk_freq_hz,
        ledc_timer: sys::ledc_timer_t::from(config.ledc_timer),
        ledc_channel: sys::ledc_channel_t::from(config.ledc_channel),

        pixel_format: pixel_format_to_raw(config.pixel_format)?,
        frame_size: frame_size_to_raw(config.frame_size),
        jpeg_quality: i32::from(config.jpeg_quality),
        fb_count: usize::from(config.fb_count),
        fb_location: match config.fb_location {
            FbLocation::Psram => camera::camera_fb_location_t_CAMERA_FB_IN_PSRAM,
            FbLocation::Dram => camera::camera_fb_location_t_CAMERA_FB_IN_DRAM,
        },
        grab_mode: match config.grab_mode {
            GrabMode::WhenEmpty => camera::camera_grab_mode_t_CAMERA_GRAB_WHEN_EMPTY,
            GrabMode::Latest => camera::camera_grab_mode_t_CAMERA_GRAB_LATEST,
        },
        sccb_i2c_port: i32::from(config.sccb_i2c_port),

        ..Default::default()
    })
}

fn pixel_format_to_raw(format: PixelFormat) -> Result<camera::pixformat_t, DriverStatus> {
    Ok(match format {
        PixelFormat::Rgb565 => camera::pixformat_t_PIXFORMAT_RGB565,
        PixelFormat::Yuv422 => camera::pixformat_t_PIXFORMAT_YUV422,
        PixelFormat::Grayscale => camera::pixformat_t_PIXFORMAT_GRAYSCALE,
        PixelFormat::Jpeg => camera::pixformat_t_PIXFORMAT_JPEG,
        PixelFormat::Rgb888 => camera::pixformat_t_PIXFORMAT_RGB888,
        PixelFormat::Unknown(_) => return Err(DriverStatus::CAMERA_NOT_SUPPORTED),
    })
}

fn pixel_format_from_raw(raw: camera::pixformat_t) -> PixelFormat {
    match raw {
        camera::pixformat_t_PIXFORMAT_RGB565 => PixelFormat::Rgb565,
        camera::pixformat_t_PIXFORMAT_YUV422 => PixelFormat::Yuv422,
        camera::pixformat_t_PIXFORMAT_GRAYSCALE => PixelFormat::Grayscale,
        camera::pixformat_t_PIXFORMAT_JPEG => PixelFormat::Jpeg,
        camera::pixformat_t_PIXFORMAT_RGB888 => PixelFormat::Rgb888,
        other => PixelFormat::Unknown(other as u32),
    }
}

fn frame_size_to_raw(size: FrameSize) -> camera::framesize_t {
    match size {
        FrameSize::Qqvga => camera::framesize_t_FRAMESIZE_QQVGA,
        FrameSize::Qvga => camera::framesize_t_FRAMESIZE_QVGA,
        FrameSize::Hvga => camera::framesize_t_FRAMESIZE_HVGA,
        FrameSize::Vga => camera::framesize_t_FRAMESIZE_VGA,
    }
}

//! Camera driver boundary.
//!
//! Any sensor driver exposing the init / acquire / release contract can back a
//! [`FrameCaptureManager`](super::FrameCaptureManager). On target this is the
//! esp32-camera component; host builds use the recording mock.

use super::config::{DeviceConfig, PixelFormat};
use super::error::DriverStatus;

/// Read access to a driver-owned frame buffer.
pub trait FrameData {
    /// Pixel bytes. Length equals the frame's byte length.
    fn data(&self) -> &[u8];

    fn format(&self) -> PixelFormat;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn len(&self) -> usize {
        self.data().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Platform-agnostic camera driver abstraction.
///
/// `Frame` is a handle to memory the driver still owns. It is moved back into
/// [`release_frame`](CameraDriver::release_frame), so a handle cannot be
/// returned twice.
pub trait CameraDriver {
    type Frame: FrameData;

    /// Probe the sensor and allocate frame buffers.
    fn init(&mut self, config: &DeviceConfig) -> Result<(), DriverStatus>;

    /// Take the next frame, or `None` if none became ready within the
    /// driver's own timeout.
    fn acquire_frame(&mut self) -> Option<Self::Frame>;

    /// Give a frame back to the driver's pool.
    fn release_frame(&mut self, frame: Self::Frame);

    /// Tear down the driver. Called once, after every frame has been returned.
    fn deinit(&mut self) {}
}

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::hardware::board::{pin_mask, BoardPlatform, PinLevel, PlatformError};
use crate::hardware::camera::config::{DeviceConfig, PixelFormat};
use crate::hardware::camera::driver::{CameraDriver, FrameData};
use crate::hardware::camera::error::DriverStatus;

/// テスト用のボードモック
///
/// 実際のGPIOや遅延を使わず、操作を記録して仮想時刻を進めます。
/// clone したハンドルは同じ状態を共有します。
#[derive(Debug, Clone, Default)]
pub struct MockBoard {
    state: Arc<Mutex<BoardState>>,
}

/// MockBoard に対して行われた操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    ConfigureOutput(i32),
    SetLevel(i32, PinLevel),
    Delay(u32),
}

#[derive(Debug, Default)]
struct BoardState {
    events: Vec<BoardEvent>,
    now_ms: u64,
    levels: HashMap<i32, (PinLevel, u64)>,
    failing_pin: Option<i32>,
}

/// esp_err_t ESP_ERR_INVALID_STATE
const MOCK_GPIO_FAILURE: i32 = 0x103;

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用: 指定ピンへの操作をすべて失敗させる
    pub fn fail_gpio(&self, pin: i32) {
        self.state.lock().unwrap().failing_pin = Some(pin);
    }

    /// テスト用: 記録された操作を取得
    pub fn events(&self) -> Vec<BoardEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// 仮想時刻（ミリ秒）
    pub fn now_ms(&self) -> u64 {
        self.state.lock().unwrap().now_ms
    }

    pub fn level(&self, pin: i32) -> Option<PinLevel> {
        self.state
            .lock()
            .unwrap()
            .levels
            .get(&pin)
            .map(|(level, _)| *level)
    }

    /// `pin` が `level` になってからの経過時間。現在そのレベルでなければ `None`
    pub fn held_for_ms(&self, pin: i32, level: PinLevel) -> Option<u64> {
        let state = self.state.lock().unwrap();
        match state.levels.get(&pin) {
            Some((current, since)) if *current == level => Some(state.now_ms - since),
            _ => None,
        }
    }

    fn check_pin(state: &BoardState, pin: i32) -> Result<(), PlatformError> {
        pin_mask(pin)?;
        if state.failing_pin == Some(pin) {
            return Err(PlatformError::Gpio {
                pin,
                code: MOCK_GPIO_FAILURE,
            });
        }
        Ok(())
    }
}

impl BoardPlatform for MockBoard {
    fn configure_output(&mut self, pin: i32) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        Self::check_pin(&state, pin)?;
        state.events.push(BoardEvent::ConfigureOutput(pin));
        Ok(())
    }

    fn set_level(&mut self, pin: i32, level: PinLevel) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        Self::check_pin(&state, pin)?;
        state.events.push(BoardEvent::SetLevel(pin, level));
        let now = state.now_ms;
        let unchanged = matches!(state.levels.get(&pin), Some((current, _)) if *current == level);
        if !unchanged {
            state.levels.insert(pin, (level, now));
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut state = self.state.lock().unwrap();
        state.events.push(BoardEvent::Delay(ms));
        state.now_ms += u64::from(ms);
    }
}

/// MockCameraDriver が返すフレーム
///
/// Clone できないので、ドライバへ返却できるのは1回だけです。
#[derive(Debug)]
pub struct MockFrame {
    id: u32,
    data: Vec<u8>,
    format: PixelFormat,
    width: usize,
    height: usize,
}

impl FrameData for MockFrame {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }
}

/// 次の `acquire_frame()` の挙動
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAcquire {
    /// 指定フォーマットのフレームを返す
    Frame(PixelFormat),
    /// フレームを返さない（タイムアウト相当）
    NoBuffer,
}

#[derive(Debug, Default)]
struct DriverState {
    init_failure: Option<DriverStatus>,
    power_probe: Option<(MockBoard, u64)>,
    config: Option<DeviceConfig>,
    init_calls: u32,
    deinit_calls: u32,
    script: VecDeque<MockAcquire>,
    next_id: u32,
    acquire_calls: u32,
    release_calls: u32,
    outstanding: Vec<u32>,
    unknown_releases: u32,
}

/// テスト用のカメラドライバモック
///
/// esp32-camera と同様に `fb_count` 枚のバッファプールを持ち、
/// 返却されないバッファがプールを使い切ると `None` を返します。
#[derive(Debug, Clone, Default)]
pub struct MockCameraDriver {
    state: Arc<Mutex<DriverState>>,
}

impl MockCameraDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用: `init()` を指定ステータスで失敗させる
    pub fn failing_init(self, status: DriverStatus) -> Self {
        self.state.lock().unwrap().init_failure = Some(status);
        self
    }

    /// テスト用: 電源投入から `settle_ms` 経過していなければ SCCB プローブを失敗させる
    pub fn requiring_power_settle(self, board: &MockBoard, settle_ms: u64) -> Self {
        self.state.lock().unwrap().power_probe = Some((board.clone(), settle_ms));
        self
    }

    /// テスト用: 次回以降の `acquire_frame()` の挙動をキューに追加
    pub fn queue(&self, acquire: MockAcquire) {
        self.state.lock().unwrap().script.push_back(acquire);
    }

    pub fn queue_frame(&self, format: PixelFormat) {
        self.queue(MockAcquire::Frame(format));
    }

    pub fn queue_no_buffer(&self) {
        self.queue(MockAcquire::NoBuffer);
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().unwrap().config.is_some()
    }

    pub fn init_calls(&self) -> u32 {
        self.state.lock().unwrap().init_calls
    }

    pub fn deinit_calls(&self) -> u32 {
        self.state.lock().unwrap().deinit_calls
    }

    pub fn acquire_calls(&self) -> u32 {
        self.state.lock().unwrap().acquire_calls
    }

    pub fn release_calls(&self) -> u32 {
        self.state.lock().unwrap().release_calls
    }

    /// ドライバへ返却されていないフレーム数
    pub fn outstanding_count(&self) -> usize {
        self.state.lock().unwrap().outstanding.len()
    }

    /// 貸し出していないフレームが返却された回数（二重解放の検出用）
    pub fn unknown_releases(&self) -> u32 {
        self.state.lock().unwrap().unknown_releases
    }
}

fn mock_frame(id: u32, format: PixelFormat, config: &DeviceConfig) -> MockFrame {
    let (width, height) = config.frame_size.dimensions();
    let data = match format.bytes_per_pixel() {
        Some(bpp) => vec![(id & 0xFF) as u8; width * height * bpp],
        None => {
            // JPEG 相当: SOI + ダミーデータ + EOI
            let mut jpeg = vec![0xFF, 0xD8];
            jpeg.extend((0..4096u32).map(|i| ((i * 17 + 73) % 256) as u8));
            jpeg.extend([0xFF, 0xD9]);
            jpeg
        }
    };
    MockFrame {
        id,
        data,
        format,
        width,
        height,
    }
}

impl CameraDriver for MockCameraDriver {
    type Frame = MockFrame;

    fn init(&mut self, config: &DeviceConfig) -> Result<(), DriverStatus> {
        let mut state = self.state.lock().unwrap();
        state.init_calls += 1;

        if let Some(status) = state.init_failure {
            return Err(status);
        }

        if let Some((board, settle_ms)) = &state.power_probe {
            let powered = board.held_for_ms(config.power.pin, config.power.active_level);
            if !matches!(powered, Some(ms) if ms >= *settle_ms) {
                return Err(DriverStatus::CAMERA_NOT_DETECTED);
            }
        }

        state.config = Some(config.clone());
        Ok(())
    }

    fn acquire_frame(&mut self) -> Option<MockFrame> {
        let mut state = self.state.lock().unwrap();
        state.acquire_calls += 1;

        let config = state.config.clone()?;
        let next = state
            .script
            .pop_front()
            .unwrap_or(MockAcquire::Frame(config.pixel_format));

        let MockAcquire::Frame(format) = next else {
            return None;
        };
        if state.outstanding.len() >= usize::from(config.fb_count) {
            return None;
        }

        state.next_id += 1;
        let id = state.next_id;
        state.outstanding.push(id);
        Some(mock_frame(id, format, &config))
    }

    fn release_frame(&mut self, frame: MockFrame) {
        let mut state = self.state.lock().unwrap();
        state.release_calls += 1;
        match state.outstanding.iter().position(|&id| id == frame.id) {
            Some(index) => {
                state.outstanding.remove(index);
            }
            None => state.unknown_releases += 1,
        }
    }

    fn deinit(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.deinit_calls += 1;
        state.config = None;
    }
}

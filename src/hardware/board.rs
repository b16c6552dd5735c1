/// GPIO出力レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    pub fn as_raw(self) -> u32 {
        match self {
            PinLevel::Low => 0,
            PinLevel::High => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("Invalid GPIO number: {0}")]
    InvalidPin(i32),
    #[error("GPIO{pin} operation failed (esp_err_t {code})")]
    Gpio { pin: i32, code: i32 },
}

/// Platform primitives needed for camera bring-up.
///
/// `delay_ms` must yield to the scheduler rather than spin.
pub trait BoardPlatform {
    /// Configure `pin` as a push-pull output with pulls and interrupts disabled.
    fn configure_output(&mut self, pin: i32) -> Result<(), PlatformError>;

    /// Drive an output pin.
    fn set_level(&mut self, pin: i32, level: PinLevel) -> Result<(), PlatformError>;

    /// Block the calling task for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

pub(crate) fn pin_mask(pin: i32) -> Result<u64, PlatformError> {
    if (0..64).contains(&pin) {
        Ok(1u64 << pin)
    } else {
        Err(PlatformError::InvalidPin(pin))
    }
}

/// ESP-IDF specific board implementation.
#[cfg(feature = "esp")]
pub struct EspIdfBoard;

#[cfg(feature = "esp")]
impl BoardPlatform for EspIdfBoard {
    fn configure_output(&mut self, pin: i32) -> Result<(), PlatformError> {
        use esp_idf_sys as sys;

        let config = sys::gpio_config_t {
            pin_bit_mask: pin_mask(pin)?,
            mode: sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: sys::gpio_int_type_t_GPIO_INTR_DISABLE,
            ..Default::default()
        };
        log::debug!("Configuring GPIO{} as output", pin);
        sys::esp!(unsafe { sys::gpio_config(&config) })
            .map_err(|e| PlatformError::Gpio { pin, code: e.code() })
    }

    fn set_level(&mut self, pin: i32, level: PinLevel) -> Result<(), PlatformError> {
        use esp_idf_sys as sys;

        pin_mask(pin)?;
        log::debug!("GPIO{} -> {:?}", pin, level);
        sys::esp!(unsafe { sys::gpio_set_level(pin, level.as_raw()) })
            .map_err(|e| PlatformError::Gpio { pin, code: e.code() })
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

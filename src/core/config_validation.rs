#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidWarmupFrames(u8),
    ZeroMaxConsecutiveFailures,
    ZeroStatsLogInterval,
}

/// 0-10 はそのまま、255 は「ウォームアップなし」
pub fn parse_warmup_frames(value: u8) -> Result<Option<u8>, ValidationError> {
    match value {
        0..=10 => Ok(Some(value)),
        255 => Ok(None),
        _ => Err(ValidationError::InvalidWarmupFrames(value)),
    }
}

pub fn validate_max_consecutive_failures(value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        Err(ValidationError::ZeroMaxConsecutiveFailures)
    } else {
        Ok(value)
    }
}

pub fn validate_stats_log_every(value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        Err(ValidationError::ZeroStatsLogInterval)
    } else {
        Ok(value)
    }
}

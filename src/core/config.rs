use crate::core::config_validation::{
    parse_warmup_frames, validate_max_consecutive_failures, validate_stats_log_every,
    ValidationError,
};

/// アプリケーション設定
///
/// この構造体はビルド時に`cfg.toml`ファイルから読み込まれた設定を保持します。
/// カメラのピン配置やフォーマットは `DeviceConfig` の定数で、ここには含みません。
#[toml_cfg::toml_config]
pub struct Config {
    #[default(100)]
    capture_interval_ms: u32,

    #[default(2)]
    warmup_frames: u8,

    #[default(10)]
    max_consecutive_failures: u32,

    #[default(50)]
    stats_log_every: u32,

    #[default(false)]
    debug_mode: bool,
}

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("warmup_frames の値が無効です (0-10, 255): {0}")]
    InvalidWarmupFrames(u8),
    #[error("max_consecutive_failures は1以上を指定してください")]
    InvalidMaxConsecutiveFailures,
    #[error("stats_log_every は1以上を指定してください")]
    InvalidStatsLogEvery,
}

/// アプリケーション設定を表す構造体
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// キャプチャ間隔（ミリ秒）
    pub capture_interval_ms: u32,

    /// 初期化直後に捨てるフレーム数
    pub warmup_frames: Option<u8>,

    /// 再起動するまでの連続失敗回数
    pub max_consecutive_failures: u32,

    /// キャプチャ統計をログ出力する間隔（試行回数）
    pub stats_log_every: u32,

    /// デバッグモード（詳細ログ）
    pub debug_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture_interval_ms: 100,
            warmup_frames: Some(2),
            max_consecutive_failures: 10,
            stats_log_every: 50,
            debug_mode: false,
        }
    }
}

impl AppConfig {
    /// 設定ファイルから設定をロードします
    pub fn load() -> Result<Self, ConfigError> {
        // toml_cfg によって生成された定数
        Self::from_config(&CONFIG)
    }

    fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let warmup_frames = parse_warmup_frames(config.warmup_frames).map_err(map_validation_error)?;
        let max_consecutive_failures =
            validate_max_consecutive_failures(config.max_consecutive_failures)
                .map_err(map_validation_error)?;
        let stats_log_every =
            validate_stats_log_every(config.stats_log_every).map_err(map_validation_error)?;

        Ok(AppConfig {
            capture_interval_ms: config.capture_interval_ms,
            warmup_frames,
            max_consecutive_failures,
            stats_log_every,
            debug_mode: config.debug_mode,
        })
    }
}

fn map_validation_error(err: ValidationError) -> ConfigError {
    match err {
        ValidationError::InvalidWarmupFrames(v) => ConfigError::InvalidWarmupFrames(v),
        ValidationError::ZeroMaxConsecutiveFailures => ConfigError::InvalidMaxConsecutiveFailures,
        ValidationError::ZeroStatsLogInterval => ConfigError::InvalidStatsLogEvery,
    }
}

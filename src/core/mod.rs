/// コアシステムモジュール
pub mod capture_policy;
pub mod capture_service;
pub mod config;
pub mod config_validation;

pub use capture_policy::{loop_delay_ms, should_log_stats, CaptureHealth, HealthAction};
pub use capture_service::CaptureService;
pub use config::{AppConfig, ConfigError};

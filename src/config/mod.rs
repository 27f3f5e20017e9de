mod app_config;

pub use app_config::{
    AppConfig, CaptchaConfig, ImagesConfig, LocationsConfig, LogFormat, LoggingConfig,
    ServerConfig, SheetsConfig, MAX_TTL_SECS,
};

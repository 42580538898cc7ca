use thiserror::Error;

mod app_config;
mod config;
mod course;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use course::{make_course_key, CourseRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

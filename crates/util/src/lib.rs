pub mod config;

pub use config::{AppConfig, ConfigError, Environment, LogFormat};

/// Loads environment variables from `.env` when available.
///
/// Missing files are ignored so the sample runs the same with or without one.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

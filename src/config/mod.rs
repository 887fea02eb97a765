use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the background-removal service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Maximum request body size in bytes (default: 5 MB)
    pub max_content_length: usize,

    /// Root directory holding the `uploads/` and `processed/` areas (default: "static")
    pub storage_root: PathBuf,

    /// Age after which stored files are deleted (default: 600 s)
    pub max_file_age: Duration,

    /// Pause between retention sweeps (default: 300 s)
    pub sweep_interval: Duration,

    /// URL of the background-removal inference endpoint
    pub remover_endpoint: String,

    /// Per-request timeout for the inference call (default: 120 s)
    pub remover_timeout: Duration,

    /// Port to bind the HTTP listener on (default: 8000)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_content_length: 5 * 1024 * 1024, // 5 MB
            storage_root: PathBuf::from("static"),
            max_file_age: Duration::from_secs(600),
            sweep_interval: Duration::from_secs(300),
            remover_endpoint: "http://127.0.0.1:7000/api/remove".to_string(),
            remover_timeout: Duration::from_secs(120),
            port: 8000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_content_length: env::var("MAX_CONTENT_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_content_length),

            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.storage_root),

            max_file_age: env::var("CLEANUP_MAX_AGE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.max_file_age),

            sweep_interval: env::var("CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.sweep_interval),

            remover_endpoint: env::var("REMBG_ENDPOINT").unwrap_or(default.remover_endpoint),

            remover_timeout: env::var("REMBG_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.remover_timeout),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }

    /// Config for development and tests (tiny limits, fast sweeps)
    pub fn development() -> Self {
        Self {
            max_content_length: 1024 * 1024,
            storage_root: PathBuf::from("static"),
            max_file_age: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(5),
            remover_endpoint: "http://127.0.0.1:7000/api/remove".to_string(),
            remover_timeout: Duration::from_secs(10),
            port: 8000,
        }
    }

    /// Upload limit in whole megabytes, used in the 413 error message
    pub fn max_content_length_mb(&self) -> usize {
        self.max_content_length / 1024 / 1024
    }
}

use std::path::PathBuf;

/// Process-level settings read from the environment.
///
/// Domain inputs (seeds, template, product) live in the scan file instead;
/// see [`crate::ScanConfig`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub scan_config_path: PathBuf,
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_seeds: usize,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

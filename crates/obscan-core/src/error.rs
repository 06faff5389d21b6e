use thiserror::Error;

/// Configuration failures. All of these are fatal and surface before any
/// seed is scanned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read scan config {path}: {source}")]
    ScanFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scan config: {0}")]
    ScanFileParse(#[from] serde_yaml::Error),

    #[error("failed to read request template {path}: {source}")]
    TemplateFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request template {path} is not valid JSON: {source}")]
    TemplateFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid scan config: {0}")]
    Validation(String),
}

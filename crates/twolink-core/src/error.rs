use thiserror::Error;

/// Top-level error type for twolink-core.
#[derive(Debug, Error)]
pub enum TwoLinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
///
/// Raised at construction time: no valid path or solution can be produced
/// from a configuration that fails these checks.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {name}: {value} (must be finite and > 0)")]
    InvalidSegmentLength { name: &'static str, value: f64 },

    #[error("Invalid step: {0} (must be finite and > 0)")]
    InvalidStep(f64),

    #[error("Invalid scan range: x_min={min}, x_max={max} (need finite x_min <= x_max)")]
    InvalidScanRange { min: f64, max: f64 },

    #[error("Invalid line: slope={slope}, intercept={intercept} (must be finite)")]
    InvalidLine { slope: f64, intercept: f64 },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

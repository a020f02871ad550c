use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Channel already exists: {0}")]
    ChannelExists(String),

    #[error("Invalid validation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl AppError {
    /// Stable machine-readable code, used as a log field
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::ChannelNotFound(_) => "CHANNEL_NOT_FOUND",
            AppError::ChannelExists(_) => "CHANNEL_EXISTS",
            AppError::InvalidPattern(_) => "INVALID_PATTERN",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

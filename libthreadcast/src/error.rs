//! Error types for Threadcast
//!
//! The text core (`weight`, `thread`, `preview`) is total and never returns
//! these. They cover configuration and the collaborators the service layer
//! talks to: the post store, the scheduler, the time-zone converter and the
//! media providers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThreadcastError>;

#[derive(Error, Debug)]
pub enum ThreadcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Scheduling error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Time zone error: {0}")]
    TimeZone(#[from] TimeZoneError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Insert failed: {0}")]
    Insert(String),

    #[error("Update failed: {0}")]
    Update(String),

    #[error("Lookup failed: {0}")]
    Lookup(String),
}

#[derive(Error, Debug, Clone)]
pub enum ScheduleError {
    #[error("Could not parse schedule: {0}")]
    Parse(String),

    #[error("Failed to schedule job: {0}")]
    Dispatch(String),

    #[error("Failed to cancel run {0}")]
    Cancel(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeZoneError {
    #[error("Invalid time zone: {0}")]
    InvalidZone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Image size ({actual} bytes) exceeds limit of {max} bytes after compression")]
    SizeLimitExceeded { actual: usize, max: usize },

    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("Unknown video provider: {0}")]
    UnknownProvider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting_invalid_input() {
        let error = ThreadcastError::InvalidInput("Content cannot be empty".to_string());
        assert_eq!(error.to_string(), "Invalid input: Content cannot be empty");
    }

    #[test]
    fn test_error_message_formatting_config() {
        let error = ThreadcastError::Config(ConfigError::MissingField("thread".to_string()));
        assert_eq!(
            error.to_string(),
            "Configuration error: Missing required field: thread"
        );
    }

    #[test]
    fn test_error_message_formatting_time_zone() {
        let error = ThreadcastError::TimeZone(TimeZoneError::InvalidZone("Mars/Olympus".into()));
        assert_eq!(
            error.to_string(),
            "Time zone error: Invalid time zone: Mars/Olympus"
        );
    }

    #[test]
    fn test_generation_failed_message_is_normalized() {
        let error = MediaError::GenerationFailed("quota exhausted".to_string());
        assert_eq!(error.to_string(), "generation failed: quota exhausted");
    }

    #[test]
    fn test_size_limit_message() {
        let error = MediaError::SizeLimitExceeded {
            actual: 6_000_000,
            max: 5_000_000,
        };
        assert!(error.to_string().contains("6000000"));
        assert!(error.to_string().contains("5000000"));
    }

    #[test]
    fn test_error_conversion_from_store_error() {
        let error: ThreadcastError = StoreError::Insert("disk full".to_string()).into();
        match error {
            ThreadcastError::Store(StoreError::Insert(msg)) => assert_eq!(msg, "disk full"),
            _ => panic!("Expected ThreadcastError::Store"),
        }
    }

    #[test]
    fn test_error_conversion_from_time_zone_error() {
        let error: ThreadcastError = TimeZoneError::InvalidDate("2024-13-01".to_string()).into();
        assert!(matches!(
            error,
            ThreadcastError::TimeZone(TimeZoneError::InvalidDate(_))
        ));
    }
}

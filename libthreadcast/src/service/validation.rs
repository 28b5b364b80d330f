//! Content validation service
//!
//! Checks content before it is threaded: empty content, overall size, and
//! whether it fits in one post or how many posts it will take.

use crate::thread::{split_thread_detailed, MAX_THREAD_LENGTH};
use crate::weight::weighted_length;
use crate::Config;
use std::sync::Arc;

/// Maximum content size in bytes (100KB)
pub const MAX_CONTENT_LENGTH: usize = 100 * 1024;

/// Service for validating content against the thread limits
///
/// # Example
///
/// ```
/// use libthreadcast::service::validation::ValidationService;
/// use libthreadcast::Config;
/// use std::sync::Arc;
///
/// let service = ValidationService::new(Arc::new(Config::default_config()));
/// let result = service.validate("Hello world", None);
///
/// assert!(result.valid);
/// assert!(!result.needs_thread);
/// assert_eq!(result.weighted_length, 11);
/// ```
#[derive(Clone)]
pub struct ValidationService {
    config: Arc<Config>,
}

/// Outcome of validating one piece of content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentValidation {
    /// No errors were found
    pub valid: bool,
    pub weighted_length: usize,
    /// Budget the content was checked against
    pub max_length: usize,
    /// Content is over budget and will be split
    pub needs_thread: bool,
    /// Posts the content needs before the thread cap is applied
    pub projected_posts: usize,
    pub errors: Vec<String>,
    /// Non-blocking problems
    pub warnings: Vec<String>,
}

impl ValidationService {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Validate `content` against `max_length`, or the configured default
    pub fn validate(&self, content: &str, max_length: Option<usize>) -> ContentValidation {
        let max_length = max_length.unwrap_or(self.config.thread.max_length);
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if content.trim().is_empty() {
            errors.push("Content cannot be empty or whitespace-only".to_string());
        }

        if content.len() > MAX_CONTENT_LENGTH {
            errors.push(format!(
                "Content size ({} bytes) exceeds maximum allowed size ({} bytes)",
                content.len(),
                MAX_CONTENT_LENGTH
            ));
        }

        if max_length == 0 {
            errors.push("Maximum post length must be greater than zero".to_string());
        }

        let weighted = weighted_length(content.trim());
        let projected = if errors.is_empty() {
            split_thread_detailed(content, max_length).uncapped_count
        } else {
            0
        };

        if projected > MAX_THREAD_LENGTH {
            warnings.push(format!(
                "Content needs {} posts; only the first {} will be kept",
                projected, MAX_THREAD_LENGTH
            ));
        }

        ContentValidation {
            valid: errors.is_empty(),
            weighted_length: weighted,
            max_length,
            needs_thread: weighted > max_length,
            projected_posts: projected,
            errors,
            warnings,
        }
    }

    /// Whether `content` is valid at the configured default budget
    pub fn is_valid(&self, content: &str) -> bool {
        self.validate(content, None).valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThreadConfig;

    fn service() -> ValidationService {
        ValidationService::new(Arc::new(Config::default_config()))
    }

    #[test]
    fn test_short_content_is_single_post() {
        let result = service().validate("Hello decentralized world!", None);

        assert!(result.valid);
        assert!(!result.needs_thread);
        assert_eq!(result.projected_posts, 1);
        assert_eq!(result.max_length, 280);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_content_is_invalid() {
        for content in ["", "   ", "\n\t\n"] {
            let result = service().validate(content, None);
            assert!(!result.valid);
            assert!(result.errors[0].contains("empty"));
        }
    }

    #[test]
    fn test_oversized_content_is_invalid() {
        let content = "a".repeat(MAX_CONTENT_LENGTH + 1);
        let result = service().validate(&content, None);

        assert!(!result.valid);
        assert!(result.errors[0].contains("exceeds maximum allowed size"));
        assert_eq!(result.projected_posts, 0);
    }

    #[test]
    fn test_long_content_needs_thread() {
        let content = "word ".repeat(100);
        let result = service().validate(&content, Some(100));

        assert!(result.valid);
        assert!(result.needs_thread);
        assert!(result.projected_posts > 1);
        assert_eq!(result.weighted_length, 499);
    }

    #[test]
    fn test_warns_when_thread_is_capped() {
        let content = (1..=12)
            .map(|i| format!("Paragraph {i}."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let result = service().validate(&content, None);

        assert!(result.valid);
        assert_eq!(result.projected_posts, 12);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("12 posts"));
    }

    #[test]
    fn test_uses_configured_max_length() {
        let config = Config {
            thread: ThreadConfig { max_length: 10 },
            ..Config::default_config()
        };
        let service = ValidationService::new(Arc::new(config));
        let result = service.validate("twelve chars", None);

        assert_eq!(result.max_length, 10);
        assert!(result.needs_thread);
    }

    #[test]
    fn test_zero_max_length_is_invalid() {
        let result = service().validate("Hello", Some(0));
        assert!(!result.valid);
    }

    #[test]
    fn test_is_valid() {
        assert!(service().is_valid("Hello"));
        assert!(!service().is_valid(" "));
    }
}

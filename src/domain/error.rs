use thiserror::Error;

/// Core domain errors
///
/// Errors produced by an underlying repository pass through the cache layer
/// untouched. The cache layer itself only ever adds the `Cache*` and
/// `Timeout` kinds.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache read failed for '{key}': {message}")]
    CacheRead { key: String, message: String },

    #[error("Cache write failed for '{key}': {message}")]
    CacheWrite { key: String, message: String },

    #[error("Cache delete failed for '{target}': {message}")]
    CacheDelete { target: String, message: String },

    #[error("Operation '{operation}' exceeded its deadline")]
    Timeout { operation: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheRead {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn cache_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn cache_delete(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheDelete {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Returns true for the error kinds raised by the cache layer itself
    pub fn is_cache_error(&self) -> bool {
        matches!(
            self,
            Self::CacheRead { .. } | Self::CacheWrite { .. } | Self::CacheDelete { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Issue 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Issue 'abc' not found");
        assert!(error.is_not_found());
        assert!(!error.is_cache_error());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_cache_error_kinds() {
        let read = DomainError::cache_read("Issue:1", "connection reset");
        let write = DomainError::cache_write("Issue:1", "OOM");
        let delete = DomainError::cache_delete("Issue:*", "READONLY");

        assert!(read.is_cache_error());
        assert!(write.is_cache_error());
        assert!(delete.is_cache_error());
        assert_eq!(
            delete.to_string(),
            "Cache delete failed for 'Issue:*': READONLY"
        );
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("get");
        assert_eq!(error.to_string(), "Operation 'get' exceeded its deadline");
        assert!(!error.is_cache_error());
    }
}

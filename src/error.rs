//! Error types for the bullet journal core
//!
//! The pure components (recurrence, hierarchy, export) only fail on caller
//! mistakes: a string that is not an ISO date, or a recurrence rule that
//! cannot be expanded. Dangling or cyclic parent links and undated bullets
//! are normal data and never produce an error.

use thiserror::Error;

/// Error type for journal operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A date string was not in `YYYY-MM-DD` form.
    #[error("Invalid date format '{input}'. Use YYYY-MM-DD (e.g., '2025-03-15')")]
    InvalidDateFormat {
        /// The rejected input.
        input: String,
    },

    /// A recurrence rule or export option is malformed.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A referenced bullet or collection does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity kind ("Bullet", "Collection").
        kind: &'static str,
        /// The missing id.
        id: String,
    },

    /// An id is already taken.
    #[error("ID '{id}' already exists. Please use a unique ID.")]
    Duplicate {
        /// The conflicting id.
        id: String,
    },

    /// A value could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for journal operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a missing bullet.
    pub fn bullet_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Bullet",
            id: id.into(),
        }
    }

    /// Shorthand for a missing collection.
    pub fn collection_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Collection",
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message_names_input() {
        let err = Error::InvalidDateFormat {
            input: "2025/01/01".to_string(),
        };
        assert!(err.to_string().contains("'2025/01/01'"));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            Error::collection_not_found("work").to_string(),
            "Collection 'work' not found"
        );
    }
}

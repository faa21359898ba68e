//! Error types for the Acres engine.

use crate::entity::{LeadId, PropertyId, TaskId};
use thiserror::Error;

/// All possible errors from the Acres engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Client-side pre-submit validation failure. The offending record is
    /// never sent to the remote store.
    #[error("validation failed for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("lead not found: {0}")]
    LeadNotFound(LeadId),

    #[error("property not found: {0}")]
    PropertyNotFound(PropertyId),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::validation("phone", "must be 7-15 digits");
        assert_eq!(
            err.to_string(),
            "validation failed for field 'phone': must be 7-15 digits"
        );

        let err = Error::LeadNotFound(LeadId::new("lead-42"));
        assert_eq!(err.to_string(), "lead not found: lead-42");
    }
}

//! # Errors
//!
//! Failure taxonomy for the thread-detail read path.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Which kind of node a validation failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Comment,
    Reply,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Comment => "comment",
            EntityKind::Reply => "reply",
        })
    }
}

/// A raw record failed its schema check. Always a data-integrity fault:
/// the store returned something malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent, null, or empty.
    #[error("{entity} record is missing required property `{field}`")]
    MissingProperty {
        entity: EntityKind,
        field: &'static str,
    },

    /// A required field is present with the wrong type.
    #[error("{entity} record property `{field}` must be {expected}, found {found}")]
    InvalidType {
        entity: EntityKind,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl ValidationError {
    pub fn entity(&self) -> EntityKind {
        match self {
            ValidationError::MissingProperty { entity, .. }
            | ValidationError::InvalidType { entity, .. } => *entity,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingProperty { field, .. }
            | ValidationError::InvalidType { field, .. } => field,
        }
    }
}

/// Failure reported by a record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store did not answer within its time budget.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Infrastructure failure (e.g., DB down, connection reset).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// The error returned to callers of the thread-detail read path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("thread not found with ID {thread_id}")]
    ThreadNotFound { thread_id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Whether a boundary should report this as "resource not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::ThreadNotFound { .. })
    }

    /// Whether the store handed back malformed data.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

/// A specialized Result type for the read path.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_entity_and_field() {
        let missing = ValidationError::MissingProperty {
            entity: EntityKind::Comment,
            field: "username",
        };
        assert_eq!(
            missing.to_string(),
            "comment record is missing required property `username`"
        );

        let invalid = ValidationError::InvalidType {
            entity: EntityKind::Reply,
            field: "id",
            expected: "a string",
            found: "integer",
        };
        assert_eq!(
            invalid.to_string(),
            "reply record property `id` must be a string, found integer"
        );
        assert_eq!(invalid.entity(), EntityKind::Reply);
        assert_eq!(invalid.field(), "id");
    }

    #[test]
    fn classification() {
        let not_found = DomainError::ThreadNotFound {
            thread_id: "thread-999".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_data_integrity());

        let invalid: DomainError = ValidationError::MissingProperty {
            entity: EntityKind::Reply,
            field: "content",
        }
        .into();
        assert!(invalid.is_data_integrity());

        let store: DomainError = StoreError::Backend("connection reset".into()).into();
        assert!(!store.is_not_found());
        assert!(!store.is_data_integrity());
    }
}

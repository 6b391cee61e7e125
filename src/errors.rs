//! Unified error types and result handling.
//!
//! Every operation in the crate returns [`Result`]. The first four variants are
//! the constraint-layer taxonomy surfaced to callers; the rest wrap failures of
//! the ambient layers (configuration, storage, environment).

use chrono::NaiveDate;
use sea_orm::DbErr;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// A single missing or malformed field found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Name of the offending field as it appears in the input record
    pub field: &'static str,
    /// What is wrong with it
    pub reason: String,
}

impl FieldIssue {
    /// Issue for a required field that was absent or blank.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: "is required".to_string(),
        }
    }

    /// Issue for a field that was present but could not be accepted.
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Main error type for the association registry.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more fields of a candidate record are missing or malformed
    #[error("Validation failed: {}", join_issues(.issues))]
    Validation {
        /// Every problem found, in field order
        issues: Vec<FieldIssue>,
    },

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The write would duplicate a unique key or break a retention rule
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable explanation
        message: String,
    },

    /// A treasurer term collides with an existing term of the same association
    #[error(
        "Treasurer term starting {start_date} (ending {}) overlaps an existing term of association {association_id}",
        .end_date.map_or_else(|| "open".to_string(), |d| d.to_string())
    )]
    Overlap {
        /// Association whose terms collide
        association_id: Uuid,
        /// Start of the rejected term
        start_date: NaiveDate,
        /// End of the rejected term, `None` when open
        end_date: Option<NaiveDate>,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable explanation
        message: String,
    },

    /// Storage layer failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a validation error carrying a single issue.
    #[must_use]
    pub fn invalid(issue: FieldIssue) -> Self {
        Self::Validation {
            issues: vec![issue],
        }
    }

    /// Shorthand for a not-found error keyed by a UUID.
    #[must_use]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

//! # Error Module
//!
//! Errors raised by the core. Remote lookup failures are not errors here;
//! they are values of [`crate::LookupFailure`] carried by the lookup state.

use thiserror::Error;

/// Errors from badgedex-core.
#[derive(Debug, Error)]
pub enum BadgeError {
    /// The identifier does not name a badge in the catalog.
    #[error("unknown badge: {0}")]
    UnknownBadge(String),

    /// Two catalog records share an identifier.
    #[error("duplicate badge id in catalog: {0}")]
    DuplicateBadgeId(String),

    /// A filter, status or sort value could not be parsed.
    #[error("invalid {kind} '{value}' (expected one of: {expected})")]
    InvalidFilter {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Thresholds must satisfy 0 < bronze < silver < gold.
    #[error("invalid thresholds {bronze}/{silver}/{gold}: expected 0 < bronze < silver < gold")]
    InvalidThresholds { bronze: u64, silver: u64, gold: u64 },

    /// The preference store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored snapshot could not be encoded or decoded.
    #[error("snapshot format error: {0}")]
    Format(String),
}

macro_rules! storage_error_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for BadgeError {
                fn from(err: $ty) -> Self {
                    Self::Storage(err.to_string())
                }
            }
        )+
    };
}

storage_error_from!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<postcard::Error> for BadgeError {
    fn from(err: postcard::Error) -> Self {
        Self::Format(err.to_string())
    }
}

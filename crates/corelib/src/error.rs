//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Duplicate adds and unknown removes are not errors: those operations report
/// `false` and leave the ring untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Lookup on a ring with no virtual nodes.
    #[error("no member available: the ring is empty")]
    EmptyRing,
    /// Hash algorithm name that does not match any built-in partitioner.
    #[error("unknown hash algorithm: {0}")]
    UnknownHashAlgorithm(String),
    /// Member description that could not be parsed.
    #[error("invalid member: {0}")]
    InvalidMember(String),
    /// Ring configuration that could not be parsed or applied.
    #[error("invalid ring config: {0}")]
    InvalidConfig(String),
}

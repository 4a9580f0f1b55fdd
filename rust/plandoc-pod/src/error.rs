use thiserror::Error;

use crate::Reference;

/// The common error type used by this crate
///
/// Errors are [Clone] so that a single failed request can be observed by
/// every caller that is waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PodError {
    /// There is no resource at the requested location
    #[error("No resource found at {reference}")]
    NotFound {
        /// The location that was requested
        reference: Reference,
    },

    /// The Pod refused access to the resource
    #[error("Access to {reference} is not authorized: {reason}")]
    Unauthorized {
        /// The location that was requested
        reference: Reference,
        /// Why access was refused
        reason: String,
    },

    /// The request could not be completed
    #[error("Request to {reference} failed: {reason}")]
    RequestFailed {
        /// The location that was requested
        reference: Reference,
        /// What went wrong
        reason: String,
    },

    /// A reference could not be interpreted as an IRI
    #[error("Invalid reference {reference}: {reason}")]
    InvalidReference {
        /// The offending reference
        reference: String,
        /// Why it could not be parsed
        reason: String,
    },
}

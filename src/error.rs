//! Error types for strategy evaluation

use thiserror::Error;

/// Errors from resolving a bucketing identifier
///
/// Consumed inside the rollout handler, which degrades every resolution
/// failure to "not enabled"; nothing here reaches the caller's request path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StickinessError {
    /// No context attribute could supply an identifier for the requested stickiness
    #[error("no bucketing identifier available for stickiness `{stickiness}`")]
    NoIdentifier {
        /// The stickiness mode that failed to resolve
        stickiness: String,
    },
}

impl StickinessError {
    /// Create a missing-identifier error for a stickiness mode
    pub fn no_identifier(stickiness: impl Into<String>) -> Self {
        Self::NoIdentifier {
            stickiness: stickiness.into(),
        }
    }
}

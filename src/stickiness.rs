//! Stickiness
//!
//! Selects which context attribute supplies the bucketing identifier for a
//! gradual rollout, with the layered fallback the `default` mode implies.

use crate::context::Context;
use crate::error::StickinessError;
use rand::Rng;
use std::fmt;

/// Source of identifiers for the random bucketing path
///
/// Injected into the rollout handler so tests can substitute a fixed source;
/// implementations must be safe to share across threads.
pub trait IdentifierSource: Send + Sync {
    /// Produce a fresh bucketing identifier
    fn next_identifier(&self) -> String;
}

/// Identifier source backed by the thread-local random generator
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentifierSource;

impl IdentifierSource for RandomIdentifierSource {
    fn next_identifier(&self) -> String {
        rand::rng().random_range(0..100_000).to_string()
    }
}

/// Stickiness mode driving identifier selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stickiness {
    /// Prefer the user id, then the session id, then a random identifier
    Default,
    /// Bucket on the user id only
    UserId,
    /// Bucket on the session id only
    SessionId,
    /// Fresh random identifier per evaluation (intentionally non-sticky)
    Random,
    /// Bucket on a named custom property
    Custom(String),
}

impl Stickiness {
    /// Parse a `stickiness` parameter value.
    ///
    /// Matching is case-sensitive; any unrecognized name addresses a custom
    /// context field, which must resolve or the strategy stays off.
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "userId" => Self::UserId,
            "sessionId" => Self::SessionId,
            "random" => Self::Random,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Resolve the bucketing identifier for a context.
    ///
    /// Empty attribute values count as absent. `Default` never fails; every
    /// other mode fails with [`StickinessError::NoIdentifier`] when its
    /// attribute is missing.
    pub fn resolve(
        &self,
        context: &Context,
        identifiers: &dyn IdentifierSource,
    ) -> Result<String, StickinessError> {
        match self {
            Self::UserId => self.require(context.user_id.as_deref()),
            Self::SessionId => self.require(context.session_id.as_deref()),
            Self::Custom(field) => {
                self.require(context.custom_properties.get(field).map(String::as_str))
            }
            Self::Random => Ok(identifiers.next_identifier()),
            Self::Default => Ok(non_empty(context.user_id.as_deref())
                .or_else(|| non_empty(context.session_id.as_deref()))
                .map(str::to_owned)
                .unwrap_or_else(|| identifiers.next_identifier())),
        }
    }

    fn require(&self, value: Option<&str>) -> Result<String, StickinessError> {
        non_empty(value)
            .map(str::to_owned)
            .ok_or_else(|| StickinessError::no_identifier(self.to_string()))
    }
}

impl fmt::Display for Stickiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::UserId => f.write_str("userId"),
            Self::SessionId => f.write_str("sessionId"),
            Self::Random => f.write_str("random"),
            Self::Custom(field) => f.write_str(field),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

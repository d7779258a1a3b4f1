//! Gradual Rollout Strategy
//!
//! Enables a feature for a percentage of identifiers. The identifier is
//! selected by the configured stickiness, hashed into a bucket, and compared
//! against the rollout percentage; constraints gate the whole computation.

use crate::context::Context;
use crate::hash::{ROLLOUT_NORMALIZER, normalized_bucket};
use crate::stickiness::{IdentifierSource, RandomIdentifierSource, Stickiness};
use crate::strategy::{Strategy, StrategyHandler};
use std::sync::Arc;
use tracing::{debug, trace};

/// Strategy name handled by [`GradualRolloutStrategy`]
pub const FLEXIBLE_ROLLOUT: &str = "flexibleRollout";

/// Typed view of the rollout parameter map, parsed once per evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
struct RolloutParams {
    rollout: u8,
    stickiness: Stickiness,
    group_id: String,
}

impl RolloutParams {
    /// Parse the string parameters, clamping the percentage into 0..=100.
    ///
    /// Missing or unparsable `rollout` means nothing is enabled; missing
    /// `stickiness` means the default fallback chain.
    fn parse(strategy: &Strategy) -> Self {
        let rollout = strategy
            .parameter("rollout")
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(0)
            .clamp(0, 100) as u8;
        let stickiness = strategy
            .parameter("stickiness")
            .map(Stickiness::parse)
            .unwrap_or(Stickiness::Default);
        let group_id = strategy.parameter("groupId").unwrap_or("").to_string();

        Self {
            rollout,
            stickiness,
            group_id,
        }
    }
}

/// Handler for the `flexibleRollout` strategy
///
/// Holds no mutable state; evaluation is a pure function of the strategy and
/// context, so one handler can serve concurrent evaluations.
pub struct GradualRolloutStrategy {
    identifiers: Arc<dyn IdentifierSource>,
}

impl GradualRolloutStrategy {
    /// Create a handler using the thread-local random identifier source
    pub fn new() -> Self {
        Self::with_identifier_source(Arc::new(RandomIdentifierSource))
    }

    /// Create a handler with a custom identifier source
    pub fn with_identifier_source(identifiers: Arc<dyn IdentifierSource>) -> Self {
        Self { identifiers }
    }
}

impl Default for GradualRolloutStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyHandler for GradualRolloutStrategy {
    fn supports(&self, strategy: &Strategy) -> bool {
        strategy.name == FLEXIBLE_ROLLOUT
    }

    fn is_enabled(&self, strategy: &Strategy, context: &Context) -> bool {
        debug_assert!(
            self.supports(strategy),
            "dispatched strategy `{}` to the gradual rollout handler",
            strategy.name
        );

        if !strategy.constraints.iter().all(|c| c.matches(context)) {
            trace!(strategy = %strategy.name, "constraint rejected context");
            return false;
        }

        let params = RolloutParams::parse(strategy);

        let identifier = match params.stickiness.resolve(context, self.identifiers.as_ref()) {
            Ok(identifier) => identifier,
            Err(error) => {
                debug!(%error, "strategy is off");
                return false;
            }
        };

        let bucket = normalized_bucket(&params.group_id, &identifier, ROLLOUT_NORMALIZER);
        trace!(
            bucket,
            rollout = params.rollout,
            group_id = %params.group_id,
            "computed rollout bucket"
        );

        bucket < u32::from(params.rollout)
    }
}

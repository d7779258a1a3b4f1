//! Strategy Definition
//!
//! Activation strategies as delivered in feature definition payloads, and the
//! handler trait an external registry dispatches them through.

use crate::constraint::Constraint;
use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Activation strategy attached to a feature
///
/// Parameters are string-valued even when logically numeric; each handler
/// parses the ones it recognizes.
///
/// # Examples
///
/// ```
/// use featuregate::Strategy;
///
/// let strategy = Strategy::new("flexibleRollout")
///     .with_parameter("rollout", "25")
///     .with_parameter("groupId", "checkout");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    /// Strategy name used for handler dispatch
    pub name: String,

    /// String-valued strategy parameters
    #[serde(default)]
    pub parameters: HashMap<String, String>,

    /// Constraints that must all hold before the strategy applies
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Strategy {
    /// Create a strategy with no parameters or constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: HashMap::new(),
            constraints: Vec::new(),
        }
    }

    /// Set a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Add a constraint
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Look up a parameter value
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(|s| s.as_str())
    }
}

/// Handler for one strategy type
///
/// The registry that maps strategy names to handlers lives outside this
/// crate; it selects the handler whose `supports` accepts the strategy and
/// calls `is_enabled` through this trait. Results for multiple strategies on
/// one feature are OR-combined by the caller.
pub trait StrategyHandler: Send + Sync {
    /// Whether this handler evaluates the given strategy
    fn supports(&self, strategy: &Strategy) -> bool;

    /// Evaluate the strategy against a context
    fn is_enabled(&self, strategy: &Strategy, context: &Context) -> bool;
}

//! Strategy Evaluation for Feature Flags
//!
//! The evaluation core of a feature-flag client: given one activation
//! strategy and one request context, decide whether a feature is enabled.
//! Fetching definitions, caching, metrics, and the name-to-handler registry
//! live outside this crate; evaluation itself is pure, synchronous, and safe
//! to run concurrently.
//!
//! # Features
//!
//! - 🎲 **Gradual Rollout** - Percentage-based activation with stable murmur3 bucketing
//! - 📌 **Stickiness** - Choose which context attribute drives bucketing, with fallback
//! - 🎯 **Constraints** - Attribute predicates that gate a strategy before any hashing
//! - 🔌 **Handler Trait** - Seam for a registry dispatching strategies by name
//!
//! # Quick Start
//!
//! ```
//! use featuregate::*;
//!
//! let strategy = Strategy::new("flexibleRollout")
//!     .with_parameter("rollout", "50")
//!     .with_parameter("groupId", "default");
//!
//! // User "634" buckets at 46, inside the 50% rollout
//! let context = Context::new().with_user_id("634");
//!
//! let handler = GradualRolloutStrategy::new();
//! assert!(handler.supports(&strategy));
//! assert!(handler.is_enabled(&strategy, &context));
//! ```
//!
//! # Constraints
//!
//! All constraints on a strategy must hold before the percentage check runs:
//!
//! ```
//! use featuregate::*;
//!
//! let strategy = Strategy::new("flexibleRollout")
//!     .with_parameter("rollout", "100")
//!     .with_constraint(Constraint::new(
//!         "environment",
//!         Operator::In,
//!         vec!["production".to_string()],
//!     ));
//!
//! let handler = GradualRolloutStrategy::new();
//!
//! let production = Context::new().with_user_id("634").with_environment("production");
//! assert!(handler.is_enabled(&strategy, &production));
//!
//! let dev = Context::new().with_user_id("634").with_environment("dev");
//! assert!(!handler.is_enabled(&strategy, &dev));
//! ```
//!
//! # Stickiness
//!
//! The `stickiness` parameter names the attribute to bucket on: `userId`,
//! `sessionId`, `random`, a custom property name, or `default` (user id,
//! else session id, else random). The random path draws from an injectable
//! [`IdentifierSource`], so tests can pin it:
//!
//! ```
//! use featuregate::*;
//! use std::sync::Arc;
//!
//! struct Fixed;
//!
//! impl IdentifierSource for Fixed {
//!     fn next_identifier(&self) -> String {
//!         "634".to_string()
//!     }
//! }
//!
//! let handler = GradualRolloutStrategy::with_identifier_source(Arc::new(Fixed));
//! let strategy = Strategy::new("flexibleRollout")
//!     .with_parameter("rollout", "50")
//!     .with_parameter("groupId", "default")
//!     .with_parameter("stickiness", "random");
//!
//! assert!(handler.is_enabled(&strategy, &Context::new()));
//! ```

pub mod constraint;
pub mod context;
pub mod error;
pub mod hash;
pub mod rollout;
pub mod stickiness;
pub mod strategy;

pub use constraint::{Constraint, Operator};
pub use context::Context;
pub use error::StickinessError;
pub use hash::{ROLLOUT_NORMALIZER, murmur3_32, normalized_bucket};
pub use rollout::{FLEXIBLE_ROLLOUT, GradualRolloutStrategy};
pub use stickiness::{IdentifierSource, RandomIdentifierSource, Stickiness};
pub use strategy::{Strategy, StrategyHandler};

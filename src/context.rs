//! Evaluation Context
//!
//! Request-scoped attributes that strategies and constraints are evaluated
//! against. Built once per request by the caller; the evaluation core only
//! reads it.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Evaluation context (per-request attributes)
///
/// # Examples
///
/// ```
/// use featuregate::Context;
///
/// let mut context = Context::new()
///     .with_user_id("user-123")
///     .with_environment("production");
/// context
///     .set_custom_property("region", "eu")
///     .set_custom_property("tier", "beta");
///
/// assert_eq!(context.get("userId"), Some("user-123"));
/// assert_eq!(context.get("region"), Some("eu"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// User identifier
    pub user_id: Option<String>,

    /// Session identifier
    pub session_id: Option<String>,

    /// Client IP address
    pub remote_address: Option<String>,

    /// Deployment environment
    pub environment: Option<String>,

    /// Application name
    pub app_name: Option<String>,

    /// Evaluation timestamp for date constraints; `None` means "now"
    pub current_time: Option<DateTime<Utc>>,

    /// Free-form attributes not modeled explicitly (keys are case-sensitive)
    pub custom_properties: HashMap<String, String>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user id
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the session id
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the client IP address
    pub fn with_remote_address(mut self, remote_address: impl Into<String>) -> Self {
        self.remote_address = Some(remote_address.into());
        self
    }

    /// Set the deployment environment
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the application name
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Pin the timestamp used by date constraints
    pub fn with_current_time(mut self, current_time: DateTime<Utc>) -> Self {
        self.current_time = Some(current_time);
        self
    }

    /// Add a custom property
    pub fn with_custom_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_properties.insert(key.into(), value.into());
        self
    }

    /// Set a custom property, returning the context for chaining
    pub fn set_custom_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.custom_properties.insert(key.into(), value.into());
        self
    }

    /// Resolve an attribute by its wire name.
    ///
    /// Built-in fields are checked first; any other name falls through to the
    /// custom properties.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "userId" => self.user_id.as_deref(),
            "sessionId" => self.session_id.as_deref(),
            "remoteAddress" => self.remote_address.as_deref(),
            "environment" => self.environment.as_deref(),
            "appName" => self.app_name.as_deref(),
            _ => self.custom_properties.get(name).map(|s| s.as_str()),
        }
    }
}

//! Constraints
//!
//! Boolean predicates over context attributes. A strategy applies only when
//! every constraint on it matches, so constraints gate evaluation before any
//! bucketing happens.

use crate::context::Context;
use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Constraint operator
///
/// Wire names are the SCREAMING_SNAKE_CASE forms used in feature definition
/// payloads (`IN`, `NOT_IN`, `STR_STARTS_WITH`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    In,
    NotIn,
    StrContains,
    StrStartsWith,
    StrEndsWith,
    NumEq,
    NumGt,
    NumGte,
    NumLt,
    NumLte,
    DateAfter,
    DateBefore,
    SemverEq,
    SemverGt,
    SemverLt,
}

/// Constraint on a context attribute
///
/// The membership and string operators compare against `values`; the numeric,
/// date, and semver operators compare against the single `value` operand.
/// An absent attribute follows each operator's literal semantics: it is never
/// a member of any list, so `In` fails and `NotIn` holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    /// Context attribute the constraint applies to
    pub context_name: String,

    /// Operator applied to the resolved attribute
    pub operator: Operator,

    /// Operand list for the membership and string operators
    #[serde(default)]
    pub values: Vec<String>,

    /// Single operand for the numeric, date, and semver operators
    #[serde(default)]
    pub value: Option<String>,

    /// Invert the outcome
    #[serde(default)]
    pub inverted: bool,

    /// Compare strings case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,
}

impl Constraint {
    /// Create a constraint over a value list
    pub fn new(context_name: impl Into<String>, operator: Operator, values: Vec<String>) -> Self {
        Self {
            context_name: context_name.into(),
            operator,
            values,
            value: None,
            inverted: false,
            case_insensitive: false,
        }
    }

    /// Set the single operand used by the numeric, date, and semver operators
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Invert the outcome
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Compare strings case-insensitively
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Evaluate the constraint against a context
    pub fn matches(&self, context: &Context) -> bool {
        let outcome = self.check(context);
        if self.inverted { !outcome } else { outcome }
    }

    fn check(&self, context: &Context) -> bool {
        let resolved = context.get(&self.context_name);

        match self.operator {
            Operator::In => resolved.map(|v| self.list_contains(v)).unwrap_or(false),
            Operator::NotIn => resolved.map(|v| !self.list_contains(v)).unwrap_or(true),
            Operator::StrContains => self.str_match(resolved, |value, op| value.contains(op)),
            Operator::StrStartsWith => self.str_match(resolved, |value, op| value.starts_with(op)),
            Operator::StrEndsWith => self.str_match(resolved, |value, op| value.ends_with(op)),
            Operator::NumEq => self.num_compare(resolved, |lhs, rhs| lhs == rhs),
            Operator::NumGt => self.num_compare(resolved, |lhs, rhs| lhs > rhs),
            Operator::NumGte => self.num_compare(resolved, |lhs, rhs| lhs >= rhs),
            Operator::NumLt => self.num_compare(resolved, |lhs, rhs| lhs < rhs),
            Operator::NumLte => self.num_compare(resolved, |lhs, rhs| lhs <= rhs),
            Operator::DateAfter => self.date_compare(context, |lhs, rhs| lhs > rhs),
            Operator::DateBefore => self.date_compare(context, |lhs, rhs| lhs < rhs),
            Operator::SemverEq => self.semver_compare(resolved, |lhs, rhs| lhs == rhs),
            Operator::SemverGt => self.semver_compare(resolved, |lhs, rhs| lhs > rhs),
            Operator::SemverLt => self.semver_compare(resolved, |lhs, rhs| lhs < rhs),
        }
    }

    fn list_contains(&self, value: &str) -> bool {
        if self.case_insensitive {
            let value = value.to_lowercase();
            self.values.iter().any(|v| v.to_lowercase() == value)
        } else {
            self.values.iter().any(|v| v == value)
        }
    }

    fn str_match(&self, resolved: Option<&str>, predicate: impl Fn(&str, &str) -> bool) -> bool {
        let Some(value) = resolved else {
            return false;
        };
        if self.case_insensitive {
            let value = value.to_lowercase();
            self.values
                .iter()
                .any(|op| predicate(&value, &op.to_lowercase()))
        } else {
            self.values.iter().any(|op| predicate(value, op))
        }
    }

    fn num_compare(&self, resolved: Option<&str>, compare: impl Fn(f64, f64) -> bool) -> bool {
        match (
            resolved.and_then(|v| v.parse::<f64>().ok()),
            self.value.as_deref().and_then(|v| v.parse::<f64>().ok()),
        ) {
            (Some(lhs), Some(rhs)) => compare(lhs, rhs),
            _ => false,
        }
    }

    fn date_compare(
        &self,
        context: &Context,
        compare: impl Fn(DateTime<Utc>, DateTime<Utc>) -> bool,
    ) -> bool {
        match (self.context_time(context), self.operand_time()) {
            (Some(lhs), Some(rhs)) => compare(lhs, rhs),
            _ => false,
        }
    }

    // The date operators read `currentTime` from the context clock when no
    // string attribute of that name is set.
    fn context_time(&self, context: &Context) -> Option<DateTime<Utc>> {
        match context.get(&self.context_name) {
            Some(raw) => parse_rfc3339(raw),
            None if self.context_name == "currentTime" => {
                Some(context.current_time.unwrap_or_else(Utc::now))
            }
            None => None,
        }
    }

    fn operand_time(&self) -> Option<DateTime<Utc>> {
        self.value.as_deref().and_then(parse_rfc3339)
    }

    fn semver_compare(
        &self,
        resolved: Option<&str>,
        compare: impl Fn(&Version, &Version) -> bool,
    ) -> bool {
        match (
            resolved.and_then(|v| Version::parse(v).ok()),
            self.value.as_deref().and_then(|v| Version::parse(v).ok()),
        ) {
            (Some(lhs), Some(rhs)) => compare(&lhs, &rhs),
            _ => false,
        }
    }
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_in_list() {
        let constraint = Constraint::new(
            "environment",
            Operator::In,
            vec!["production".to_string(), "staging".to_string()],
        );

        assert!(constraint.matches(&Context::new().with_environment("staging")));
        assert!(!constraint.matches(&Context::new().with_environment("dev")));
        // Absent attribute is never a member
        assert!(!constraint.matches(&Context::new()));
    }

    #[test]
    fn test_not_in_list() {
        let constraint = Constraint::new("something", Operator::NotIn, vec!["test".to_string()]);

        assert!(constraint.matches(&Context::new()));
        assert!(constraint.matches(&Context::new().with_custom_property("something", "other")));
        assert!(!constraint.matches(&Context::new().with_custom_property("something", "test")));
    }

    #[test]
    fn test_inverted() {
        let constraint =
            Constraint::new("environment", Operator::In, vec!["production".to_string()])
                .inverted();

        assert!(!constraint.matches(&Context::new().with_environment("production")));
        assert!(constraint.matches(&Context::new().with_environment("dev")));
        assert!(constraint.matches(&Context::new()));
    }

    #[test]
    fn test_case_insensitive_membership() {
        let constraint = Constraint::new("email", Operator::In, vec!["User@Example.com".to_string()])
            .case_insensitive();

        assert!(constraint.matches(&Context::new().with_custom_property("email", "user@example.com")));

        let sensitive = Constraint::new("email", Operator::In, vec!["User@Example.com".to_string()]);
        assert!(!sensitive.matches(&Context::new().with_custom_property("email", "user@example.com")));
    }

    #[test]
    fn test_string_operators() {
        let starts = Constraint::new("appName", Operator::StrStartsWith, vec!["web-".to_string()]);
        assert!(starts.matches(&Context::new().with_app_name("web-checkout")));
        assert!(!starts.matches(&Context::new().with_app_name("api-checkout")));
        assert!(!starts.matches(&Context::new()));

        let ends = Constraint::new("email", Operator::StrEndsWith, vec!["@company.com".to_string()]);
        assert!(ends.matches(&Context::new().with_custom_property("email", "dev@company.com")));

        let contains = Constraint::new(
            "userId",
            Operator::StrContains,
            vec!["beta".to_string(), "canary".to_string()],
        );
        assert!(contains.matches(&Context::new().with_user_id("canary-17")));
        assert!(!contains.matches(&Context::new().with_user_id("user-17")));
    }

    #[test]
    fn test_numeric_operators() {
        let gte = Constraint::new("age", Operator::NumGte, Vec::new()).with_value("21");

        assert!(gte.matches(&Context::new().with_custom_property("age", "21")));
        assert!(gte.matches(&Context::new().with_custom_property("age", "34.5")));
        assert!(!gte.matches(&Context::new().with_custom_property("age", "18")));
        // Unparsable or missing values never match
        assert!(!gte.matches(&Context::new().with_custom_property("age", "twenty")));
        assert!(!gte.matches(&Context::new()));

        let eq = Constraint::new("count", Operator::NumEq, Vec::new()).with_value("3");
        assert!(eq.matches(&Context::new().with_custom_property("count", "3.0")));
        assert!(!eq.matches(&Context::new().with_custom_property("count", "4")));
    }

    #[test]
    fn test_date_operators() {
        let after = Constraint::new("currentTime", Operator::DateAfter, Vec::new())
            .with_value("2024-01-01T00:00:00Z");

        let before_cutoff = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let after_cutoff = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert!(after.matches(&Context::new().with_current_time(after_cutoff)));
        assert!(!after.matches(&Context::new().with_current_time(before_cutoff)));

        let before = Constraint::new("currentTime", Operator::DateBefore, Vec::new())
            .with_value("2024-01-01T00:00:00Z");
        assert!(before.matches(&Context::new().with_current_time(before_cutoff)));

        // A string attribute wins over the context clock
        let explicit = Constraint::new("expiresAt", Operator::DateAfter, Vec::new())
            .with_value("2024-01-01T00:00:00Z");
        assert!(explicit.matches(
            &Context::new().with_custom_property("expiresAt", "2025-03-01T12:00:00Z")
        ));
        assert!(!explicit.matches(&Context::new()));

        // Unparsable operand never matches
        let bad = Constraint::new("currentTime", Operator::DateAfter, Vec::new())
            .with_value("not-a-date");
        assert!(!bad.matches(&Context::new().with_current_time(after_cutoff)));
    }

    #[test]
    fn test_semver_operators() {
        let gt = Constraint::new("appVersion", Operator::SemverGt, Vec::new()).with_value("2.1.0");

        assert!(gt.matches(&Context::new().with_custom_property("appVersion", "2.2.0")));
        assert!(!gt.matches(&Context::new().with_custom_property("appVersion", "2.1.0")));
        assert!(!gt.matches(&Context::new().with_custom_property("appVersion", "2.0.9")));
        assert!(!gt.matches(&Context::new().with_custom_property("appVersion", "not-semver")));
        assert!(!gt.matches(&Context::new()));

        let eq = Constraint::new("appVersion", Operator::SemverEq, Vec::new()).with_value("1.0.0");
        assert!(eq.matches(&Context::new().with_custom_property("appVersion", "1.0.0")));
    }

    #[test]
    fn test_wire_format() {
        let constraint: Constraint = serde_json::from_str(
            r#"{
                "contextName": "environment",
                "operator": "NOT_IN",
                "values": ["production"],
                "inverted": false,
                "caseInsensitive": true
            }"#,
        )
        .unwrap();

        assert_eq!(constraint.context_name, "environment");
        assert_eq!(constraint.operator, Operator::NotIn);
        assert!(constraint.case_insensitive);
        assert!(!constraint.matches(&Context::new().with_environment("PRODUCTION")));

        // Omitted optional fields take their defaults
        let minimal: Constraint =
            serde_json::from_str(r#"{"contextName": "userId", "operator": "IN", "values": ["1"]}"#)
                .unwrap();
        assert!(!minimal.inverted);
        assert!(!minimal.case_insensitive);
        assert_eq!(minimal.value, None);
    }
}

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::route::Medium;

/// A single prefix rule in a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Address prefix this rule matches, e.g. `"http://"` or `"orders."`.
    pub prefix: String,
    /// Medium assigned to matching addresses.
    pub medium: Medium,
    /// When true, the matched prefix is removed from the resolved address.
    #[serde(default)]
    pub strip_prefix: bool,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, medium: impl Into<Medium>) -> Self {
        Self {
            prefix: prefix.into(),
            medium: medium.into(),
            strip_prefix: false,
        }
    }

    pub fn stripped(mut self) -> Self {
        self.strip_prefix = true;
        self
    }
}

/// Address-prefix routing configuration.
///
/// ```json
/// {
///   "fallback": 0,
///   "routes": [
///     { "prefix": "http://", "medium": 1 },
///     { "prefix": "broker:", "medium": 2, "strip_prefix": true }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Medium for addresses no rule matches.
    #[serde(default)]
    pub fallback: Medium,
    #[serde(default)]
    pub routes: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(fallback: impl Into<Medium>) -> Self {
        Self {
            fallback: fallback.into(),
            routes: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: RouteRule) -> Self {
        self.routes.push(rule);
        self
    }

    /// Parse and validate a routing table from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, RoutingError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a routing table file.
    pub fn from_path(path: &Path) -> Result<Self, RoutingError> {
        let json = std::fs::read_to_string(path).map_err(|source| RoutingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject empty and duplicate prefixes.
    pub fn validate(&self) -> Result<(), RoutingError> {
        let mut seen = HashSet::new();
        for (index, rule) in self.routes.iter().enumerate() {
            if rule.prefix.is_empty() {
                return Err(RoutingError::EmptyPrefix { index });
            }
            if !seen.insert(rule.prefix.as_str()) {
                return Err(RoutingError::DuplicatePrefix(rule.prefix.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table() {
        let table = RouteTable::from_json_str(
            r#"{
                "fallback": 0,
                "routes": [
                    { "prefix": "http://", "medium": 1 },
                    { "prefix": "broker:", "medium": 2, "strip_prefix": true }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(table.fallback, Medium::DEFAULT);
        assert_eq!(table.routes.len(), 2);
        assert!(!table.routes[0].strip_prefix);
        assert_eq!(table.routes[1], RouteRule::new("broker:", Medium::BROKER).stripped());
    }

    #[test]
    fn test_empty_document_defaults() {
        let table = RouteTable::from_json_str("{}").unwrap();
        assert_eq!(table, RouteTable::default());
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let err = RouteTable::from_json_str(r#"{"routes":[{"prefix":"","medium":1}]}"#).unwrap_err();
        assert!(matches!(err, RoutingError::EmptyPrefix { index: 0 }));
    }

    #[test]
    fn test_rejects_duplicate_prefix() {
        let table = RouteTable::new(Medium::DEFAULT)
            .with_rule(RouteRule::new("a.", Medium::HTTP))
            .with_rule(RouteRule::new("a.", Medium::BROKER));
        assert!(matches!(table.validate(), Err(RoutingError::DuplicatePrefix(p)) if p == "a."));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = RouteTable::from_json_str("{routes:").unwrap_err();
        assert!(matches!(err, RoutingError::InvalidTable(_)));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join(format!("muldem-missing-{}.json", std::process::id()));
        let err = RouteTable::from_path(&path).unwrap_err();
        assert!(matches!(err, RoutingError::Read { .. }));
    }
}

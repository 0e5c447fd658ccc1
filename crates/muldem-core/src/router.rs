use tracing::trace;

use crate::config::{RouteRule, RouteTable};
use crate::error::RoutingError;
use crate::route::{Medium, Route};

/// Resolves a logical address to a [`Route`].
///
/// Resolution never fails: an address that cannot be mapped must still resolve
/// to some route. Routers that can reject addresses also override
/// [`Router::try_resolve`], which strict pipelines call instead.
///
/// Implementations must be deterministic: equal addresses under equal
/// configuration yield equal routes.
pub trait Router: Send + Sync {
    fn resolve(&self, address: &str) -> Route;

    /// Resolve without falling back. Defaults to [`Router::resolve`].
    fn try_resolve(&self, address: &str) -> Result<Route, RoutingError> {
        Ok(self.resolve(address))
    }
}

impl<F> Router for F
where
    F: Fn(&str) -> Route + Send + Sync,
{
    fn resolve(&self, address: &str) -> Route {
        self(address)
    }
}

/// Tags every address with a fixed medium and leaves it unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityRouter {
    medium: Medium,
}

impl IdentityRouter {
    pub fn new(medium: impl Into<Medium>) -> Self {
        Self {
            medium: medium.into(),
        }
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }
}

impl Router for IdentityRouter {
    fn resolve(&self, address: &str) -> Route {
        Route::new(self.medium, address)
    }
}

/// Routes addresses by their longest matching prefix.
#[derive(Debug, Clone)]
pub struct PrefixRouter {
    fallback: Medium,
    // Longest prefix first.
    rules: Vec<RouteRule>,
}

impl PrefixRouter {
    /// Build a router from a validated routing table.
    pub fn new(table: RouteTable) -> Result<Self, RoutingError> {
        table.validate()?;
        let mut rules = table.routes;
        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Ok(Self {
            fallback: table.fallback,
            rules,
        })
    }

    pub fn fallback(&self) -> Medium {
        self.fallback
    }

    /// Resolve an address, failing if no rule matches.
    pub fn lookup(&self, address: &str) -> Result<Route, RoutingError> {
        self.matching(address)
            .ok_or_else(|| RoutingError::NoRoute(address.to_string()))
    }

    fn matching(&self, address: &str) -> Option<Route> {
        let rule = self
            .rules
            .iter()
            .find(|rule| address.starts_with(rule.prefix.as_str()))?;

        let resolved = if rule.strip_prefix {
            &address[rule.prefix.len()..]
        } else {
            address
        };
        trace!(address, prefix = %rule.prefix, medium = %rule.medium, "matched route rule");
        Some(Route::new(rule.medium, resolved))
    }
}

impl Router for PrefixRouter {
    fn resolve(&self, address: &str) -> Route {
        self.matching(address)
            .unwrap_or_else(|| Route::new(self.fallback, address))
    }

    fn try_resolve(&self, address: &str) -> Result<Route, RoutingError> {
        self.lookup(address)
    }
}

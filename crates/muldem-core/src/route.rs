//! Mediums and resolved routes.
//!
//! Mediums 0-255 are reserved for built-in transport classes.
//! Mediums 256-65535 are available for application-defined transports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer tag identifying a class of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Medium(pub u16);

impl Medium {
    /// Default, in-process delivery.
    pub const DEFAULT: Medium = Medium(0);

    /// HTTP delivery.
    pub const HTTP: Medium = Medium(1);

    /// Message broker delivery.
    pub const BROKER: Medium = Medium(2);

    /// First user-defined medium.
    pub const USER_MEDIUM_START: Medium = Medium(256);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u16 {
        self.0
    }

    /// Returns a human-readable name for this medium.
    pub fn name(self) -> &'static str {
        match self {
            Self::DEFAULT => "DEFAULT",
            Self::HTTP => "HTTP",
            Self::BROKER => "BROKER",
            Medium(3..=255) => "RESERVED",
            _ => "USER",
        }
    }

    /// Returns true if the medium is in the reserved range.
    pub fn is_reserved(self) -> bool {
        self < Self::USER_MEDIUM_START
    }

    /// Returns true if the medium is a built-in medium.
    pub fn is_builtin(self) -> bool {
        self <= Self::BROKER
    }
}

impl From<u16> for Medium {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The resolved destination of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Route {
    pub medium: Medium,
    pub address: String,
}

impl Route {
    pub fn new(medium: impl Into<Medium>, address: impl Into<String>) -> Self {
        Self {
            medium: medium.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.medium.name(), self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_names() {
        assert_eq!(Medium::DEFAULT.name(), "DEFAULT");
        assert_eq!(Medium::HTTP.name(), "HTTP");
        assert_eq!(Medium::BROKER.name(), "BROKER");
        assert_eq!(Medium(42).name(), "RESERVED");
        assert_eq!(Medium(256).name(), "USER");
    }

    #[test]
    fn test_medium_ranges() {
        assert!(Medium::BROKER.is_builtin());
        assert!(!Medium(3).is_builtin());
        assert!(Medium(255).is_reserved());
        assert!(!Medium::USER_MEDIUM_START.is_reserved());
    }

    #[test]
    fn test_medium_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Medium::BROKER).unwrap(), "2");
        let route: Route = serde_json::from_str(r#"{"medium":1,"address":"/orders"}"#).unwrap();
        assert_eq!(route, Route::new(Medium::HTTP, "/orders"));
    }

    #[test]
    fn test_route_display() {
        assert_eq!(Route::new(Medium::BROKER, "orders").to_string(), "BROKER:orders");
    }
}

use std::path::PathBuf;

/// Boxed error produced by a caller-supplied strategy.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the multiplex/demultiplex pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MuldemError {
    /// The payload could not be marshaled, or the bytes could not be unmarshaled.
    #[error("encoding error: {0}")]
    Encoding(#[source] BoxError),

    /// The message envelope could not be built or unwrapped.
    #[error("envelope error: {0}")]
    Envelope(#[source] BoxError),

    /// An address could not be resolved to a route.
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    /// The builder was finished without one of the five capabilities.
    #[error("muldem is missing its {0}")]
    MissingCapability(&'static str),
}

/// Coarse classification of a [`MuldemError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Encoding,
    Envelope,
    Routing,
    Config,
}

impl MuldemError {
    /// Wrap a codec failure.
    pub fn encoding(err: impl Into<BoxError>) -> Self {
        Self::Encoding(err.into())
    }

    /// Wrap an envelope failure.
    pub fn envelope(err: impl Into<BoxError>) -> Self {
        Self::Envelope(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Envelope(_) => ErrorKind::Envelope,
            Self::Routing(_) => ErrorKind::Routing,
            Self::MissingCapability(_) => ErrorKind::Config,
        }
    }
}

impl From<serde_json::Error> for MuldemError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(Box::new(err))
    }
}

/// Errors raised by address resolution and routing configuration.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// No configured rule matches the address.
    #[error("no route for address {0:?}")]
    NoRoute(String),

    /// A route rule has an empty prefix.
    #[error("route rule {index} has an empty prefix")]
    EmptyPrefix { index: usize },

    /// Two rules share the same prefix.
    #[error("duplicate route prefix {0:?}")]
    DuplicatePrefix(String),

    /// The routing table is not valid JSON.
    #[error("invalid routing table: {0}")]
    InvalidTable(#[from] serde_json::Error),

    /// The routing table file could not be read.
    #[error("failed to read routing table {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MuldemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_encoding() {
        let err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = MuldemError::from(err);
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_routing_error_kind() {
        let err = MuldemError::from(RoutingError::NoRoute("x".into()));
        assert_eq!(err.kind(), ErrorKind::Routing);
        assert_eq!(err.to_string(), "routing error: no route for address \"x\"");
    }

    #[test]
    fn test_missing_capability_message() {
        let err = MuldemError::MissingCapability("router");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.to_string(), "muldem is missing its router");
    }
}

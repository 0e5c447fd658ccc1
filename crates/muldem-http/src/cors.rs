use std::sync::Arc;

use http::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN};
use http::request::Parts;
use http::Method;
use tower::layer::util::Stack;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::debug;

use crate::body::UniformBodyLayer;

const DEFAULT_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::HEAD];

fn default_headers() -> Vec<HeaderName> {
    vec![
        ORIGIN,
        ACCEPT,
        CONTENT_TYPE,
        HeaderName::from_static("x-requested-with"),
    ]
}

/// Cross-origin resource sharing policy.
///
/// Empty lists fall back to defaults: any origin, `GET`/`POST`/`HEAD`, and
/// the `Origin`, `Accept`, `Content-Type`, `X-Requested-With` headers.
/// Origins may be `"*"` or contain one `*` wildcard
/// (`"https://*.example.com"`). A `"*"` header allows any request header.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
    allowed_methods: Vec<Method>,
    allowed_headers: Vec<HeaderName>,
    any_header: bool,
    debug: bool,
}

impl CorsPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins
            .into_iter()
            .map(|o| o.into().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn allow_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.allowed_methods = methods.into_iter().collect();
        self
    }

    /// Names that are not valid header names are ignored.
    pub fn allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_headers.clear();
        self.any_header = false;
        for header in headers {
            let header = header.as_ref();
            if header == "*" {
                self.any_header = true;
            } else if let Ok(name) = HeaderName::from_bytes(header.as_bytes()) {
                self.allowed_headers.push(name);
            }
        }
        self
    }

    /// Log every origin decision at debug level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.allows_any_origin() {
            return true;
        }
        let origin = origin.to_ascii_lowercase();
        self.allowed_origins
            .iter()
            .any(|pattern| match pattern.split_once('*') {
                Some((prefix, suffix)) => {
                    origin.len() >= prefix.len() + suffix.len()
                        && origin.starts_with(prefix)
                        && origin.ends_with(suffix)
                }
                None => *pattern == origin,
            })
    }

    fn allow_origin(&self) -> AllowOrigin {
        if self.allows_any_origin() && !self.debug {
            return AllowOrigin::any();
        }
        let policy = Arc::new(self.clone());
        AllowOrigin::predicate(move |origin: &HeaderValue, parts: &Parts| {
            let allowed = origin
                .to_str()
                .is_ok_and(|origin| policy.is_origin_allowed(origin));
            if policy.debug {
                debug!(
                    method = %parts.method,
                    uri = %parts.uri,
                    ?origin,
                    allowed,
                    "cors: origin checked"
                );
            }
            allowed
        })
    }

    fn allow_methods_value(&self) -> AllowMethods {
        if self.allowed_methods.is_empty() {
            AllowMethods::list(DEFAULT_METHODS)
        } else {
            AllowMethods::list(self.allowed_methods.iter().cloned())
        }
    }

    fn allow_headers_value(&self) -> AllowHeaders {
        if self.any_header {
            AllowHeaders::any()
        } else if self.allowed_headers.is_empty() {
            AllowHeaders::list(default_headers())
        } else {
            AllowHeaders::list(self.allowed_headers.iter().cloned())
        }
    }

    /// The equivalent `tower-http` layer.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.allow_origin())
            .allow_methods(self.allow_methods_value())
            .allow_headers(self.allow_headers_value())
    }
}

pub type CorsPolicyLayer = Stack<UniformBodyLayer, CorsLayer>;

/// Applies `policy` to every request.
///
/// Preflight requests are answered here and never reach the inner service.
/// Other requests always reach the inner service; allowed cross-origin
/// requests get `Access-Control-Allow-Origin` on the response.
pub fn cors(policy: CorsPolicy) -> CorsPolicyLayer {
    Stack::new(UniformBodyLayer, policy.cors_layer())
}

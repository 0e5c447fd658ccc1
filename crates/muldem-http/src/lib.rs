//! Ordered tower middleware stack for HTTP services.
//!
//! Layers are pushed one at a time. The first layer pushed is the
//! outermost: it sees the request first and delegates inward, down to the
//! terminal service. An empty stack hands requests straight to the terminal
//! service.
//!
//! Built-in layers:
//! - [`panic_recover`]: turns a panicking service into a 500 response
//! - [`request_logger`]: logs every requested URI
//! - [`cors`]: cross-origin policy from a [`CorsPolicy`]
//! - [`tracing_span`]: runs the rest of the chain inside a request span
//!
//! Every built-in layer answers with [`Response`], so they stack in any order.

pub mod body;
pub mod cors;
pub mod middleware;
pub mod stack;

pub use axum::body::Body;
pub use body::{UniformBody, UniformBodyLayer};
pub use cors::{cors, CorsPolicy, CorsPolicyLayer};
pub use middleware::{
    panic_recover, request_logger, tracing_span, InternalErrorOnPanic, PanicRecoverLayer,
    RequestLogger, RequestLoggerLayer, RequestSpan, RequestSpanLayer, SPAN_NAME,
};
pub use stack::{MiddlewareStack, Request, Response};

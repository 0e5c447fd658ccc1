//! Pluggable multiplex/demultiplex pipelines.
//!
//! muldem turns application payloads into transport-ready messages addressed
//! to a medium, and back again, by composing a router, a codec and an
//! envelope. Sending the resulting messages is left to the caller.
//!
//! # Crate Structure
//!
//! - [`pipeline`]: Capability traits, reference strategies and the [`Muldem`] pipeline
//! - [`frame`]: Length-prefixed envelope that carries the route on the wire
//! - [`http`]: Ordered middleware stack for HTTP handlers (behind `http` feature)

/// Re-export pipeline types.
pub mod pipeline {
    pub use muldem_core::*;
}

/// Re-export frame types.
pub mod frame {
    pub use muldem_frame::*;
}

/// Re-export middleware types (requires `http` feature).
#[cfg(feature = "http")]
pub mod http {
    pub use muldem_http::*;
}

pub use muldem_core::{Medium, Muldem, MuldemError, Route, Router};

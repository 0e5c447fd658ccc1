//! Pluggable multiplex/demultiplex pipeline.
//!
//! A [`Muldem`] turns an application payload plus a logical address into a
//! transport-ready message, and back again, by composing five capabilities:
//! - a [`Router`] resolving the address to a [`Route`] (medium + address)
//! - a [`Marshaler`] / [`Unmarshaler`] pair converting payloads to bytes
//! - an [`Encapsulator`] / [`Decapsulator`] pair wrapping bytes in framing
//!
//! Every capability is a single-method trait, also implemented for closures.
//! Nothing here performs I/O; sending the resulting message is up to the
//! caller's transport.

pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod muldem;
pub mod route;
pub mod router;

pub use codec::{JsonCodec, JsonMarshaler, JsonUnmarshaler, Marshaler, Unmarshaler};
pub use config::{RouteRule, RouteTable};
pub use envelope::{Decapsulator, Encapsulator, NoopDecapsulator, NoopEncapsulator, PassthroughEnvelope};
pub use error::{BoxError, ErrorKind, MuldemError, Result, RoutingError};
pub use muldem::{Muldem, MuldemBuilder};
pub use route::{Medium, Route};
pub use router::{IdentityRouter, PrefixRouter, Router};

//! Length-prefixed, route-carrying envelope for muldem pipelines.
//!
//! Every message is framed with:
//! - A 2-byte magic number ("MD") for stream synchronization
//! - A 1-byte format version
//! - A 2-byte little-endian medium
//! - A 2-byte little-endian address length and a 4-byte little-endian payload length
//! - The UTF-8 address followed by the payload
//!
//! A receiver needs no external context to recover the route a frame was sent on.

pub mod codec;
pub mod envelope;
pub mod error;

pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_ADDRESS, DEFAULT_MAX_PAYLOAD,
    HEADER_SIZE, MAGIC, VERSION,
};
pub use envelope::{framed, framed_with_config, FrameEnvelope};
pub use error::{FrameError, Result};

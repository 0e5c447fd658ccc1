use bytes::{Bytes, BytesMut};
use muldem_core::{Decapsulator, Encapsulator, JsonCodec, Muldem, Route, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec::{encode_frame, Frame, FrameConfig, HEADER_SIZE};
use crate::error::FrameError;

/// Matched encapsulator/decapsulator pair producing [`Frame`] wire bytes.
///
/// The envelope embeds the medium and address, so a receiver can recover the
/// full route with [`FrameEnvelope::decapsulate_routed`].
#[derive(Debug, Clone, Default)]
pub struct FrameEnvelope {
    config: FrameConfig,
}

impl FrameEnvelope {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Unwrap a message into its route and payload.
    pub fn decapsulate_routed(&self, message: &[u8]) -> muldem_core::Result<Frame> {
        Frame::parse(message, &self.config).map_err(|err| {
            debug!(size = message.len(), error = %err, "rejected frame");
            err.into()
        })
    }
}

impl Encapsulator<Bytes> for FrameEnvelope {
    fn encapsulate(&self, route: &Route, bytes: Bytes) -> muldem_core::Result<Bytes> {
        if route.address.len() > self.config.max_address_len {
            return Err(FrameError::AddressTooLong {
                len: route.address.len(),
                max: self.config.max_address_len,
            }
            .into());
        }
        if bytes.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: bytes.len(),
                max: self.config.max_payload_size,
            }
            .into());
        }

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + route.address.len() + bytes.len());
        encode_frame(route, &bytes, &mut buf)?;
        Ok(buf.freeze())
    }
}

impl Decapsulator<Bytes> for FrameEnvelope {
    fn decapsulate(&self, message: &Bytes) -> muldem_core::Result<Bytes> {
        Ok(self.decapsulate_routed(message)?.payload)
    }
}

/// JSON pipeline wrapping payloads in frames with default limits.
pub fn framed<P>(router: impl Router + 'static) -> Muldem<P, Bytes>
where
    P: Serialize + DeserializeOwned,
{
    framed_with_config(router, FrameConfig::default())
}

/// JSON pipeline wrapping payloads in frames with explicit limits.
pub fn framed_with_config<P>(router: impl Router + 'static, config: FrameConfig) -> Muldem<P, Bytes>
where
    P: Serialize + DeserializeOwned,
{
    let envelope = FrameEnvelope::new(config);
    Muldem::new(router, JsonCodec, JsonCodec, envelope.clone(), envelope)
}

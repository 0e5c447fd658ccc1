use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{MuldemError, Result};

/// Converts a payload into bytes.
///
/// A marshaler must fail only on payload shapes its format cannot represent,
/// and that failure must be returned rather than replaced by partial output.
pub trait Marshaler<P: ?Sized>: Send + Sync {
    fn marshal(&self, payload: &P) -> Result<Bytes>;
}

/// Converts bytes back into a payload.
pub trait Unmarshaler<P>: Send + Sync {
    fn unmarshal(&self, bytes: &[u8]) -> Result<P>;
}

impl<P, F> Marshaler<P> for F
where
    P: ?Sized,
    F: Fn(&P) -> Result<Bytes> + Send + Sync,
{
    fn marshal(&self, payload: &P) -> Result<Bytes> {
        self(payload)
    }
}

impl<P, F> Unmarshaler<P> for F
where
    F: Fn(&[u8]) -> Result<P> + Send + Sync,
{
    fn unmarshal(&self, bytes: &[u8]) -> Result<P> {
        self(bytes)
    }
}

/// JSON marshaler for any `Serialize` payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaler;

impl<P> Marshaler<P> for JsonMarshaler
where
    P: Serialize + ?Sized,
{
    fn marshal(&self, payload: &P) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(payload)?))
    }
}

/// JSON unmarshaler for any `DeserializeOwned` payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonUnmarshaler;

impl<P> Unmarshaler<P> for JsonUnmarshaler
where
    P: DeserializeOwned,
{
    fn unmarshal(&self, bytes: &[u8]) -> Result<P> {
        serde_json::from_slice(bytes).map_err(MuldemError::from)
    }
}

/// Both halves of the JSON codec in one value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<P> Marshaler<P> for JsonCodec
where
    P: Serialize + ?Sized,
{
    fn marshal(&self, payload: &P) -> Result<Bytes> {
        JsonMarshaler.marshal(payload)
    }
}

impl<P> Unmarshaler<P> for JsonCodec
where
    P: DeserializeOwned,
{
    fn unmarshal(&self, bytes: &[u8]) -> Result<P> {
        JsonUnmarshaler.unmarshal(bytes)
    }
}

use bytes::Bytes;

use crate::error::Result;
use crate::route::Route;

/// Wraps marshaled bytes in route-aware transport framing.
///
/// Framing may carry the medium, the address, a length prefix or any other
/// header a downstream transport needs to deliver the message without
/// external context. Implementations with representability limits (maximum
/// sizes, field widths) report them as envelope errors.
pub trait Encapsulator<M>: Send + Sync {
    fn encapsulate(&self, route: &Route, bytes: Bytes) -> Result<M>;
}

/// Recovers marshaled bytes from a transport message.
///
/// A production decapsulator is the inverse of its encapsulator:
/// `decapsulate(encapsulate(route, bytes)) == bytes`.
pub trait Decapsulator<M>: Send + Sync {
    fn decapsulate(&self, message: &M) -> Result<Bytes>;
}

impl<M, F> Encapsulator<M> for F
where
    F: Fn(&Route, Bytes) -> Result<M> + Send + Sync,
{
    fn encapsulate(&self, route: &Route, bytes: Bytes) -> Result<M> {
        self(route, bytes)
    }
}

impl<M, F> Decapsulator<M> for F
where
    F: Fn(&M) -> Result<Bytes> + Send + Sync,
{
    fn decapsulate(&self, message: &M) -> Result<Bytes> {
        self(message)
    }
}

/// Stand-in encapsulator: discards its inputs and yields an empty message.
///
/// Not an inverse of anything. Only meant for stub configurations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEncapsulator;

impl<M: Default> Encapsulator<M> for NoopEncapsulator {
    fn encapsulate(&self, _route: &Route, _bytes: Bytes) -> Result<M> {
        Ok(M::default())
    }
}

/// Stand-in decapsulator: yields no bytes and no error for any message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDecapsulator;

impl<M> Decapsulator<M> for NoopDecapsulator {
    fn decapsulate(&self, _message: &M) -> Result<Bytes> {
        Ok(Bytes::new())
    }
}

/// Matched envelope whose message is the marshaled bytes themselves.
///
/// Use when the payload encoding is already the wire format and the route is
/// carried out of band.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughEnvelope;

impl Encapsulator<Bytes> for PassthroughEnvelope {
    fn encapsulate(&self, _route: &Route, bytes: Bytes) -> Result<Bytes> {
        Ok(bytes)
    }
}

impl Decapsulator<Bytes> for PassthroughEnvelope {
    fn decapsulate(&self, message: &Bytes) -> Result<Bytes> {
        Ok(message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MuldemError;
    use crate::route::Medium;

    #[test]
    fn test_noop_encapsulate_is_empty() {
        let route = Route::new(Medium::BROKER, "orders");
        let message: Vec<u8> = NoopEncapsulator
            .encapsulate(&route, Bytes::from_static(b"payload"))
            .unwrap();
        assert!(message.is_empty());

        let message: String = NoopEncapsulator
            .encapsulate(&Route::default(), Bytes::new())
            .unwrap();
        assert!(message.is_empty());
    }

    #[test]
    fn test_noop_decapsulate_is_empty() {
        let bytes = NoopDecapsulator
            .decapsulate(&b"anything at all".to_vec())
            .unwrap();
        assert!(bytes.is_empty());

        let bytes = NoopDecapsulator.decapsulate(&String::new()).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_passthrough_is_inverse() {
        let route = Route::new(Medium::HTTP, "/orders");
        let payload = Bytes::from_static(b"{\"id\":1}");
        let message = PassthroughEnvelope
            .encapsulate(&route, payload.clone())
            .unwrap();
        assert_eq!(PassthroughEnvelope.decapsulate(&message).unwrap(), payload);
    }

    #[test]
    fn test_closure_envelope() {
        let encapsulate = |route: &Route, bytes: Bytes| -> Result<String> {
            let body = std::str::from_utf8(&bytes).map_err(MuldemError::envelope)?;
            Ok(format!("{}|{}", route.address, body))
        };
        let decapsulate = |message: &String| -> Result<Bytes> {
            let (_, body) = message
                .split_once('|')
                .ok_or_else(|| MuldemError::envelope("missing separator"))?;
            Ok(Bytes::copy_from_slice(body.as_bytes()))
        };

        let route = Route::new(Medium::DEFAULT, "inbox");
        let message = encapsulate
            .encapsulate(&route, Bytes::from_static(b"hi"))
            .unwrap();
        assert_eq!(message, "inbox|hi");
        assert_eq!(decapsulate.decapsulate(&message).unwrap().as_ref(), b"hi");
        assert!(decapsulate.decapsulate(&"no-separator".to_string()).is_err());
    }
}

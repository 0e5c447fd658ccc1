use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec::{JsonCodec, Marshaler, Unmarshaler};
use crate::envelope::{Decapsulator, Encapsulator, NoopDecapsulator, NoopEncapsulator, PassthroughEnvelope};
use crate::error::{MuldemError, Result};
use crate::route::{Medium, Route};
use crate::router::{IdentityRouter, Router};

/// Multiplex/demultiplex pipeline over payload type `P` and message type `M`.
///
/// Multiplexing runs router → marshaler → encapsulator; demultiplexing runs
/// decapsulator → unmarshaler. The first failing step ends the call and its
/// error is returned unchanged.
///
/// A `Muldem` is immutable once built and holds no per-call state, so one
/// instance can be shared across threads (e.g. behind an `Arc`) and invoked
/// concurrently.
pub struct Muldem<P, M> {
    router: Box<dyn Router>,
    marshaler: Box<dyn Marshaler<P>>,
    unmarshaler: Box<dyn Unmarshaler<P>>,
    encapsulator: Box<dyn Encapsulator<M>>,
    decapsulator: Box<dyn Decapsulator<M>>,
}

impl<P, M> Muldem<P, M> {
    /// Bind all five capabilities at once.
    pub fn new(
        router: impl Router + 'static,
        marshaler: impl Marshaler<P> + 'static,
        unmarshaler: impl Unmarshaler<P> + 'static,
        encapsulator: impl Encapsulator<M> + 'static,
        decapsulator: impl Decapsulator<M> + 'static,
    ) -> Self {
        Self {
            router: Box::new(router),
            marshaler: Box::new(marshaler),
            unmarshaler: Box::new(unmarshaler),
            encapsulator: Box::new(encapsulator),
            decapsulator: Box::new(decapsulator),
        }
    }

    /// Start building a pipeline from individual capabilities.
    pub fn builder() -> MuldemBuilder<P, M> {
        MuldemBuilder::default()
    }

    /// Resolve an address without encoding anything.
    pub fn route(&self, address: &str) -> Route {
        self.router.resolve(address)
    }

    /// Resolve an address, failing when the router has no rule for it.
    pub fn try_route(&self, address: &str) -> Result<Route> {
        Ok(self.router.try_resolve(address)?)
    }

    /// Route, marshal and encapsulate a payload.
    pub fn multiplex(&self, address: &str, payload: &P) -> Result<M> {
        self.encode(self.router.resolve(address), payload)
    }

    /// Like [`Muldem::multiplex`], but an unroutable address is a
    /// [`MuldemError::Routing`] error instead of taking the router's fallback.
    pub fn try_multiplex(&self, address: &str, payload: &P) -> Result<M> {
        let route = self.try_route(address)?;
        self.encode(route, payload)
    }

    fn encode(&self, route: Route, payload: &P) -> Result<M> {
        let bytes = self.marshaler.marshal(payload)?;
        let size = bytes.len();
        let message = self.encapsulator.encapsulate(&route, bytes)?;
        debug!(medium = %route.medium, address = %route.address, size, "multiplexed payload");
        Ok(message)
    }

    /// Decapsulate and unmarshal a message.
    pub fn demultiplex(&self, message: &M) -> Result<P> {
        let bytes = self.decapsulator.decapsulate(message)?;
        let payload = self.unmarshaler.unmarshal(&bytes)?;
        debug!(size = bytes.len(), "demultiplexed payload");
        Ok(payload)
    }
}

impl<P, M> Muldem<P, M>
where
    P: Serialize + DeserializeOwned,
    M: Default,
{
    /// Identity router on [`Medium::DEFAULT`], JSON codec and the no-op envelope.
    ///
    /// The no-op envelope drops the marshaled bytes, so a stub pipeline can
    /// not demultiplex what it multiplexed. Use it only where the envelope
    /// does not matter yet; production pipelines need a matched envelope.
    pub fn stub() -> Self {
        Self::new(
            IdentityRouter::new(Medium::DEFAULT),
            JsonCodec,
            JsonCodec,
            NoopEncapsulator,
            NoopDecapsulator,
        )
    }
}

impl<P> Muldem<P, Bytes>
where
    P: Serialize + DeserializeOwned,
{
    /// JSON codec with the passthrough envelope: the message is the JSON text.
    pub fn passthrough(router: impl Router + 'static) -> Self {
        Self::new(router, JsonCodec, JsonCodec, PassthroughEnvelope, PassthroughEnvelope)
    }
}

impl<P, M> fmt::Debug for Muldem<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Muldem").finish_non_exhaustive()
    }
}

/// Builder binding exactly one of each capability.
pub struct MuldemBuilder<P, M> {
    router: Option<Box<dyn Router>>,
    marshaler: Option<Box<dyn Marshaler<P>>>,
    unmarshaler: Option<Box<dyn Unmarshaler<P>>>,
    encapsulator: Option<Box<dyn Encapsulator<M>>>,
    decapsulator: Option<Box<dyn Decapsulator<M>>>,
}

impl<P, M> Default for MuldemBuilder<P, M> {
    fn default() -> Self {
        Self {
            router: None,
            marshaler: None,
            unmarshaler: None,
            encapsulator: None,
            decapsulator: None,
        }
    }
}

impl<P, M> MuldemBuilder<P, M> {
    pub fn router(mut self, router: impl Router + 'static) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    pub fn marshaler(mut self, marshaler: impl Marshaler<P> + 'static) -> Self {
        self.marshaler = Some(Box::new(marshaler));
        self
    }

    pub fn unmarshaler(mut self, unmarshaler: impl Unmarshaler<P> + 'static) -> Self {
        self.unmarshaler = Some(Box::new(unmarshaler));
        self
    }

    /// Bind both codec halves from one value.
    pub fn codec<C>(self, codec: C) -> Self
    where
        C: Marshaler<P> + Unmarshaler<P> + Clone + 'static,
    {
        self.marshaler(codec.clone()).unmarshaler(codec)
    }

    pub fn encapsulator(mut self, encapsulator: impl Encapsulator<M> + 'static) -> Self {
        self.encapsulator = Some(Box::new(encapsulator));
        self
    }

    pub fn decapsulator(mut self, decapsulator: impl Decapsulator<M> + 'static) -> Self {
        self.decapsulator = Some(Box::new(decapsulator));
        self
    }

    /// Bind a matched encapsulator/decapsulator pair from one value.
    pub fn envelope<E>(self, envelope: E) -> Self
    where
        E: Encapsulator<M> + Decapsulator<M> + Clone + 'static,
    {
        self.encapsulator(envelope.clone()).decapsulator(envelope)
    }

    /// Finish the pipeline. Every capability must have been set.
    pub fn build(self) -> Result<Muldem<P, M>> {
        Ok(Muldem {
            router: self.router.ok_or(MuldemError::MissingCapability("router"))?,
            marshaler: self
                .marshaler
                .ok_or(MuldemError::MissingCapability("marshaler"))?,
            unmarshaler: self
                .unmarshaler
                .ok_or(MuldemError::MissingCapability("unmarshaler"))?,
            encapsulator: self
                .encapsulator
                .ok_or(MuldemError::MissingCapability("encapsulator"))?,
            decapsulator: self
                .decapsulator
                .ok_or(MuldemError::MissingCapability("decapsulator"))?,
        })
    }
}

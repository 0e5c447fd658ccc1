use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, HttpBody};
use bytes::Bytes;
use tower::{BoxError, Layer, Service};

use crate::stack::Response;

/// Boxes whatever body the inner service returns into a [`Body`].
///
/// The built-in layers wrap their own body types; normalizing them keeps
/// every stack answering with [`Response`] regardless of push order.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformBodyLayer;

impl<S> Layer<S> for UniformBodyLayer {
    type Service = UniformBody<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UniformBody { inner }
    }
}

#[derive(Debug, Clone)]
pub struct UniformBody<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for UniformBody<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: 'static,
    ResBody: HttpBody<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<ReqBody>) -> Self::Future {
        let fut = self.inner.call(req);
        Box::pin(async move { Ok(fut.await?.map(Body::new)) })
    }
}

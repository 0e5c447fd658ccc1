use std::any::Any;
use std::task::{Context, Poll};

use axum::body::Body;
use http::StatusCode;
use tower::layer::util::Stack;
use tower::{Layer, Service};
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::{error, info, info_span, Span};

use crate::body::UniformBodyLayer;
use crate::stack::Response;

/// Name of the span opened by [`tracing_span`].
pub const SPAN_NAME: &str = "http.request";

pub(crate) fn status_response(status: StatusCode) -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = status;
    resp
}

/// Answers a caught panic with an empty 500.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalErrorOnPanic;

impl ResponseForPanic for InternalErrorOnPanic {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        let message = err
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| err.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        error!(panic = message, "handler panicked");
        status_response(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

pub type PanicRecoverLayer = Stack<CatchPanicLayer<InternalErrorOnPanic>, UniformBodyLayer>;

/// Converts a panic anywhere inside this layer into an empty 500 response.
pub fn panic_recover() -> PanicRecoverLayer {
    Stack::new(CatchPanicLayer::custom(InternalErrorOnPanic), UniformBodyLayer)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLoggerLayer;

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestLogger<S> {
    inner: S,
}

impl<S, B> Service<http::Request<B>> for RequestLogger<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        info!("requested {}", req.uri());
        self.inner.call(req)
    }
}

/// Logs each requested URI at info level.
pub fn request_logger() -> RequestLoggerLayer {
    RequestLoggerLayer
}

/// Opens the `http.request` span, tagged with the request method and URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, req: &http::Request<B>) -> Span {
        info_span!(
            "http.request",
            otel.name = %format!("[{}] {}", req.method(), req.uri()),
            http.request.method = %req.method(),
            url.full = %req.uri(),
        )
    }
}

pub type RequestSpanLayer =
    Stack<TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan>, UniformBodyLayer>;

/// Runs the inner chain inside a [`RequestSpan`].
pub fn tracing_span() -> RequestSpanLayer {
    Stack::new(
        TraceLayer::new_for_http().make_span_with(RequestSpan),
        UniformBodyLayer,
    )
}

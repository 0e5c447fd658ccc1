use std::fmt;

use axum::body::Body;
use tower::layer::util::{Identity, Stack};
use tower::{Layer, ServiceBuilder};

use crate::cors::{cors, CorsPolicy, CorsPolicyLayer};
use crate::middleware::{
    panic_recover, request_logger, tracing_span, PanicRecoverLayer, RequestLoggerLayer,
    RequestSpanLayer,
};

pub type Request = http::Request<Body>;
pub type Response = http::Response<Body>;

/// Ordered sequence of tower layers.
///
/// `push` returns the extended stack. A stack is never mutated once built,
/// so one stack can wrap any number of terminal services.
#[derive(Clone)]
pub struct MiddlewareStack<L = Identity> {
    builder: ServiceBuilder<L>,
    len: usize,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self {
            builder: ServiceBuilder::new(),
            len: 0,
        }
    }
}

impl Default for MiddlewareStack {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> MiddlewareStack<L> {
    /// Append a layer inside every layer pushed before it.
    pub fn push<T>(self, layer: T) -> MiddlewareStack<Stack<T, L>> {
        MiddlewareStack {
            builder: self.builder.layer(layer),
            len: self.len + 1,
        }
    }

    pub fn push_panic_recover(self) -> MiddlewareStack<Stack<PanicRecoverLayer, L>> {
        self.push(panic_recover())
    }

    pub fn push_request_logger(self) -> MiddlewareStack<Stack<RequestLoggerLayer, L>> {
        self.push(request_logger())
    }

    pub fn push_cors(self, policy: CorsPolicy) -> MiddlewareStack<Stack<CorsPolicyLayer, L>> {
        self.push(cors(policy))
    }

    pub fn push_tracing(self) -> MiddlewareStack<Stack<RequestSpanLayer, L>> {
        self.push(tracing_span())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wrap `terminal` in every layer, first-pushed outermost.
    pub fn build<S>(&self, terminal: S) -> L::Service
    where
        L: Layer<S>,
    {
        self.builder.service(terminal)
    }
}

impl<L> fmt::Debug for MiddlewareStack<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("layers", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    use http::StatusCode;
    use tower::util::MapRequestLayer;
    use tower::{service_fn, ServiceExt};

    use super::*;

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn recording(name: &'static str, log: Log) -> MapRequestLayer<impl Fn(Request) -> Request + Clone> {
        MapRequestLayer::new(move |req: Request| {
            log.lock().unwrap().push(name);
            req
        })
    }

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_stack_is_passthrough() {
        let stack = MiddlewareStack::new();
        assert!(stack.is_empty());

        let svc = stack.build(service_fn(|_req: Request| async {
            Ok::<_, Infallible>(Response::new(Body::from("terminal")))
        }));
        let resp = svc.oneshot(Request::new(Body::empty())).await.unwrap();
        assert_eq!(body_text(resp).await, "terminal");
    }

    #[tokio::test]
    async fn test_first_pushed_runs_first() {
        let log: Log = Arc::default();
        let stack = MiddlewareStack::new()
            .push(recording("a", Arc::clone(&log)))
            .push(recording("b", Arc::clone(&log)))
            .push(recording("c", Arc::clone(&log)));
        assert_eq!(stack.len(), 3);

        let terminal_log = Arc::clone(&log);
        let svc = stack.build(service_fn(move |_req: Request| {
            terminal_log.lock().unwrap().push("terminal");
            async { Ok::<_, Infallible>(Response::new(Body::empty())) }
        }));
        svc.oneshot(Request::new(Body::empty())).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "terminal"]);
    }

    #[tokio::test]
    async fn test_stack_builds_independent_services() {
        let log: Log = Arc::default();
        let stack = MiddlewareStack::new().push(recording("outer", Arc::clone(&log)));

        let reply = |text: &'static str| {
            service_fn(move |_req: Request| async move {
                Ok::<_, Infallible>(Response::new(Body::from(text)))
            })
        };
        let first = stack.build(reply("one"));
        let second = stack
            .clone()
            .push(recording("inner", Arc::clone(&log)))
            .build(reply("two"));

        let resp = first.oneshot(Request::new(Body::empty())).await.unwrap();
        assert_eq!(body_text(resp).await, "one");
        let resp = second.oneshot(Request::new(Body::empty())).await.unwrap();
        assert_eq!(body_text(resp).await, "two");

        assert_eq!(*log.lock().unwrap(), vec!["outer", "outer", "inner"]);
        assert_eq!(stack.len(), 1);
    }

    #[tokio::test]
    async fn test_builtin_layers_share_response_type() {
        let svc = MiddlewareStack::new()
            .push_tracing()
            .push_cors(CorsPolicy::new())
            .push_request_logger()
            .push_panic_recover()
            .build(service_fn(|_req: Request| async {
                Ok::<_, Infallible>(Response::new(Body::from("reversed")))
            }));

        let resp: Response = svc.oneshot(Request::new(Body::empty())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "reversed");
    }
}

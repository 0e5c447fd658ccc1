#![cfg(feature = "http")]

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use http::{Method, StatusCode};
use muldem::frame::{framed, FrameEnvelope};
use muldem::http::{Body, CorsPolicy, MiddlewareStack, Request, Response};
use muldem::pipeline::{IdentityRouter, Medium, Muldem};
use serde_json::{json, Value};
use tower::{service_fn, Service, ServiceExt};

fn status(code: StatusCode) -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = code;
    resp
}

// Unwraps framed request bodies and answers with a framed reply.
fn framed_service(
) -> impl Service<Request, Response = Response, Error = Infallible, Future: Send> + Clone {
    let muldem: Arc<Muldem<Value, Bytes>> = Arc::new(framed(IdentityRouter::new(Medium::HTTP)));
    service_fn(move |req: Request| {
        let muldem = Arc::clone(&muldem);
        async move {
            let address = req.uri().path().to_owned();
            let Ok(body) = axum::body::to_bytes(req.into_body(), usize::MAX).await else {
                return Ok::<_, Infallible>(status(StatusCode::BAD_REQUEST));
            };
            let Ok(payload) = muldem.demultiplex(&body) else {
                return Ok(status(StatusCode::BAD_REQUEST));
            };
            Ok(match muldem.multiplex(&address, &json!({"echo": payload})) {
                Ok(message) => Response::new(Body::from(message)),
                Err(_) => status(StatusCode::INTERNAL_SERVER_ERROR),
            })
        }
    })
}

fn post(body: Bytes) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .header(ORIGIN, "https://shop.example.com")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn decorated_service_speaks_frames() {
    let svc = MiddlewareStack::new()
        .push_panic_recover()
        .push_cors(CorsPolicy::new().allow_origins(["https://*.example.com"]))
        .push_tracing()
        .build(framed_service());

    let client: Muldem<Value, Bytes> = framed(IdentityRouter::new(Medium::HTTP));
    let request = client.multiplex("/orders", &json!({"id": 7})).unwrap();

    let resp = svc.oneshot(post(request)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://shop.example.com"
    );

    let reply = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let frame = FrameEnvelope::default().decapsulate_routed(&reply).unwrap();
    assert_eq!(frame.route.medium, Medium::HTTP);
    assert_eq!(frame.route.address, "/orders");
    assert_eq!(client.demultiplex(&reply).unwrap(), json!({"echo": {"id": 7}}));
}

#[tokio::test]
async fn unframed_body_is_rejected() {
    let svc = MiddlewareStack::new()
        .push_panic_recover()
        .build(framed_service());

    let resp = svc
        .oneshot(post(Bytes::from_static(br#"{"id":7}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

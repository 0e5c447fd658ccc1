//! Framed round trip: route payloads by prefix, frame them, and recover both
//! the route and the payload on the receiving side.
//!
//! Run with:
//!   cargo run --example framed-roundtrip

use bytes::{Bytes, BytesMut};
use muldem::frame::{decode_frame, framed, FrameConfig};
use muldem::pipeline::{PrefixRouter, RouteRule, RouteTable};
use muldem::{Medium, Muldem};
use serde_json::{json, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let table = RouteTable::new(Medium::DEFAULT)
        .with_rule(RouteRule::new("http://", Medium::HTTP))
        .with_rule(RouteRule::new("broker:", Medium::BROKER).stripped());
    let muldem: Muldem<Value, Bytes> = framed(PrefixRouter::new(table)?);

    // Sender: one byte stream carrying messages for several media.
    let mut wire = BytesMut::new();
    for (address, payload) in [
        ("http://billing/invoices", json!({"invoice": 42, "total": "19.90"})),
        ("broker:orders.created", json!({"order": 7, "items": ["tea", "cup"]})),
        ("local/audit", json!("started")),
    ] {
        let message = muldem.multiplex(address, &payload)?;
        eprintln!(
            "[sender] {} -> {} ({} bytes)",
            address,
            muldem.route(address),
            message.len()
        );
        wire.extend_from_slice(&message);
    }

    // Receiver: split the stream back into frames and demultiplex each one.
    let config = FrameConfig::default();
    while let Some(frame) = decode_frame(&mut wire, &config)? {
        let message = frame.to_bytes()?;
        let payload = muldem.demultiplex(&message)?;
        eprintln!(
            "[receiver] medium={} ({}) address={} payload={}",
            frame.route.medium,
            frame.route.medium.name(),
            frame.route.address,
            payload
        );
    }

    Ok(())
}

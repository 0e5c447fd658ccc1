use bytes::{Bytes, BytesMut};
use muldem_core::{Medium, Muldem, PrefixRouter, Route, RouteRule, RouteTable};
use muldem_frame::{decode_frame, framed, Frame, FrameConfig, FrameEnvelope};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Reading {
    sensor: String,
    celsius: f64,
}

fn router() -> PrefixRouter {
    PrefixRouter::new(
        RouteTable::new(Medium::DEFAULT)
            .with_rule(RouteRule::new("http://", Medium::HTTP))
            .with_rule(RouteRule::new("broker:", Medium::BROKER).stripped()),
    )
    .unwrap()
}

#[test]
fn receiver_recovers_route_without_context() {
    let sender: Muldem<Reading, Bytes> = framed(router());
    let reading = Reading {
        sensor: "greenhouse-2".into(),
        celsius: 21.5,
    };

    let message = sender.multiplex("broker:telemetry.temp", &reading).unwrap();

    let frame = FrameEnvelope::default().decapsulate_routed(&message).unwrap();
    assert_eq!(frame.route, Route::new(Medium::BROKER, "telemetry.temp"));
    assert_eq!(sender.demultiplex(&message).unwrap(), reading);
}

#[test]
fn frames_split_across_reads_are_reassembled() {
    let sender: Muldem<Reading, Bytes> = framed(router());
    let mut wire = Vec::new();
    for i in 0..5 {
        let reading = Reading {
            sensor: format!("s{i}"),
            celsius: i as f64,
        };
        wire.extend_from_slice(&sender.multiplex("http://ingest", &reading).unwrap());
    }

    let config = FrameConfig::default();
    let mut buf = BytesMut::new();
    let mut frames = Vec::new();
    for chunk in wire.chunks(7) {
        buf.extend_from_slice(chunk);
        while let Some(frame) = decode_frame(&mut buf, &config).unwrap() {
            frames.push(frame);
        }
    }

    assert!(buf.is_empty());
    assert_eq!(frames.len(), 5);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.route, Route::new(Medium::HTTP, "http://ingest"));
        let reading: Reading = serde_json::from_slice(&frame.payload).unwrap();
        assert_eq!(reading.sensor, format!("s{i}"));
    }
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".{0,16}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map(".{0,8}", inner, 0..4)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn framed_round_trips_any_json(
        payload in json_value(),
        address in "(http://|broker:|local/)[a-z0-9./]{0,24}",
    ) {
        let muldem: Muldem<Value, Bytes> = framed(router());
        let message = muldem.multiplex(&address, &payload).unwrap();
        prop_assert_eq!(muldem.demultiplex(&message).unwrap(), payload);

        let frame = FrameEnvelope::default().decapsulate_routed(&message).unwrap();
        prop_assert_eq!(frame.route, muldem.route(&address));
    }

    #[test]
    fn parse_recovers_encoded_frame(
        medium in any::<u16>(),
        address in "[a-z0-9./:-]{0,64}",
        payload in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let frame = Frame::new(Route::new(Medium(medium), address), payload);
        let bytes = frame.to_bytes().unwrap();
        prop_assert_eq!(Frame::parse(&bytes, &FrameConfig::default()).unwrap(), frame);
    }
}

use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use muldem_core::Route;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RouteOutput<'a> {
    medium: u16,
    medium_name: &'a str,
    address: &'a str,
}

impl<'a> RouteOutput<'a> {
    fn new(route: &'a Route) -> Self {
        Self {
            medium: route.medium.id(),
            medium_name: route.medium.name(),
            address: &route.address,
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    #[serde(flatten)]
    route: RouteOutput<'a>,
    payload_size: usize,
    frame_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<&'a str>,
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    #[serde(flatten)]
    route: RouteOutput<'a>,
    payload_size: usize,
    payload: &'a Value,
}

pub fn print_route(route: &Route, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&RouteOutput::new(route)),
        OutputFormat::Table => {
            print_table(
                vec!["MEDIUM", "NAME", "ADDRESS"],
                vec![
                    route.medium.to_string(),
                    route.medium.name().to_string(),
                    route.address.clone(),
                ],
            );
        }
        OutputFormat::Pretty => {
            println!(
                "medium={} ({}) address={}",
                route.medium,
                route.medium.name(),
                route.address
            );
        }
        OutputFormat::Raw => println!("{route}"),
    }
}

/// Summary of an encoded frame. In raw format the frame bytes themselves are
/// written to stdout unless they already went to a file.
pub fn print_encoded(
    route: &Route,
    payload_size: usize,
    message: &[u8],
    written_to: Option<&str>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            route: RouteOutput::new(route),
            payload_size,
            frame_size: message.len(),
            written_to,
        }),
        OutputFormat::Table => {
            print_table(
                vec!["MEDIUM", "ADDRESS", "PAYLOAD", "FRAME", "OUTPUT"],
                vec![
                    route.medium.name().to_string(),
                    route.address.clone(),
                    payload_size.to_string(),
                    message.len().to_string(),
                    written_to.unwrap_or("-").to_string(),
                ],
            );
        }
        OutputFormat::Pretty => {
            println!(
                "medium={} ({}) address={} payload={} frame={}",
                route.medium,
                route.medium.name(),
                route.address,
                payload_size,
                message.len()
            );
        }
        OutputFormat::Raw => {
            if written_to.is_none() {
                print_raw(message);
            }
        }
    }
}

pub fn print_decoded(route: &Route, payload_bytes: &[u8], payload: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&DecodedOutput {
            route: RouteOutput::new(route),
            payload_size: payload_bytes.len(),
            payload,
        }),
        OutputFormat::Table => {
            print_table(
                vec!["MEDIUM", "ADDRESS", "SIZE", "PAYLOAD"],
                vec![
                    route.medium.name().to_string(),
                    route.address.clone(),
                    payload_bytes.len().to_string(),
                    payload_preview(payload_bytes),
                ],
            );
        }
        OutputFormat::Pretty => {
            println!(
                "medium={} ({}) address={} size={} payload={}",
                route.medium,
                route.medium.name(),
                route.address,
                payload_bytes.len(),
                payload_preview(payload_bytes)
            );
        }
        OutputFormat::Raw => print_raw(payload_bytes),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_table(header: Vec<&str>, row: Vec<String>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header)
        .add_row(row);
    println!("{table}");
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

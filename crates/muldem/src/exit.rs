use std::fmt;
use std::io;

use muldem_core::{ErrorKind, MuldemError, RoutingError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const ENVELOPE_INVALID: i32 = 61;
pub const ROUTING: i32 = 62;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn routing_error(context: &str, err: RoutingError) -> CliError {
    match err {
        RoutingError::Read { source, .. } => io_error(context, source),
        other => CliError::new(ROUTING, format!("{context}: {other}")),
    }
}

pub fn muldem_error(context: &str, err: MuldemError) -> CliError {
    let code = match err.kind() {
        ErrorKind::Encoding => DATA_INVALID,
        ErrorKind::Envelope => ENVELOPE_INVALID,
        ErrorKind::Routing => ROUTING,
        ErrorKind::Config => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

use muldem_core::MuldemError;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame header contains an invalid magic number.
    #[error("invalid frame magic (expected 0x4d44 \"MD\")")]
    InvalidMagic,

    /// The frame was written with a format version this build does not read.
    #[error("unsupported frame version {0}")]
    UnsupportedVersion(u8),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The route address exceeds the configured maximum length.
    #[error("address too long ({len} bytes, max {max})")]
    AddressTooLong { len: usize, max: usize },

    /// The message ends before the frame it announces.
    #[error("truncated frame ({available} of {needed} bytes)")]
    Truncated { needed: usize, available: usize },

    /// The message continues past the end of its frame.
    #[error("{0} trailing bytes after frame")]
    TrailingBytes(usize),

    /// The embedded address is not valid UTF-8.
    #[error("frame address is not valid UTF-8: {0}")]
    InvalidAddress(#[from] std::str::Utf8Error),
}

impl From<FrameError> for MuldemError {
    fn from(err: FrameError) -> Self {
        MuldemError::envelope(err)
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;

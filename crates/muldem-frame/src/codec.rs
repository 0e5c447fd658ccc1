use bytes::{Buf, BufMut, Bytes, BytesMut};
use muldem_core::{Medium, Route};
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// Frame header: magic (2) + version (1) + medium (2) + address length (2) + payload length (4).
pub const HEADER_SIZE: usize = 11;

/// Magic bytes: "MD" (0x4d 0x44).
pub const MAGIC: [u8; 2] = [0x4d, 0x44];

/// Current wire format version.
pub const VERSION: u8 = 1;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Default maximum address length, the widest the header can express.
pub const DEFAULT_MAX_ADDRESS: usize = u16::MAX as usize;

/// A decoded frame: the route it was sent on and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub route: Route,
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(route: Route, payload: impl Into<Bytes>) -> Self {
        Self {
            route,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + address + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.route.address.len() + self.payload.len()
    }

    /// Encode this frame into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        encode_frame(&self.route, &self.payload, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Parse a message that must hold exactly one complete frame.
    pub fn parse(message: &[u8], config: &FrameConfig) -> Result<Self> {
        let header = match Header::peek(message, config)? {
            Some(header) => header,
            None => {
                return Err(FrameError::Truncated {
                    needed: HEADER_SIZE,
                    available: message.len(),
                })
            }
        };

        let total = header.frame_len();
        if message.len() < total {
            return Err(FrameError::Truncated {
                needed: total,
                available: message.len(),
            });
        }
        if message.len() > total {
            return Err(FrameError::TrailingBytes(message.len() - total));
        }

        let body = &message[HEADER_SIZE..];
        let address = std::str::from_utf8(&body[..header.address_len])?;
        let payload = Bytes::copy_from_slice(&body[header.address_len..]);

        Ok(Self {
            route: Route::new(header.medium, address),
            payload,
        })
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬─────────┬──────────┬─────────────┬─────────────┬──────────┬──────────┐
/// │ Magic (2B) │ Version │ Medium   │ Address len │ Payload len │ Address  │ Payload  │
/// │ 0x4d 0x44  │ (1B)    │ (2B LE)  │ (2B LE)     │ (4B LE)     │ (UTF-8)  │          │
/// │ "MD"       │         │          │             │             │          │          │
/// └────────────┴─────────┴──────────┴─────────────┴─────────────┴──────────┴──────────┘
/// ```
pub fn encode_frame(route: &Route, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let address = route.address.as_bytes();
    if address.len() > DEFAULT_MAX_ADDRESS {
        return Err(FrameError::AddressTooLong {
            len: address.len(),
            max: DEFAULT_MAX_ADDRESS,
        });
    }
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }

    dst.reserve(HEADER_SIZE + address.len() + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u8(VERSION);
    dst.put_u16_le(route.medium.id());
    dst.put_u16_le(address.len() as u16);
    dst.put_u32_le(payload.len() as u32);
    dst.put_slice(address);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a receive buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, config: &FrameConfig) -> Result<Option<Frame>> {
    let header = match Header::peek(&src[..], config)? {
        Some(header) => header,
        None => return Ok(None), // Need more data
    };

    if src.len() < header.frame_len() {
        return Ok(None); // Need more data
    }

    // The whole frame leaves the buffer even if its address turns out invalid.
    let mut frame = src.split_to(header.frame_len());
    let address_end = HEADER_SIZE + header.address_len;
    let address = std::str::from_utf8(&frame[HEADER_SIZE..address_end])?.to_owned();
    let payload = frame.split_off(address_end).freeze();

    Ok(Some(Frame {
        route: Route::new(header.medium, address),
        payload,
    }))
}

struct Header {
    medium: Medium,
    address_len: usize,
    payload_len: usize,
}

impl Header {
    fn peek(src: &[u8], config: &FrameConfig) -> Result<Option<Self>> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        if src[0..2] != MAGIC {
            return Err(FrameError::InvalidMagic);
        }
        if src[2] != VERSION {
            return Err(FrameError::UnsupportedVersion(src[2]));
        }

        let mut fields = &src[3..HEADER_SIZE];
        let medium = Medium::new(fields.get_u16_le());
        let address_len = fields.get_u16_le() as usize;
        let payload_len = fields.get_u32_le() as usize;

        if address_len > config.max_address_len {
            return Err(FrameError::AddressTooLong {
                len: address_len,
                max: config.max_address_len,
            });
        }
        if payload_len > config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload_len,
                max: config.max_payload_size,
            });
        }

        Ok(Some(Self {
            medium,
            address_len,
            payload_len,
        }))
    }

    fn frame_len(&self) -> usize {
        HEADER_SIZE + self.address_len + self.payload_len
    }
}

/// Limits applied by the frame envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Maximum address length in bytes. Default: 65535.
    pub max_address_len: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_address_len: DEFAULT_MAX_ADDRESS,
        }
    }
}

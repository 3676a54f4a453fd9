//! Frame extraction
//!
//! A frame is laid out as
//!
//! ```txt
//! +----------+----------+--------------------+----------+
//! | 11111111 | protocol | data + checksum …  | 00000000 |
//! +----------+----------+--------------------+----------+
//!     start     8 bits       variable            end
//! ```
//!
//! Both flags must match exactly. There is no search for the
//! flags: the frame must occupy the entire line-decoded bit
//! sequence.

use std::fmt;

use thiserror::Error;

use crate::bits::{bits_to_u8, BitSequence};
use crate::waveform::{FLAG_END, FLAG_START, PROTOCOL_TEXT};

const FLAG_BITS: usize = 8;
const PROTOCOL_BITS: usize = 8;

/// Payload protocol
///
/// Identifies the content of the frame from its protocol
/// byte. Only text is understood by this crate. Any other
/// byte is carried as `Unknown` so that it can be reported.
///
/// ```
/// use askrx::Protocol;
///
/// assert_eq!(Protocol::Text, Protocol::from(0b1100_0011));
/// assert_eq!(Protocol::Unknown(0x00), Protocol::from(0x00));
/// assert_eq!(0xc3, u8::from(Protocol::Text));
/// assert_eq!("text", Protocol::Text.as_display_str());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumMessage)]
pub enum Protocol {
    /// Text message, one character per byte
    #[strum(message = "text")]
    Text,

    /// Unrecognized protocol identifier
    #[strum(message = "unknown")]
    Unknown(u8),
}

impl Protocol {
    /// Human-readable protocol name
    pub fn as_display_str(&self) -> &'static str {
        use strum::EnumMessage;
        self.get_message().unwrap_or("unknown")
    }

    /// True if the protocol is understood
    pub fn is_known(&self) -> bool {
        !matches!(self, Protocol::Unknown(_))
    }
}

impl From<u8> for Protocol {
    fn from(byte: u8) -> Self {
        match byte {
            PROTOCOL_TEXT => Protocol::Text,
            other => Protocol::Unknown(other),
        }
    }
}

impl From<Protocol> for u8 {
    fn from(proto: Protocol) -> Self {
        match proto {
            Protocol::Text => PROTOCOL_TEXT,
            Protocol::Unknown(byte) => byte,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Text => f.write_str(self.as_display_str()),
            Protocol::Unknown(byte) => write!(f, "{} ({:08b})", self.as_display_str(), byte),
        }
    }
}

/// Error extracting a frame
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FramingErr {
    /// Fewer bits than two flags
    #[error("frame too short: {0} bits, need at least 16")]
    TooShort(usize),

    /// Start or end flag does not match
    #[error("frame flags incorrect")]
    BadFlags,

    /// Flags are present, but there is no room for a protocol byte
    #[error("frame has no protocol identifier")]
    MissingProtocol,
}

/// A validated frame
///
/// A `Frame` can only be created by [`Frame::extract()`],
/// which verifies both flags. It retains the protocol and the
/// undecoded data-and-checksum bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    protocol: Protocol,
    payload: BitSequence,
}

impl Frame {
    /// Extract a frame from line-decoded `bits`
    ///
    /// The first eight bits must be the start flag `11111111`
    /// and the last eight must be the end flag `00000000`.
    /// The eight bits after the start flag are the protocol
    /// identifier, and everything between the protocol and
    /// the end flag is the payload.
    ///
    /// An unrecognized protocol is *not* an error here.
    ///
    /// ```
    /// use askrx::{Frame, FramingErr, Protocol};
    ///
    /// let bits = "11111111 11000011 101 00000000".parse().unwrap();
    /// let frame = Frame::extract(&bits).unwrap();
    /// assert_eq!(Protocol::Text, frame.protocol());
    /// assert_eq!("101", &frame.payload().to_string());
    ///
    /// let bad = "11101111 11000011 00000000".parse().unwrap();
    /// assert_eq!(Err(FramingErr::BadFlags), Frame::extract(&bad));
    /// ```
    pub fn extract(bits: &BitSequence) -> Result<Self, FramingErr> {
        let bits = bits.as_slice();
        if bits.len() < 2 * FLAG_BITS {
            return Err(FramingErr::TooShort(bits.len()));
        }

        let (start, rest) = bits.split_at(FLAG_BITS);
        let (core, end) = rest.split_at(rest.len() - FLAG_BITS);
        if bits_to_u8(start) != FLAG_START || bits_to_u8(end) != FLAG_END {
            return Err(FramingErr::BadFlags);
        }

        if core.len() < PROTOCOL_BITS {
            return Err(FramingErr::MissingProtocol);
        }

        let (protocol, payload) = core.split_at(PROTOCOL_BITS);
        Ok(Self {
            protocol: Protocol::from(bits_to_u8(protocol)),
            payload: BitSequence::from(payload),
        })
    }

    /// Payload protocol
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Data and checksum bits
    pub fn payload(&self) -> &BitSequence {
        &self.payload
    }

    /// Consume, returning the data and checksum bits
    pub fn into_payload(self) -> BitSequence {
        self.payload
    }
}

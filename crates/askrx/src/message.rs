//! Receiver outputs for the client

use std::fmt;

use thiserror::Error;

use crate::assembler::AssembleErr;
use crate::builder::ConfigErr;
use crate::checksum::ChecksumErr;
use crate::framing::{FramingErr, Protocol};

/// A fully-decoded message
///
/// The text is built one character per received byte, so every
/// character is in the range `U+0000` – `U+00FF`. The message is
/// created once, at the end of the receive chain, and is never
/// modified.
///
/// `DecodedMessage` implements `Display` and efficient
/// conversion to `&str`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodedMessage {
    text: String,
    protocol: Protocol,
}

/// Error decoding a message
///
/// Each variant is fatal to the message. No partial text is
/// available when decoding fails.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum DecodeErr {
    /// The start or end flag was wrong or missing
    #[error("unable to extract frame: {0}")]
    Framing(#[from] FramingErr),

    /// At least one data byte failed its checksum
    #[error("message corrupted: {0}")]
    Checksum(#[from] ChecksumErr),

    /// The frame carries a protocol other than text
    #[error("unrecognized protocol: {0}")]
    UnrecognizedProtocol(Protocol),

    /// The frame carries no data
    #[error("empty payload")]
    EmptyPayload,

    /// The signal or receiver parameters are unusable
    #[error("invalid receiver configuration: {0}")]
    Config(#[from] ConfigErr),
}

/// Result of decoding one signal
pub type DecodeResult = Result<DecodedMessage, DecodeErr>;

impl DecodedMessage {
    /// Create from assembled `text`
    pub(crate) fn new<S>(text: S, protocol: Protocol) -> Self
    where
        S: Into<String>,
    {
        Self {
            text: text.into(),
            protocol,
        }
    }

    /// Message text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Protocol the message was sent with
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Number of characters
    ///
    /// Equal to the number of data bytes received.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Obtain the owned message String
    ///
    /// Destroys this object and releases the text
    /// contained within
    pub fn release(self) -> String {
        self.text
    }
}

impl DecodeErr {
    /// True if the signal was framed and verified but not text
    ///
    /// These errors are reported as an explicit result by the
    /// last stage of the receiver, rather than as a corrupted
    /// message.
    pub fn is_unassembled(&self) -> bool {
        matches!(
            self,
            DecodeErr::UnrecognizedProtocol(_) | DecodeErr::EmptyPayload
        )
    }
}

impl From<AssembleErr> for DecodeErr {
    fn from(err: AssembleErr) -> Self {
        match err {
            AssembleErr::UnrecognizedProtocol(p) => DecodeErr::UnrecognizedProtocol(p),
            AssembleErr::EmptyPayload => DecodeErr::EmptyPayload,
        }
    }
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}

impl AsRef<str> for DecodedMessage {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<DecodedMessage> for String {
    #[inline]
    fn from(msg: DecodedMessage) -> String {
        msg.release()
    }
}

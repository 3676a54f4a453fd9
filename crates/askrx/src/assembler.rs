//! Character assembly
//!
//! Converts verified data bits into text. Bits are taken eight
//! at a time, most significant bit first, and each byte becomes
//! the character with the same code point. This is a Latin-1
//! mapping: bytes `0x80` – `0xff` become single characters
//! `U+0080` – `U+00FF`, not UTF-8 sequences.

#[cfg(not(test))]
use log::debug;

#[cfg(test)]
use std::println as debug;

use thiserror::Error;

use crate::bits::{bits_to_u8, BitSequence};
use crate::framing::Protocol;
use crate::message::DecodedMessage;

/// The data could not be assembled into text
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssembleErr {
    /// The frame's protocol is not text
    #[error("unrecognized protocol: {0}")]
    UnrecognizedProtocol(Protocol),

    /// There were no data bits
    #[error("empty payload")]
    EmptyPayload,
}

/// Assemble verified `data` bits into a message
///
/// Only [`Protocol::Text`] frames can be assembled. A trailing
/// group of fewer than eight bits is ignored.
///
/// ```
/// use askrx::{assembler, AssembleErr, Protocol};
///
/// let data = "01001000 01001001".parse().unwrap();
/// let msg = assembler::assemble(&data, Protocol::Text).unwrap();
/// assert_eq!("HI", msg.as_str());
///
/// assert_eq!(
///     Err(AssembleErr::UnrecognizedProtocol(Protocol::Unknown(0))),
///     assembler::assemble(&data, Protocol::Unknown(0))
/// );
/// ```
pub fn assemble(data: &BitSequence, protocol: Protocol) -> Result<DecodedMessage, AssembleErr> {
    if protocol != Protocol::Text {
        return Err(AssembleErr::UnrecognizedProtocol(protocol));
    }
    if data.is_empty() {
        return Err(AssembleErr::EmptyPayload);
    }

    let chunks = data.as_slice().chunks_exact(8);
    if !chunks.remainder().is_empty() {
        debug!(
            "assembler: ignoring {} trailing bits",
            chunks.remainder().len()
        );
    }

    let text: String = chunks.map(|byte| char::from(bits_to_u8(byte))).collect();
    Ok(DecodedMessage::new(text, protocol))
}

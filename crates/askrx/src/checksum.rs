//! Per-byte checksum verification
//!
//! The payload is a series of 12-bit blocks. Each block holds
//! one data byte followed by a 4-bit checksum:
//!
//! ```txt
//! +----------------+---------+
//! | d7 d6 … d1 d0  | c3 … c0 |
//! +----------------+---------+
//! ```
//!
//! The checksum is the remainder of the data byte, shifted
//! left by four bits, divided by the integer `0b1001` (9):
//!
//! ```txt
//! checksum = (data << 4) % 9
//! ```
//!
//! This is integer division, not polynomial division over
//! GF(2). The two give different remainders in general, and
//! only the integer form matches what transmitters send.
//!
//! Verification is all-or-nothing. A single bad block
//! invalidates every block in the message.

#[cfg(not(test))]
use log::debug;

#[cfg(test)]
use std::println as debug;

use thiserror::Error;

use crate::bits::{bits_to_u8, BitSequence};
use crate::waveform::{BLOCK_BITS, CHECKSUM_DIVISOR, DATA_BITS};

/// Message failed checksum verification
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[error("checksum mismatch: {failed} of {blocks} blocks failed, first at block {first}")]
pub struct ChecksumErr {
    /// Index of the first failing block
    pub first: usize,

    /// Number of failing blocks
    pub failed: usize,

    /// Total number of complete blocks
    pub blocks: usize,
}

/// One data byte and its received checksum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChecksumBlock {
    data: u8,
    checksum: u8,
}

impl ChecksumBlock {
    /// Split a 12-bit block into data and checksum units
    ///
    /// Returns `None` unless `bits` is exactly twelve bits.
    pub fn from_bits(bits: &[bool]) -> Option<Self> {
        if bits.len() != BLOCK_BITS {
            return None;
        }
        Some(Self::split(bits))
    }

    // Split a block known to be exactly twelve bits
    #[inline]
    fn split(bits: &[bool]) -> Self {
        debug_assert_eq!(bits.len(), BLOCK_BITS);
        let (data, checksum) = bits.split_at(DATA_BITS);
        Self {
            data: bits_to_u8(data),
            checksum: bits_to_u8(checksum),
        }
    }

    /// Data byte
    pub fn data(&self) -> u8 {
        self.data
    }

    /// Received 4-bit checksum
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// True if the received checksum matches the data
    pub fn is_valid(&self) -> bool {
        expected_checksum(self.data) == self.checksum
    }
}

/// Compute the 4-bit checksum for a data byte
///
/// Appends four zero bits to `data` and reduces the result
/// modulo `0b1001`.
///
/// ```
/// use askrx::checksum::expected_checksum;
///
/// assert_eq!(0b0000, expected_checksum(b'H'));
/// assert_eq!(0b0111, expected_checksum(b'I'));
/// ```
pub fn expected_checksum(data: u8) -> u8 {
    ((u32::from(data) << 4) % CHECKSUM_DIVISOR) as u8
}

/// Verify and strip checksums from `payload`
///
/// Splits `payload` into 12-bit blocks. Trailing bits which
/// do not fill a complete block are ignored. If every block's
/// checksum is valid, returns the concatenation of all data
/// units with the checksums removed. If any block fails,
/// nothing is returned.
///
/// ```
/// use askrx::checksum;
///
/// // 'H' with checksum 0000, then 'I' with checksum 0111
/// let payload = "01001000 0000 01001001 0111".parse().unwrap();
/// let data = checksum::validate(&payload).unwrap();
/// assert_eq!("0100100001001001", &data.to_string());
///
/// let corrupt = "01001000 0000 01001001 0110".parse().unwrap();
/// assert!(checksum::validate(&corrupt).is_err());
/// ```
pub fn validate(payload: &BitSequence) -> Result<BitSequence, ChecksumErr> {
    let chunks = payload.as_slice().chunks_exact(BLOCK_BITS);
    let leftover = chunks.remainder().len();
    let blocks = chunks.len();

    let mut data = Vec::with_capacity(blocks * DATA_BITS);
    let mut first = None;
    let mut failed = 0;
    for (i, chunk) in chunks.enumerate() {
        let block = ChecksumBlock::split(chunk);
        if !block.is_valid() {
            debug!(
                "checksum: block {} data {:08b} received {:04b} expected {:04b}",
                i,
                block.data(),
                block.checksum(),
                expected_checksum(block.data())
            );
            first.get_or_insert(i);
            failed += 1;
        }
        data.extend_from_slice(&chunk[..DATA_BITS]);
    }

    if leftover > 0 {
        debug!("checksum: ignoring {} trailing bits", leftover);
    }

    match first {
        Some(first) => Err(ChecksumErr {
            first,
            failed,
            blocks,
        }),
        None => Ok(BitSequence::from(data)),
    }
}

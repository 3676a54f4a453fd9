//! Bit sequences passed between pipeline stages

use std::fmt;
use std::iter::FromIterator;
use std::str::FromStr;

use thiserror::Error;

/// An immutable sequence of bits
///
/// Every stage of the receiver consumes one `BitSequence` and
/// produces a fresh one. Sequences are never modified after
/// they are built.
///
/// A `BitSequence` may be parsed from a string of `0` and `1`
/// characters, and it displays the same way.
///
/// ```
/// use askrx::BitSequence;
///
/// let bits: BitSequence = "1100 0011".parse().unwrap();
/// assert_eq!(bits.len(), 8);
/// assert_eq!(bits.to_byte(), Some(0xc3));
/// assert_eq!("11000011", &format!("{}", bits));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitSequence {
    bits: Vec<bool>,
}

/// A character other than `0`, `1`, or whitespace was found
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[error("invalid bit character '{0}' at offset {1}")]
pub struct ParseBitsErr(pub char, pub usize);

impl BitSequence {
    /// Empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if there are no bits
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bits as a slice
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Iterate over bits
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Interpret up to eight bits as an unsigned byte
    ///
    /// The first bit is the most significant. Returns `None` if
    /// the sequence is longer than eight bits.
    pub fn to_byte(&self) -> Option<u8> {
        if self.len() > 8 {
            None
        } else {
            Some(bits_to_u8(&self.bits))
        }
    }

    /// Append the eight bits of `byte`, most significant first
    pub(crate) fn push_byte(bits: &mut Vec<bool>, byte: u8) {
        bits.extend((0..8).rev().map(|shift| (byte >> shift) & 0x01 == 1));
    }
}

/// Read a big-endian bit slice as an integer
///
/// The slice must be no longer than eight bits.
#[inline]
pub(crate) fn bits_to_u8(bits: &[bool]) -> u8 {
    debug_assert!(bits.len() <= 8);
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit as u8))
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl From<&[bool]> for BitSequence {
    fn from(bits: &[bool]) -> Self {
        Self {
            bits: bits.to_vec(),
        }
    }
}

impl From<BitSequence> for Vec<bool> {
    fn from(seq: BitSequence) -> Self {
        seq.bits
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[bool]> for BitSequence {
    fn as_ref(&self) -> &[bool] {
        &self.bits
    }
}

impl FromStr for BitSequence {
    type Err = ParseBitsErr;

    /// Parse from `0` and `1` characters
    ///
    /// Whitespace and underscores are ignored so long
    /// sequences can be grouped for readability.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Vec::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                '_' => {}
                c if c.is_whitespace() => {}
                c => return Err(ParseBitsErr(c, i)),
            }
        }
        Ok(Self { bits })
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

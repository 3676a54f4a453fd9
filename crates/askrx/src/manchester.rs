//! Manchester line decoding
//!
//! Each logical bit is sent as two symbols:
//!
//! | Symbols | Bit |
//! |---------|-----|
//! | `1 0`   | `1` |
//! | `0 1`   | `0` |
//!
//! Pairs are read left to right and never overlap. The
//! remaining patterns, `0 0` and `1 1`, are not valid
//! Manchester symbols. They are dropped without producing
//! an output bit. If the input has an odd length, the last
//! symbol is unpaired and is also dropped.

#[cfg(not(test))]
use log::debug;

#[cfg(test)]
use std::println as debug;

use crate::bits::BitSequence;

/// Result of Manchester decoding
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineDecoded {
    /// Logical bits
    pub bits: BitSequence,

    /// Number of invalid symbol pairs which were dropped
    pub dropped_pairs: usize,
}

/// Decode Manchester-coded `symbols` into logical bits
///
/// Never fails. The output has at most `symbols.len() / 2`
/// bits, and exactly that many if every pair is valid.
///
/// ```
/// use askrx::manchester;
///
/// let symbols = "10 01 11 10 1".parse().unwrap();
/// let out = manchester::decode(&symbols);
/// assert_eq!("101", &out.bits.to_string());
/// assert_eq!(1, out.dropped_pairs);
/// ```
pub fn decode(symbols: &BitSequence) -> LineDecoded {
    let mut dropped_pairs = 0;
    let bits = symbols
        .as_slice()
        .chunks_exact(2)
        .filter_map(|pair| match pair {
            [true, false] => Some(true),
            [false, true] => Some(false),
            _ => {
                dropped_pairs += 1;
                None
            }
        })
        .collect();

    if dropped_pairs > 0 {
        debug!(
            "manchester: dropped {} invalid symbol pairs of {}",
            dropped_pairs,
            symbols.len() / 2
        );
    }

    LineDecoded {
        bits,
        dropped_pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::waveform::manchester_encode;

    #[test]
    fn test_valid_pairs() {
        const DATA: &[bool] = &[true, true, false, true, false, false, false, true];
        let symbols = BitSequence::from(manchester_encode(DATA));
        let out = decode(&symbols);
        assert_eq!(DATA, out.bits.as_slice());
        assert_eq!(symbols.len() / 2, out.bits.len());
        assert_eq!(0, out.dropped_pairs);
    }

    #[test]
    fn test_invalid_pairs_dropped() {
        let symbols: BitSequence = "10 00 01 11".parse().unwrap();
        let out = decode(&symbols);
        assert_eq!("10", out.bits.to_string());
        assert_eq!(2, out.dropped_pairs);
        assert!(out.bits.len() < symbols.len() / 2);

        // every pair invalid
        let symbols: BitSequence = "0000 1111".parse().unwrap();
        let out = decode(&symbols);
        assert!(out.bits.is_empty());
        assert_eq!(4, out.dropped_pairs);
    }

    #[test]
    fn test_odd_length() {
        let symbols: BitSequence = "01 10 1".parse().unwrap();
        let out = decode(&symbols);
        assert_eq!("01", out.bits.to_string());
        assert_eq!(0, out.dropped_pairs);

        let out = decode(&"1".parse().unwrap());
        assert!(out.bits.is_empty());
    }

    #[test]
    fn test_pairs_do_not_overlap() {
        // "0110" contains "10" at offset 1, which must not be read
        let symbols: BitSequence = "0110".parse().unwrap();
        assert_eq!("01", decode(&symbols).bits.to_string());
    }
}

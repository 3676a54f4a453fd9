//! Waveform and frame-layout parameters

/// Default carrier frequency (Hz)
pub const CARRIER_HZ: f32 = 2000.0;

/// Default baud rate (symbols per second)
///
/// One symbol is one *Manchester half-bit*, so the logical
/// data rate is half of this.
pub const BAUD_HZ: u32 = 200;

/// Default sampling rate (Hz)
///
/// Used for sources, like CSV text, which do not carry their
/// own sampling rate.
pub const DEFAULT_RATE: u32 = 44100;

/// Start-of-frame flag byte: `11111111`
pub const FLAG_START: u8 = 0xff;

/// End-of-frame flag byte: `00000000`
pub const FLAG_END: u8 = 0x00;

/// Protocol identifier for text messages: `11000011`
pub const PROTOCOL_TEXT: u8 = 0xc3;

/// Checksum divisor: `1001`
pub const CHECKSUM_DIVISOR: u32 = 0b1001;

/// Bits in a data unit
pub const DATA_BITS: usize = 8;

/// Bits in a checksum unit
pub const CHECKSUM_BITS: usize = 4;

/// Bits in a checksum block: one data unit plus its checksum
pub const BLOCK_BITS: usize = DATA_BITS + CHECKSUM_BITS;

/// Whole samples per symbol
///
/// Truncates `fs / baud`. The result is zero if the baud
/// rate exceeds the sampling rate.
pub fn samples_per_symbol(fs: u32, baud: u32) -> usize {
    if baud == 0 {
        0
    } else {
        (fs / baud) as usize
    }
}

/// Reference carrier at absolute sample index `n`
///
/// Evaluates `sin(2π·fc·n/fs)`. The phase is computed in
/// double precision so that long signals do not lose phase
/// coherence.
#[inline]
pub fn reference_carrier(n: usize, fs: u32, fc: f32) -> f64 {
    let t = n as f64 / fs as f64;
    f64::sin(2.0 * std::f64::consts::PI * fc as f64 * t)
}

/// Build the bits of a complete frame
///
/// This method is designed for use in tests. Emits the start
/// flag, the `protocol` byte, one checksum block per byte of
/// `payload`, and the end flag.
#[cfg(test)]
pub fn frame_bits(protocol: u8, payload: &[u8]) -> Vec<bool> {
    use crate::bits::BitSequence;
    use crate::checksum::expected_checksum;

    let mut out = Vec::with_capacity(24 + payload.len() * BLOCK_BITS);
    BitSequence::push_byte(&mut out, FLAG_START);
    BitSequence::push_byte(&mut out, protocol);
    for &byte in payload {
        BitSequence::push_byte(&mut out, byte);
        let sum = expected_checksum(byte);
        out.extend((0..CHECKSUM_BITS).rev().map(|shift| (sum >> shift) & 0x01 == 1));
    }
    BitSequence::push_byte(&mut out, FLAG_END);
    out
}

/// Manchester-encode bits
///
/// This method is designed for use in tests. A one is sent
/// as `10` and a zero as `01`.
#[cfg(test)]
pub fn manchester_encode(bits: &[bool]) -> Vec<bool> {
    bits.iter()
        .flat_map(|&bit| if bit { [true, false] } else { [false, true] })
        .collect()
}

/// Very simple on-off keyed modulator
///
/// This method is designed for use in tests. Each symbol
/// occupies exactly [`samples_per_symbol()`] samples. One
/// symbols are the reference carrier, and zero symbols are
/// silence.
#[cfg(test)]
pub fn modulate_ask(syms: &[bool], fs: u32, fc: f32, baud: u32) -> Vec<f32> {
    let sps = samples_per_symbol(fs, baud);
    let mut out = Vec::with_capacity(syms.len() * sps);
    for (i, &sym) in syms.iter().enumerate() {
        for k in 0..sps {
            let n = i * sps + k;
            out.push(if sym {
                reference_carrier(n, fs, fc) as f32
            } else {
                0.0f32
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_samples_per_symbol() {
        assert_eq!(220, samples_per_symbol(DEFAULT_RATE, BAUD_HZ));
        assert_eq!(240, samples_per_symbol(48000, BAUD_HZ));
        assert_eq!(0, samples_per_symbol(100, BAUD_HZ));
        assert_eq!(0, samples_per_symbol(100, 0));
    }

    #[test]
    fn test_reference_carrier() {
        // quarter period of 2 kHz at 8 kHz is one sample
        assert_approx_eq!(reference_carrier(0, 8000, 2000.0), 0.0f64);
        assert_approx_eq!(reference_carrier(1, 8000, 2000.0), 1.0f64);
        assert_approx_eq!(reference_carrier(3, 8000, 2000.0), -1.0f64);
    }

    #[test]
    fn test_frame_bits() {
        let bits = frame_bits(PROTOCOL_TEXT, b"H");
        assert_eq!(8 + 8 + BLOCK_BITS + 8, bits.len());
        assert!(bits[0..8].iter().all(|&b| b));
        assert!(bits[bits.len() - 8..].iter().all(|&b| !b));
    }

    #[test]
    fn test_manchester_encode() {
        assert_eq!(
            vec![true, false, false, true, true, false],
            manchester_encode(&[true, false, true])
        );
    }
}

//! Decode a recording and report the outcome
//!
//! The program decodes exactly one recording. The decoded
//! message is printed on standard output. Each class of
//! decoding failure has its own exit code so that scripts can
//! tell a damaged recording from one that is simply not a text
//! message.

use anyhow::anyhow;
use log::{info, warn};

use askrx::{AskReceiverBuilder, DecodeErr, TrailingWindow};

use crate::cli::{Args, CliError};
use crate::source::Recording;

/// Exit code: start or end flag incorrect
pub const EXIT_FRAMING: i32 = 2;

/// Exit code: checksum mismatch
pub const EXIT_CHECKSUM: i32 = 3;

/// Exit code: not a text message, or empty
pub const EXIT_NOT_TEXT: i32 = 4;

/// Run the application
///
/// Decodes the `recording` with the modem parameters in
/// `args`. Returns the decoded text, which has already been
/// printed unless `args.quiet` is set.
pub fn run(args: &Args, recording: &Recording) -> Result<String, CliError> {
    let rx = AskReceiverBuilder::new(recording.rate)
        .with_carrier_frequency(args.carrier)
        .with_baud_rate(args.baud)
        .with_trailing_window(if args.drop_short_window {
            TrailingWindow::Drop
        } else {
            TrailingWindow::Include
        })
        .build()
        .map_err(|e| anyhow!(e))?;

    info!(
        "decoding {} samples at {} Hz ({} samples per symbol)",
        recording.samples.len(),
        rx.input_rate(),
        rx.samples_per_symbol()
    );

    let report = rx.decode_report(&recording.samples);
    info!("demodulated bits: {}", report.raw_bit_count());
    info!("bits after Manchester decoding: {}", report.line_bit_count());
    if report.dropped_pair_count() > 0 {
        warn!(
            "{} invalid Manchester pairs were dropped",
            report.dropped_pair_count()
        );
    }

    match report.into_result() {
        Ok(msg) => {
            if !args.quiet {
                println!("{}", msg);
            }
            Ok(msg.release())
        }
        Err(err) => Err(decode_error(err)),
    }
}

// Wrap a decoding error with its exit code
fn decode_error(err: DecodeErr) -> CliError {
    let code = match &err {
        DecodeErr::Framing(_) => EXIT_FRAMING,
        DecodeErr::Checksum(_) => EXIT_CHECKSUM,
        DecodeErr::UnrecognizedProtocol(_) | DecodeErr::EmptyPayload => EXIT_NOT_TEXT,
        DecodeErr::Config(_) => 1,
    };
    CliError::new(anyhow!(err), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    // Build line-level symbols for a text frame carrying `text`
    fn frame_symbols(protocol: u8, text: &[u8]) -> Vec<bool> {
        fn push_bits(out: &mut Vec<bool>, value: u8, nbits: u32) {
            for shift in (0..nbits).rev() {
                out.push((value >> shift) & 0x01 == 1);
            }
        }

        let mut bits = vec![];
        push_bits(&mut bits, 0xff, 8);
        push_bits(&mut bits, protocol, 8);
        for &byte in text {
            push_bits(&mut bits, byte, 8);
            push_bits(&mut bits, askrx::checksum::expected_checksum(byte), 4);
        }
        push_bits(&mut bits, 0x00, 8);

        bits.iter()
            .flat_map(|&b| if b { [true, false] } else { [false, true] })
            .collect()
    }

    // On-off keyed samples at 44.1 kHz, phase-continuous from zero
    fn modulate(symbols: &[bool]) -> Recording {
        let rate = askrx::waveform::DEFAULT_RATE;
        let sps = askrx::waveform::samples_per_symbol(rate, askrx::waveform::BAUD_HZ);
        let samples = (0..symbols.len() * sps)
            .map(|n| {
                if symbols[n / sps] {
                    // i16-scale amplitude, as read from a WAV file
                    16384.0
                        * askrx::waveform::reference_carrier(n, rate, askrx::waveform::CARRIER_HZ)
                            as f32
                } else {
                    0.0
                }
            })
            .collect();
        Recording { samples, rate }
    }

    fn quiet_args() -> Args {
        Args::try_parse_from(["askdec", "-q"]).expect("bad args")
    }

    #[test]
    fn test_run() {
        let rec = modulate(&frame_symbols(0xc3, b"HI"));
        assert_eq!("HI", run(&quiet_args(), &rec).expect("decode failed"));
    }

    #[test]
    fn test_exit_codes() {
        let mut bad_flag = frame_symbols(0xc3, b"HI");
        bad_flag.swap(6, 7);
        let err = run(&quiet_args(), &modulate(&bad_flag)).expect_err("decoded");
        assert_eq!(EXIT_FRAMING, err.exit_code());

        let mut bad_sum = frame_symbols(0xc3, b"HI");
        let last = 2 * (16 + 24) - 1;
        bad_sum.swap(last - 1, last);
        let err = run(&quiet_args(), &modulate(&bad_sum)).expect_err("decoded");
        assert_eq!(EXIT_CHECKSUM, err.exit_code());

        let err = run(&quiet_args(), &modulate(&frame_symbols(0x00, b"HI"))).expect_err("decoded");
        assert_eq!(EXIT_NOT_TEXT, err.exit_code());

        let err = run(&quiet_args(), &modulate(&frame_symbols(0xc3, b""))).expect_err("decoded");
        assert_eq!(EXIT_NOT_TEXT, err.exit_code());
    }

    #[test]
    fn test_bad_rate() {
        let rec = Recording {
            samples: vec![0.0; 16],
            rate: 100,
        };
        let err = run(&quiet_args(), &rec).expect_err("decoded");
        assert_eq!(1, err.exit_code());
    }
}

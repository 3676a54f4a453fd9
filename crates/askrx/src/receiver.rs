//! Full receiver chain

#[cfg(not(test))]
use log::{debug, info, trace};

#[cfg(test)]
use std::println as trace;
#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as info;

use std::convert::From;

use crate::assembler;
use crate::bits::BitSequence;
use crate::builder::{AskReceiverBuilder, ConfigErr};
use crate::checksum;
use crate::demod::{AskDemod, Signal};
use crate::framing::Frame;
use crate::manchester;
use crate::message::{DecodeErr, DecodeResult, DecodedMessage};
use crate::waveform;

/// A complete ASK receiver chain
///
/// The receive chain takes `f32` samples of a whole
/// transmission and performs the following operations:
///
/// 1. Coherent demodulation into one raw bit per symbol
/// 2. Manchester decoding into logical bits
/// 3. Frame extraction: start flag, protocol, end flag
/// 4. Checksum verification of every data byte
/// 5. Character assembly
///
/// Each step runs to completion before the next begins.
/// A failure at any step ends decoding; there are no
/// retries.
///
/// To create the receiver, first create its Builder:
///
/// ```
/// use askrx::AskReceiverBuilder;
///
/// let receiver = AskReceiverBuilder::default().build().unwrap();
/// assert_eq!(receiver.input_rate(), 44100);
/// assert_eq!(receiver.samples_per_symbol(), 220);
/// ```
///
/// The receiver holds no state between calls. Decoding one
/// signal never affects the next, and a single receiver may
/// be shared between threads.
#[derive(Clone, Debug, PartialEq)]
pub struct AskReceiver {
    demod: AskDemod,
    input_rate: u32,
}

/// Stage of the receive chain
///
/// Stages advance in declaration order. Failure at any
/// stage is terminal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineState {
    /// Nothing processed yet
    AwaitingSignal,

    /// Raw symbols recovered
    Demodulated,

    /// Manchester decoding complete
    LineDecoded,

    /// Flags verified and frame split
    FrameValidated,

    /// Every data byte verified
    ChecksumValidated,

    /// Text assembly attempted
    Assembled,
}

/// Detailed outcome of one decode
///
/// In addition to the [result](DecodeReport::result), the
/// report counts bits at the first two stages of the
/// receiver. These counts help diagnose a bad decode: a
/// Manchester count much less than half the raw count means
/// many invalid symbol pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeReport {
    raw_bits: usize,
    line_bits: usize,
    dropped_pairs: usize,
    reached: PipelineState,
    result: DecodeResult,
}

impl AskReceiver {
    /// Decode one complete transmission
    ///
    /// The `samples` must be mono and sampled at the
    /// [`input_rate()`](#method.input_rate). They are used
    /// as-is, without any gain normalization.
    pub fn decode<S>(&self, samples: S) -> DecodeResult
    where
        S: AsRef<[f32]>,
    {
        self.decode_report(samples).into_result()
    }

    /// Decode one transmission with bit-count diagnostics
    ///
    /// Like [`decode()`](#method.decode), but also reports
    /// how far the receiver got and how many bits each of the
    /// first two stages produced.
    pub fn decode_report<S>(&self, samples: S) -> DecodeReport
    where
        S: AsRef<[f32]>,
    {
        let samples = samples.as_ref();
        let mut report = DecodeReport::new();

        let signal = match Signal::new(samples, self.input_rate) {
            Ok(signal) => signal,
            Err(err) => return report.fail(err.into()),
        };

        // demodulate
        let raw = self.demod.demodulate(&signal);
        report.raw_bits = raw.len();
        report.advance(PipelineState::Demodulated);
        info!(
            "receiver: demodulated {} bits from {} samples",
            raw.len(),
            samples.len()
        );

        // line decoding
        let line = manchester::decode(&raw);
        report.line_bits = line.bits.len();
        report.dropped_pairs = line.dropped_pairs;
        report.advance(PipelineState::LineDecoded);
        info!(
            "receiver: {} bits after Manchester decoding",
            line.bits.len()
        );

        match self.decode_frame(&line.bits, &mut report) {
            Ok(msg) => {
                info!("receiver: decoded {} characters", msg.char_count());
                report.succeed(msg)
            }
            Err(err) => {
                debug!("receiver: failed after {}: {}", report.reached, err);
                report.fail(err)
            }
        }
    }

    /// Input sampling rate
    ///
    /// Returns sampling rate expected by the
    /// [`decode()`](#method.decode) method.
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Carrier frequency (Hz)
    pub fn carrier_frequency(&self) -> f32 {
        self.demod.carrier_hz()
    }

    /// Baud rate
    pub fn baud_rate(&self) -> u32 {
        self.demod.baud()
    }

    /// Samples per symbol window
    pub fn samples_per_symbol(&self) -> usize {
        waveform::samples_per_symbol(self.input_rate, self.demod.baud())
    }

    // Decode line-decoded bits into a message
    fn decode_frame(&self, bits: &BitSequence, report: &mut DecodeReport) -> DecodeResult {
        let frame = Frame::extract(bits)?;
        report.advance(PipelineState::FrameValidated);
        debug!(
            "receiver: frame protocol {}, {} payload bits",
            frame.protocol(),
            frame.payload().len()
        );

        let data = checksum::validate(frame.payload())?;
        report.advance(PipelineState::ChecksumValidated);

        let msg = assembler::assemble(&data, frame.protocol());
        report.advance(PipelineState::Assembled);
        Ok(msg?)
    }
}

impl From<&AskReceiverBuilder> for AskReceiver {
    fn from(cfg: &AskReceiverBuilder) -> Self {
        Self {
            demod: AskDemod::new(
                cfg.carrier_frequency(),
                cfg.baud_rate(),
                cfg.trailing_window(),
            ),
            input_rate: cfg.input_rate(),
        }
    }
}

impl DecodeReport {
    /// Decoded message or error
    pub fn result(&self) -> &DecodeResult {
        &self.result
    }

    /// Consume, returning the decoded message or error
    pub fn into_result(self) -> DecodeResult {
        self.result
    }

    /// Number of raw bits from the demodulator
    pub fn raw_bit_count(&self) -> usize {
        self.raw_bits
    }

    /// Number of logical bits after Manchester decoding
    pub fn line_bit_count(&self) -> usize {
        self.line_bits
    }

    /// Number of invalid Manchester pairs that were dropped
    pub fn dropped_pair_count(&self) -> usize {
        self.dropped_pairs
    }

    /// Last stage which completed
    ///
    /// If decoding failed, the failure occurred in the stage
    /// *after* this one. `Assembled` is reached even if the
    /// assembler reports an unrecognized protocol.
    pub fn reached(&self) -> PipelineState {
        self.reached
    }

    fn new() -> Self {
        Self {
            raw_bits: 0,
            line_bits: 0,
            dropped_pairs: 0,
            reached: PipelineState::AwaitingSignal,
            result: Err(DecodeErr::EmptyPayload),
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(next > self.reached);
        trace!("receiver: {} → {}", self.reached, next);
        self.reached = next;
    }

    fn succeed(mut self, msg: DecodedMessage) -> Self {
        self.result = Ok(msg);
        self
    }

    fn fail(mut self, err: DecodeErr) -> Self {
        self.result = Err(err);
        self
    }
}

/// Decode one transmission with explicit parameters
///
/// Builds a receiver for the given `sample_rate`, `carrier_hz`,
/// and `baud`, and decodes `samples` with it. Short final
/// symbol windows are [included](crate::TrailingWindow::Include).
///
/// ```
/// use askrx::{decode, DecodeErr};
///
/// // silence demodulates to all zeros, which has no start flag
/// let silence = vec![0.0f32; 44100];
/// assert!(matches!(
///     decode(&silence, 44100, 2000.0, 200),
///     Err(DecodeErr::Framing(_))
/// ));
/// ```
pub fn decode<S>(samples: S, sample_rate: u32, carrier_hz: f32, baud: u32) -> DecodeResult
where
    S: AsRef<[f32]>,
{
    let rx = build_receiver(sample_rate, carrier_hz, baud)?;
    rx.decode(samples)
}

fn build_receiver(sample_rate: u32, carrier_hz: f32, baud: u32) -> Result<AskReceiver, ConfigErr> {
    AskReceiverBuilder::new(sample_rate)
        .with_carrier_frequency(carrier_hz)
        .with_baud_rate(baud)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::checksum::ChecksumErr;
    use crate::demod::TrailingWindow;
    use crate::framing::{FramingErr, Protocol};
    use crate::waveform::{
        frame_bits, manchester_encode, modulate_ask, BAUD_HZ, CARRIER_HZ, DEFAULT_RATE,
        PROTOCOL_TEXT,
    };

    // Modulate line-level bits into samples at the default rate
    fn modulate(frame: &[bool]) -> Vec<f32> {
        modulate_ask(&manchester_encode(frame), DEFAULT_RATE, CARRIER_HZ, BAUD_HZ)
    }

    fn receiver() -> AskReceiver {
        AskReceiverBuilder::default().build().expect("bad config")
    }

    #[test]
    fn test_decode_hi() {
        let samples = modulate(&frame_bits(PROTOCOL_TEXT, b"HI"));
        let report = receiver().decode_report(&samples);

        // 8 + 8 + 2 * 12 + 8 = 48 logical bits
        assert_eq!(96, report.raw_bit_count());
        assert_eq!(48, report.line_bit_count());
        assert_eq!(0, report.dropped_pair_count());
        assert_eq!(PipelineState::Assembled, report.reached());

        let msg = report.into_result().expect("decode failed");
        assert_eq!("HI", msg.as_str());
        assert_eq!(Protocol::Text, msg.protocol());
    }

    #[test]
    fn test_decode_longer_message() {
        const TEXT: &str = "Bonjour, le monde! 0123456789";
        let samples = modulate(&frame_bits(PROTOCOL_TEXT, TEXT.as_bytes()));
        let msg = decode(&samples, DEFAULT_RATE, CARRIER_HZ, BAUD_HZ).expect("decode failed");
        assert_eq!(TEXT, msg.as_str());
    }

    #[test]
    fn test_decode_other_rate() {
        let samples = modulate_ask(
            &manchester_encode(&frame_bits(PROTOCOL_TEXT, b"HI")),
            48000,
            CARRIER_HZ,
            BAUD_HZ,
        );
        let msg = decode(&samples, 48000, CARRIER_HZ, BAUD_HZ).expect("decode failed");
        assert_eq!("HI", msg.as_str());
    }

    #[test]
    fn test_start_flag_corrupt() {
        let mut frame = frame_bits(PROTOCOL_TEXT, b"HI");
        frame[3] = false;
        let report = receiver().decode_report(&modulate(&frame));
        assert_eq!(PipelineState::LineDecoded, report.reached());
        assert_eq!(
            &Err(DecodeErr::Framing(FramingErr::BadFlags)),
            report.result()
        );
    }

    #[test]
    fn test_checksum_corrupt() {
        // last bit of the second checksum block
        let mut frame = frame_bits(PROTOCOL_TEXT, b"HI");
        let idx = 16 + 2 * 12 - 1;
        frame[idx] = !frame[idx];

        let report = receiver().decode_report(&modulate(&frame));
        assert_eq!(PipelineState::FrameValidated, report.reached());
        assert_eq!(
            &Err(DecodeErr::Checksum(ChecksumErr {
                first: 1,
                failed: 1,
                blocks: 2
            })),
            report.result()
        );
    }

    #[test]
    fn test_unknown_protocol() {
        let samples = modulate(&frame_bits(0x00, b"HI"));
        let report = receiver().decode_report(&samples);
        assert_eq!(PipelineState::Assembled, report.reached());
        assert_eq!(
            &Err(DecodeErr::UnrecognizedProtocol(Protocol::Unknown(0))),
            report.result()
        );
    }

    #[test]
    fn test_empty_payload() {
        let samples = modulate(&frame_bits(PROTOCOL_TEXT, b""));
        assert_eq!(Err(DecodeErr::EmptyPayload), receiver().decode(&samples));
    }

    #[test]
    fn test_silence() {
        let report = receiver().decode_report(vec![0.0f32; 220 * 40]);
        assert_eq!(40, report.raw_bit_count());
        assert_eq!(0, report.line_bit_count());
        assert_eq!(20, report.dropped_pair_count());
        assert_eq!(
            &Err(DecodeErr::Framing(FramingErr::TooShort(0))),
            report.result()
        );
    }

    #[test]
    fn test_empty_signal() {
        let report = receiver().decode_report(Vec::<f32>::new());
        assert_eq!(0, report.raw_bit_count());
        assert!(matches!(
            report.result(),
            Err(DecodeErr::Framing(FramingErr::TooShort(0)))
        ));
    }

    #[test]
    fn test_trailing_partial_window() {
        // a few extra samples of silence after the end flag
        // become one more raw bit, which is unpaired
        let mut samples = modulate(&frame_bits(PROTOCOL_TEXT, b"HI"));
        samples.extend_from_slice(&[0.0f32; 30]);

        let report = receiver().decode_report(&samples);
        assert_eq!(97, report.raw_bit_count());
        assert_eq!("HI", report.result().as_ref().unwrap().as_str());

        let rx = AskReceiverBuilder::default()
            .with_trailing_window(TrailingWindow::Drop)
            .build()
            .unwrap();
        let report = rx.decode_report(&samples);
        assert_eq!(96, report.raw_bit_count());
        assert_eq!("HI", report.result().as_ref().unwrap().as_str());
    }

    #[test]
    fn test_bad_config() {
        assert_eq!(
            Err(DecodeErr::Config(ConfigErr::SampleRate(0))),
            decode([0.0f32; 4], 0, CARRIER_HZ, BAUD_HZ)
        );
        assert_eq!(
            Err(DecodeErr::Config(ConfigErr::BaudRate(0))),
            decode([0.0f32; 4], DEFAULT_RATE, CARRIER_HZ, 0)
        );
    }

    #[test]
    fn test_stateless() {
        let rx = receiver();
        let good = modulate(&frame_bits(PROTOCOL_TEXT, b"HI"));
        let bad = vec![0.0f32; 100];

        assert!(rx.decode(&good).is_ok());
        assert!(rx.decode(&bad).is_err());
        assert_eq!("HI", rx.decode(&good).unwrap().as_str());
    }

    #[test]
    fn test_pipeline_state_display() {
        assert_eq!("awaiting_signal", PipelineState::AwaitingSignal.to_string());
        assert_eq!(
            "checksum_validated",
            PipelineState::ChecksumValidated.to_string()
        );
        assert!(PipelineState::Demodulated < PipelineState::Assembled);
    }
}

//! # askrx: Manchester-coded ASK message decoding
//!
//! This crate recovers short text messages from an
//! amplitude-shift keyed (ASK) signal. The transmitter keys a
//! 2000 Hz carrier at 200 baud, Manchester-codes every bit, and
//! wraps the message in a frame with a start flag, a protocol
//! byte, a checksum on every data byte, and an end flag.
//!
//! ## Example
//!
//! You will first need a recording of the signal as `f32`
//! samples, along with its sampling rate. Reading audio files
//! is beyond the scope of this crate; the `askdec` program
//! reads WAV, CSV, and raw PCM. If you have a stereo signal,
//! select one channel first.
//!
//! ```
//! use askrx::{AskReceiverBuilder, DecodeErr};
//!
//! # let some_recorded_signal = || vec![0.0f32; 44100];
//! #
//! // create an AskReceiver with your sampling rate
//! let rx = AskReceiverBuilder::new(44100)
//!     .with_carrier_frequency(2000.0)   // carrier (Hz)
//!     .with_baud_rate(200)              // symbols per second
//!     .build()
//!     .expect("invalid receiver parameters");
//!
//! let samples = some_recorded_signal();
//! match rx.decode(&samples) {
//!     Ok(msg) => println!("message: {}", msg),
//!     Err(DecodeErr::Framing(e)) => println!("no frame: {}", e),
//!     Err(DecodeErr::Checksum(e)) => println!("corrupted: {}", e),
//!     Err(e) => println!("not a text message: {}", e),
//! }
//! ```
//!
//! The signal is processed as a whole. There is no streaming
//! interface and no synchronization: the first sample must be
//! the first sample of the first symbol.
//!
//! ## Frame format
//!
//! After demodulation and Manchester decoding, a frame is:
//!
//! ```txt
//! 11111111 11000011 [dddddddd cccc]… 00000000
//! ^ start  ^ text   ^ data + checksum ^ end
//! ```
//!
//! Every data byte `d` is followed by a four-bit checksum
//! `c = (d << 4) mod 9`. A single bad checksum rejects the
//! whole message.
//!
//! ## Lenient and strict stages
//!
//! Some malformed input is discarded quietly:
//!
//! * invalid Manchester pairs (`00` and `11`);
//! * bits after the last complete 12-bit checksum block; and
//! * bits after the last complete 8-bit character.
//!
//! Other problems are fatal and reported as a [`DecodeErr`]:
//! incorrect flags, any checksum mismatch, a protocol other
//! than text, or no data at all.
//!
//! Each stage is also available on its own: see [`AskDemod`],
//! [`manchester`], [`Frame`], [`checksum`], and [`assembler`].

pub mod assembler;
mod bits;
mod builder;
pub mod checksum;
mod demod;
mod framing;
pub mod manchester;
mod message;
mod receiver;
pub mod waveform;

pub use assembler::AssembleErr;
pub use bits::{BitSequence, ParseBitsErr};
pub use builder::{AskReceiverBuilder, ConfigErr};
pub use checksum::{ChecksumBlock, ChecksumErr};
pub use demod::{AskDemod, Signal, TrailingWindow};
pub use framing::{Frame, FramingErr, Protocol};
pub use manchester::LineDecoded;
pub use message::{DecodeErr, DecodeResult, DecodedMessage};
pub use receiver::{decode, AskReceiver, DecodeReport, PipelineState};

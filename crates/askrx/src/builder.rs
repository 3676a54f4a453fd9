use thiserror::Error;

use crate::demod::TrailingWindow;
use crate::receiver::AskReceiver;
use crate::waveform;

/// Invalid receiver or signal parameters
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ConfigErr {
    /// Sampling rate must be positive
    #[error("sampling rate {0} Hz is not positive")]
    SampleRate(u32),

    /// Baud rate must be positive
    #[error("baud rate {0} is not positive")]
    BaudRate(u32),

    /// Carrier frequency must be positive and finite
    #[error("carrier frequency {0} Hz is not positive and finite")]
    Carrier(f32),

    /// Baud rate is higher than the sampling rate
    #[error("sampling rate {rate} Hz has no whole samples per symbol at {baud} baud")]
    NoSamplesPerSymbol {
        /// Sampling rate (Hz)
        rate: u32,

        /// Baud rate
        baud: u32,
    },
}

/// Builds an ASK receiver
///
/// The builder comes with the default waveform parameters:
/// a 2000 Hz carrier keyed at 200 baud. All you really need
/// to provide is the input sampling rate.
///
/// ```
/// use askrx::{AskReceiverBuilder, TrailingWindow};
///
/// let rx = AskReceiverBuilder::new(48000)
///     .with_carrier_frequency(2000.0)
///     .with_baud_rate(200)
///     .with_trailing_window(TrailingWindow::Drop)
///     .build()
///     .expect("bad configuration");
///
/// assert_eq!(rx.input_rate(), 48000);
/// assert_eq!(rx.samples_per_symbol(), 240);
/// ```
///
/// The builder is an immutable value once configured. Many
/// receivers with different parameters may be built and used
/// side by side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AskReceiverBuilder {
    input_rate: u32,
    carrier_hz: f32,
    baud: u32,
    trailing: TrailingWindow,
}

impl AskReceiverBuilder {
    /// New receiver chain with the default waveform
    ///
    /// The only mandatory parameter is the input sampling
    /// rate, in Hz. For WAV files, use the rate from the file
    /// header.
    pub fn new(input_rate: u32) -> Self {
        Self {
            input_rate,
            carrier_hz: waveform::CARRIER_HZ,
            baud: waveform::BAUD_HZ,
            trailing: TrailingWindow::default(),
        }
    }

    /// Build a receiver chain
    ///
    /// Fails if any rate is zero, if the carrier is not a
    /// positive finite frequency, or if a symbol would be
    /// shorter than one sample.
    pub fn build(&self) -> Result<AskReceiver, ConfigErr> {
        self.validate()?;
        Ok(AskReceiver::from(self))
    }

    /// Carrier frequency (Hz)
    ///
    /// The demodulator mixes the input with a sinusoid at
    /// this frequency, phase-locked to the first sample.
    pub fn with_carrier_frequency(&mut self, carrier_hz: f32) -> &mut Self {
        self.carrier_hz = carrier_hz;
        self
    }

    /// Baud rate (symbols per second)
    ///
    /// Symbols are Manchester half-bits. The symbol window is
    /// `input_rate / baud` samples, rounded down.
    pub fn with_baud_rate(&mut self, baud: u32) -> &mut Self {
        self.baud = baud;
        self
    }

    /// Short final symbol window policy
    ///
    /// See [`TrailingWindow`].
    pub fn with_trailing_window(&mut self, trailing: TrailingWindow) -> &mut Self {
        self.trailing = trailing;
        self
    }

    /// Input sampling rate (Hz)
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Carrier frequency (Hz)
    pub fn carrier_frequency(&self) -> f32 {
        self.carrier_hz
    }

    /// Baud rate
    pub fn baud_rate(&self) -> u32 {
        self.baud
    }

    /// Short final symbol window policy
    pub fn trailing_window(&self) -> TrailingWindow {
        self.trailing
    }

    fn validate(&self) -> Result<(), ConfigErr> {
        if self.input_rate == 0 {
            return Err(ConfigErr::SampleRate(self.input_rate));
        }
        if self.baud == 0 {
            return Err(ConfigErr::BaudRate(self.baud));
        }
        if !(self.carrier_hz.is_finite() && self.carrier_hz > 0.0) {
            return Err(ConfigErr::Carrier(self.carrier_hz));
        }
        if waveform::samples_per_symbol(self.input_rate, self.baud) == 0 {
            return Err(ConfigErr::NoSamplesPerSymbol {
                rate: self.input_rate,
                baud: self.baud,
            });
        }
        Ok(())
    }
}

impl std::default::Default for AskReceiverBuilder {
    fn default() -> Self {
        Self::new(waveform::DEFAULT_RATE)
    }
}

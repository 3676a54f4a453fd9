//! Coherent ASK demodulation
//!
//! A synchronous detector for amplitude-shift keying. The
//! received signal is multiplied by a locally-generated copy
//! of the carrier, and the product is integrated over each
//! symbol. A positive integral is a one bit.
//!
//! The reference carrier is phase-locked to the *first sample*
//! of the signal, and symbol windows are cut at fixed intervals
//! from that same sample. There is no carrier or clock recovery:
//! the transmitter and receiver are assumed to agree exactly.

use crate::bits::BitSequence;
use crate::builder::ConfigErr;
use crate::waveform;

/// Sampled input signal
///
/// Borrows a slice of real-valued samples and tags it with
/// the sampling rate. The samples are used as-is; no gain
/// or DC correction is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signal<'a> {
    samples: &'a [f32],
    rate: u32,
}

impl<'a> Signal<'a> {
    /// Tag `samples` with sampling `rate`, in Hz
    ///
    /// The rate must be positive.
    pub fn new(samples: &'a [f32], rate: u32) -> Result<Self, ConfigErr> {
        if rate == 0 {
            return Err(ConfigErr::SampleRate(rate));
        }
        Ok(Self { samples, rate })
    }

    /// Sample values
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// Sampling rate (Hz)
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the signal has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Handling of a short final symbol window
///
/// If the number of samples is not an exact multiple of the
/// symbol length, the last window is short.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum TrailingWindow {
    /// Demodulate the short window like any other
    ///
    /// The output has `ceil(samples / samples_per_symbol)` bits.
    /// A window of a single sample always integrates to zero
    /// and yields a zero bit.
    #[default]
    Include,

    /// Discard the short window
    ///
    /// The output has `floor(samples / samples_per_symbol)` bits.
    Drop,
}

/// ASK demodulator
///
/// Converts a [`Signal`] into one hard bit decision per
/// symbol window:
///
/// * `integral > 0` → `1`
/// * `integral <= 0` → `0`
///
/// An integral of exactly zero, as produced by silence, is a
/// zero bit.
#[derive(Clone, Debug, PartialEq)]
pub struct AskDemod {
    carrier_hz: f32,
    baud: u32,
    trailing: TrailingWindow,
}

impl AskDemod {
    /// Create demodulator
    ///
    /// Demodulates a carrier at `carrier_hz` keyed at `baud`
    /// symbols per second.
    pub fn new(carrier_hz: f32, baud: u32, trailing: TrailingWindow) -> Self {
        Self {
            carrier_hz,
            baud,
            trailing,
        }
    }

    /// Carrier frequency (Hz)
    pub fn carrier_hz(&self) -> f32 {
        self.carrier_hz
    }

    /// Symbol rate (Hz)
    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// Short final window policy
    pub fn trailing_window(&self) -> TrailingWindow {
        self.trailing
    }

    /// Demodulate the entire `signal`
    ///
    /// Returns one bit per symbol window. Windows are
    /// [`samples_per_symbol()`](crate::waveform::samples_per_symbol)
    /// long and do not overlap. An empty signal produces an
    /// empty output.
    ///
    /// If the signal's sampling rate is lower than the baud
    /// rate, there are no whole samples per symbol and the
    /// output is empty. The [receiver](crate::AskReceiverBuilder)
    /// rejects this configuration before it gets here.
    pub fn demodulate(&self, signal: &Signal<'_>) -> BitSequence {
        let sps = waveform::samples_per_symbol(signal.rate(), self.baud);
        if sps == 0 {
            return BitSequence::new();
        }

        signal
            .samples()
            .chunks(sps)
            .enumerate()
            .filter(|(_, window)| self.trailing == TrailingWindow::Include || window.len() == sps)
            .map(|(i, window)| self.integrate(window, i * sps, signal.rate()) > 0.0)
            .collect()
    }

    // Integrate one window against the reference carrier
    //
    // `start` is the absolute index of the window's first
    // sample within the signal. Integration uses the
    // trapezoidal rule with unit sample spacing.
    fn integrate(&self, window: &[f32], start: usize, fs: u32) -> f64 {
        let mut product = window
            .iter()
            .enumerate()
            .map(|(k, &sa)| sa as f64 * waveform::reference_carrier(start + k, fs, self.carrier_hz));

        let mut last = match product.next() {
            Some(first) => first,
            None => return 0.0,
        };

        let mut acc = 0.0f64;
        for cur in product {
            acc += 0.5 * (last + cur);
            last = cur;
        }
        acc
    }
}

impl Default for AskDemod {
    fn default() -> Self {
        Self::new(
            waveform::CARRIER_HZ,
            waveform::BAUD_HZ,
            TrailingWindow::default(),
        )
    }
}

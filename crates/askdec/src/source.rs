//! Sample sources
//!
//! Loads a complete recording into memory as `f32` samples
//! tagged with their sampling rate. Three containers are
//! understood:
//!
//! * CSV text: every comma-separated value, row by row. The
//!   sampling rate comes from the command line.
//! * WAV audio: the sampling rate comes from the file. One
//!   channel is selected. Integer samples keep their raw
//!   scale; they are not normalized to ±1.0.
//! * Raw PCM: signed 16-bit native-endian mono at the rate
//!   given on the command line.

use std::io::{self, BufRead, Read};
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use byteorder::{NativeEndian, ReadBytesExt};
use log::{debug, info};

use crate::cli::InputFormat;

/// Loaded samples
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    /// Sample values
    pub samples: Vec<f32>,

    /// Sampling rate (Hz)
    pub rate: u32,
}

/// Container of a file to read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    Csv,
    Wav,
    Raw,
}

impl Container {
    /// Select container from the requested `format` and `path`
    ///
    /// With [`InputFormat::Auto`], the container is chosen by
    /// file extension, ignoring case. Standard input is raw PCM
    /// unless another format is requested.
    pub fn select(format: InputFormat, path: &str, is_stdin: bool) -> Result<Self, anyhow::Error> {
        match format {
            InputFormat::Csv => Ok(Container::Csv),
            InputFormat::Wav => Ok(Container::Wav),
            InputFormat::Raw => Ok(Container::Raw),
            InputFormat::Auto if is_stdin => Ok(Container::Raw),
            InputFormat::Auto => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase());
                match ext.as_deref() {
                    Some("csv") => Ok(Container::Csv),
                    Some("wav") => Ok(Container::Wav),
                    _ => Err(anyhow!(
                        "unrecognized extension for \"{}\": use a .csv or .wav file, or --format",
                        path
                    )),
                }
            }
        }
    }
}

/// Read comma-separated samples
///
/// Rows are concatenated in order. Blank fields and blank
/// lines are skipped. Any other field which is not a number
/// is an error.
pub fn read_csv<R>(input: R, rate: u32) -> Result<Recording, anyhow::Error>
where
    R: BufRead,
{
    let mut samples = Vec::new();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("Unable to read CSV input")?;
        for field in line.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let value: f32 = field.parse().with_context(|| {
                format!("Line {}: \"{}\" is not a number", lineno + 1, field)
            })?;
            samples.push(value);
        }
    }

    debug!("csv: read {} samples", samples.len());
    Ok(Recording { samples, rate })
}

/// Read one channel of a WAV file
///
/// The sampling rate is taken from the WAV header. `channel`
/// zero is the left (or only) channel.
pub fn read_wav<R>(input: R, channel: u16) -> Result<Recording, anyhow::Error>
where
    R: Read,
{
    let mut reader = hound::WavReader::new(input).context("Unable to read WAV header")?;
    let spec = reader.spec();
    info!(
        "wav: {} Hz, {} channel(s), {} bits, {:?}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
    );

    if channel >= spec.channels {
        bail!(
            "--channel {} requested, but WAV file has {} channel(s)",
            channel,
            spec.channels
        );
    }

    let stride = spec.channels as usize;
    let samples = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .skip(channel as usize)
            .step_by(stride)
            .map(|sa| sa.map(|v| v as f32))
            .collect::<Result<Vec<f32>, _>>(),
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .skip(channel as usize)
            .step_by(stride)
            .collect::<Result<Vec<f32>, _>>(),
    }
    .context("Unable to read WAV samples")?;

    Ok(Recording {
        samples,
        rate: spec.sample_rate,
    })
}

/// Read raw signed 16-bit native-endian PCM
///
/// Reads until end of input. A trailing odd byte is ignored.
pub fn read_raw<R>(mut input: R, rate: u32) -> Result<Recording, anyhow::Error>
where
    R: Read,
{
    let mut samples = Vec::new();
    loop {
        match input.read_i16::<NativeEndian>() {
            Ok(sa) => samples.push(sa as f32),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e).context("Unable to read raw samples"),
        }
    }

    debug!("raw: read {} samples", samples.len());
    Ok(Recording { samples, rate })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_select() {
        assert_eq!(
            Container::Csv,
            Container::select(InputFormat::Auto, "signal.CSV", false).unwrap()
        );
        assert_eq!(
            Container::Wav,
            Container::select(InputFormat::Auto, "dir.v2/Message_stereo.wav", false).unwrap()
        );
        assert_eq!(
            Container::Raw,
            Container::select(InputFormat::Auto, "-", true).unwrap()
        );
        assert_eq!(
            Container::Csv,
            Container::select(InputFormat::Csv, "-", true).unwrap()
        );
        assert_eq!(
            Container::Wav,
            Container::select(InputFormat::Wav, "noext", false).unwrap()
        );
        assert!(Container::select(InputFormat::Auto, "signal.mp3", false).is_err());
        assert!(Container::select(InputFormat::Auto, "signal", false).is_err());
    }

    #[test]
    fn test_read_csv() {
        let input = "0.5, -1.0,2\n\n3e-1,\n 4 \n";
        let rec = read_csv(Cursor::new(input), 8000).expect("csv failed");
        assert_eq!(8000, rec.rate);
        assert_eq!(5, rec.samples.len());
        assert_approx_eq!(rec.samples[0], 0.5f32);
        assert_approx_eq!(rec.samples[1], -1.0f32);
        assert_approx_eq!(rec.samples[3], 0.3f32);
        assert_approx_eq!(rec.samples[4], 4.0f32);

        let err = read_csv(Cursor::new("1.0\n2.0,abc\n"), 8000).expect_err("parsed junk");
        assert!(format!("{:#}", err).contains("Line 2"));
    }

    #[test]
    fn test_read_raw() {
        let mut bytes = vec![];
        for v in [0i16, 1, -1, i16::MAX] {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        bytes.push(0x7f);

        let rec = read_raw(Cursor::new(bytes), 22050).expect("raw failed");
        assert_eq!(vec![0.0f32, 1.0, -1.0, 32767.0], rec.samples);
        assert_eq!(22050, rec.rate);
    }

    fn make_wav<F>(spec: hound::WavSpec, write: F) -> Vec<u8>
    where
        F: FnOnce(&mut hound::WavWriter<&mut Cursor<Vec<u8>>>),
    {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut buf, spec).expect("wav writer");
            write(&mut writer);
            writer.finalize().expect("wav finalize");
        }
        buf.into_inner()
    }

    #[test]
    fn test_read_wav_stereo_int() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let wav = make_wav(spec, |w| {
            for (l, r) in [(100i16, -5i16), (-200, 6), (300, -7)] {
                w.write_sample(l).unwrap();
                w.write_sample(r).unwrap();
            }
        });

        let left = read_wav(Cursor::new(wav.clone()), 0).expect("wav failed");
        assert_eq!(48000, left.rate);
        assert_eq!(vec![100.0f32, -200.0, 300.0], left.samples);

        let right = read_wav(Cursor::new(wav.clone()), 1).expect("wav failed");
        assert_eq!(vec![-5.0f32, 6.0, -7.0], right.samples);

        assert!(read_wav(Cursor::new(wav), 2).is_err());
    }

    #[test]
    fn test_read_wav_float() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let wav = make_wav(spec, |w| {
            for v in [0.25f32, -0.5, 1.0] {
                w.write_sample(v).unwrap();
            }
        });

        let rec = read_wav(Cursor::new(wav), 0).expect("wav failed");
        assert_eq!(44100, rec.rate);
        assert_eq!(vec![0.25f32, -0.5, 1.0], rec.samples);
    }

    #[test]
    fn test_read_wav_garbage() {
        assert!(read_wav(Cursor::new(b"not a wav file".to_vec()), 0).is_err());
    }
}

use std::fmt::Display;

use clap::{error::ErrorKind, value_parser, CommandFactory, Parser, ValueEnum};

/// Standard input filename
const STDIN_FILE: &str = "-";

/// File decoded when none is given
const DEFAULT_FILE: &str = "Message_stereo.wav";

const USAGE_SHORT: &str = r#"
This program reads a recorded ASK signal from a CSV, WAV, or raw PCM file, decodes the Manchester-coded frame it carries, and prints the text message.

See --help for more details.
"#;

const USAGE_LONG: &str = r#"
This program reads a recorded ASK signal from a CSV, WAV, or raw PCM file, decodes the Manchester-coded frame it carries, and prints the text message.

The container is chosen by file extension:

  .csv   comma-separated sample values, every row in order,
         sampled at --rate
  .wav   WAV audio at the rate in its header. Integer samples
         are used at their raw scale. Multi-channel files are
         read from --channel (0 = left).

Use --format to override the extension. Standard input ("-")
is read as raw signed 16-bit native-endian mono PCM at --rate:

    sox message.wav -t raw -r 44100 -e signed -b 16 -c 1 - \
        | askdec -r 44100 -

The exit status describes the outcome:

  0  message decoded
  1  unable to read input, or bad options
  2  start or end flag incorrect
  3  checksum mismatch
  4  frame is not a text message, or is empty
"#;

const ADVANCED: &str = "Advanced Modem Options";

/// Input container format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    /// Choose from the file extension
    Auto,

    /// Comma-separated text
    Csv,

    /// WAV audio
    Wav,

    /// Signed 16-bit native-endian mono PCM
    Raw,
}

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_help = USAGE_SHORT, after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print NOTHING, not even the message
    #[arg(short, long)]
    pub quiet: bool,

    /// Input file (or "-" for stdin)
    #[arg(default_value_t = DEFAULT_FILE.to_string())]
    pub file: String,

    /// Input container format
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Sampling rate for CSV and raw input (Hz)
    ///
    /// WAV files always use the rate in their header.
    #[arg(short, long, default_value_t = askrx::waveform::DEFAULT_RATE)]
    #[arg(value_parser = value_parser!(u32).range(1..))]
    pub rate: u32,

    /// Channel to decode from multi-channel WAV files
    #[arg(long, default_value_t = 0)]
    pub channel: u16,

    /// Carrier frequency (Hz)
    #[arg(long, default_value_t = askrx::waveform::CARRIER_HZ)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = ADVANCED)]
    pub carrier: f32,

    /// Symbol rate (baud)
    #[arg(long, default_value_t = askrx::waveform::BAUD_HZ)]
    #[arg(value_parser = value_parser!(u32).range(1..))]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = ADVANCED)]
    pub baud: u32,

    /// Ignore a short symbol window at the end of the input
    #[arg(long)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = ADVANCED)]
    pub drop_short_window: bool,
}

impl Args {
    /// Return true if the user requests input from stdin
    pub fn input_is_stdin(&self) -> bool {
        self.file == STDIN_FILE
    }
}

/// A program-level error with exit code
#[derive(Debug)]
pub struct CliError {
    error: anyhow::Error,
    exit_code: i32,
}

impl CliError {
    /// Create new error with a custom exit code
    pub fn new(error: anyhow::Error, code: i32) -> CliError {
        CliError {
            error,
            exit_code: code,
        }
    }

    /// Exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Print this error to the terminal
    ///
    /// Errors from clap are printed verbatim. Other types of errors
    /// are printed indirectly via clap's fancy formatter.
    pub fn print(&self) -> std::io::Result<()> {
        if let Some(e) = self.error.downcast_ref::<clap::Error>() {
            e.print()
        } else {
            Args::command()
                .error(ErrorKind::Format, self.to_string())
                .print()
        }
    }

    /// Print this error to the terminal and exit
    pub fn exit(&self) -> ! {
        drop(self.print());
        std::process::exit(self.exit_code);
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.error)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> CliError {
        CliError::new(err, 1)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> CliError {
        let code = if err.use_stderr() { 1 } else { 0 };
        CliError::new(err.into(), code)
    }
}

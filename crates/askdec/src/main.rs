use std::io;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::{info, LevelFilter};

mod app;
mod cli;
mod source;

use cli::{Args, CliError};
use source::{Container, Recording};

fn main() {
    match askdec() {
        Ok(()) => {}
        Err(cli_error) => cli_error.exit(),
    }
}

fn askdec() -> Result<(), CliError> {
    // Parse options and start logging
    let args = Args::try_parse()?;
    log_setup(&args);

    // file setup: locks stdin in case we need it
    let stdin = io::stdin();
    let stdin_handle = stdin.lock();
    let recording = load(&args, stdin_handle)?;

    app::run(&args, &recording)?;
    Ok(())
}

fn log_setup(args: &Args) {
    if args.quiet {
        // no logging
        return;
    } else if std::env::var_os("RUST_LOG").is_none() {
        // parameter controls
        let log_filter = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            3 | _ => LevelFilter::Trace,
        };

        pretty_env_logger::formatted_builder()
            .filter_module("askrx", log_filter)
            .filter_module("askdec", log_filter)
            .init();
    } else {
        // environment controls
        pretty_env_logger::init();
    }
}

fn load<'stdin>(
    args: &Args,
    stdin: std::io::StdinLock<'stdin>,
) -> Result<Recording, anyhow::Error> {
    let container = Container::select(args.format, &args.file, args.input_is_stdin())?;

    let input: Box<dyn io::BufRead + 'stdin> = if args.input_is_stdin() {
        info!("decoder reading standard input as {:?}", container);
        if container == Container::Raw && is_terminal(&std::io::stdin()) {
            return Err(anyhow!(
                "cowardly refusing to read audio samples from a terminal.

Pipe a source of raw uncompressed audio from sox, parec,
or similar into this program."
            ));
        }
        Box::new(io::BufReader::new(stdin))
    } else {
        info!("decoder reading file: \"{}\"", &args.file);
        Box::new(io::BufReader::new(
            std::fs::File::open(&args.file)
                .with_context(|| format!("Unable to open file \"{}\"", args.file))?,
        ))
    };

    match container {
        Container::Csv => source::read_csv(input, args.rate),
        Container::Wav => source::read_wav(input, args.channel),
        Container::Raw => source::read_raw(input, args.rate),
    }
}

#[cfg(not(target_os = "windows"))]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::fd::AsRawFd,
{
    terminal_size::terminal_size_using_fd(stream.as_raw_fd()).is_some()
}

#[cfg(target_os = "windows")]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::windows::io::AsRawHandle,
{
    terminal_size::terminal_size_using_handle(stream.as_raw_handle()).is_some()
}

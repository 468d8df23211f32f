//! spectext CLI - text to spectrogram audio
//!
//! Renders text into a WAV file whose spectrogram shows the text.
//!
//! ## Usage
//!
//! ```bash
//! # Write "hello" into converted.wav
//! spectext hello
//!
//! # Custom output, slower scroll, plus a debug image of the composite
//! spectext "Hello World" -o hello.wav --pixels-per-second 15 --debug-image hello.png
//!
//! # Use a directory of per-character PNG glyphs
//! spectext hello --glyph-dir ./characters
//! ```

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use spectext_cli::cli_args::Cli;
use spectext_cli::commands;
use spectext_cli::logging::setup_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match commands::convert::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::from(1)
        }
    }
}

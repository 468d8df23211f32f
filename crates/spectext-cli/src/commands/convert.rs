//! Convert command implementation
//!
//! Renders the input text through the core pipeline and writes the WAV file.

use std::io::Write;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, Result};
use colored::Colorize;
use spectext_core::{
    BuiltinAtlas, DirectoryAtlas, EncoderConfig, GlyphAtlas, Pipeline, Progress, RenderOptions,
};

use crate::cli_args::Cli;

/// Builds the encoder configuration: defaults, then the config file, then flags.
pub fn build_config(cli: &Cli) -> Result<EncoderConfig> {
    let mut config = match &cli.config {
        Some(path) => EncoderConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EncoderConfig::default(),
    };

    if let Some(min_freq) = cli.min_freq {
        config.min_freq = min_freq;
    }
    if let Some(max_freq) = cli.max_freq {
        config.max_freq = max_freq;
    }
    if let Some(sample_rate) = cli.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(pixels_per_second) = cli.pixels_per_second {
        config.pixels_per_second = pixels_per_second;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }

    Ok(config)
}

/// Picks the glyph source requested on the command line.
pub fn build_atlas(cli: &Cli) -> Result<Box<dyn GlyphAtlas>> {
    Ok(match &cli.glyph_dir {
        Some(dir) => Box::new(DirectoryAtlas::new(dir)),
        None => Box::new(BuiltinAtlas::new(cli.scale)?),
    })
}

/// Run the convert command
///
/// # Returns
/// Exit code: 0 on success. Errors are returned to `main` for reporting.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let config = build_config(cli)?;
    tracing::info!(
        input = %cli.input,
        output = %cli.output.display(),
        glyph_dir = ?cli.glyph_dir,
        "starting conversion"
    );
    let options = RenderOptions {
        invert: cli.invert,
        rotate: cli.rotate,
        debug_image: cli.debug_image.clone(),
    };

    let mut pipeline = Pipeline::new(build_atlas(cli)?, config, options)
        .context("invalid encoder configuration")?;

    if !cli.quiet {
        println!("{} {}.", "Input".cyan().bold(), cli.input);
    }

    let last_percent = AtomicU32::new(u32::MAX);
    let report = pipeline
        .run_with_progress(&cli.input, &cli.output, |progress: Progress| {
            if cli.quiet {
                return;
            }
            let percent = progress.percent();
            if last_percent.swap(percent, Ordering::Relaxed) != percent {
                let mut stdout = std::io::stdout().lock();
                let _ = write!(stdout, "Conversion progress: {}%   \r", percent);
                let _ = stdout.flush();
            }
        })
        .with_context(|| format!("failed to convert {:?}", cli.input))?;

    if !cli.quiet {
        println!("Conversion progress: 100%   ");
        println!(
            "{} Completed in {:.2} seconds.",
            "Success.".green().bold(),
            report.elapsed.as_secs_f64()
        );
        println!(
            "  {} {} ({}x{} px, {:.2}s of audio)",
            "Output:".dimmed(),
            report.output.display(),
            report.width,
            report.height,
            report.duration_seconds
        );
        if let Some(path) = &report.debug_image {
            println!("  {} {}", "Debug image:".dimmed(), path.display());
        }
        println!("  {} {}", "PCM hash:".dimmed(), report.pcm_hash);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["spectext"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{"pixels_per_second": 45, "min_freq": 500.0, "threads": 2}"#,
        )
        .unwrap();

        let cli = parse(&[
            "x",
            "--config",
            config_path.to_str().unwrap(),
            "--min-freq",
            "300",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.pixels_per_second, 45);
        assert_eq!(config.min_freq, 300.0);
        assert_eq!(config.threads, 2);
        assert_eq!(config.max_freq, 20000.0);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = parse(&["x", "--config", "/nonexistent/spectext.json"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_run_quiet() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("x.wav");
        let cli = parse(&[
            "xy",
            "-o",
            output.to_str().unwrap(),
            "--sample-rate",
            "8000",
            "--pixels-per-second",
            "100",
            "--max-freq",
            "4000",
            "--quiet",
        ]);

        run(&cli).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_run_rejects_bad_timing() {
        let tmp = tempfile::tempdir().unwrap();
        let output: PathBuf = tmp.path().join("x.wav");
        let cli = parse(&[
            "x",
            "-o",
            output.to_str().unwrap(),
            "--pixels-per-second",
            "31",
            "--quiet",
        ]);

        let err = run(&cli).unwrap_err();
        assert!(format!("{:#}", err).contains("not evenly divisible"));
        assert!(!output.exists());
    }
}

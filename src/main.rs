use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;

use wavout::audio::{InputFormat, open_decoder};
use wavout::config::{ConvertConfig, SampleRate};
use wavout::output::{ConversionReport, Formatter, ReportFormat, create_formatter};
use wavout::wav::{WavHeader, clipped_samples, save_wav};

#[derive(Parser, Debug)]
#[command(name = "wavout")]
#[command(about = "Convert decoded audio to 16-bit PCM WAV files", long_about = None)]
struct Args {
    /// Input files to convert
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Appended to the input file stem before ".wav"
    #[arg(long)]
    suffix: Option<String>,

    /// Replace existing output files
    #[arg(long)]
    force: bool,

    /// Input interpretation: auto, wav, raw
    #[arg(short, long, value_enum, default_value = "auto")]
    input_format: InputFormat,

    /// Sample rate of raw input (e.g., "48000", "44.1k")
    #[arg(long)]
    sample_rate: Option<SampleRate>,

    /// Channel count of raw input
    #[arg(long)]
    channels: Option<u16>,

    /// Report format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Re-read each written header and check it against the input
    #[arg(long)]
    verify: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_config(args: &Args) -> anyhow::Result<ConvertConfig> {
    let mut config = match &args.config {
        Some(path) => ConvertConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConvertConfig::default(),
    };

    if let Some(rate) = args.sample_rate {
        config.raw.sample_rate = rate;
    }
    if let Some(channels) = args.channels {
        config.raw.channels = channels;
    }
    if let Some(ref dir) = args.output_dir {
        config.output.dir = Some(dir.clone());
    }
    if let Some(ref suffix) = args.suffix {
        config.output.suffix = suffix.clone();
    }
    if args.force {
        config.output.overwrite = true;
    }

    config.validate()?;
    Ok(config)
}

fn convert_file(
    path: &Path,
    config: &ConvertConfig,
    input_format: InputFormat,
    verify: bool,
) -> anyhow::Result<ConversionReport> {
    let output = config.output.output_path(path)?;

    let mut decoder = open_decoder(path, input_format, &config.raw)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let source_format = decoder.describe();
    let audio = decoder
        .decode()
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    log::info!(
        "{}: {} ch, {} Hz, {} frames ({})",
        path.display(),
        audio.channel_count(),
        audio.sample_rate(),
        audio.frame_count(),
        source_format
    );

    let clipped = clipped_samples(&audio);
    if clipped > 0 {
        log::warn!(
            "{}: {} samples outside [-1.0, 1.0] will be clamped (peak {:.3})",
            path.display(),
            clipped,
            audio.peak()
        );
    }

    if let Some(dir) = output.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let bytes = save_wav(&output, &audio).context("Failed to write WAV file")?;

    if verify {
        verify_output(
            &output,
            audio.sample_rate(),
            audio.channel_count(),
            audio.frame_count(),
        )?;
    }

    Ok(ConversionReport::new(
        path.to_path_buf(),
        output,
        source_format,
        &audio,
        bytes,
        clipped,
    ))
}

fn verify_output(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    frames: usize,
) -> anyhow::Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to re-read {}", path.display()))?;
    let header = WavHeader::parse(&bytes)?;

    if header.sample_rate != sample_rate
        || header.channels != channels
        || header.frame_count() != frames
        || header.file_len() != bytes.len()
    {
        bail!(
            "{}: header mismatch (got {} ch, {} Hz, {} frames, {} bytes on disk)",
            path.display(),
            header.channels,
            header.sample_rate,
            header.frame_count(),
            bytes.len()
        );
    }
    log::debug!("{}: header verified", path.display());
    Ok(())
}

/// Convert every input independently, writing one report line per success
///
/// Returns the number of files that failed.
fn convert_all<W: Write>(
    args: &Args,
    config: &ConvertConfig,
    formatter: &dyn Formatter,
    out: &mut W,
) -> anyhow::Result<usize> {
    if let Some(header) = formatter.header() {
        writeln!(out, "{}", header)?;
    }

    let mut failures = 0;
    for path in &args.files {
        match convert_file(path, config, args.input_format, args.verify) {
            Ok(report) => writeln!(out, "{}", formatter.format(&report))?,
            Err(e) => {
                failures += 1;
                eprintln!("Error: {}: {:#}", path.display(), e);
            }
        }
    }
    Ok(failures)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    let formatter: Box<dyn Formatter> = create_formatter(args.format, args.verbose > 0);

    let failures = convert_all(&args, &config, formatter.as_ref(), &mut io::stdout().lock())?;
    if failures > 0 {
        bail!("{} of {} files failed", failures, args.files.len());
    }
    Ok(())
}

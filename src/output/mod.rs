mod csv;
mod json;
mod text;

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::audio::DecodedAudio;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Outcome of converting one input file
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_format: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
    pub duration_secs: f64,
    pub bytes: usize,
    pub clipped_samples: usize,
}

impl ConversionReport {
    pub fn new(
        input: PathBuf,
        output: PathBuf,
        source_format: String,
        audio: &DecodedAudio,
        bytes: usize,
        clipped_samples: usize,
    ) -> Self {
        Self {
            input,
            output,
            source_format,
            sample_rate: audio.sample_rate(),
            channels: audio.channel_count(),
            frames: audio.frame_count(),
            duration_secs: audio.duration_secs(),
            bytes,
            clipped_samples,
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, report: &ConversionReport) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: ReportFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        ReportFormat::Text => Box::new(TextFormatter::new(verbose)),
        ReportFormat::Json => Box::new(JsonFormatter),
        ReportFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
pub(crate) fn sample_report() -> ConversionReport {
    ConversionReport {
        input: PathBuf::from("in/clip.raw"),
        output: PathBuf::from("out/clip.wav"),
        source_format: "raw/f32le 2 ch @ 48000hz".to_string(),
        sample_rate: 48000,
        channels: 2,
        frames: 24000,
        duration_secs: 0.5,
        bytes: 96044,
        clipped_samples: 3,
    }
}

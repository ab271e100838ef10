//! Configuration for `wavout` conversions.
//!
//! Settings come from an optional TOML file; command-line flags override
//! whatever the file sets. Every section is optional:
//!
//! ```toml
//! [raw]
//! sample_rate = "48k"
//! channels = 2
//!
//! [output]
//! dir = "converted"
//! suffix = "_pcm16"
//! overwrite = false
//! ```

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Result, WavError};

/// Sample rate in Hz
///
/// # Parsing formats
/// - `44100` or `44100hz` - whole Hz
/// - `44.1k` or `48khz` - kilohertz, must resolve to a whole number of Hz
///
/// # Example
/// ```
/// use wavout::config::SampleRate;
///
/// let rate: SampleRate = "44.1k".parse().unwrap();
/// assert_eq!(rate.as_hz(), 44100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRate(u32);

impl SampleRate {
    pub fn from_hz(hz: u32) -> Result<Self> {
        if hz == 0 {
            return Err(WavError::Config("sample rate must be positive".to_string()));
        }
        Ok(Self(hz))
    }

    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self(44100)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hz", self.0)
    }
}

impl FromStr for SampleRate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let num = lower.strip_suffix("hz").unwrap_or(&lower);

        let hz = if let Some(khz) = num.strip_suffix('k') {
            let khz: f64 = khz
                .trim()
                .parse()
                .map_err(|_| format!("invalid sample rate: {}", s))?;
            let hz = khz * 1000.0;
            let whole = hz.round();
            if (hz - whole).abs() > 1e-6 || whole < 0.0 || whole > u32::MAX as f64 {
                return Err(format!("sample rate must be a whole number of Hz: {}", s));
            }
            whole as u32
        } else {
            num.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid sample rate: {}", s))?
        };

        if hz == 0 {
            return Err("sample rate must be positive".to_string());
        }
        Ok(Self(hz))
    }
}

impl<'de> Deserialize<'de> for SampleRate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Hz(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Hz(hz) => SampleRate::from_hz(hz).map_err(serde::de::Error::custom),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Layout of headerless interleaved `f32` input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawInputConfig {
    /// Sample rate the raw samples were captured at
    pub sample_rate: SampleRate,
    /// Number of interleaved channels
    pub channels: u16,
}

impl Default for RawInputConfig {
    fn default() -> Self {
        Self {
            sample_rate: SampleRate::default(),
            channels: 2,
        }
    }
}

/// Where converted files are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory; `None` writes next to each input
    pub dir: Option<PathBuf>,
    /// Appended to the input file stem before `.wav`
    pub suffix: String,
    /// Replace existing output files
    pub overwrite: bool,
}

impl OutputConfig {
    /// Derive the output path for `input`: `<dir>/<stem><suffix>.wav`
    ///
    /// Fails if the derived path is the input itself or exists while
    /// `overwrite` is off.
    pub fn output_path(&self, input: &Path) -> Result<PathBuf> {
        let stem = input.file_stem().ok_or_else(|| {
            WavError::Config(format!("input has no file name: {}", input.display()))
        })?;

        let mut name = OsString::from(stem);
        name.push(&self.suffix);
        name.push(".wav");

        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let output = dir.join(name);

        if output == input || same_location(input, &output) {
            return Err(WavError::Config(format!(
                "output would overwrite its own input: {} (set a suffix or output dir)",
                input.display()
            )));
        }
        if !self.overwrite && output.exists() {
            return Err(WavError::Config(format!(
                "output already exists: {} (use --force to replace)",
                output.display()
            )));
        }
        Ok(output)
    }
}

/// Resolve `path` to an absolute location, following `..` and symlinks
///
/// A path that does not exist yet resolves through its parent directory.
fn resolve_location(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

fn same_location(a: &Path, b: &Path) -> bool {
    match (resolve_location(a), resolve_location(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Complete conversion configuration
///
/// # Example
/// ```
/// use wavout::config::ConvertConfig;
///
/// let config: ConvertConfig = toml::from_str("[raw]\nchannels = 1\n").unwrap();
/// assert_eq!(config.raw.channels, 1);
/// assert_eq!(config.raw.sample_rate.as_hz(), 44100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub raw: RawInputConfig,
    pub output: OutputConfig,
}

impl ConvertConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WavError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.raw.channels == 0 {
            return Err(WavError::Config(
                "raw.channels must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

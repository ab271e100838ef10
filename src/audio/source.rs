use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::WavReader;

use super::DecodedAudio;
use crate::config::RawInputConfig;
use crate::error::{Result, WavError};

/// How an input file should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputFormat {
    /// Sniff the file: `RIFF` magic means WAV, anything else is raw
    #[default]
    Auto,
    /// WAV container (integer or float samples)
    Wav,
    /// Headerless interleaved little-endian f32
    Raw,
}

/// Produces a fully decoded buffer from some encoded source
pub trait AudioDecoder {
    fn decode(&mut self) -> Result<DecodedAudio>;

    /// Human-readable description of the source format, for logs and reports
    fn describe(&self) -> String;
}

pub struct WavFileDecoder<R: Read> {
    reader: Option<WavReader<R>>,
}

impl WavFileDecoder<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = WavReader::open(path.as_ref()).map_err(|e| match e {
            hound::Error::IoError(io) => WavError::Io(io),
            other => WavError::UnsupportedFormat(format!(
                "{}: {}",
                path.as_ref().display(),
                other
            )),
        })?;
        Ok(Self {
            reader: Some(reader),
        })
    }
}

impl<R: Read> WavFileDecoder<R> {
    pub fn new(reader: R) -> Result<Self> {
        let reader =
            WavReader::new(reader).map_err(|e| WavError::UnsupportedFormat(e.to_string()))?;
        Ok(Self {
            reader: Some(reader),
        })
    }

    fn read_samples(reader: WavReader<R>, spec: &hound::WavSpec) -> Result<Vec<f32>> {
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max_val = (1_i64 << (spec.bits_per_sample as u32 - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(samples)
    }
}

impl<R: Read> AudioDecoder for WavFileDecoder<R> {
    fn decode(&mut self) -> Result<DecodedAudio> {
        let reader = self.reader.take().ok_or_else(|| {
            WavError::InvalidAudioInput("WAV source already decoded".to_string())
        })?;
        let spec = reader.spec();
        log::debug!(
            "WAV input: {} ch, {} Hz, {}-bit {:?}",
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample,
            spec.sample_format
        );

        let samples = Self::read_samples(reader, &spec)?;
        DecodedAudio::from_interleaved(spec.sample_rate, spec.channels, &samples)
    }

    fn describe(&self) -> String {
        match &self.reader {
            Some(reader) => {
                let spec = reader.spec();
                let kind = match spec.sample_format {
                    hound::SampleFormat::Float => "float",
                    hound::SampleFormat::Int => "int",
                };
                format!("wav/{}{}", kind, spec.bits_per_sample)
            }
            None => "wav".to_string(),
        }
    }
}

/// Headerless interleaved little-endian `f32` samples
pub struct RawF32Decoder<R: Read> {
    reader: R,
    config: RawInputConfig,
}

impl RawF32Decoder<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, config: RawInputConfig) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file), config))
    }
}

impl<R: Read> RawF32Decoder<R> {
    pub fn new(reader: R, config: RawInputConfig) -> Self {
        Self { reader, config }
    }
}

impl<R: Read> AudioDecoder for RawF32Decoder<R> {
    fn decode(&mut self) -> Result<DecodedAudio> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;

        if bytes.len() % 4 != 0 {
            return Err(WavError::InvalidAudioInput(format!(
                "raw f32 input of {} bytes ends with a partial sample",
                bytes.len()
            )));
        }

        let samples: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        DecodedAudio::from_interleaved(
            self.config.sample_rate.as_hz(),
            self.config.channels,
            &samples,
        )
    }

    fn describe(&self) -> String {
        format!(
            "raw/f32le {} ch @ {}",
            self.config.channels, self.config.sample_rate
        )
    }
}

/// Check whether the file starts with the RIFF magic
pub fn looks_like_wav<P: AsRef<Path>>(path: P) -> Result<bool> {
    let mut magic = [0u8; 4];
    let mut file = File::open(path.as_ref())?;
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..])? {
            0 => return Ok(false),
            n => filled += n,
        }
    }
    Ok(&magic == b"RIFF")
}

/// Open the decoder matching `format` for `path`
pub fn open_decoder(
    path: &Path,
    format: InputFormat,
    raw: &RawInputConfig,
) -> Result<Box<dyn AudioDecoder>> {
    let format = match format {
        InputFormat::Auto if looks_like_wav(path)? => InputFormat::Wav,
        InputFormat::Auto => InputFormat::Raw,
        explicit => explicit,
    };
    log::debug!("Decoding {} as {:?}", path.display(), format);

    let decoder: Box<dyn AudioDecoder> = match format {
        InputFormat::Wav => Box::new(WavFileDecoder::open(path)?),
        _ => Box::new(RawF32Decoder::open(path, *raw)?),
    };
    Ok(decoder)
}

/// Decode a whole file into memory
pub fn load_audio(path: &Path, format: InputFormat, raw: &RawInputConfig) -> Result<DecodedAudio> {
    let mut decoder = open_decoder(path, format, raw)?;
    decoder.decode().map_err(|e| with_path(e, path))
}

fn with_path(err: WavError, path: &Path) -> WavError {
    match err {
        WavError::Decode(e) => WavError::UnsupportedFormat(format!("{}: {}", path.display(), e)),
        WavError::InvalidAudioInput(msg) => {
            WavError::InvalidAudioInput(format!("{}: {}", path.display(), msg))
        }
        other => other,
    }
}

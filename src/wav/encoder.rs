use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::header::WavHeader;
use super::writer::LeWriter;
use crate::audio::DecodedAudio;
use crate::error::{Result, WavError};

/// Convert one floating-point sample to signed 16-bit PCM
///
/// Clamps to [-1.0, 1.0], scales negatives by 32768 and non-negatives by
/// 32767, then truncates toward zero. The product is formed in `f64`.
/// NaN encodes as 0.
///
/// # Example
/// ```
/// use wavout::wav::sample_to_pcm16;
///
/// assert_eq!(sample_to_pcm16(1.0), 32767);
/// assert_eq!(sample_to_pcm16(-1.0), -32768);
/// assert_eq!(sample_to_pcm16(0.5), 16383);
/// ```
#[inline]
pub fn sample_to_pcm16(sample: f32) -> i16 {
    let s = f64::from(sample).clamp(-1.0, 1.0);
    let scaled = if s < 0.0 { s * 32768.0 } else { s * 32767.0 };
    // `as` truncates toward zero and maps NaN to 0
    scaled as i16
}

/// Exact size in bytes of the WAV file `encode` produces for `audio`
pub fn encoded_len(audio: &DecodedAudio) -> Result<usize> {
    let header = WavHeader::pcm16(audio.sample_rate(), audio.channel_count(), audio.frame_count())?;
    Ok(header.file_len())
}

/// Encode decoded audio as a complete 16-bit PCM WAV file
///
/// The result is the 44-byte canonical header followed by the interleaved
/// little-endian payload, `44 + frames * channels * 2` bytes in total.
/// Pure and deterministic: the same input always yields the same bytes.
///
/// # Errors
/// * `DataTooLarge` - the payload exceeds what 32-bit RIFF sizes can describe
/// * `Allocation` - the output buffer could not be allocated
///
/// # Example
/// ```
/// use wavout::{DecodedAudio, encode};
///
/// let audio = DecodedAudio::new(44100, vec![vec![0.0, 0.5, -0.5, 1.0]]).unwrap();
/// let wav = encode(&audio).unwrap();
/// assert_eq!(wav.len(), 52);
/// assert_eq!(&wav[0..4], b"RIFF");
/// ```
pub fn encode(audio: &DecodedAudio) -> Result<Vec<u8>> {
    let header = WavHeader::pcm16(audio.sample_rate(), audio.channel_count(), audio.frame_count())?;

    let mut w = LeWriter::with_capacity(header.file_len())?;
    header.write_to(&mut w);

    let channels = audio.channels();
    for frame in 0..audio.frame_count() {
        for channel in channels {
            w.write_i16_le(sample_to_pcm16(channel[frame]));
        }
    }

    debug_assert_eq!(w.len(), header.file_len());
    Ok(w.into_inner())
}

/// Count samples that `encode` will clamp
pub fn clipped_samples(audio: &DecodedAudio) -> usize {
    audio
        .channels()
        .iter()
        .flatten()
        .filter(|s| s.abs() > 1.0)
        .count()
}

/// Encode `audio` and write the WAV bytes to `writer`
pub fn write_wav<W: Write>(audio: &DecodedAudio, mut writer: W) -> Result<usize> {
    let bytes = encode(audio)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(bytes.len())
}

/// Encode `audio` and save it as a WAV file at `path`
pub fn save_wav<P: AsRef<Path>>(path: P, audio: &DecodedAudio) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        WavError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let written = write_wav(audio, BufWriter::new(file))?;
    log::info!("Wrote {} ({} bytes)", path.display(), written);
    Ok(written)
}

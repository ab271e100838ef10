use super::writer::LeWriter;
use crate::error::{Result, WavError};

/// Size of the canonical PCM WAV header in bytes
pub const HEADER_LEN: usize = 44;

/// Bytes in the RIFF chunk that precede ChunkSize's coverage (`"RIFF"` + ChunkSize)
const RIFF_PREAMBLE_LEN: u32 = 8;

pub const PCM_FORMAT: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;
pub const BYTES_PER_SAMPLE: u16 = BITS_PER_SAMPLE / 8;

const FMT_CHUNK_LEN: u32 = 16;

/// Canonical 44-byte RIFF/WAVE header for 16-bit PCM
///
/// ```text
/// 0  "RIFF"  4  ChunkSize  8  "WAVE"
/// 12 "fmt "  16 16  20 format=1  22 channels  24 sample_rate
/// 28 byte_rate  32 block_align  34 bits=16
/// 36 "data"  40 data_len  44 payload
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub data_len: u32,
}

impl WavHeader {
    /// Build the header for `frame_count` frames of 16-bit PCM
    ///
    /// # Errors
    /// * `InvalidAudioInput` - zero channels, or a BlockAlign / ByteRate that overflows
    /// * `DataTooLarge` - the payload does not fit the 32-bit RIFF size fields
    pub fn pcm16(sample_rate: u32, channels: u16, frame_count: usize) -> Result<Self> {
        if channels == 0 {
            return Err(WavError::InvalidAudioInput(
                "at least one channel is required".to_string(),
            ));
        }

        let block_align = channels.checked_mul(BYTES_PER_SAMPLE).ok_or_else(|| {
            WavError::InvalidAudioInput(format!("block align overflows for {} channels", channels))
        })?;
        let byte_rate = sample_rate
            .checked_mul(block_align as u32)
            .ok_or_else(|| {
                WavError::InvalidAudioInput(format!(
                    "byte rate overflows for {} Hz x {} channels",
                    sample_rate, channels
                ))
            })?;

        let data_bytes = (frame_count as u64).saturating_mul(block_align as u64);
        let max_data = (u32::MAX - (HEADER_LEN as u32 - RIFF_PREAMBLE_LEN)) as u64;
        if data_bytes > max_data {
            return Err(WavError::DataTooLarge { bytes: data_bytes });
        }

        Ok(Self {
            channels,
            sample_rate,
            byte_rate,
            block_align,
            data_len: data_bytes as u32,
        })
    }

    /// RIFF ChunkSize: total file length minus the 8-byte preamble
    pub fn chunk_size(&self) -> u32 {
        HEADER_LEN as u32 - RIFF_PREAMBLE_LEN + self.data_len
    }

    /// Total file length in bytes, header included
    pub fn file_len(&self) -> usize {
        HEADER_LEN + self.data_len as usize
    }

    pub fn frame_count(&self) -> usize {
        (self.data_len / self.block_align as u32) as usize
    }

    pub fn write_to(&self, w: &mut LeWriter) {
        w.write_tag(b"RIFF");
        w.write_u32_le(self.chunk_size());
        w.write_tag(b"WAVE");

        w.write_tag(b"fmt ");
        w.write_u32_le(FMT_CHUNK_LEN);
        w.write_u16_le(PCM_FORMAT);
        w.write_u16_le(self.channels);
        w.write_u32_le(self.sample_rate);
        w.write_u32_le(self.byte_rate);
        w.write_u16_le(self.block_align);
        w.write_u16_le(BITS_PER_SAMPLE);

        w.write_tag(b"data");
        w.write_u32_le(self.data_len);
    }

    /// Read back a canonical 16-bit PCM header
    ///
    /// Only the exact layout written by [`WavHeader::write_to`] is accepted;
    /// files with extra chunks or other sample formats are `UnsupportedFormat`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WavError::UnsupportedFormat(format!(
                "header needs {} bytes, got {}",
                HEADER_LEN,
                bytes.len()
            )));
        }

        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        let expect_tag = |at: usize, tag: &[u8; 4]| {
            if &bytes[at..at + 4] == tag {
                Ok(())
            } else {
                Err(WavError::UnsupportedFormat(format!(
                    "expected {:?} at offset {}",
                    String::from_utf8_lossy(tag),
                    at
                )))
            }
        };

        expect_tag(0, b"RIFF")?;
        expect_tag(8, b"WAVE")?;
        expect_tag(12, b"fmt ")?;
        expect_tag(36, b"data")?;

        if u32_at(16) != FMT_CHUNK_LEN || u16_at(20) != PCM_FORMAT {
            return Err(WavError::UnsupportedFormat(
                "not a plain PCM fmt chunk".to_string(),
            ));
        }
        if u16_at(34) != BITS_PER_SAMPLE {
            return Err(WavError::UnsupportedFormat(format!(
                "{}-bit samples, expected {}",
                u16_at(34),
                BITS_PER_SAMPLE
            )));
        }

        let header = Self::pcm16(u32_at(24), u16_at(22), 0)
            .map_err(|e| WavError::UnsupportedFormat(e.to_string()))?;
        let header = Self {
            data_len: u32_at(40),
            ..header
        };

        if header.byte_rate != u32_at(28) || header.block_align != u16_at(32) {
            return Err(WavError::UnsupportedFormat(
                "byte rate or block align inconsistent with channel layout".to_string(),
            ));
        }
        if u32_at(4) != header.chunk_size() {
            return Err(WavError::UnsupportedFormat(format!(
                "RIFF size {} does not match data size {}",
                u32_at(4),
                header.data_len
            )));
        }
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(header: &WavHeader) -> Vec<u8> {
        let mut w = LeWriter::new();
        header.write_to(&mut w);
        w.into_inner()
    }

    #[test]
    fn test_mono_fields() {
        let header = WavHeader::pcm16(44100, 1, 4).unwrap();
        assert_eq!(header.byte_rate, 88200);
        assert_eq!(header.block_align, 2);
        assert_eq!(header.data_len, 8);
        assert_eq!(header.chunk_size(), 44);
        assert_eq!(header.file_len(), 52);
    }

    #[test]
    fn test_layout_matches_canonical_table() {
        let bytes = header_bytes(&WavHeader::pcm16(48000, 2, 10).unwrap());
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[4..8], &(36u32 + 40).to_le_bytes());
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(&bytes[16..20], &16u32.to_le_bytes());
        assert_eq!(&bytes[20..22], &1u16.to_le_bytes());
        assert_eq!(&bytes[22..24], &2u16.to_le_bytes());
        assert_eq!(&bytes[24..28], &48000u32.to_le_bytes());
        assert_eq!(&bytes[28..32], &192000u32.to_le_bytes());
        assert_eq!(&bytes[32..34], &4u16.to_le_bytes());
        assert_eq!(&bytes[34..36], &16u16.to_le_bytes());
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(&bytes[40..44], &40u32.to_le_bytes());
    }

    #[test]
    fn test_rejects_zero_channels() {
        assert!(WavHeader::pcm16(44100, 0, 1).is_err());
    }

    #[test]
    fn test_rejects_byte_rate_overflow() {
        let err = WavHeader::pcm16(u32::MAX, 2, 0).unwrap_err();
        assert!(matches!(err, WavError::InvalidAudioInput(_)));
    }

    #[test]
    fn test_rejects_oversized_payload() {
        // 2^31 stereo frames = 8 GiB of PCM
        let err = WavHeader::pcm16(44100, 2, 1 << 31).unwrap_err();
        assert!(matches!(err, WavError::DataTooLarge { .. }));
    }

    #[test]
    fn test_largest_payload_is_accepted() {
        let frames = ((u32::MAX - 36) / 2) as usize;
        let header = WavHeader::pcm16(8000, 1, frames).unwrap();
        assert_eq!(header.chunk_size(), u32::MAX - 1);
    }

    #[test]
    fn test_parse_reads_back_written_header() {
        let header = WavHeader::pcm16(22050, 3, 7).unwrap();
        let parsed = WavHeader::parse(&header_bytes(&header)).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.frame_count(), 7);
    }

    #[test]
    fn test_parse_rejects_short_input() {
        assert!(WavHeader::parse(b"RIFF").is_err());
    }

    #[test]
    fn test_parse_rejects_float_format() {
        let mut bytes = header_bytes(&WavHeader::pcm16(44100, 1, 0).unwrap());
        bytes[20] = 3;
        assert!(matches!(
            WavHeader::parse(&bytes),
            Err(WavError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_riff_size() {
        let mut bytes = header_bytes(&WavHeader::pcm16(44100, 1, 2).unwrap());
        bytes[4] = 0;
        assert!(WavHeader::parse(&bytes).is_err());
    }
}

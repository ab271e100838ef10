use crate::error::{Result, WavError};

/// Append-only little-endian byte writer
///
/// Owns the output buffer for a single encode; the write position is the
/// buffer length. RIFF tags go through [`LeWriter::write_tag`] so their bytes
/// land in file order, every numeric field through the `*_le` methods.
#[derive(Debug, Default)]
pub struct LeWriter {
    buf: Vec<u8>,
}

impl LeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with exactly `capacity` bytes reserved
    ///
    /// Allocation failure is reported as `WavError::Allocation` rather than aborting.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| WavError::Allocation { bytes: capacity })?;
        Ok(Self { buf })
    }

    pub fn write_tag(&mut self, tag: &[u8; 4]) {
        self.buf.extend_from_slice(tag);
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16_le(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

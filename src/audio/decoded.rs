use crate::error::{Result, WavError};

/// Largest channel count whose 16-bit BlockAlign (`channels * 2`) still fits in a `u16`.
pub const MAX_CHANNELS: usize = (u16::MAX / 2) as usize;

/// Decoded multi-channel floating-point audio
///
/// Planar storage: one `Vec<f32>` per channel, all of identical length.
/// Samples are nominally in [-1.0, 1.0] but may overshoot; the encoder clamps.
///
/// Construction validates the shape, so every `DecodedAudio` value has a
/// positive sample rate, at least one channel, and equal-length channels.
///
/// # Example
/// ```
/// use wavout::DecodedAudio;
///
/// let audio = DecodedAudio::new(44100, vec![vec![0.0, 0.5], vec![0.0, -0.5]]).unwrap();
/// assert_eq!(audio.channel_count(), 2);
/// assert_eq!(audio.frame_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Create from planar channel data
    ///
    /// # Errors
    /// * `InvalidAudioInput` - zero sample rate, no channels, or more than [`MAX_CHANNELS`]
    /// * `ChannelLengthMismatch` - channels differ in length
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(WavError::InvalidAudioInput(
                "sample rate must be positive".to_string(),
            ));
        }
        if channels.is_empty() {
            return Err(WavError::InvalidAudioInput(
                "at least one channel is required".to_string(),
            ));
        }
        if channels.len() > MAX_CHANNELS {
            return Err(WavError::InvalidAudioInput(format!(
                "{} channels exceeds the maximum of {}",
                channels.len(),
                MAX_CHANNELS
            )));
        }

        let expected = channels[0].len();
        if let Some((channel, samples)) = channels
            .iter()
            .enumerate()
            .find(|(_, samples)| samples.len() != expected)
        {
            return Err(WavError::ChannelLengthMismatch {
                channel,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Create from frame-major interleaved samples (`L R L R ...` for stereo)
    pub fn from_interleaved(sample_rate: u32, channel_count: u16, samples: &[f32]) -> Result<Self> {
        let count = channel_count as usize;
        if count == 0 {
            return Err(WavError::InvalidAudioInput(
                "at least one channel is required".to_string(),
            ));
        }
        if samples.len() % count != 0 {
            return Err(WavError::InvalidAudioInput(format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                count
            )));
        }

        let frames = samples.len() / count;
        let mut channels: Vec<Vec<f32>> = (0..count).map(|_| Vec::with_capacity(frames)).collect();
        for frame in samples.chunks_exact(count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(sample_rate, channels)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        // Bounded by MAX_CHANNELS in `new`
        self.channels.len() as u16
    }

    /// Number of samples in each channel
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Samples of one frame in channel order
    ///
    /// Yields nothing when `index` is past the last frame.
    pub fn frame(&self, index: usize) -> impl Iterator<Item = f32> + '_ {
        self.channels
            .iter()
            .filter_map(move |channel| channel.get(index).copied())
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value across all channels (NaN ignored)
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .map(|s| s.abs())
            .filter(|s| !s.is_nan())
            .fold(0.0, f32::max)
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

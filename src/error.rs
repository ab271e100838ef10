use thiserror::Error;

#[derive(Error, Debug)]
pub enum WavError {
    #[error("Invalid audio input: {0}")]
    InvalidAudioInput(String),

    #[error("Channel {channel} has {actual} frames, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("PCM payload of {bytes} bytes does not fit a RIFF container")]
    DataTooLarge { bytes: u64 },

    #[error("Failed to allocate {bytes} bytes for WAV output")]
    Allocation { bytes: usize },

    #[error("Format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WAV decode error: {0}")]
    Decode(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WavError>;

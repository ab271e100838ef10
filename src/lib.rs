pub mod audio;
pub mod config;
pub mod error;
pub mod output;
pub mod wav;

pub use audio::DecodedAudio;
pub use config::ConvertConfig;
pub use error::{Result, WavError};
pub use wav::{encode, save_wav};

pub mod decoded;
pub mod source;

pub use decoded::{DecodedAudio, MAX_CHANNELS};
pub use source::{
    AudioDecoder, InputFormat, RawF32Decoder, WavFileDecoder, load_audio, looks_like_wav,
    open_decoder,
};

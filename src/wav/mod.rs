pub mod encoder;
pub mod header;
pub mod writer;

pub use encoder::{
    clipped_samples, encode, encoded_len, sample_to_pcm16, save_wav, write_wav,
};
pub use header::{HEADER_LEN, WavHeader};
pub use writer::LeWriter;

mod generate;

pub use generate::{interleave, sine, stereo_sweep};

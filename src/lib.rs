pub mod dsp;
pub mod graph; // Block-rendering nodes and cross-thread control

/// Fixed processing rate of a deployed filter instance, in Hz.
pub const SAMPLE_RATE: f32 = 44_100.0;

/// Fixed number of samples per audio block.
pub const BLOCK_SIZE: usize = 128;

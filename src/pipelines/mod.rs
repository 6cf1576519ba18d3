/// Inference configuration
pub mod config;

/// Padding and shaping of indexed examples into batches
pub mod batcher;

/// The network capability required by the pipelines
pub mod network;

/// The inference engine shared by all variants
pub mod inference;

/// Sequence Labeling
pub mod sequence_labeling;

/// Classification
pub mod classification;

pub use batcher::{Batch, Batcher, Shaping};
pub use config::Config;
pub use inference::{Inference, State, Task, Variant};
pub use network::{Decode, GradientTracking, Mode, Network};

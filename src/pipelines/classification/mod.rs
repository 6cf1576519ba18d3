/// Classification variant
pub mod inference;

pub use inference::{Classification, MIN_SEQ_LENGTH};

/// An inference engine for classification networks
pub type Inference<B> = super::inference::Inference<B, Classification>;

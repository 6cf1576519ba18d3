/// Sequence labeling variant
pub mod inference;

pub use inference::SequenceLabeling;

/// An inference engine for sequence labeling networks
pub type Inference<B> = super::inference::Inference<B, SequenceLabeling>;

use std::path::Path;

use async_trait::async_trait;

/// Vocabulary lookup and token-to-index mapping
pub mod vocabulary;

/// Class id to label lookup
pub mod labels;

/// Index orderings over a dataset
pub mod sampler;

/// Grouping of index orderings into batches
pub mod batchifier;

pub use batchifier::Batchifier;
pub use labels::LabelMap;
pub use sampler::{BucketSampler, Bucketing, RandomSampler, Sampler, SequentialSampler};
pub use vocabulary::{Vocabulary, UNKNOWN_TOKEN};

/// A lookup table which can be loaded from disk
#[async_trait]
pub trait Loadable {
    /// Load the table from the given file
    async fn load(path: &Path) -> crate::error::Result<Self>
    where
        Self: std::marker::Sized;
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

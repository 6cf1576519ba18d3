//! # Burn Infer
//!
//! Batched inference for sequence labeling and classification networks over pre-tokenized text.
#![forbid(unsafe_code)]

/// Vocabulary, labels, sampling, and batching of indexes
pub mod data;

/// Pipelines
pub mod pipelines;

/// Errors
pub mod error;

/// Utilities
pub mod utils;

pub use error::{Error, Result};

/// File utilities
pub mod files;

/// Tensor Utilities
pub mod tensors;

/// Utilities for vocabulary and label tables
pub mod classes;

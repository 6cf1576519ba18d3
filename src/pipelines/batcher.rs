use burn::{
    data::dataloader,
    tensor::{backend::Backend, Int, Tensor},
};
use derive_new::new;

use crate::utils::tensors;

/// Options controlling how a batch of indexed examples is shaped into a rectangle
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Shaping {
    /// The fill value used for padding
    pub pad_token_id: usize,

    /// Truncate batches wider than this
    pub max_seq_length: Option<usize>,

    /// Extend batches narrower than this
    pub min_seq_length: Option<usize>,

    /// Emit the per-row sequence lengths alongside the tokens
    pub output_lengths: bool,
}

/// An inference batch of padded token ids
#[derive(Debug, Clone, new)]
pub struct Batch<B: Backend> {
    /// Token ids as 2D tensor: [batch_size, width]
    pub tokens: Tensor<B, 2, Int>,

    /// Valid token count for each row, when requested
    pub lengths: Option<Vec<usize>>,
}

/// Rows padded to a common width, before conversion to a tensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Padded {
    /// Rectangular token rows
    pub rows: Vec<Vec<usize>>,

    /// The common row width
    pub width: usize,

    /// Valid token count for each row, never wider than `width`
    pub lengths: Vec<usize>,
}

/// Right-pad every sequence with `fill` up to the longest sequence in the batch. Sequences are
/// never truncated here.
pub fn pad(batch: Vec<Vec<usize>>, fill: usize) -> Vec<Vec<usize>> {
    let max_length = batch.iter().map(Vec::len).max().unwrap_or(0);

    batch
        .into_iter()
        .map(|mut sample| {
            sample.resize(max_length, fill);
            sample
        })
        .collect()
}

/// Struct for padding and shaping batches of indexed examples
#[derive(Clone, new)]
pub struct Batcher<B: Backend> {
    /// Shaping options
    shaping: Shaping,

    /// Device on which to perform computation
    device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// The shaping options for this batcher
    pub fn shaping(&self) -> &Shaping {
        &self.shaping
    }

    /// The device batches are created on
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Pad the batch to its longest row, then apply the max and min width constraints.
    ///
    /// Lengths are taken from the unpadded rows and clamped to the final width, so a truncated
    /// row never reports more valid tokens than the batch holds.
    pub fn shape(&self, items: Vec<Vec<usize>>) -> Padded {
        let Shaping {
            pad_token_id,
            max_seq_length,
            min_seq_length,
            ..
        } = self.shaping;

        let original_lengths: Vec<usize> = items.iter().map(Vec::len).collect();

        let mut rows = pad(items, pad_token_id);
        let mut width = rows.first().map(Vec::len).unwrap_or(0);

        if let Some(max_seq_length) = max_seq_length {
            if width > max_seq_length {
                rows.iter_mut().for_each(|row| row.truncate(max_seq_length));
                width = max_seq_length;
            }
        }

        if let Some(min_seq_length) = min_seq_length {
            if width < min_seq_length {
                rows.iter_mut()
                    .for_each(|row| row.resize(min_seq_length, pad_token_id));
                width = min_seq_length;
            }
        }

        let lengths = original_lengths
            .into_iter()
            .map(|length| length.min(width))
            .collect();

        Padded {
            rows,
            width,
            lengths,
        }
    }
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<Vec<usize>, Batch<B>> for Batcher<B> {
    /// Collects a vector of indexed examples into an inference batch
    fn batch(&self, items: Vec<Vec<usize>>) -> Batch<B> {
        let Padded {
            rows,
            width,
            lengths,
        } = self.shape(items);

        let tokens = tensors::from_rows::<B>(&rows, width, &self.device);

        Batch {
            tokens,
            lengths: self.shaping.output_lengths.then_some(lengths),
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::{backend::NdArray, data::dataloader::batcher::Batcher as _};
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = NdArray;

    fn batcher(
        max_seq_length: Option<usize>,
        min_seq_length: Option<usize>,
        output_lengths: bool,
    ) -> Batcher<TestBackend> {
        Batcher::new(
            Shaping::new(0, max_seq_length, min_seq_length, output_lengths),
            Default::default(),
        )
    }

    #[test]
    fn test_pad_to_longest() {
        let padded = pad(vec![vec![1, 2, 3], vec![4], vec![5, 6]], 0);

        assert_eq!(padded, vec![vec![1, 2, 3], vec![4, 0, 0], vec![5, 6, 0]]);
    }

    #[test]
    fn test_pad_keeps_original_prefix() {
        let batch = vec![vec![3, 1, 4, 1, 5], vec![9, 2], vec![], vec![6, 5, 3]];

        let padded = pad(batch.clone(), 7);

        for (row, original) in padded.iter().zip(batch.iter()) {
            assert_eq!(row.len(), 5);
            assert_eq!(&row[..original.len()], original.as_slice());
            assert!(row[original.len()..].iter().all(|value| *value == 7));
        }
    }

    #[test]
    fn test_equal_lengths_add_no_padding() {
        let shaped = batcher(None, None, true).shape(vec![vec![1, 2], vec![3, 4]]);

        assert_eq!(shaped.rows, vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(shaped.width, 2);
        assert_eq!(shaped.lengths, vec![2, 2]);
    }

    #[test]
    fn test_truncate_after_padding_clamps_lengths() {
        let shaped = batcher(Some(2), None, true).shape(vec![vec![1, 2, 3, 4], vec![5]]);

        assert_eq!(shaped.rows, vec![vec![1, 2], vec![5, 0]]);
        assert_eq!(shaped.width, 2);
        assert_eq!(shaped.lengths, vec![2, 1]);
    }

    #[test]
    fn test_narrow_batch_is_not_truncated() {
        let shaped = batcher(Some(10), None, true).shape(vec![vec![1, 2, 3]]);

        assert_eq!(shaped.rows, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_extend_to_min_width() {
        let shaped = batcher(None, Some(5), true).shape(vec![vec![1]]);

        assert_eq!(shaped.rows, vec![vec![1, 0, 0, 0, 0]]);
        assert_eq!(shaped.width, 5);
        assert_eq!(shaped.lengths, vec![1]);
    }

    #[test]
    fn test_batch_tensor_and_lengths() {
        let batch = batcher(None, None, true).batch(vec![vec![1, 2], vec![0]]);

        assert_eq!(batch.tokens.dims(), [2, 2]);
        assert_eq!(
            batch.tokens.into_data().convert::<i64>().value,
            vec![1, 2, 0, 0]
        );
        assert_eq!(batch.lengths, Some(vec![2, 1]));
    }

    #[test]
    fn test_batch_without_lengths() {
        let batch = batcher(None, Some(5), false).batch(vec![vec![1]]);

        assert_eq!(batch.tokens.dims(), [1, 5]);
        assert_eq!(batch.lengths, None);
    }
}

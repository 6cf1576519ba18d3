use crate::error::{Error, Result};

/// Groups an ordered index stream into fixed-size chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batchifier {
    /// The size of every group except possibly the last
    batch_size: usize,

    /// Discard a final group smaller than the batch size
    drop_last: bool,
}

impl Batchifier {
    /// Creates a new batchifier. The batch size must be greater than zero.
    pub fn new(batch_size: usize, drop_last: bool) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::Configuration(
                "batch size must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            batch_size,
            drop_last,
        })
    }

    /// The configured batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Split the indexes into groups. Each call starts a fresh pass over the same grouping.
    pub fn batches<'a>(&self, indexes: &'a [usize]) -> impl Iterator<Item = &'a [usize]> + 'a {
        let Self {
            batch_size,
            drop_last,
        } = *self;

        indexes
            .chunks(batch_size)
            .filter(move |group| !drop_last || group.len() == batch_size)
    }

    /// The number of groups produced for `len` indexes
    pub fn num_batches(&self, len: usize) -> usize {
        if self.drop_last {
            len / self.batch_size
        } else {
            len.div_ceil(self.batch_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_keeps_trailing_partial_group() {
        let batchifier = Batchifier::new(3, false).unwrap();
        let indexes: Vec<usize> = (0..7).collect();

        let groups: Vec<&[usize]> = batchifier.batches(&indexes).collect();

        assert_eq!(groups, vec![&[0, 1, 2][..], &[3, 4, 5][..], &[6][..]]);
        assert_eq!(batchifier.num_batches(indexes.len()), 3);
    }

    #[test]
    fn test_drops_trailing_partial_group() {
        let batchifier = Batchifier::new(3, true).unwrap();
        let indexes: Vec<usize> = (0..7).collect();

        let groups: Vec<&[usize]> = batchifier.batches(&indexes).collect();

        assert_eq!(groups, vec![&[0, 1, 2][..], &[3, 4, 5][..]]);
        assert_eq!(batchifier.num_batches(indexes.len()), 2);
    }

    #[test]
    fn test_partitions_every_index_once_in_order() {
        for len in 0..20 {
            for batch_size in 1..6 {
                let batchifier = Batchifier::new(batch_size, false).unwrap();
                let indexes: Vec<usize> = (0..len).collect();

                let groups: Vec<&[usize]> = batchifier.batches(&indexes).collect();
                let flattened: Vec<usize> = groups.concat();

                assert_eq!(groups.len(), len.div_ceil(batch_size));
                assert_eq!(flattened, indexes);
            }
        }
    }

    #[test]
    fn test_is_restartable() {
        let batchifier = Batchifier::new(2, false).unwrap();
        let indexes = vec![4, 2, 0, 1, 3];

        let first: Vec<&[usize]> = batchifier.batches(&indexes).collect();
        let second: Vec<&[usize]> = batchifier.batches(&indexes).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_batch_size() {
        assert!(matches!(
            Batchifier::new(0, false),
            Err(Error::Configuration(_))
        ));
    }
}

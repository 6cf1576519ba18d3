use burn::data::dataset::Dataset;
use derive_new::new;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// A strategy for ordering the indexes of a dataset. Every index in `0..len` must be produced
/// exactly once.
pub trait Sampler<I> {
    /// Produce an ordering over the dataset's indexes
    fn sample<D: Dataset<I>>(&self, dataset: &D) -> Vec<usize>;
}

/// Yields indexes in dataset order, which keeps batch composition reproducible
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl<I> Sampler<I> for SequentialSampler {
    fn sample<D: Dataset<I>>(&self, dataset: &D) -> Vec<usize> {
        (0..dataset.len()).collect()
    }
}

/// Yields indexes in a uniformly shuffled order
#[derive(Debug, Clone, Copy, Default, new)]
pub struct RandomSampler {
    /// Seed for reproducible shuffles. Uses system entropy when empty.
    seed: Option<u64>,
}

impl RandomSampler {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl<I> Sampler<I> for RandomSampler {
    fn sample<D: Dataset<I>>(&self, dataset: &D) -> Vec<usize> {
        let mut indexes: Vec<usize> = (0..dataset.len()).collect();

        indexes.shuffle(&mut self.rng());

        indexes
    }
}

/// How `BucketSampler` splits examples into length buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bucketing {
    /// Contiguous buckets of equal size over the length-sorted indexes
    #[default]
    Sorted,

    /// One bucket per cluster of a 1-d k-means over the lengths
    KMeans {
        /// The maximum number of assignment and update rounds
        max_iter: usize,
    },
}

/// Groups examples of similar length so that batches carry less padding.
///
/// Indexes are split into `num_buckets` buckets by length (see [`Bucketing`]). Each bucket is
/// shuffled and cut into `batch_size` groups, and the groups are shuffled across buckets before
/// being flattened.
#[derive(Debug, Clone, Copy, new)]
pub struct BucketSampler {
    /// The number of length buckets
    num_buckets: usize,

    /// The size of the groups formed within each bucket
    batch_size: usize,

    /// Seed for reproducible shuffles. Uses system entropy when empty.
    seed: Option<u64>,

    #[new(value = "Bucketing::Sorted")]
    bucketing: Bucketing,
}

impl BucketSampler {
    /// Use a different bucketing strategy
    pub fn with_bucketing(mut self, bucketing: Bucketing) -> Self {
        self.bucketing = bucketing;
        self
    }

    fn buckets(&self, lengths: &[usize]) -> Vec<Vec<usize>> {
        let num_buckets = self.num_buckets.max(1);

        match self.bucketing {
            Bucketing::Sorted => {
                let bucket_size = lengths.len().div_ceil(num_buckets).max(1);

                simple_sort_bucketing(lengths)
                    .chunks(bucket_size)
                    .map(<[usize]>::to_vec)
                    .collect()
            }
            Bucketing::KMeans { max_iter } => k_means_bucketing(lengths, num_buckets, max_iter),
        }
    }
}

impl<T> Sampler<Vec<T>> for BucketSampler {
    fn sample<D: Dataset<Vec<T>>>(&self, dataset: &D) -> Vec<usize> {
        let mut rng = RandomSampler::new(self.seed).rng();

        let lengths: Vec<usize> = (0..dataset.len())
            .map(|i| dataset.get(i).map(|item| item.len()).unwrap_or(0))
            .collect();

        let batch_size = self.batch_size.max(1);

        let mut groups: Vec<Vec<usize>> = Vec::new();

        for mut bucket in self.buckets(&lengths) {
            bucket.shuffle(&mut rng);

            groups.extend(bucket.chunks(batch_size).map(<[usize]>::to_vec));
        }

        groups.shuffle(&mut rng);

        groups.into_iter().flatten().collect()
    }
}

/// Indexes ordered by ascending length. Equal lengths keep their original order.
pub fn simple_sort_bucketing(lengths: &[usize]) -> Vec<usize> {
    let mut indexes: Vec<usize> = (0..lengths.len()).collect();

    indexes.sort_by_key(|i| lengths[*i]);

    indexes
}

/// Cluster lengths into `k` groups with Lloyd's algorithm in one dimension.
///
/// Centroids start at evenly spaced quantiles of the sorted values. Returns the centroids and the
/// cluster assigned to each value. A value equally close to two centroids goes to the lower one,
/// and a cluster left empty keeps its previous centroid.
pub fn k_means_1d(values: &[usize], k: usize, max_iter: usize) -> (Vec<f64>, Vec<usize>) {
    if values.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let k = k.max(1);

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mut centroids: Vec<f64> = (0..k)
        .map(|i| sorted[(i * sorted.len() / k).min(sorted.len() - 1)] as f64)
        .collect();

    let mut assignments = assign(values, &centroids);

    for _ in 0..max_iter {
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];

        for (value, cluster) in values.iter().zip(&assignments) {
            sums[*cluster] += *value as f64;
            counts[*cluster] += 1;
        }

        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            if counts[cluster] > 0 {
                *centroid = sums[cluster] / counts[cluster] as f64;
            }
        }

        let next = assign(values, &centroids);

        if next == assignments {
            break;
        }

        assignments = next;
    }

    (centroids, assignments)
}

fn assign(values: &[usize], centroids: &[f64]) -> Vec<usize> {
    values
        .iter()
        .map(|value| {
            let value = *value as f64;

            centroids
                .iter()
                .enumerate()
                .fold((0, f64::INFINITY), |(best, distance), (cluster, centroid)| {
                    let d = (value - centroid).abs();

                    if d < distance {
                        (cluster, d)
                    } else {
                        (best, distance)
                    }
                })
                .0
        })
        .collect()
}

/// Split indexes into `num_buckets` buckets by clustering their lengths. Some buckets may be
/// empty when there are fewer distinct lengths than buckets.
pub fn k_means_bucketing(
    lengths: &[usize],
    num_buckets: usize,
    max_iter: usize,
) -> Vec<Vec<usize>> {
    let num_buckets = num_buckets.max(1);
    let (_, assignments) = k_means_1d(lengths, num_buckets, max_iter);

    let mut buckets = vec![Vec::new(); num_buckets];

    for (index, cluster) in assignments.into_iter().enumerate() {
        buckets[cluster].push(index);
    }

    buckets
}

use std::{path::Path, sync::Arc};

use burn::{
    data::{
        dataloader::batcher::Batcher as _,
        dataset::{Dataset, InMemDataset},
    },
    tensor::backend::Backend,
};
use log::{debug, info};

use crate::{
    data::{Batchifier, LabelMap, Loadable, Sampler, SequentialSampler, Vocabulary},
    error::Result,
};

use super::{
    batcher::{Batch, Batcher, Shaping},
    config::Config,
    network::{Mode, Network},
};

/// The vocabulary file within an artifact directory
pub static VOCABULARY_FILE: &str = "word2id.json";

/// The label file within an artifact directory
pub static LABELS_FILE: &str = "id2class.json";

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// The shaping requirements of a pipeline variant. Only the sequence labeling and
/// classification variants implement this.
pub trait Task: sealed::Sealed {
    /// The unique string token that identifies this variant
    const NAME: &'static str;

    /// The default shaping options for this variant
    fn shaping(&self, config: &Config) -> Shaping;

    /// Check that batches shaped with these options can be handled by this variant
    fn validate(&self, shaping: &Shaping) -> Result<()>;
}

/// The forward and decode steps of a pipeline variant for a particular network
pub trait Variant<B: Backend, N: Network<B>>: Task {
    /// The raw prediction accumulated for each batch
    type Prediction;

    /// The decoded output for each example
    type Output;

    /// Run the network over a single batch, without gradient tracking
    fn forward(&self, network: &N, batch: Batch<B>) -> Result<Self::Prediction>;

    /// Decode all accumulated predictions into labels, in input order
    fn decode(
        &self,
        predictions: Vec<Self::Prediction>,
        labels: &LabelMap,
    ) -> Result<Vec<Self::Output>>;
}

/// The engine lifecycle.
///
/// `predict` borrows the engine mutably, so callers holding the engine always see `Setup`.
/// `Running` is only visible inside the call, in its debug logging. `predict` resets the state
/// on every exit path.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum State {
    /// Tables are loaded and no prediction is in progress
    Setup,

    /// A `predict` call is in progress
    Running,
}

/// Runs trained networks over raw tokenized text: tokens are mapped to vocabulary indexes,
/// grouped in order into batches, padded, passed forward, and decoded back into labels.
///
/// An engine handles one `predict` call at a time. The vocabulary and label tables are
/// read-only and may be shared between engines.
pub struct Inference<B: Backend, V: Task> {
    config: Config,
    vocabulary: Arc<Vocabulary>,
    labels: Arc<LabelMap>,
    batchifier: Batchifier,
    batcher: Batcher<B>,
    variant: V,
    state: State,
}

impl<B: Backend, V: Task> Inference<B, V> {
    /// Creates a new engine with the variant's default shaping
    pub fn new(
        config: Config,
        vocabulary: Arc<Vocabulary>,
        labels: Arc<LabelMap>,
        variant: V,
        device: B::Device,
    ) -> Result<Self> {
        // Inference never drops a trailing partial batch
        let batchifier = Batchifier::new(config.batch_size, false)?;
        let batcher = Batcher::new(variant.shaping(&config), device);

        Ok(Self {
            config,
            vocabulary,
            labels,
            batchifier,
            batcher,
            variant,
            state: State::Setup,
        })
    }

    /// Creates a new engine from the vocabulary and label files in an artifact directory
    pub async fn from_artifacts<P: AsRef<Path>>(
        artifact_dir: P,
        config: Config,
        variant: V,
        device: B::Device,
    ) -> Result<Self> {
        let artifact_dir = artifact_dir.as_ref();

        let vocabulary = Vocabulary::load(&artifact_dir.join(VOCABULARY_FILE)).await?;
        let labels = LabelMap::load(&artifact_dir.join(LABELS_FILE)).await?;

        debug!(
            "Loaded {} vocabulary entries and {} labels from {}",
            vocabulary.len(),
            labels.len(),
            artifact_dir.display()
        );

        Self::new(
            config,
            Arc::new(vocabulary),
            Arc::new(labels),
            variant,
            device,
        )
    }

    /// Replace the variant's default shaping options
    pub fn with_shaping(self, shaping: Shaping) -> Self {
        let device = self.batcher.device().clone();

        Self {
            batcher: Batcher::new(shaping, device),
            ..self
        }
    }

    /// The engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shaping options applied to each batch
    pub fn shaping(&self) -> &Shaping {
        self.batcher.shaping()
    }

    /// The vocabulary used to map raw tokens
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The label map used to decode predictions
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// The current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Predict labels for each raw example, in input order.
    ///
    /// The network is left in evaluation mode. Network errors abort the call and are returned
    /// unmodified; no partial results are returned.
    pub fn predict<N, E, T>(&mut self, network: &mut N, data: &[E]) -> Result<Vec<V::Output>>
    where
        N: Network<B>,
        V: Variant<B, N>,
        E: AsRef<[T]>,
        T: AsRef<str>,
    {
        self.variant.validate(self.batcher.shaping())?;

        info!("Running {} inference on {} examples...", V::NAME, data.len());

        self.state = State::Running;
        let result = self.run(network, data);
        self.state = State::Setup;

        if let Ok(outputs) = &result {
            info!("Predicted {} outputs", outputs.len());
        }

        result
    }

    fn run<N, E, T>(&self, network: &mut N, data: &[E]) -> Result<Vec<V::Output>>
    where
        N: Network<B>,
        V: Variant<B, N>,
        E: AsRef<[T]>,
        T: AsRef<str>,
    {
        network.set_mode(Mode::Eval);

        debug!("Engine state: {:?}", self.state);

        let dataset = InMemDataset::new(self.vocabulary.map(data));
        let indexes = SequentialSampler.sample(&dataset);

        let mut predictions = Vec::with_capacity(self.batchifier.num_batches(indexes.len()));

        for (i, group) in self.batchifier.batches(&indexes).enumerate() {
            let items: Vec<Vec<usize>> = group
                .iter()
                .filter_map(|index| dataset.get(*index))
                .collect();

            let batch = self.batcher.batch(items);

            debug!("Batch {i}: tokens {:?}", batch.tokens.dims());

            predictions.push(self.variant.forward(network, batch)?);
        }

        self.variant.decode(predictions, &self.labels)
    }
}

use burn::tensor::{backend::Backend, Tensor};

use crate::{
    data::LabelMap,
    error::{Error, Result},
    pipelines::{
        batcher::{Batch, Shaping},
        config::Config,
        inference::{sealed::Sealed, Task, Variant},
        network::{GradientTracking, Network},
    },
};

/// The minimum batch width fed to classification networks
pub static MIN_SEQ_LENGTH: usize = 5;

/// Whole-sequence classification with one label per example
#[derive(Debug, Clone, Copy, Default)]
pub struct Classification;

impl Sealed for Classification {}

impl Task for Classification {
    const NAME: &'static str = "classification";

    fn shaping(&self, config: &Config) -> Shaping {
        Shaping::new(
            config.pad_token_id,
            config.max_seq_length,
            config.min_seq_length.or(Some(MIN_SEQ_LENGTH)),
            false,
        )
    }

    fn validate(&self, _shaping: &Shaping) -> Result<()> {
        Ok(())
    }
}

impl<B: Backend, N: Network<B, Output = Tensor<B, 2>>> Variant<B, N> for Classification {
    /// Logits as 2D tensor: [batch_size, n_classes]
    type Prediction = Tensor<B, 2>;

    /// The class label of an example
    type Output = String;

    fn forward(&self, network: &N, batch: Batch<B>) -> Result<Self::Prediction> {
        let [batch_size, _] = batch.tokens.dims();

        let logits = network
            .forward(batch.tokens, GradientTracking::Disabled)?
            .detach();

        let [rows, _] = logits.dims();

        if rows != batch_size {
            return Err(Error::ShapeMismatch(format!(
                "{rows} rows of logits for a batch of {batch_size} rows"
            )));
        }

        Ok(logits)
    }

    /// Takes the arg-max of every row, so each example in a batch receives its own label
    fn decode(
        &self,
        predictions: Vec<Self::Prediction>,
        labels: &LabelMap,
    ) -> Result<Vec<Self::Output>> {
        let mut results = Vec::new();

        for logits in predictions {
            let class_indexes = logits.argmax(1).into_data().convert::<i64>().value;

            for index in class_indexes {
                results.push(labels.get(index as usize)?.to_string());
            }
        }

        Ok(results)
    }
}

use burn::tensor::backend::Backend;

use crate::{
    data::LabelMap,
    error::{Error, Result},
    pipelines::{
        batcher::{Batch, Shaping},
        config::Config,
        inference::{sealed::Sealed, Task, Variant},
        network::{Decode, GradientTracking},
    },
    utils::tensors,
};

/// Per-token tagging with a constrained decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceLabeling;

impl Sealed for SequenceLabeling {}

impl Task for SequenceLabeling {
    const NAME: &'static str = "sequence-labeling";

    fn shaping(&self, config: &Config) -> Shaping {
        Shaping::new(
            config.pad_token_id,
            config.max_seq_length,
            config.min_seq_length,
            true,
        )
    }

    fn validate(&self, shaping: &Shaping) -> Result<()> {
        if !shaping.output_lengths {
            return Err(unsupported());
        }

        Ok(())
    }
}

fn unsupported() -> Error {
    Error::UnsupportedConfiguration(format!(
        "{} needs sequence lengths, but the batcher is not configured to emit them",
        SequenceLabeling::NAME
    ))
}

impl<B: Backend, N: Decode<B>> Variant<B, N> for SequenceLabeling {
    /// Tag ids for each row, cut to the row's valid length
    type Prediction = Vec<Vec<usize>>;

    /// Labels for each token of an example
    type Output = Vec<String>;

    fn forward(&self, network: &N, batch: Batch<B>) -> Result<Self::Prediction> {
        let Batch { tokens, lengths } = batch;
        let [batch_size, max_len] = tokens.dims();

        let lengths = lengths.ok_or_else(unsupported)?;

        if lengths.len() != batch_size {
            return Err(Error::ShapeMismatch(format!(
                "{} sequence lengths for a batch of {batch_size} rows",
                lengths.len()
            )));
        }

        let mask = tensors::mask_from_lengths::<B>(&lengths, max_len, &tokens.device())?;

        let scores = network
            .forward(tokens, GradientTracking::Disabled)?
            .detach();

        let tags = network.decode(scores, mask)?;

        if tags.len() != batch_size {
            return Err(Error::ShapeMismatch(format!(
                "decoded {} tag sequences for a batch of {batch_size} rows",
                tags.len()
            )));
        }

        tags.into_iter()
            .zip(lengths)
            .enumerate()
            .map(|(row, (mut tags, length))| {
                if tags.len() < length {
                    return Err(Error::ShapeMismatch(format!(
                        "decoded {} tags for row {row} with {length} valid tokens",
                        tags.len()
                    )));
                }

                tags.truncate(length);

                Ok(tags)
            })
            .collect()
    }

    fn decode(
        &self,
        predictions: Vec<Self::Prediction>,
        labels: &LabelMap,
    ) -> Result<Vec<Self::Output>> {
        predictions
            .into_iter()
            .flatten()
            .map(|tags| labels.decode(&tags))
            .collect()
    }
}

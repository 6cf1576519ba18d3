use burn::tensor::{backend::Backend, Bool, Int, Tensor};

/// Whether a network behaves as during training or during inference
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Mode {
    /// Training-only behavior such as dropout is active
    #[default]
    Train,

    /// Deterministic inference
    Eval,
}

/// Whether the forward call may record state for backpropagation
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum GradientTracking {
    /// Record the autodiff graph
    Enabled,

    /// No backpropagation bookkeeping is performed or retained
    Disabled,
}

/// A trained model that maps padded token batches to output tensors
pub trait Network<B: Backend> {
    /// The forward output, e.g. `Tensor<B, 3>` per-token scores or `Tensor<B, 2>` logits
    type Output;

    /// Switch between training and inference behavior
    fn set_mode(&mut self, mode: Mode);

    /// Perform a forward pass over a `[batch_size, width]` batch of token ids
    fn forward(
        &self,
        tokens: Tensor<B, 2, Int>,
        gradients: GradientTracking,
    ) -> anyhow::Result<Self::Output>;
}

/// A network with a constrained decoding step (e.g. a CRF) for sequence labeling
pub trait Decode<B: Backend>: Network<B, Output = Tensor<B, 3>> {
    /// Decode per-token scores into one tag per valid position for each row. The mask is true
    /// at valid positions.
    fn decode(
        &self,
        scores: Tensor<B, 3>,
        mask: Tensor<B, 2, Bool>,
    ) -> anyhow::Result<Vec<Vec<usize>>>;
}

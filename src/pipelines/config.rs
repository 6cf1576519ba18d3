/// Inference settings shared by all pipeline variants
#[derive(burn::config::Config)]
pub struct Config {
    /// Batch size
    #[config(default = 1)]
    pub batch_size: usize,

    /// The padding token ID used to fill short sequences
    #[config(default = 0)]
    pub pad_token_id: usize,

    /// An optional maximum batch width. Wider batches are truncated.
    #[config(default = "None")]
    pub max_seq_length: Option<usize>,

    /// An optional minimum batch width. Narrower batches are extended with padding. When empty,
    /// the variant's own minimum applies.
    #[config(default = "None")]
    pub min_seq_length: Option<usize>,
}

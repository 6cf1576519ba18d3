use std::{collections::HashMap, path::Path};

use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    utils::{classes, files},
};

use super::{is_json, Loadable};

/// The token substituted for words missing from the vocabulary
pub static UNKNOWN_TOKEN: &str = "<unk>";

/// An immutable mapping from tokens to vocabulary indexes, with an unknown-token fallback
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// A mapping from tokens to indexes
    word2index: HashMap<String, usize>,

    /// The index substituted for tokens missing from the mapping
    unknown_index: usize,
}

impl Vocabulary {
    /// Creates a vocabulary using the default `<unk>` token as the fallback
    pub fn new(word2index: HashMap<String, usize>) -> Result<Self> {
        Self::with_unknown_token(word2index, UNKNOWN_TOKEN)
    }

    /// Creates a vocabulary with a custom unknown token, which must be present in the mapping
    pub fn with_unknown_token(
        word2index: HashMap<String, usize>,
        unknown_token: &str,
    ) -> Result<Self> {
        let unknown_index = word2index.get(unknown_token).copied().ok_or_else(|| {
            Error::Configuration(format!(
                "the vocabulary has no entry for the unknown token {unknown_token:?}"
            ))
        })?;

        Ok(Self {
            word2index,
            unknown_index,
        })
    }

    /// Creates a vocabulary from an ordered token list, where each token's index is its position
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let index2word: HashMap<usize, String> = classes::enumerate_lines(tokens);

        Self::new(classes::invert_map(index2word))
    }

    /// Look up a single token, falling back to the unknown index
    pub fn index(&self, token: &str) -> usize {
        self.word2index
            .get(token)
            .copied()
            .unwrap_or(self.unknown_index)
    }

    /// Transform a list of token lists into lists of vocabulary indexes with the same shape
    pub fn map<E, T>(&self, examples: &[E]) -> Vec<Vec<usize>>
    where
        E: AsRef<[T]>,
        T: AsRef<str>,
    {
        examples
            .iter()
            .map(|example| {
                example
                    .as_ref()
                    .iter()
                    .map(|token| self.index(token.as_ref()))
                    .collect()
            })
            .collect()
    }

    /// The index used for tokens missing from the vocabulary
    pub fn unknown_index(&self) -> usize {
        self.unknown_index
    }

    /// The number of entries, including the unknown token
    pub fn len(&self) -> usize {
        self.word2index.len()
    }

    /// Returns true if the vocabulary has no entries
    pub fn is_empty(&self) -> bool {
        self.word2index.is_empty()
    }
}

#[async_trait]
impl Loadable for Vocabulary {
    /// Load a `{"token": index}` JSON object, or a plain text file with one token per line
    async fn load(path: &Path) -> Result<Self> {
        if is_json(path) {
            let contents = tokio::fs::read_to_string(path).await?;

            Self::new(serde_json::from_str(&contents)?)
        } else {
            Self::from_tokens(files::read_file(path).await?.as_slice())
        }
    }
}

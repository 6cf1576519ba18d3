use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    utils::{classes, files},
};

use super::{is_json, Loadable};

/// An immutable mapping from class ids to class name labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    id2label: BTreeMap<usize, String>,
}

impl LabelMap {
    /// Creates a label map from `(id, label)` pairs
    pub fn new<I: IntoIterator<Item = (usize, String)>>(id2label: I) -> Self {
        Self {
            id2label: id2label.into_iter().collect(),
        }
    }

    /// Creates a label map from an ordered label list, where each label's id is its position
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        Self {
            id2label: classes::enumerate_lines(labels),
        }
    }

    /// Creates a label map by inverting a training-time label vocabulary
    pub fn from_label2id(label2id: HashMap<String, usize>) -> Self {
        Self {
            id2label: classes::invert_map(label2id),
        }
    }

    /// Look up the label for a class id
    pub fn get(&self, index: usize) -> Result<&str> {
        self.id2label
            .get(&index)
            .map(String::as_str)
            .ok_or(Error::UnknownLabel(index))
    }

    /// Decode a list of class ids into labels
    pub fn decode(&self, indexes: &[usize]) -> Result<Vec<String>> {
        indexes
            .iter()
            .map(|index| self.get(*index).map(str::to_string))
            .collect()
    }

    /// The number of labels
    pub fn len(&self) -> usize {
        self.id2label.len()
    }

    /// Returns true if there are no labels
    pub fn is_empty(&self) -> bool {
        self.id2label.is_empty()
    }
}

#[async_trait]
impl Loadable for LabelMap {
    /// Load a `{"id": "label"}` JSON object, or a plain text file with one label per line
    async fn load(path: &Path) -> Result<Self> {
        if is_json(path) {
            let contents = tokio::fs::read_to_string(path).await?;
            let id2label: HashMap<usize, String> = serde_json::from_str(&contents)?;

            Ok(Self::new(id2label))
        } else {
            Ok(Self::from_labels(files::read_file(path).await?.as_slice()))
        }
    }
}

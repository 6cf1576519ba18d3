use std::hash::Hash;

/// Invert a map by swapping keys and values
pub fn invert_map<K, V, MK, MV>(original: MK) -> MV
where
    K: Ord + Hash + Eq,
    V: Ord + Hash + Eq + Clone,
    MK: IntoIterator<Item = (K, V)>,
    MV: FromIterator<(V, K)>,
{
    original
        .into_iter()
        .map(|(key, value)| (value, key))
        .collect()
}

/// Assign each entry its line number as an index, trimming surrounding whitespace
pub fn enumerate_lines<S: AsRef<str>, M: FromIterator<(usize, String)>>(lines: &[S]) -> M {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| (i, line.as_ref().trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_invert_map() {
        let id2label = BTreeMap::from([(0, "O".to_string()), (1, "B".to_string())]);

        let label2id: HashMap<String, usize> = invert_map(id2label);

        assert_eq!(label2id.get("O"), Some(&0));
        assert_eq!(label2id.get("B"), Some(&1));
    }

    #[test]
    fn test_enumerate_lines_keeps_line_numbers() {
        let lines = vec!["neg\n", "", "  pos "];

        let id2label: BTreeMap<usize, String> = enumerate_lines(&lines);

        assert_eq!(
            id2label,
            BTreeMap::from([
                (0, "neg".to_string()),
                (1, String::new()),
                (2, "pos".to_string())
            ])
        );
    }
}

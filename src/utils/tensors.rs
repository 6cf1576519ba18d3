use burn::tensor::{backend::Backend, Bool, Data, ElementConversion, Int, Shape, Tensor};

use crate::error::{Error, Result};

/// Build an integer tensor from rectangular rows of token ids
pub fn from_rows<B: Backend>(
    rows: &[Vec<usize>],
    width: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = rows.len();

    let values: Vec<B::IntElem> = rows
        .iter()
        .flat_map(|row| row.iter().map(|token| (*token as i64).elem()))
        .collect();

    Tensor::from_data(
        Data::<B::IntElem, 2>::new(values, Shape::new([batch_size, width])),
        device,
    )
}

/// Read an integer tensor back into rows of token ids
pub fn to_rows<B: Backend>(tensor: Tensor<B, 2, Int>) -> Vec<Vec<usize>> {
    let [batch_size, width] = tensor.dims();

    if width == 0 {
        return vec![Vec::new(); batch_size];
    }

    let values = tensor.into_data().convert::<i64>().value;

    values
        .chunks(width)
        .map(|row| row.iter().map(|value| *value as usize).collect())
        .collect()
}

/// Build a validity mask of shape `[lengths.len(), width]` that is true where `j < lengths[i]`
pub fn mask_from_lengths<B: Backend>(
    lengths: &[usize],
    width: usize,
    device: &B::Device,
) -> Result<Tensor<B, 2, Bool>> {
    if let Some((row, length)) = lengths
        .iter()
        .enumerate()
        .find(|(_, length)| **length > width)
    {
        return Err(Error::ShapeMismatch(format!(
            "sequence length {length} at row {row} exceeds the batch width {width}"
        )));
    }

    let valid: Vec<Vec<usize>> = lengths
        .iter()
        .map(|length| (0..width).map(|j| usize::from(j < *length)).collect())
        .collect();

    Ok(from_rows::<B>(&valid, width, device).equal_elem(1))
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn test_rows_round_trip_keeps_shape() {
        let device = Default::default();
        let rows = vec![vec![1, 2, 3], vec![4, 0, 0]];

        let tensor = from_rows::<TestBackend>(&rows, 3, &device);

        assert_eq!(tensor.dims(), [2, 3]);
        assert_eq!(to_rows(tensor), rows);
    }

    #[test]
    fn test_mask_from_lengths() {
        let device = Default::default();

        let mask = mask_from_lengths::<TestBackend>(&[2, 1, 0], 2, &device).unwrap();

        assert_eq!(mask.dims(), [3, 2]);
        assert_eq!(
            mask.into_data().value,
            vec![true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_mask_rejects_lengths_wider_than_the_batch() {
        let device = Default::default();

        let result = mask_from_lengths::<TestBackend>(&[3], 2, &device);

        assert!(matches!(result, Err(Error::ShapeMismatch(_))));
    }
}

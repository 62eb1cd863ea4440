//! Label image measurements built on the touch matrix.
//!
//! The pipeline is
//!
//! 1. [`build_touch_matrix`]: which labels are face-adjacent,
//! 2. [`count_touching_neighbors`]: per-label degree, background zeroed,
//! 3. [`statistic_of_touching_neighbors`]: a statistic over the neighbours' values,
//! 4. [`remap_by_label`]: broadcast a per-label vector back onto the grid.
//!
//! [`local_standard_deviation_touching_neighbor_count_map`] runs all four stages.

use num_traits::PrimInt;
use rayon::prelude::*;
use vexel_tensor::Tensor;

use crate::error::ImgprocError;

mod maps;
mod neighbors;
mod remap;
mod touch_matrix;

pub use maps::*;
pub use neighbors::*;
pub use remap::*;
pub use touch_matrix::*;

/// Integer types usable as label values.
pub trait Label: PrimInt + std::fmt::Display + Send + Sync {}

impl<T: PrimInt + std::fmt::Display + Send + Sync> Label for T {}

#[inline]
fn label_index<L: Label>(label: L) -> Result<usize, ImgprocError> {
    label
        .to_usize()
        .ok_or_else(|| ImgprocError::InvalidLabel(label.to_string()))
}

/// Find the largest label in a label grid.
///
/// This is the pre-scan that sizes every per-label structure: a touch matrix or a
/// per-label vector for `labels` has `max_label + 1` entries. An empty grid has
/// max label 0.
///
/// # Errors
///
/// Returns [`ImgprocError::InvalidLabel`] if any value is negative.
///
/// # Example
///
/// ```
/// use vexel_imgproc::label::max_label;
/// use vexel_tensor::Tensor2;
///
/// let labels = Tensor2::<i32>::from_shape_vec([2, 2], vec![0, 3, 1, 1]).unwrap();
/// assert_eq!(max_label(&labels).unwrap(), 3);
///
/// let bad = Tensor2::<i32>::from_shape_vec([1, 2], vec![1, -1]).unwrap();
/// assert!(max_label(&bad).is_err());
/// ```
pub fn max_label<L: Label, const N: usize>(labels: &Tensor<L, N>) -> Result<usize, ImgprocError> {
    labels
        .as_slice()
        .par_iter()
        .try_fold(
            || 0usize,
            |acc, &l| -> Result<usize, ImgprocError> { Ok(acc.max(label_index(l)?)) },
        )
        .try_reduce(|| 0usize, |a, b| Ok(a.max(b)))
}

/// Label grid validated and converted to flat indices.
pub(crate) struct LabelIndices {
    pub indices: Vec<usize>,
    pub max_label: usize,
}

pub(crate) fn label_indices<L: Label, const N: usize>(
    labels: &Tensor<L, N>,
) -> Result<LabelIndices, ImgprocError> {
    let indices = labels
        .as_slice()
        .par_iter()
        .map(|&l| label_index(l))
        .collect::<Result<Vec<_>, _>>()?;
    let max_label = indices.par_iter().copied().max().unwrap_or(0);
    Ok(LabelIndices { indices, max_label })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vexel_tensor::Tensor3;

    #[test]
    fn max_label_empty() -> Result<(), Box<dyn std::error::Error>> {
        let labels = Tensor3::<u16>::zeros([0, 2, 2])?;
        assert_eq!(max_label(&labels)?, 0);
        Ok(())
    }

    #[test]
    fn max_label_negative() -> Result<(), Box<dyn std::error::Error>> {
        let labels = Tensor3::<i8>::from_shape_vec([1, 1, 3], vec![2, -4, 1])?;
        assert_eq!(
            max_label(&labels),
            Err(ImgprocError::InvalidLabel("-4".to_string()))
        );
        Ok(())
    }

    #[test]
    fn label_indices_match() -> Result<(), Box<dyn std::error::Error>> {
        let labels = Tensor3::<u8>::from_shape_vec([1, 2, 2], vec![0, 5, 2, 5])?;
        let li = label_indices(&labels)?;
        assert_eq!(li.indices, vec![0, 5, 2, 5]);
        assert_eq!(li.max_label, 5);
        Ok(())
    }
}

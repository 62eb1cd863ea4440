use vexel_tensor::Tensor;

use super::{label_indices, Label};
use crate::error::ImgprocError;
use crate::parallel::{ExecuteExt, ExecutionStrategy};

/// Replace every label in a label grid by its entry in a per-label vector.
///
/// The destination has the shape of `labels`; voxel `v` receives `values[labels[v]]`.
/// Background voxels receive `values[0]`.
///
/// # Arguments
///
/// * `labels` - The label grid.
/// * `values` - One value per label, at least `max_label + 1` long.
/// * `strategy` - How the lookup is split across threads.
///
/// # Errors
///
/// Returns an error if a label is negative or has no entry in `values`.
///
/// # Example
///
/// ```
/// use vexel_imgproc::label::remap_by_label;
/// use vexel_imgproc::parallel::ExecutionStrategy;
/// use vexel_tensor::Tensor2;
///
/// let labels = Tensor2::<u8>::from_shape_vec([2, 2], vec![0, 1, 2, 1]).unwrap();
/// let out = remap_by_label(&labels, &[0.0f32, 1.5, 2.5], ExecutionStrategy::Serial).unwrap();
/// assert_eq!(out.as_slice(), &[0.0, 1.5, 2.5, 1.5]);
/// ```
pub fn remap_by_label<L, V, const N: usize>(
    labels: &Tensor<L, N>,
    values: &[V],
    strategy: ExecutionStrategy,
) -> Result<Tensor<V, N>, ImgprocError>
where
    L: Label,
    V: Copy + Default + Send + Sync,
{
    let prescan = label_indices(labels)?;
    remap_indices(labels.shape, &prescan.indices, prescan.max_label, values, strategy)
}

pub(crate) fn remap_indices<V, const N: usize>(
    shape: [usize; N],
    indices: &[usize],
    max_label: usize,
    values: &[V],
    strategy: ExecutionStrategy,
) -> Result<Tensor<V, N>, ImgprocError>
where
    V: Copy + Default + Send + Sync,
{
    if max_label >= values.len() {
        return Err(ImgprocError::InvalidVectorLength {
            labels: max_label.saturating_add(1),
            length: values.len(),
        });
    }

    let mut dst = Tensor::from_shape_val(shape, V::default())?;
    indices.execute_with(strategy, dst.as_slice_mut(), |(&label, d)| {
        *d = values[label];
    })?;

    Ok(dst)
}

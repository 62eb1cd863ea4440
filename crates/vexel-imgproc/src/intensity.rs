use vexel_tensor::Tensor;

use crate::error::ImgprocError;
use crate::parallel::{ExecuteExt, ExecutionStrategy};

/// Replace a specific intensity in a grid with a new value.
///
/// # Arguments
///
/// * `src` - The input grid.
/// * `value_to_replace` - The intensity to look for.
/// * `value_replacement` - The intensity written in its place.
/// * `strategy` - How the work is split across threads.
///
/// # Returns
///
/// A new grid of the same shape where every element equal to `value_to_replace`
/// is `value_replacement` and every other element is copied.
///
/// # Example
///
/// ```
/// use vexel_imgproc::intensity::replace_intensity;
/// use vexel_imgproc::parallel::ExecutionStrategy;
/// use vexel_tensor::Tensor2;
///
/// let src = Tensor2::<f32>::from_shape_vec([2, 2], vec![0.0, 1.0, 0.0, 3.0]).unwrap();
/// let dst = replace_intensity(&src, 0.0, 1.0, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(dst.as_slice(), &[1.0, 1.0, 1.0, 3.0]);
/// ```
pub fn replace_intensity<T, const N: usize>(
    src: &Tensor<T, N>,
    value_to_replace: T,
    value_replacement: T,
    strategy: ExecutionStrategy,
) -> Result<Tensor<T, N>, ImgprocError>
where
    T: Copy + Default + PartialEq + Send + Sync,
{
    let mut dst = Tensor::from_shape_val(src.shape, T::default())?;

    src.as_slice()
        .execute_with(strategy, dst.as_slice_mut(), |(s, d)| {
            *d = if *s == value_to_replace {
                value_replacement
            } else {
                *s
            };
        })?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vexel_tensor::Tensor3;

    #[test]
    fn replace_in_label_volume() -> Result<(), ImgprocError> {
        let src = Tensor3::<u16>::from_shape_vec([2, 1, 3], vec![4, 0, 4, 2, 4, 1])?;
        let dst = replace_intensity(&src, 4, 9, ExecutionStrategy::AutoRows(3))?;
        assert_eq!(dst.shape, src.shape);
        assert_eq!(dst.as_slice(), &[9, 0, 9, 2, 9, 1]);
        Ok(())
    }

    #[test]
    fn replace_absent_value_copies() -> Result<(), ImgprocError> {
        let src = Tensor3::<i32>::from_shape_vec([1, 2, 2], vec![1, 2, 3, 4])?;
        let dst = replace_intensity(&src, 7, 0, ExecutionStrategy::ParallelElements)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn replace_invalid_strategy() -> Result<(), ImgprocError> {
        let src = Tensor3::<u8>::zeros([1, 1, 1])?;
        let res = replace_intensity(&src, 0, 1, ExecutionStrategy::Fixed(0));
        assert!(matches!(res, Err(ImgprocError::Parallel(_))));
        Ok(())
    }
}

use vexel_tensor::Tensor;

use super::neighbors::{
    count_touching_neighbors, statistic_of_touching_neighbors, NeighborStatistic,
};
use super::remap::remap_indices;
use super::touch_matrix::touch_matrix_from_indices;
use super::{label_indices, Label};
use crate::error::ImgprocError;
use crate::neighborhood::check_dimensionality;
use crate::parallel::ExecutionStrategy;

/// Replace every label by the number of labels touching it.
///
/// Background voxels are set to 0.
///
/// # Example
///
/// ```
/// use vexel_imgproc::label::touching_neighbor_count_map;
/// use vexel_imgproc::parallel::ExecutionStrategy;
/// use vexel_tensor::Tensor2;
///
/// let labels = Tensor2::<u8>::from_shape_vec([1, 4], vec![1, 2, 3, 0]).unwrap();
/// let out = touching_neighbor_count_map(&labels, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(out.as_slice(), &[1, 2, 1, 0]);
/// ```
pub fn touching_neighbor_count_map<L: Label, const N: usize>(
    labels: &Tensor<L, N>,
    strategy: ExecutionStrategy,
) -> Result<Tensor<u32, N>, ImgprocError> {
    check_dimensionality::<N>()?;
    let prescan = label_indices(labels)?;
    let matrix = touch_matrix_from_indices(&labels.shape, &labels.strides, &prescan, strategy)?;
    let counts = count_touching_neighbors(&matrix);
    remap_indices(labels.shape, &prescan.indices, prescan.max_label, &counts, strategy)
}

/// Replace every label by a statistic of its neighbours' touching-neighbour counts.
///
/// Runs the whole pipeline: touch matrix, neighbour counts, the chosen statistic over
/// each label's neighbours' counts, then the remap onto the grid. Labels without
/// neighbours and background become 0.
pub fn local_statistic_touching_neighbor_count_map<L: Label, const N: usize>(
    labels: &Tensor<L, N>,
    statistic: NeighborStatistic,
    strategy: ExecutionStrategy,
) -> Result<Tensor<f32, N>, ImgprocError> {
    check_dimensionality::<N>()?;
    let prescan = label_indices(labels)?;

    let matrix = touch_matrix_from_indices(&labels.shape, &labels.strides, &prescan, strategy)?;
    let counts = count_touching_neighbors(&matrix);
    let stats = statistic_of_touching_neighbors(&counts, &matrix, statistic)?;
    log::debug!(
        "{:?} of touching neighbor counts over {} labels",
        statistic,
        matrix.max_label()
    );

    remap_indices(labels.shape, &prescan.indices, prescan.max_label, &stats, strategy)
}

/// Replace every label by the standard deviation of its neighbours' touching-neighbour counts.
///
/// # Example
///
/// ```
/// use vexel_imgproc::label::local_standard_deviation_touching_neighbor_count_map;
/// use vexel_imgproc::parallel::ExecutionStrategy;
/// use vexel_tensor::Tensor2;
///
/// // counts are 1, 2, 2, 1 along the chain 1-2-3-4
/// let labels = Tensor2::<u8>::from_shape_vec([1, 5], vec![1, 2, 3, 4, 0]).unwrap();
/// let out = local_standard_deviation_touching_neighbor_count_map(
///     &labels,
///     ExecutionStrategy::Serial,
/// ).unwrap();
/// assert_eq!(out.as_slice(), &[0.0, 0.5, 0.5, 0.0, 0.0]);
/// ```
pub fn local_standard_deviation_touching_neighbor_count_map<L: Label, const N: usize>(
    labels: &Tensor<L, N>,
    strategy: ExecutionStrategy,
) -> Result<Tensor<f32, N>, ImgprocError> {
    local_statistic_touching_neighbor_count_map(
        labels,
        NeighborStatistic::StandardDeviation,
        strategy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{
        build_touch_matrix, remap_by_label, standard_deviation_of_touching_neighbors,
    };
    use vexel_tensor::{Tensor2, Tensor3};

    #[test]
    fn count_map_2d() -> Result<(), ImgprocError> {
        #[rustfmt::skip]
        let labels = Tensor2::<u16>::from_shape_vec([3, 3], vec![
            1, 1, 2,
            1, 2, 2,
            3, 3, 2,
        ])?;
        let out = touching_neighbor_count_map(&labels, ExecutionStrategy::Serial)?;
        // every label touches the two others
        assert_eq!(out.as_slice(), &[2; 9]);
        Ok(())
    }

    #[test]
    fn pipeline_matches_stages() -> Result<(), ImgprocError> {
        #[rustfmt::skip]
        let labels = Tensor3::<u32>::from_shape_vec([2, 3, 3], vec![
            1, 1, 0,
            2, 2, 0,
            0, 3, 3,

            1, 4, 4,
            0, 4, 0,
            5, 5, 3,
        ])?;

        let matrix = build_touch_matrix(&labels, ExecutionStrategy::Serial)?;
        let counts = count_touching_neighbors(&matrix);
        let stats = standard_deviation_of_touching_neighbors(&counts, &matrix)?;
        let expected = remap_by_label(&labels, &stats, ExecutionStrategy::Serial)?;

        let out = local_standard_deviation_touching_neighbor_count_map(
            &labels,
            ExecutionStrategy::ParallelElements,
        )?;
        assert_eq!(out, expected);

        for (l, v) in labels.iter().zip(out.iter()) {
            if *l == 0 {
                assert_eq!(*v, 0.0);
            }
        }
        Ok(())
    }

    #[test]
    fn pipeline_single_label() -> Result<(), ImgprocError> {
        let labels = Tensor2::<u8>::from_shape_val([4, 4], 1)?;
        let out = local_standard_deviation_touching_neighbor_count_map(
            &labels,
            ExecutionStrategy::Serial,
        )?;
        assert!(out.iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn pipeline_rejects_unsupported_rank() -> Result<(), ImgprocError> {
        let labels = Tensor::<u8, 1>::from_shape_vec([2], vec![1, 2])?;
        let res = touching_neighbor_count_map(&labels, ExecutionStrategy::Serial);
        assert_eq!(res, Err(ImgprocError::UnsupportedDimensionality(1)));
        Ok(())
    }
}

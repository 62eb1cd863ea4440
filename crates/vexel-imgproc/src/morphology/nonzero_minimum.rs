use num_traits::Zero;
use vexel_tensor::Tensor;

use crate::error::ImgprocError;
use crate::neighborhood::{check_dimensionality, check_same_shape, for_each_face_neighbor};
use crate::parallel::{self, ExecutionStrategy};

/// Whether repeated propagation passes can still change the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationState {
    /// The last pass changed at least one voxel.
    Active,
    /// The last pass changed nothing; further passes are no-ops.
    Converged,
}

/// The outputs of one [`diamond_minimum_pass`].
#[derive(Debug, Clone, PartialEq)]
pub struct DiamondPass<T, const N: usize> {
    /// `true` exactly where the pass changed the destination.
    pub flags: Tensor<bool, N>,
    /// The destination grid after the pass.
    pub destination: Tensor<T, N>,
}

impl<T, const N: usize> DiamondPass<T, N> {
    /// Number of voxels changed by the pass.
    pub fn changed_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// `Converged` when no flag is set.
    pub fn state(&self) -> PropagationState {
        if self.flags.iter().any(|&f| f) {
            PropagationState::Active
        } else {
            PropagationState::Converged
        }
    }

    /// Shorthand for `state() == PropagationState::Converged`.
    pub fn is_converged(&self) -> bool {
        self.state() == PropagationState::Converged
    }
}

/// Apply one pass of a radius 1, zero-ignoring minimum filter with a diamond footprint.
///
/// Only voxels that are zero in both `src` and the incoming `destination` may change:
/// such a voxel takes the minimum of its non-zero face neighbours, or stays zero if it
/// has none. Every other voxel keeps its value. Neighbour reads see `destination` as
/// it was before the pass. `destination` is usually seeded with a copy of `src`.
///
/// # Arguments
///
/// * `src` - The grid whose zero voxels may be filled.
/// * `flags` - Reused as the flag output; its incoming contents are overwritten.
/// * `destination` - The destination grid, consumed and returned updated.
/// * `strategy` - How the voxels are split across threads.
///
/// # Errors
///
/// Returns [`ImgprocError::ShapeMismatch`] before any write if the three grids
/// differ in shape, or [`ImgprocError::UnsupportedDimensionality`] for non 2D/3D grids.
///
/// # Example
///
/// ```
/// use vexel_imgproc::morphology::diamond_minimum_pass;
/// use vexel_imgproc::parallel::ExecutionStrategy;
/// use vexel_tensor::Tensor2;
///
/// let src = Tensor2::<u8>::from_shape_vec([1, 4], vec![5, 0, 0, 3]).unwrap();
/// let flags = Tensor2::from_shape_val([1, 4], false).unwrap();
/// let pass = diamond_minimum_pass(&src, flags, src.clone(), ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(pass.destination.as_slice(), &[5, 5, 3, 3]);
/// assert_eq!(pass.flags.as_slice(), &[false, true, true, false]);
/// ```
pub fn diamond_minimum_pass<T, const N: usize>(
    src: &Tensor<T, N>,
    mut flags: Tensor<bool, N>,
    mut destination: Tensor<T, N>,
    strategy: ExecutionStrategy,
) -> Result<DiamondPass<T, N>, ImgprocError>
where
    T: Copy + PartialOrd + Zero + Send + Sync,
{
    check_dimensionality::<N>()?;
    check_same_shape(src, &destination)?;
    check_same_shape(src, &flags)?;
    strategy.validate()?;

    let snapshot = destination.clone();

    let (shape, strides) = (snapshot.shape, snapshot.strides);
    let before = snapshot.as_slice();
    let seed = src.as_slice();

    parallel::execute_indexed(destination.as_slice_mut(), strategy, |offset, d| {
        if !seed[offset].is_zero() || !before[offset].is_zero() {
            return;
        }
        let mut minimum: Option<T> = None;
        for_each_face_neighbor(&shape, &strides, offset, |neighbor| {
            let value = before[neighbor];
            if value.is_zero() {
                return;
            }
            minimum = match minimum {
                Some(m) if m <= value => Some(m),
                _ => Some(value),
            };
        });
        if let Some(m) = minimum {
            *d = m;
        }
    })?;

    let after = destination.as_slice();
    parallel::execute_indexed(flags.as_slice_mut(), strategy, |offset, f| {
        *f = after[offset] != before[offset];
    })?;

    Ok(DiamondPass { flags, destination })
}

/// The result of [`propagate_nonzero_minimum`].
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation<T, const N: usize> {
    /// The grid after the last pass.
    pub destination: Tensor<T, N>,
    /// Number of passes that were run.
    pub iterations: usize,
    /// `Converged` if the last pass changed nothing.
    pub state: PropagationState,
}

/// Repeat [`diamond_minimum_pass`] from a copy of `src` until nothing changes.
///
/// At most `max_iterations` passes are run; the returned state tells whether the
/// fixed point was reached. With `max_iterations == 0` the copy of `src` is
/// returned in the `Active` state.
///
/// # Example
///
/// ```
/// use vexel_imgproc::morphology::{propagate_nonzero_minimum, PropagationState};
/// use vexel_imgproc::parallel::ExecutionStrategy;
/// use vexel_tensor::Tensor2;
///
/// let src = Tensor2::<u8>::from_shape_vec([1, 5], vec![4, 0, 0, 0, 0]).unwrap();
/// let out = propagate_nonzero_minimum(&src, 16, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(out.destination.as_slice(), &[4, 4, 4, 4, 4]);
/// assert_eq!(out.state, PropagationState::Converged);
/// assert_eq!(out.iterations, 5);
/// ```
pub fn propagate_nonzero_minimum<T, const N: usize>(
    src: &Tensor<T, N>,
    max_iterations: usize,
    strategy: ExecutionStrategy,
) -> Result<Propagation<T, N>, ImgprocError>
where
    T: Copy + PartialOrd + Zero + Send + Sync,
{
    check_dimensionality::<N>()?;

    let mut destination = src.clone();
    let mut flags = Tensor::from_shape_val(src.shape, false)?;
    let mut state = PropagationState::Active;
    let mut iterations = 0;

    while iterations < max_iterations {
        let pass = diamond_minimum_pass(src, flags, destination, strategy)?;
        iterations += 1;
        log::trace!(
            "propagation pass {}: {} voxels changed",
            iterations,
            pass.changed_count()
        );

        state = pass.state();
        destination = pass.destination;
        flags = pass.flags;
        if state == PropagationState::Converged {
            break;
        }
    }

    log::debug!("propagation stopped after {} passes in state {:?}", iterations, state);

    Ok(Propagation {
        destination,
        iterations,
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use vexel_tensor::{Tensor2, Tensor3};

    fn single_pass<T, const N: usize>(
        src: &Tensor<T, N>,
        strategy: ExecutionStrategy,
    ) -> Result<DiamondPass<T, N>, ImgprocError>
    where
        T: Copy + PartialOrd + Zero + Send + Sync,
    {
        let flags = Tensor::from_shape_val(src.shape, false)?;
        diamond_minimum_pass(src, flags, src.clone(), strategy)
    }

    #[test]
    fn pass_fills_zero_neighbours_2d() -> Result<(), ImgprocError> {
        #[rustfmt::skip]
        let src = Tensor2::<u16>::from_shape_vec([3, 3], vec![
            2, 0, 0,
            0, 0, 3,
            0, 0, 0,
        ])?;
        let pass = single_pass(&src, ExecutionStrategy::Serial)?;

        assert_eq!(pass.destination.as_slice(), &[2, 2, 3, 2, 3, 3, 0, 0, 3]);
        assert_eq!(
            pass.flags.as_slice(),
            &[false, true, true, true, true, false, false, false, true]
        );
        assert_eq!(pass.changed_count(), 5);
        assert_eq!(pass.state(), PropagationState::Active);
        Ok(())
    }

    #[test]
    fn pass_takes_minimum_of_nonzero_neighbours() -> Result<(), ImgprocError> {
        #[rustfmt::skip]
        let src = Tensor2::<i32>::from_shape_vec([3, 3], vec![
            0, 9, 0,
            7, 0, 8,
            0, 5, 0,
        ])?;
        let pass = single_pass(&src, ExecutionStrategy::Serial)?;
        assert_eq!(pass.destination.get([1, 1]), Some(&5));
        assert_eq!(pass.destination.get([0, 0]), Some(&7));
        assert_eq!(pass.destination.get([2, 2]), Some(&5));
        Ok(())
    }

    #[test]
    fn pass_reads_pre_pass_snapshot() -> Result<(), ImgprocError> {
        // a single pass only moves values by one voxel, whatever the scan order
        let src = Tensor2::<u8>::from_shape_vec([1, 4], vec![1, 0, 0, 0])?;
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::ParallelElements,
            ExecutionStrategy::AutoRows(1),
        ] {
            let pass = single_pass(&src, strategy)?;
            assert_eq!(pass.destination.as_slice(), &[1, 1, 0, 0]);
        }
        Ok(())
    }

    #[test]
    fn pass_3d() -> Result<(), ImgprocError> {
        let mut src = Tensor3::<f32>::zeros([3, 3, 3])?;
        if let Some(v) = src.get_mut([1, 1, 1]) {
            *v = 2.5;
        }
        let pass = single_pass(&src, ExecutionStrategy::ParallelElements)?;
        assert_eq!(pass.changed_count(), 6);
        assert_eq!(pass.destination.get([0, 1, 1]), Some(&2.5));
        assert_eq!(pass.destination.get([1, 1, 2]), Some(&2.5));
        assert_eq!(pass.destination.get([0, 0, 1]), Some(&0.0));
        Ok(())
    }

    #[test]
    fn pass_never_overwrites_nonzero_source() -> Result<(), ImgprocError> {
        let mut rng = StdRng::seed_from_u64(11);
        let data: Vec<u8> = (0..5 * 6 * 7)
            .map(|_| if rng.random_bool(0.6) { 0 } else { rng.random_range(1..50) })
            .collect();
        let src = Tensor3::from_shape_vec([5, 6, 7], data)?;
        let pass = single_pass(&src, ExecutionStrategy::AutoRows(7))?;

        for ((s, d), f) in src.iter().zip(pass.destination.iter()).zip(pass.flags.iter()) {
            if *s != 0 {
                assert_eq!(s, d);
                assert!(!f);
            }
            assert_eq!(*f, s != d);
        }
        Ok(())
    }

    #[test]
    fn pass_idempotent_at_fixed_point() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::from_shape_vec([2, 3], vec![1, 1, 2, 3, 2, 2])?;
        let pass = single_pass(&src, ExecutionStrategy::Serial)?;
        assert!(pass.is_converged());
        assert_eq!(pass.destination, src);

        let zeros = Tensor2::<u8>::zeros([4, 4])?;
        assert!(single_pass(&zeros, ExecutionStrategy::Serial)?.is_converged());
        Ok(())
    }

    #[test]
    fn pass_overwrites_stale_flags() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::from_shape_vec([1, 2], vec![1, 1])?;
        let flags = Tensor2::from_shape_val([1, 2], true)?;
        let pass = diamond_minimum_pass(&src, flags, src.clone(), ExecutionStrategy::Serial)?;
        assert_eq!(pass.flags.as_slice(), &[false, false]);
        Ok(())
    }

    #[test]
    fn pass_shape_mismatch() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::zeros([2, 3])?;
        let flags = Tensor2::from_shape_val([2, 3], false)?;
        let dst = Tensor2::<u8>::zeros([3, 2])?;
        let res = diamond_minimum_pass(&src, flags, dst, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(ImgprocError::ShapeMismatch {
                expected: vec![2, 3],
                actual: vec![3, 2]
            })
        );

        let flags = Tensor2::from_shape_val([2, 2], false)?;
        let res = diamond_minimum_pass(&src, flags, src.clone(), ExecutionStrategy::Serial);
        assert!(matches!(res, Err(ImgprocError::ShapeMismatch { .. })));
        Ok(())
    }

    #[test]
    fn propagation_converges_per_component() -> Result<(), ImgprocError> {
        #[rustfmt::skip]
        let src = Tensor2::<u8>::from_shape_vec([3, 3], vec![
            3, 0, 0,
            0, 0, 0,
            0, 0, 2,
        ])?;
        let out = propagate_nonzero_minimum(&src, 100, ExecutionStrategy::ParallelElements)?;
        assert_eq!(out.state, PropagationState::Converged);
        assert_eq!(out.iterations, 3);
        // voxels equidistant from both seeds take the smaller one
        assert_eq!(out.destination.as_slice(), &[3, 3, 2, 3, 2, 2, 2, 2, 2]);
        Ok(())
    }

    #[test]
    fn propagation_iteration_cap() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::from_shape_vec([1, 6], vec![1, 0, 0, 0, 0, 0])?;
        let out = propagate_nonzero_minimum(&src, 2, ExecutionStrategy::Serial)?;
        assert_eq!(out.iterations, 2);
        assert_eq!(out.state, PropagationState::Active);
        assert_eq!(out.destination.as_slice(), &[1, 1, 1, 0, 0, 0]);

        let out = propagate_nonzero_minimum(&src, 0, ExecutionStrategy::Serial)?;
        assert_eq!(out.iterations, 0);
        assert_eq!(out.destination, src);
        Ok(())
    }
}

use vexel_tensor::Tensor;

use crate::error::ImgprocError;

/// Ensure a grid is 2D or 3D.
pub(crate) fn check_dimensionality<const N: usize>() -> Result<(), ImgprocError> {
    if N == 2 || N == 3 {
        Ok(())
    } else {
        Err(ImgprocError::UnsupportedDimensionality(N))
    }
}

/// Ensure two grids share the same shape.
pub(crate) fn check_same_shape<T, U, const N: usize>(
    expected: &Tensor<T, N>,
    actual: &Tensor<U, N>,
) -> Result<(), ImgprocError> {
    if expected.shape != actual.shape {
        return Err(ImgprocError::shape_mismatch(&expected.shape, &actual.shape));
    }
    Ok(())
}

/// Call `f` with the flat offset of every in-bounds face neighbour of `offset`.
///
/// Face neighbours are the voxels one step away along a single axis, i.e. the
/// 4-neighbourhood in 2D and the 6-neighbourhood in 3D. The center voxel is not visited.
#[inline]
pub fn for_each_face_neighbor<const N: usize>(
    shape: &[usize; N],
    strides: &[usize; N],
    offset: usize,
    mut f: impl FnMut(usize),
) {
    for axis in 0..N {
        let coord = (offset / strides[axis]) % shape[axis];
        if coord > 0 {
            f(offset - strides[axis]);
        }
        if coord + 1 < shape[axis] {
            f(offset + strides[axis]);
        }
    }
}

/// Like [`for_each_face_neighbor`], but only visits the neighbours in the positive
/// direction of each axis, so every face-adjacent pair is visited exactly once.
#[inline]
pub fn for_each_forward_neighbor<const N: usize>(
    shape: &[usize; N],
    strides: &[usize; N],
    offset: usize,
    mut f: impl FnMut(usize),
) {
    for axis in 0..N {
        let coord = (offset / strides[axis]) % shape[axis];
        if coord + 1 < shape[axis] {
            f(offset + strides[axis]);
        }
    }
}

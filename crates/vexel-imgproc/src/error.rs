use vexel_tensor::TensorError;

use crate::parallel::ParallelError;

/// An error type for the image processing operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// Grids passed to an operation expecting matching shapes differ.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Shape of the reference grid.
        expected: Vec<usize>,
        /// Shape of the offending grid.
        actual: Vec<usize>,
    },

    /// A label value cannot be used as an index (e.g. it is negative).
    #[error("Invalid label value: {0}")]
    InvalidLabel(String),

    /// The operation only supports 2D and 3D grids.
    #[error("Unsupported grid dimensionality {0}, expected 2 or 3")]
    UnsupportedDimensionality(usize),

    /// A per-label vector does not cover the labels it is used with.
    #[error("Per-label vector of length {length} does not cover {labels} labels")]
    InvalidVectorLength {
        /// Number of entries required (max label + 1).
        labels: usize,
        /// Length of the vector that was provided.
        length: usize,
    },

    /// Error from the underlying tensor.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// Error from the execution strategy.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

impl ImgprocError {
    /// Creates a ShapeMismatch error from two shapes.
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

use std::sync::atomic::{AtomicBool, Ordering};

use vexel_tensor::{Tensor, Tensor2};

use super::{label_indices, Label, LabelIndices};
use crate::error::ImgprocError;
use crate::neighborhood::{check_dimensionality, for_each_forward_neighbor};
use crate::parallel::{self, ExecutionStrategy};

/// Symmetric boolean adjacency between the labels of a label grid.
///
/// The matrix has `max_label + 1` rows and columns. Row and column 0 hold the
/// adjacency to background; they are recorded but [`TouchMatrix::neighbors`] never
/// reports background as a neighbour. The diagonal is always `false`.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchMatrix {
    size: usize,
    data: Vec<bool>,
}

impl TouchMatrix {
    /// Build a touch matrix over labels `0..=max_label` from a list of touching pairs.
    ///
    /// Pairs are symmetrised and self pairs are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::InvalidLabel`] if a pair references a label above `max_label`.
    ///
    /// # Example
    ///
    /// ```
    /// use vexel_imgproc::label::TouchMatrix;
    ///
    /// let m = TouchMatrix::from_pairs(3, &[(1, 2), (3, 3)]).unwrap();
    /// assert!(m.get(2, 1));
    /// assert!(!m.get(3, 3));
    /// ```
    pub fn from_pairs(max_label: usize, pairs: &[(usize, usize)]) -> Result<Self, ImgprocError> {
        let size = matrix_size(max_label)?;
        let mut data = vec![false; size * size];
        for &(i, j) in pairs {
            if i >= size || j >= size {
                return Err(ImgprocError::InvalidLabel(format!(
                    "pair ({i}, {j}) exceeds max label {max_label}"
                )));
            }
            if i != j {
                data[i * size + j] = true;
                data[j * size + i] = true;
            }
        }
        Ok(Self { size, data })
    }

    /// Number of rows (and columns), i.e. `max_label + 1`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The largest label index covered by the matrix.
    #[inline]
    pub fn max_label(&self) -> usize {
        self.size - 1
    }

    /// Whether labels `i` and `j` touch. Out of range labels never touch.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        i < self.size && j < self.size && self.data[i * self.size + j]
    }

    /// The full row of label `i`, background column included.
    pub fn row(&self, i: usize) -> &[bool] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Labels touching label `i`, excluding background and `i` itself.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        let row: &[bool] = if i < self.size { self.row(i) } else { &[] };
        row.iter()
            .enumerate()
            .skip(1)
            .filter(move |&(j, &touches)| touches && j != i)
            .map(|(j, _)| j)
    }

    /// Copy the matrix into a 2D tensor of shape `[size, size]`.
    pub fn to_tensor(&self) -> Result<Tensor2<bool>, ImgprocError> {
        Ok(Tensor2::from_shape_slice([self.size, self.size], &self.data)?)
    }
}

/// Determine which labels of a label grid touch each other.
///
/// Two labels touch when a voxel of one is face-adjacent to a voxel of the other
/// (4-neighbourhood in 2D, 6-neighbourhood in 3D). Background (label 0) takes part
/// like any other label. An empty grid yields a 1x1 matrix.
///
/// # Arguments
///
/// * `labels` - The 2D or 3D label grid.
/// * `strategy` - How the voxel scan is split across threads.
///
/// # Errors
///
/// Returns an error if the grid is not 2D/3D or contains negative labels.
///
/// # Example
///
/// ```
/// use vexel_imgproc::label::build_touch_matrix;
/// use vexel_imgproc::parallel::ExecutionStrategy;
/// use vexel_tensor::Tensor2;
///
/// let labels = Tensor2::<u16>::from_shape_vec(
///     [3, 3],
///     vec![1, 1, 2, 1, 2, 2, 3, 3, 2],
/// ).unwrap();
///
/// let m = build_touch_matrix(&labels, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(m.size(), 4);
/// assert!(m.get(1, 2) && m.get(2, 3) && m.get(1, 3));
/// assert!(!m.get(0, 1));
/// ```
pub fn build_touch_matrix<L: Label, const N: usize>(
    labels: &Tensor<L, N>,
    strategy: ExecutionStrategy,
) -> Result<TouchMatrix, ImgprocError> {
    check_dimensionality::<N>()?;
    let prescan = label_indices(labels)?;
    touch_matrix_from_indices(&labels.shape, &labels.strides, &prescan, strategy)
}

pub(crate) fn touch_matrix_from_indices<const N: usize>(
    shape: &[usize; N],
    strides: &[usize; N],
    prescan: &LabelIndices,
    strategy: ExecutionStrategy,
) -> Result<TouchMatrix, ImgprocError> {
    let size = matrix_size(prescan.max_label)?;
    let indices = &prescan.indices;

    if indices.is_empty() {
        log::debug!("touch matrix of an empty label grid");
    }

    // concurrent writes only ever store `true`, so ordering between them is irrelevant
    let cells: Vec<AtomicBool> = (0..size * size).map(|_| AtomicBool::new(false)).collect();

    parallel::for_each_index(indices.len(), strategy, |offset| {
        let a = indices[offset];
        for_each_forward_neighbor(shape, strides, offset, |neighbor| {
            let b = indices[neighbor];
            if a != b {
                cells[a * size + b].store(true, Ordering::Relaxed);
                cells[b * size + a].store(true, Ordering::Relaxed);
            }
        });
    })?;

    let data: Vec<bool> = cells.into_iter().map(AtomicBool::into_inner).collect();
    log::debug!("built touch matrix for {} labels", size - 1);

    Ok(TouchMatrix { size, data })
}

/// Row count of a matrix covering labels `0..=max_label`, with `size * size` cells addressable.
fn matrix_size(max_label: usize) -> Result<usize, ImgprocError> {
    max_label
        .checked_add(1)
        .filter(|size| size.checked_mul(*size).is_some())
        .ok_or_else(|| {
            ImgprocError::InvalidLabel(format!("label {max_label} cannot size a touch matrix"))
        })
}

/// Check that a per-label vector has one entry per row of `matrix`.
pub(crate) fn check_vector_length(matrix: &TouchMatrix, length: usize) -> Result<(), ImgprocError> {
    if length != matrix.size() {
        return Err(ImgprocError::InvalidVectorLength {
            labels: matrix.size(),
            length,
        });
    }
    Ok(())
}

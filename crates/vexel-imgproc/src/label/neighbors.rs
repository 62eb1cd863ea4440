use rayon::prelude::*;

use super::touch_matrix::{check_vector_length, TouchMatrix};
use crate::error::ImgprocError;

/// Count how many labels touch each label.
///
/// The result has one entry per row of `matrix`. Background is neither counted as a
/// neighbour nor given a count of its own: `count[0]` is always 0.
///
/// # Example
///
/// ```
/// use vexel_imgproc::label::{count_touching_neighbors, TouchMatrix};
///
/// let m = TouchMatrix::from_pairs(3, &[(0, 1), (1, 2), (2, 3)]).unwrap();
/// assert_eq!(count_touching_neighbors(&m), vec![0, 1, 2, 1]);
/// ```
pub fn count_touching_neighbors(matrix: &TouchMatrix) -> Vec<u32> {
    let mut counts: Vec<u32> = (0..matrix.size())
        .into_par_iter()
        .map(|i| matrix.neighbors(i).count() as u32)
        .collect();
    // background is not a neighbour for measurement purposes
    counts[0] = 0;
    counts
}

/// The statistic computed over the values of a label's touching neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborStatistic {
    /// Arithmetic mean.
    Mean,
    /// Population standard deviation (divides by the number of neighbours).
    #[default]
    StandardDeviation,
    /// Smallest value.
    Minimum,
    /// Largest value.
    Maximum,
    /// Median; the mean of the two central values for an even number of neighbours.
    Median,
}

impl NeighborStatistic {
    fn compute(&self, values: &mut [f64]) -> f64 {
        let n = values.len() as f64;
        match self {
            NeighborStatistic::Mean => values.iter().sum::<f64>() / n,
            NeighborStatistic::StandardDeviation => {
                let (sum, sum_sq) = values
                    .iter()
                    .fold((0.0, 0.0), |(s, sq), &v| (s + v, sq + v * v));
                let mean = sum / n;
                (sum_sq / n - mean * mean).max(0.0).sqrt()
            }
            NeighborStatistic::Minimum => values.iter().copied().fold(f64::INFINITY, f64::min),
            NeighborStatistic::Maximum => {
                values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            }
            NeighborStatistic::Median => {
                values.sort_by(f64::total_cmp);
                let mid = values.len() / 2;
                if values.len() % 2 == 0 {
                    0.5 * (values[mid - 1] + values[mid])
                } else {
                    values[mid]
                }
            }
        }
    }
}

/// Compute, for every label, a statistic over the values of its touching neighbours.
///
/// `values` holds one value per label (typically the output of
/// [`count_touching_neighbors`]). For label `i` the statistic is taken over
/// `values[j]` for every label `j >= 1` touching `i`. Labels without touching
/// neighbours, and background, get exactly 0.
///
/// # Errors
///
/// Returns [`ImgprocError::InvalidVectorLength`] if `values` does not have one entry
/// per row of `matrix`.
pub fn statistic_of_touching_neighbors<V>(
    values: &[V],
    matrix: &TouchMatrix,
    statistic: NeighborStatistic,
) -> Result<Vec<f32>, ImgprocError>
where
    V: Copy + Into<f64> + Sync,
{
    check_vector_length(matrix, values.len())?;

    let stats = (0..matrix.size())
        .into_par_iter()
        .map(|i| {
            if i == 0 {
                return 0.0;
            }
            let mut neighbor_values: Vec<f64> =
                matrix.neighbors(i).map(|j| values[j].into()).collect();
            if neighbor_values.is_empty() {
                return 0.0;
            }
            statistic.compute(&mut neighbor_values) as f32
        })
        .collect();

    Ok(stats)
}

/// Population standard deviation of the neighbours' values, per label.
///
/// # Example
///
/// ```
/// use vexel_imgproc::label::{
///     count_touching_neighbors, standard_deviation_of_touching_neighbors, TouchMatrix,
/// };
///
/// // 1 touches 2 and 3, 3 also touches 4
/// let m = TouchMatrix::from_pairs(4, &[(1, 2), (1, 3), (3, 4)]).unwrap();
/// let counts = count_touching_neighbors(&m);
/// assert_eq!(counts, vec![0, 2, 1, 2, 1]);
///
/// let std = standard_deviation_of_touching_neighbors(&counts, &m).unwrap();
/// assert_eq!(std[1], 0.5);
/// assert_eq!(std[2], 0.0);
/// ```
pub fn standard_deviation_of_touching_neighbors<V>(
    values: &[V],
    matrix: &TouchMatrix,
) -> Result<Vec<f32>, ImgprocError>
where
    V: Copy + Into<f64> + Sync,
{
    statistic_of_touching_neighbors(values, matrix, NeighborStatistic::StandardDeviation)
}

/// Mean of the neighbours' values, per label.
pub fn mean_of_touching_neighbors<V>(
    values: &[V],
    matrix: &TouchMatrix,
) -> Result<Vec<f32>, ImgprocError>
where
    V: Copy + Into<f64> + Sync,
{
    statistic_of_touching_neighbors(values, matrix, NeighborStatistic::Mean)
}

/// Minimum of the neighbours' values, per label.
pub fn minimum_of_touching_neighbors<V>(
    values: &[V],
    matrix: &TouchMatrix,
) -> Result<Vec<f32>, ImgprocError>
where
    V: Copy + Into<f64> + Sync,
{
    statistic_of_touching_neighbors(values, matrix, NeighborStatistic::Minimum)
}

/// Maximum of the neighbours' values, per label.
pub fn maximum_of_touching_neighbors<V>(
    values: &[V],
    matrix: &TouchMatrix,
) -> Result<Vec<f32>, ImgprocError>
where
    V: Copy + Into<f64> + Sync,
{
    statistic_of_touching_neighbors(values, matrix, NeighborStatistic::Maximum)
}

/// Median of the neighbours' values, per label.
pub fn median_of_touching_neighbors<V>(
    values: &[V],
    matrix: &TouchMatrix,
) -> Result<Vec<f32>, ImgprocError>
where
    V: Copy + Into<f64> + Sync,
{
    statistic_of_touching_neighbors(values, matrix, NeighborStatistic::Median)
}

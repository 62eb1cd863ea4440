use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride for AutoRows must be valid.
    #[error("row stride must be > 0 for AutoRows strategy")]
    InvalidRowStride(usize),

    /// Input and output sizes do not match.
    #[error("source and destination slices must have the same length")]
    SizeMismatch,
}

/// Controls how parallel operations are executed.
///
/// Every strategy produces the same result; they only differ in how the work is
/// split across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process every element in parallel.
    #[default]
    ParallelElements,

    /// Use the global Rayon thread pool to process rows (chunks) in parallel.
    ///
    /// You must provide the row stride, usually the extent of the last axis.
    AutoRows(usize),

    /// Run sequentially on the current thread.
    ///
    /// Useful for small grids, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Check the strategy parameters before any work is scheduled.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match *self {
            ExecutionStrategy::AutoRows(0) => Err(ParallelError::InvalidRowStride(0)),
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

fn build_pool(n: usize) -> Result<rayon::ThreadPool, ParallelError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))
}

/// Trait to execute operations on a slice with a given strategy.
pub trait ExecuteExt<T> {
    /// Execute an operation on every (source, destination) element pair.
    ///
    /// # Arguments
    ///
    /// * `strategy` - The execution strategy.
    /// * `dst` - The destination slice, same length as the source.
    /// * `op` - The operation to perform on each (source, destination) element pair.
    fn execute_with<U, F>(
        &self,
        strategy: ExecutionStrategy,
        dst: &mut [U],
        op: F,
    ) -> Result<(), ParallelError>
    where
        U: Send,
        F: Fn((&T, &mut U)) + Sync + Send;
}

impl<T: Sync + Send> ExecuteExt<T> for &[T] {
    fn execute_with<U, F>(
        &self,
        strategy: ExecutionStrategy,
        dst: &mut [U],
        op: F,
    ) -> Result<(), ParallelError>
    where
        U: Send,
        F: Fn((&T, &mut U)) + Sync + Send,
    {
        if self.len() != dst.len() {
            return Err(ParallelError::SizeMismatch);
        }
        strategy.validate()?;

        match strategy {
            ExecutionStrategy::Serial => {
                self.iter().zip(dst.iter_mut()).for_each(op);
            }
            ExecutionStrategy::ParallelElements => {
                self.par_iter().zip(dst.par_iter_mut()).for_each(op);
            }
            ExecutionStrategy::AutoRows(stride) => {
                self.par_chunks(stride)
                    .zip(dst.par_chunks_mut(stride))
                    .for_each(|(src_row, dst_row)| {
                        src_row.iter().zip(dst_row.iter_mut()).for_each(&op);
                    });
            }
            ExecutionStrategy::Fixed(n) => {
                build_pool(n)?.install(|| {
                    self.par_iter().zip(dst.par_iter_mut()).for_each(op);
                });
            }
        }
        Ok(())
    }
}

/// Execute an operation on every destination element together with its flat index.
///
/// Used by stencil operations that read neighbours from a separate snapshot.
pub fn execute_indexed<U, F>(
    dst: &mut [U],
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), ParallelError>
where
    U: Send,
    F: Fn(usize, &mut U) + Sync + Send,
{
    strategy.validate()?;

    match strategy {
        ExecutionStrategy::Serial => {
            dst.iter_mut().enumerate().for_each(|(i, d)| op(i, d));
        }
        ExecutionStrategy::ParallelElements => {
            dst.par_iter_mut().enumerate().for_each(|(i, d)| op(i, d));
        }
        ExecutionStrategy::AutoRows(stride) => {
            dst.par_chunks_mut(stride)
                .enumerate()
                .for_each(|(row, dst_row)| {
                    let base = row * stride;
                    dst_row
                        .iter_mut()
                        .enumerate()
                        .for_each(|(i, d)| op(base + i, d));
                });
        }
        ExecutionStrategy::Fixed(n) => {
            build_pool(n)?.install(|| {
                dst.par_iter_mut().enumerate().for_each(|(i, d)| op(i, d));
            });
        }
    }
    Ok(())
}

/// Visit every index in `0..len` with the given strategy.
///
/// The closure must only write to shared state through atomics.
pub fn for_each_index<F>(
    len: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), ParallelError>
where
    F: Fn(usize) + Sync + Send,
{
    strategy.validate()?;

    match strategy {
        ExecutionStrategy::Serial => {
            (0..len).for_each(op);
        }
        ExecutionStrategy::ParallelElements => {
            (0..len).into_par_iter().for_each(op);
        }
        ExecutionStrategy::AutoRows(stride) => {
            (0..len.div_ceil(stride)).into_par_iter().for_each(|row| {
                let start = row * stride;
                (start..(start + stride).min(len)).for_each(&op);
            });
        }
        ExecutionStrategy::Fixed(n) => {
            build_pool(n)?.install(|| {
                (0..len).into_par_iter().for_each(op);
            });
        }
    }
    Ok(())
}

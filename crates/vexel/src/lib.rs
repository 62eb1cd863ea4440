//! `vexel`: label-grid statistics and nonzero propagation primitives.
//!
//! ```rust
//! use vexel::imgproc::{label, parallel::ExecutionStrategy};
//! use vexel::tensor::Tensor2;
//!
//! let labels = Tensor2::<u32>::from_shape_vec([2, 2], vec![1, 2, 1, 2]).unwrap();
//! let matrix = label::build_touch_matrix(&labels, ExecutionStrategy::Serial).unwrap();
//! assert!(matrix.get(1, 2));
//! ```

#[doc(inline)]
pub use vexel_tensor as tensor;

#[doc(inline)]
pub use vexel_imgproc as imgproc;

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `vexel-tensor` provides the grid container every `vexel` operation works on: a
//! row-major, owned N-dimensional array with its shape and strides. Label images and
//! intensity images are both plain tensors; the element type tells them apart.
//!
//! # Quick Start
//!
//! ```rust
//! use vexel_tensor::{Tensor2, Tensor3};
//!
//! // a 2x3 label image
//! let labels = Tensor2::<u32>::from_shape_vec([2, 3], vec![1, 1, 2, 0, 2, 2]).unwrap();
//! assert_eq!(labels.get([0, 2]), Some(&2));
//! assert!(labels.get([2, 0]).is_none());
//!
//! // a 2x2x2 intensity volume
//! let volume = Tensor3::<f32>::from_shape_fn([2, 2, 2], |[z, y, x]| (z + y + x) as f32).unwrap();
//! assert_eq!(volume.numel(), 8);
//! assert_eq!(*volume.get_unchecked([1, 1, 1]), 3.0);
//! ```

/// Serde module for serialization and deserialization of tensors.
///
/// Only available with the `serde` feature.
#[cfg(feature = "serde")]
pub mod serde;

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::tensor::get_strides_from_shape;
pub use crate::tensor::{Tensor, TensorError};

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

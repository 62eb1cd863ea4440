#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the image processing operations.
pub mod error;

/// intensity substitution module.
pub mod intensity;

/// label image measurements module.
pub mod label;

/// morphological operations module.
pub mod morphology;

/// face-neighbourhood utilities for 2D and 3D grids.
pub mod neighborhood;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::error::ImgprocError;

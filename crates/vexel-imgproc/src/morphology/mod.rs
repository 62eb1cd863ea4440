//! Morphological operations on 2D and 3D grids.

mod nonzero_minimum;

pub use nonzero_minimum::*;

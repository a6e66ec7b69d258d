//! Geometric primitives shared by the spin models and the symmetry layer.

pub mod directions;
pub mod geometry;

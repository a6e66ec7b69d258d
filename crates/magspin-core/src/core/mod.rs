//! # Core Module
//!
//! The foundation layer of magspin: stateless geometry, the spin and structure
//! models, the symmetry collaborators and file formats.
//!
//! - **Geometry** ([`utils`]) - Rotation matrices (Rodrigues' formula), minimal
//!   rotations between vectors, reference-frame construction and reflections
//! - **Models** ([`models`]) - Spin vectors, angles, sites and structures
//! - **Symmetry** ([`symmetry`]) - The orbit oracle contract and a concrete
//!   operation-list group with point and moment actions
//! - **File I/O** ([`io`]) - TOML structure files and CSV image tables

pub mod io;
pub mod models;
pub mod symmetry;
pub mod utils;

//! # magspin Core Library
//!
//! Spin-vector geometry for magnetic crystallography: orientation conversions
//! (Cartesian vector, spherical angles, rotation matrix, Euler angles), rotations and
//! reflections of spins, and symmetry images of magnetic sites under a space group.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SpinVector`, `MagneticSite`,
//!   `MagneticStructure`), symmetry operations and the `OrbitOracle` contract, geometric
//!   helpers (Rodrigues rotations, frame construction, reflections), and file I/O.
//!
//! - **[`engine`]: Settings and Errors.** The `ExpansionConfig` used when generating site
//!   images and the errors raised while doing so.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures such as expanding a structure
//!   into all of its symmetry-equivalent sites with transformed spins.

pub mod core;
pub mod engine;
pub mod workflows;

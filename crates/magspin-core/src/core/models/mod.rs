//! # Core Models Module
//!
//! Data structures describing magnetic crystal structures.
//!
//! ## Key Components
//!
//! - [`spin`] - The spin vector: direction, moment and reference frame, with all
//!   orientation conversions and in-place transformations
//! - [`angles`] - Angle units, spherical angles and Euler angles
//! - [`site`] - A crystallographic site optionally carrying a spin
//! - [`structure`] - A named collection of sites keyed by [`ids::SiteId`]
//! - [`image`] - A symmetry-generated copy of a site
//!
//! ## Usage
//!
//! ```ignore
//! use magspin::core::models::{angles::AngleUnit, spin::SpinVector};
//! use nalgebra::Vector3;
//!
//! let mut spin = SpinVector::from_angles(0.0, 90.0, Some(2.2), AngleUnit::Degrees, None)?;
//! spin.rotate(&Vector3::z(), 90.0, AngleUnit::Degrees)?;
//! let (theta, phi) = spin.angles()?.to_degrees();
//! ```

pub mod angles;
pub mod ids;
pub mod image;
pub mod site;
pub mod spin;
pub mod structure;

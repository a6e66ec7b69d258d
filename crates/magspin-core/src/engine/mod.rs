//! # Engine Module
//!
//! Settings and error types shared by the structure workflows.
//!
//! - **Configuration** ([`config`]) - Position tolerance and wrapping behaviour used when
//!   expanding sites into their symmetry images.
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping configuration and
//!   geometry failures.

pub mod config;
pub mod error;

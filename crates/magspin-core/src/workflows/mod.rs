//! # Workflows Module
//!
//! High-level procedures that combine the `core` models with `engine` settings.
//!
//! - **Expansion Workflow** ([`expand`]) - Generates every symmetry-equivalent image of
//!   each site in a magnetic structure, carrying the transformed spin along with the
//!   transformed position.

pub mod expand;

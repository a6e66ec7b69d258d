//! File formats for reading magnetic structures and writing their symmetry images.
//!
//! - [`structure_file`] loads a structure, its symmetry operations and optional
//!   processing settings from TOML.
//! - [`image_table`] writes expanded site images as CSV.

pub mod image_table;
pub mod structure_file;

//! Symmetry collaborators of the spin engine.
//!
//! The engine itself only depends on [`orbit::OrbitOracle`]. The operation and group
//! types provide a concrete oracle built from Jones-faithful operation strings, with
//! separate actions on positions (polar, translated) and on magnetic moments (axial,
//! optionally time-reversed).

pub mod group;
pub mod operation;
pub mod orbit;

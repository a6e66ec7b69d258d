use magspin::core::models::angles::{AngleUnit, EulerAngles};
use magspin::core::models::spin::SpinVector;
use nalgebra::{Matrix3, Vector3};

const DECIMALS: usize = 6;
const DISPLAY_ZERO: f64 = 5e-7;

/// Snaps values that would print as `-0.000000` or `0.000000` to a clean zero.
fn clean(value: f64) -> f64 {
    if value.abs() < DISPLAY_ZERO { 0.0 } else { value }
}

pub fn format_scalar(value: f64) -> String {
    format!("{:.*}", DECIMALS, clean(value))
}

pub fn format_vector(vector: &Vector3<f64>) -> String {
    format!(
        "[{}, {}, {}]",
        format_scalar(vector.x),
        format_scalar(vector.y),
        format_scalar(vector.z)
    )
}

pub fn format_matrix(matrix: &Matrix3<f64>) -> String {
    matrix
        .row_iter()
        .map(|row| format!("  {}", format_vector(&row.transpose())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats an angle given in radians in the requested unit.
pub fn format_angle(radians: f64, unit: AngleUnit) -> String {
    let value = format_scalar(unit.from_radians(radians));
    match unit {
        AngleUnit::Degrees => format!("{value} deg"),
        AngleUnit::Radians => format!("{value} rad"),
    }
}

pub fn format_euler(angles: &EulerAngles, unit: AngleUnit) -> String {
    format!(
        "alpha = {}, beta = {}, gamma = {}",
        format_angle(angles.alpha, unit),
        format_angle(angles.beta, unit),
        format_angle(angles.gamma, unit)
    )
}

/// One-line summary of a spin: direction, moment and reference normal.
pub fn format_spin(spin: &SpinVector) -> String {
    format!(
        "vector {}  moment {}  normal {}",
        format_vector(&spin.vector()),
        format_scalar(spin.m()),
        format_vector(&spin.normal())
    )
}

use nalgebra::Vector3;
use phf::{Map, phf_map};
use thiserror::Error;

static NAMED_DIRECTIONS: Map<&'static str, [f64; 3]> = phf_map! {
    "x" => [1.0, 0.0, 0.0], "+x" => [1.0, 0.0, 0.0], "-x" => [-1.0, 0.0, 0.0],
    "y" => [0.0, 1.0, 0.0], "+y" => [0.0, 1.0, 0.0], "-y" => [0.0, -1.0, 0.0],
    "z" => [0.0, 0.0, 1.0], "+z" => [0.0, 0.0, 1.0], "-z" => [0.0, 0.0, -1.0],
    "[100]" => [1.0, 0.0, 0.0], "[010]" => [0.0, 1.0, 0.0], "[001]" => [0.0, 0.0, 1.0],
    "[110]" => [1.0, 1.0, 0.0], "[101]" => [1.0, 0.0, 1.0], "[011]" => [0.0, 1.0, 1.0],
    "[111]" => [1.0, 1.0, 1.0],
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectionParseError {
    #[error("Direction cannot be empty")]
    Empty,

    #[error("Expected three comma-separated components or a named direction, got '{0}'")]
    Malformed(String),

    #[error("Component '{component}' of direction '{input}' is not a number")]
    InvalidComponent { component: String, input: String },
}

/// Looks up a named direction such as `x`, `-z` or `[111]` (case-insensitive).
pub fn named_direction(name: &str) -> Option<Vector3<f64>> {
    NAMED_DIRECTIONS
        .get(name.trim().to_ascii_lowercase().as_str())
        .map(|&[x, y, z]| Vector3::new(x, y, z))
}

/// Parses either a named direction or an explicit `x,y,z` triple.
///
/// Whitespace around components is ignored, so `"1, 0, -2"` and `"-z"` are both accepted.
pub fn parse_direction(input: &str) -> Result<Vector3<f64>, DirectionParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DirectionParseError::Empty);
    }
    if let Some(direction) = named_direction(trimmed) {
        return Ok(direction);
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(DirectionParseError::Malformed(trimmed.to_string()));
    }

    let mut components = [0.0; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|_| DirectionParseError::InvalidComponent {
                component: part.to_string(),
                input: trimmed.to_string(),
            })?;
    }
    Ok(Vector3::from(components))
}

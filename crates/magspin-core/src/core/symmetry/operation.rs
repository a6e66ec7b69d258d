use nalgebra::{Matrix3, Vector3};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];
const DENOMINATORS: [i64; 7] = [1, 2, 3, 4, 6, 8, 12];
const FRACTION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum OperationParseError {
    #[error("Expected 3 or 4 comma-separated fields in '{0}'")]
    FieldCount(String),

    #[error("Invalid term '{term}' in '{expression}'")]
    InvalidTerm { term: String, expression: String },

    #[error("Invalid time-reversal flag '{0}'; expected '+1' or '-1'")]
    TimeReversal(String),
}

/// A Seitz operator `{R | t}` with an optional time-reversal flag.
///
/// The rotation part acts on fractional coordinates as `R · p + t`. Spins are
/// axial vectors, so they transform with the proper part of `R` only and flip
/// sign under time reversal.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOperation {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    pub time_reversal: bool,
}

impl SymmetryOperation {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
            time_reversal: false,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    pub fn with_time_reversal(mut self, time_reversal: bool) -> Self {
        self.time_reversal = time_reversal;
        self
    }

    /// Parses Jones-faithful notation such as `-y,x-y,z+1/3`.
    ///
    /// A fourth field `+1` or `-1` marks the absence or presence of time reversal,
    /// as in magnetic CIF files.
    pub fn parse(text: &str) -> Result<Self, OperationParseError> {
        let fields: Vec<&str> = text.split(',').map(str::trim).collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(OperationParseError::FieldCount(text.to_string()));
        }

        let mut rotation = Matrix3::zeros();
        let mut translation = Vector3::zeros();
        for (row, field) in fields.iter().take(3).enumerate() {
            let (coefficients, shift) = parse_component(field)?;
            for (col, coefficient) in coefficients.iter().enumerate() {
                rotation[(row, col)] = *coefficient;
            }
            translation[row] = shift;
        }

        let time_reversal = match fields.get(3) {
            None => false,
            Some(&"1") | Some(&"+1") => false,
            Some(&"-1") => true,
            Some(other) => return Err(OperationParseError::TimeReversal(other.to_string())),
        };

        Ok(Self {
            rotation,
            translation,
            time_reversal,
        })
    }

    pub fn is_identity(&self) -> bool {
        !self.time_reversal
            && (self.rotation - Matrix3::identity()).amax() < FRACTION_TOLERANCE
            && self.translation.amax() < FRACTION_TOLERANCE
    }

    pub fn determinant(&self) -> f64 {
        self.rotation.determinant()
    }

    /// Maps a point: `R · p + t`.
    pub fn apply_to_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * point + self.translation
    }

    /// Maps an axial vector such as a magnetic moment: `±det(R) · R · s`,
    /// negated again under time reversal. Translations do not act on moments.
    pub fn apply_to_moment(&self, moment: &Vector3<f64>) -> Vector3<f64> {
        let mut sign = self.determinant().signum();
        if self.time_reversal {
            sign = -sign;
        }
        self.rotation * moment * sign
    }
}

impl Default for SymmetryOperation {
    fn default() -> Self {
        Self::identity()
    }
}

impl FromStr for SymmetryOperation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_component(expression: &str) -> Result<([f64; 3], f64), OperationParseError> {
    let compact: String = expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let invalid = |term: &str| OperationParseError::InvalidTerm {
        term: term.to_string(),
        expression: expression.to_string(),
    };
    if compact.is_empty() {
        return Err(invalid(""));
    }

    let mut terms = Vec::new();
    let mut start = 0;
    for (i, c) in compact.char_indices() {
        if (c == '+' || c == '-') && i > start {
            terms.push(&compact[start..i]);
            start = i;
        }
    }
    terms.push(&compact[start..]);

    let mut coefficients = [0.0; 3];
    let mut shift = 0.0;
    for term in terms {
        let (sign, body) = match term.as_bytes().first() {
            Some(b'-') => (-1.0, &term[1..]),
            Some(b'+') => (1.0, &term[1..]),
            _ => (1.0, term),
        };
        if body.is_empty() {
            return Err(invalid(term));
        }

        match body.chars().last().and_then(|c| AXIS_NAMES.iter().position(|&a| a == c)) {
            Some(axis) => {
                let factor = body[..body.len() - 1].trim_end_matches('*');
                let factor = if factor.is_empty() {
                    1.0
                } else {
                    parse_number(factor).ok_or_else(|| invalid(term))?
                };
                coefficients[axis] += sign * factor;
            }
            None => shift += sign * parse_number(body).ok_or_else(|| invalid(term))?,
        }
    }
    Ok((coefficients, shift))
}

fn parse_number(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            (denominator != 0.0).then(|| numerator / denominator)
        }
        None => text.parse().ok(),
    }
}

fn format_number(value: f64) -> String {
    for denominator in DENOMINATORS {
        let numerator = value * denominator as f64;
        if (numerator - numerator.round()).abs() < FRACTION_TOLERANCE {
            let numerator = numerator.round() as i64;
            return if denominator == 1 {
                numerator.abs().to_string()
            } else {
                format!("{}/{}", numerator.abs(), denominator)
            };
        }
    }
    format!("{}", value.abs())
}

fn format_component(coefficients: [f64; 3], shift: f64) -> String {
    let mut out = String::new();
    for (axis, coefficient) in coefficients.iter().enumerate() {
        if coefficient.abs() < FRACTION_TOLERANCE {
            continue;
        }
        if *coefficient < 0.0 {
            out.push('-');
        } else if !out.is_empty() {
            out.push('+');
        }
        if (coefficient.abs() - 1.0).abs() >= FRACTION_TOLERANCE {
            out.push_str(&format_number(*coefficient));
        }
        out.push(AXIS_NAMES[axis]);
    }
    if shift.abs() >= FRACTION_TOLERANCE {
        out.push(if shift < 0.0 { '-' } else { '+' });
        out.push_str(&format_number(shift));
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

impl fmt::Display for SymmetryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = (0..3)
            .map(|row| {
                let coefficients = [
                    self.rotation[(row, 0)],
                    self.rotation[(row, 1)],
                    self.rotation[(row, 2)],
                ];
                format_component(coefficients, self.translation[row])
            })
            .collect();
        write!(f, "{}", rows.join(","))?;
        if self.time_reversal {
            write!(f, ",-1")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn assert_vector_close(actual: &Vector3<f64>, expected: &Vector3<f64>) {
        assert!(
            (actual - expected).amax() < TOLERANCE,
            "vectors differ: {actual:?} vs {expected:?}"
        );
    }

    #[test]
    fn parse_identity() {
        let op = SymmetryOperation::parse("x,y,z").unwrap();
        assert!(op.is_identity());
        assert_eq!(op, SymmetryOperation::identity());
    }

    #[test]
    fn parse_hexagonal_operation_with_translation() {
        let op: SymmetryOperation = "-y, x-y, z+1/3".parse().unwrap();
        let expected_rotation = Matrix3::new(0.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(op.rotation, expected_rotation);
        assert_vector_close(&op.translation, &Vector3::new(0.0, 0.0, 1.0 / 3.0));
        assert!(!op.time_reversal);
    }

    #[test]
    fn parse_leading_translation_and_uppercase() {
        let op = SymmetryOperation::parse("1/2+X,-Y,1/4-Z").unwrap();
        assert_eq!(
            op.rotation,
            Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0))
        );
        assert_vector_close(&op.translation, &Vector3::new(0.5, 0.0, 0.25));
    }

    #[test]
    fn parse_explicit_coefficients_and_decimals() {
        let op = SymmetryOperation::parse("2x, 0.5*y, -z+0.25").unwrap();
        assert_eq!(op.rotation[(0, 0)], 2.0);
        assert_eq!(op.rotation[(1, 1)], 0.5);
        assert_eq!(op.rotation[(2, 2)], -1.0);
        assert_eq!(op.translation[2], 0.25);
    }

    #[test]
    fn parse_time_reversal_flag() {
        let primed = SymmetryOperation::parse("-x,-y,z,-1").unwrap();
        assert!(primed.time_reversal);
        let unprimed = SymmetryOperation::parse("-x,-y,z,+1").unwrap();
        assert!(!unprimed.time_reversal);
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        assert!(matches!(
            SymmetryOperation::parse("x,y"),
            Err(OperationParseError::FieldCount(_))
        ));
        assert!(matches!(
            SymmetryOperation::parse("x,y,z,1,2"),
            Err(OperationParseError::FieldCount(_))
        ));
    }

    #[test]
    fn parse_rejects_malformed_terms() {
        for text in ["x,y,w", "x,,z", "x,y,z+", "x,y,1/0", "x,--y,z"] {
            assert!(
                matches!(
                    SymmetryOperation::parse(text),
                    Err(OperationParseError::InvalidTerm { .. })
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn parse_rejects_unknown_time_reversal_flag() {
        assert_eq!(
            SymmetryOperation::parse("x,y,z,2"),
            Err(OperationParseError::TimeReversal("2".to_string()))
        );
    }

    #[test]
    fn apply_to_point_adds_translation() {
        let op = SymmetryOperation::parse("-x,-y,z+1/2").unwrap();
        assert_vector_close(
            &op.apply_to_point(&Vector3::new(0.1, 0.2, 0.3)),
            &Vector3::new(-0.1, -0.2, 0.8),
        );
    }

    #[test]
    fn apply_to_moment_ignores_translation_and_inversion() {
        let inversion = SymmetryOperation::parse("-x,-y,-z+1/2").unwrap();
        let s = Vector3::new(0.3, -0.4, 0.5);
        assert_vector_close(&inversion.apply_to_moment(&s), &s);
    }

    #[test]
    fn apply_to_moment_treats_mirror_as_axial() {
        let mirror_z = SymmetryOperation::parse("x,y,-z").unwrap();
        let s = Vector3::new(1.0, 2.0, 3.0);
        assert_vector_close(&mirror_z.apply_to_moment(&s), &Vector3::new(-1.0, -2.0, 3.0));
    }

    #[test]
    fn apply_to_moment_flips_under_time_reversal() {
        let op = SymmetryOperation::identity().with_time_reversal(true);
        assert_vector_close(&op.apply_to_moment(&Vector3::z()), &-Vector3::z());
        assert!(!op.is_identity());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["x,y,z", "-y,x-y,z+1/3", "-x+1/2,y,-z+3/4,-1", "x-y,-y,-z"] {
            let op = SymmetryOperation::parse(text).unwrap();
            assert_eq!(op.to_string(), text);
            assert_eq!(SymmetryOperation::parse(&op.to_string()).unwrap(), op);
        }
    }
}

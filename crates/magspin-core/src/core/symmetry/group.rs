use super::operation::{OperationParseError, SymmetryOperation};
use super::orbit::OrbitOracle;
use nalgebra::Vector3;
use tracing::warn;

const DETERMINANT_TOLERANCE: f64 = 1e-6;

/// An ordered list of symmetry operations standing in for a (magnetic) space group.
///
/// As an [`OrbitOracle`] the group maps points: it returns one image per operation,
/// in operation order, without wrapping or deduplication. [`SymmetryGroup::moments`]
/// exposes the same operations acting on axial vectors, so that the `i`-th spin
/// image always corresponds to the `i`-th position image.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryGroup {
    operations: Vec<SymmetryOperation>,
}

impl SymmetryGroup {
    pub fn new(operations: Vec<SymmetryOperation>) -> Self {
        for (index, operation) in operations.iter().enumerate() {
            let det = operation.determinant();
            if (det.abs() - 1.0).abs() > DETERMINANT_TOLERANCE {
                warn!(
                    "Symmetry operation #{} ('{}') has determinant {:.6}; images will not preserve length.",
                    index, operation, det
                );
            }
        }
        Self { operations }
    }

    /// The trivial group containing only the identity.
    pub fn identity() -> Self {
        Self {
            operations: vec![SymmetryOperation::identity()],
        }
    }

    /// Parses a list of Jones-faithful operation strings.
    ///
    /// # Errors
    ///
    /// Returns the index of the first malformed operation together with its parse error.
    pub fn from_strings<I, S>(operations: I) -> Result<Self, (usize, OperationParseError)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let operations = operations
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                SymmetryOperation::parse(text.as_ref()).map_err(|e| (index, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(operations))
    }

    pub fn operations(&self) -> &[SymmetryOperation] {
        &self.operations
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymmetryOperation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn contains_identity(&self) -> bool {
        self.operations.iter().any(SymmetryOperation::is_identity)
    }

    /// A view of this group acting on magnetic moments.
    pub fn moments(&self) -> MomentOrbit<'_> {
        MomentOrbit { group: self }
    }
}

impl Default for SymmetryGroup {
    fn default() -> Self {
        Self::identity()
    }
}

impl OrbitOracle for SymmetryGroup {
    fn get_orbit(&self, point: &Vector3<f64>) -> Vec<Vector3<f64>> {
        self.operations
            .iter()
            .map(|op| op.apply_to_point(point))
            .collect()
    }
}

/// The operations of a [`SymmetryGroup`] applied to axial vectors.
#[derive(Debug, Clone, Copy)]
pub struct MomentOrbit<'a> {
    group: &'a SymmetryGroup,
}

impl OrbitOracle for MomentOrbit<'_> {
    fn get_orbit(&self, moment: &Vector3<f64>) -> Vec<Vector3<f64>> {
        self.group
            .operations
            .iter()
            .map(|op| op.apply_to_moment(moment))
            .collect()
    }
}

/// Reduces fractional coordinates into `[0, 1)`.
///
/// Components within `tolerance` of `1` are folded onto `0`.
pub fn wrap_fractional(point: &Vector3<f64>, tolerance: f64) -> Vector3<f64> {
    point.map(|c| {
        let wrapped = c - c.floor();
        if (1.0 - wrapped).abs() <= tolerance {
            0.0
        } else {
            wrapped
        }
    })
}

/// Distance between two fractional positions, optionally under periodic boundaries.
pub fn fractional_distance(a: &Vector3<f64>, b: &Vector3<f64>, periodic: bool) -> f64 {
    let delta = a - b;
    if periodic {
        delta.map(|d| d - d.round()).norm()
    } else {
        delta.norm()
    }
}

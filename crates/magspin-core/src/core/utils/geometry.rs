use nalgebra::{Matrix3, Unit, Vector3};
use thiserror::Error;

/// Relative in-plane magnitude below which a direction is treated as lying on the pole.
pub const POLE_TOLERANCE: f64 = 1e-12;

/// Distance of `cos(angle)` from `-1` below which two directions are treated as anti-parallel.
pub const ANTIPARALLEL_TOLERANCE: f64 = 1e-12;

/// Errors raised by the spin geometry routines.
///
/// The first three variants form the domain-error family: they are raised when an
/// operation is asked to work on a direction that does not exist (a zero-length
/// vector, or one with non-finite components). The last variant is a shape error raised
/// by matrix application.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("Rotation axis must be a finite, non-zero vector")]
    ZeroLengthAxis,

    #[error("Reference normal must be a finite, non-zero vector")]
    ZeroLengthNormal,

    #[error("Cannot compute the {quantity} of a zero-length or non-finite spin vector")]
    ZeroNormVector { quantity: &'static str },

    #[error("Expected a 3x3 or 4x4 matrix, got {rows}x{cols}")]
    InvalidMatrixShape { rows: usize, cols: usize },
}

impl GeometryError {
    /// Returns `true` for errors caused by a degenerate (zero-length or non-finite) direction.
    pub fn is_domain(&self) -> bool {
        !matches!(self, GeometryError::InvalidMatrixShape { .. })
    }
}

/// An orthonormal, right-handed frame derived from a reference normal.
///
/// The `z` axis is always the normalized reference normal; `x` and `y` complete the
/// frame following the construction in [`generate_cart_axes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianAxes {
    pub x: Vector3<f64>,
    pub y: Vector3<f64>,
    pub z: Vector3<f64>,
}

impl CartesianAxes {
    /// The global frame: `x`, `y` and `z` along the coordinate axes.
    pub fn canonical() -> Self {
        Self {
            x: Vector3::x(),
            y: Vector3::y(),
            z: Vector3::z(),
        }
    }

    /// Builds the frame whose polar axis is `normal`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthNormal`] if `normal` is the zero vector.
    pub fn from_normal(normal: &Vector3<f64>) -> Result<Self, GeometryError> {
        let (z, x, y) = generate_cart_axes(normal)?;
        Ok(Self { x, y, z })
    }

    /// Returns the frame as a matrix whose columns are `x`, `y` and `z`.
    pub fn as_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[self.x, self.y, self.z])
    }

    /// Checks orthonormality and handedness within `tolerance`.
    pub fn is_right_handed(&self, tolerance: f64) -> bool {
        let basis = self.as_matrix();
        let gram = basis.transpose() * basis;
        (gram - Matrix3::identity()).amax() <= tolerance
            && (basis.determinant() - 1.0).abs() <= tolerance
    }
}

/// Euclidean norm of `v`, computed on `v` scaled by its largest component so that
/// squaring neither overflows nor underflows for finite inputs.
pub fn scaled_norm(v: &Vector3<f64>) -> f64 {
    let amax = v.amax();
    if amax == 0.0 || !amax.is_finite() {
        return v.norm();
    }
    amax * (v / amax).norm()
}

/// The direction of `v`, or `None` for the zero vector and vectors with non-finite components.
fn unit_direction(v: &Vector3<f64>) -> Option<Unit<Vector3<f64>>> {
    if !v.iter().all(|c| c.is_finite()) {
        return None;
    }
    let amax = v.amax();
    if amax == 0.0 {
        return None;
    }
    Unit::try_new(v / amax, 0.0)
}

/// `v` divided by its largest component; zero and non-finite vectors are returned as-is.
fn rescaled(v: &Vector3<f64>) -> Vector3<f64> {
    let amax = v.amax();
    if amax > 0.0 && amax.is_finite() {
        v / amax
    } else {
        *v
    }
}

impl Default for CartesianAxes {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Generates an orthonormal triple from an arbitrary normal vector.
///
/// The secondary axis is `n × (0, 0, -1)`, falling back to `n × (0, -1, 0)` when the
/// normal is parallel to the z axis; the third axis is `n × secondary`. The triple
/// is returned as `(n̂, secondary, third)`, all normalized.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroLengthNormal`] if `normal` is the zero vector or has
/// non-finite components.
pub fn generate_cart_axes(
    normal: &Vector3<f64>,
) -> Result<(Vector3<f64>, Vector3<f64>, Vector3<f64>), GeometryError> {
    let n = unit_direction(normal)
        .ok_or(GeometryError::ZeroLengthNormal)?
        .into_inner();

    let mut secondary = n.cross(&(-Vector3::z()));
    if secondary == Vector3::zeros() {
        secondary = n.cross(&(-Vector3::y()));
    }
    let third = n.cross(&secondary);

    Ok((n, secondary.normalize(), third.normalize()))
}

/// Elementary rotation by `angle` radians about the z axis.
pub fn rotation_z(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0)
}

/// Elementary rotation by `angle` radians about the y axis.
pub fn rotation_y(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(cos, 0.0, sin, 0.0, 1.0, 0.0, -sin, 0.0, cos)
}

/// Rotation matrix for a rotation of `angle` radians about `axis` (Rodrigues' formula).
///
/// The axis does not need to be normalized.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroLengthAxis`] if `axis` is the zero vector or has
/// non-finite components.
pub fn rotate_about_axis(axis: &Vector3<f64>, angle: f64) -> Result<Matrix3<f64>, GeometryError> {
    let axis = unit_direction(axis).ok_or(GeometryError::ZeroLengthAxis)?;
    Ok(rodrigues(&axis, angle))
}

fn rodrigues(axis: &Unit<Vector3<f64>>, angle: f64) -> Matrix3<f64> {
    let (sin_half, a) = (angle / 2.0).sin_cos();
    let b = axis.x * sin_half;
    let c = axis.y * sin_half;
    let d = axis.z * sin_half;

    Matrix3::new(
        a * a + b * b - c * c - d * d,
        2.0 * (b * c - a * d),
        2.0 * (b * d + a * c),
        2.0 * (b * c + a * d),
        a * a + c * c - b * b - d * d,
        2.0 * (c * d - a * b),
        2.0 * (b * d - a * c),
        2.0 * (c * d + a * b),
        a * a + d * d - b * b - c * c,
    )
}

/// Returns the minimal rotation matrix that turns the direction of `from` onto `to`.
///
/// Parallel inputs yield the identity. Anti-parallel inputs have no unique minimal
/// rotation; a half turn about a deterministic perpendicular axis is returned instead.
/// A zero `from` vector yields the identity.
pub fn matrix_between_vectors(from: &Vector3<f64>, to: &Vector3<f64>) -> Matrix3<f64> {
    let from = rescaled(from);
    let to = rescaled(to);
    if from.cross(&to) == Vector3::zeros() {
        if from.dot(&to) >= 0.0 {
            return Matrix3::identity();
        }
        return half_turn_about_perpendicular(&from);
    }

    let from_unit = from.normalize();
    let to_unit = to.normalize();
    let v = from_unit.cross(&to_unit);
    let c = from_unit.dot(&to_unit);

    if 1.0 + c <= ANTIPARALLEL_TOLERANCE {
        return half_turn_about_perpendicular(&from);
    }

    // (1 - c) / (1 - c^2), reduced so it stays finite as c -> 1.
    let h = 1.0 / (1.0 + c);
    let (vx, vy, vz) = (v.x, v.y, v.z);

    Matrix3::new(
        c + h * vx * vx,
        h * vx * vy - vz,
        h * vx * vz + vy,
        h * vx * vy + vz,
        c + h * vy * vy,
        h * vy * vz - vx,
        h * vx * vz - vy,
        h * vy * vz + vx,
        c + h * vz * vz,
    )
}

fn half_turn_about_perpendicular(v: &Vector3<f64>) -> Matrix3<f64> {
    let scale = v.abs().sum();
    if scale == 0.0 {
        return Matrix3::identity();
    }
    let w = v / scale;
    let perpendicular = if w.x.abs() > w.y.abs() {
        Vector3::new(w.z, 0.0, -w.x)
    } else {
        Vector3::new(0.0, w.z, -w.y)
    };
    rodrigues(&Unit::new_normalize(perpendicular), std::f64::consts::PI)
}

/// Reflection through the plane (containing the origin) whose normal is `normal`.
///
/// Built from the frame `(n, u, v)` of [`generate_cart_axes`] as `Bᵀ · diag(1, 1, -1) · B`,
/// where the rows of `B` are `u`, `v` and `n`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroLengthNormal`] if `normal` is the zero vector.
pub fn reflection_matrix(normal: &Vector3<f64>) -> Result<Matrix3<f64>, GeometryError> {
    let (n, u, v) = generate_cart_axes(normal)?;
    let basis = Matrix3::from_rows(&[u.transpose(), v.transpose(), n.transpose()]);
    let flip = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, -1.0));
    Ok(basis.transpose() * flip * basis)
}

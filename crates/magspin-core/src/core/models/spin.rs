use super::angles::{AngleUnit, EulerAngles, SphericalAngles};
use crate::core::symmetry::orbit::OrbitOracle;
use crate::core::utils::geometry::{
    CartesianAxes, GeometryError, POLE_TOLERANCE, matrix_between_vectors, reflection_matrix,
    rotate_about_axis, rotation_y, rotation_z, scaled_norm,
};
use nalgebra::storage::RawStorage;
use nalgebra::{Dim, Matrix, Matrix3, Vector3};
use std::f64::consts::PI;
use std::fmt;

/// The magnetic spin carried by a crystallographic site.
///
/// A spin is a direction `(s_x, s_y, s_z)` together with an independent magnitude `m`
/// (the magnetic moment) and a reference `normal`, the polar axis against which the
/// spherical angles are measured. The Cartesian triple is the only stored orientation;
/// angles, matrices and the global-frame view are derived from it on every call.
///
/// Components are expressed in the spin's own frame, whose z axis is the normal.
/// Use [`SpinVector::xyz`] to compare spins that were defined with different normals.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinVector {
    vector: Vector3<f64>,
    m: f64,
    normal: Vector3<f64>,
    axes: CartesianAxes,
}

impl Default for SpinVector {
    /// A unit spin along +z with unit moment and a +z normal.
    fn default() -> Self {
        Self {
            vector: Vector3::z(),
            m: 1.0,
            normal: Vector3::z(),
            axes: CartesianAxes::canonical(),
        }
    }
}

impl SpinVector {
    /// Creates a spin from its components and normalizes the direction to unit length.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroNormVector`] if all components are zero.
    pub fn new(s_x: f64, s_y: f64, s_z: f64, m: f64) -> Result<Self, GeometryError> {
        SpinVectorBuilder::new()
            .components(s_x, s_y, s_z)
            .m(m)
            .build()
    }

    /// Creates a spin from its components without touching their length.
    pub fn unnormalized(s_x: f64, s_y: f64, s_z: f64, m: f64) -> Self {
        Self {
            vector: Vector3::new(s_x, s_y, s_z),
            m,
            ..Self::default()
        }
    }

    pub fn builder() -> SpinVectorBuilder {
        SpinVectorBuilder::new()
    }

    /// Creates a normalized spin from a direction vector.
    ///
    /// `m` defaults to `1.0` and `normal` to +z.
    pub fn from_vector(
        vector: Vector3<f64>,
        m: Option<f64>,
        normal: Option<Vector3<f64>>,
    ) -> Result<Self, GeometryError> {
        let mut builder = SpinVectorBuilder::new()
            .components(vector.x, vector.y, vector.z)
            .m(m.unwrap_or(1.0));
        if let Some(normal) = normal {
            builder = builder.normal(normal);
        }
        builder.build()
    }

    /// Creates a unit spin from spherical angles measured against `normal` (default +z).
    ///
    /// `theta` is the azimuth and `phi` the polar angle. The resulting components are
    /// `(cos θ sin φ, sin θ sin φ, cos φ)` in the frame of `normal`; the moment `m`
    /// (default `1.0`) is stored separately and does not scale the direction.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthNormal`] if `normal` is the zero vector.
    pub fn from_angles(
        theta: f64,
        phi: f64,
        m: Option<f64>,
        unit: AngleUnit,
        normal: Option<Vector3<f64>>,
    ) -> Result<Self, GeometryError> {
        let direction = SphericalAngles::from_unit(theta, phi, unit).direction();
        SpinVectorBuilder::new()
            .components(direction.x, direction.y, direction.z)
            .m(m.unwrap_or(1.0))
            .normal(normal.unwrap_or_else(Vector3::z))
            .normalize(false)
            .build()
    }

    pub fn s_x(&self) -> f64 {
        self.vector.x
    }

    pub fn s_y(&self) -> f64 {
        self.vector.y
    }

    pub fn s_z(&self) -> f64 {
        self.vector.z
    }

    pub fn vector(&self) -> Vector3<f64> {
        self.vector
    }

    /// Replaces all three components at once. The new vector is not renormalized.
    pub fn set_vector(&mut self, vector: Vector3<f64>) {
        self.vector = vector;
    }

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn set_m(&mut self, m: f64) {
        self.m = m;
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Changes the reference normal and rebuilds the Cartesian frame.
    ///
    /// The stored components are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthNormal`] if `normal` is the zero vector; the spin
    /// is unchanged in that case.
    pub fn set_normal(&mut self, normal: Vector3<f64>) -> Result<(), GeometryError> {
        self.axes = CartesianAxes::from_normal(&normal)?;
        self.normal = normal;
        Ok(())
    }

    pub fn axes(&self) -> &CartesianAxes {
        &self.axes
    }

    pub fn norm(&self) -> f64 {
        scaled_norm(&self.vector)
    }

    /// The moment vector `m · direction`.
    pub fn moment(&self) -> Vector3<f64> {
        self.vector * self.m
    }

    /// Scales the direction to unit length. The moment `m` is not affected.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroNormVector`] if the vector has zero length or a
    /// non-finite component.
    pub fn normalize(&mut self) -> Result<(), GeometryError> {
        let norm = self.checked_norm("normalization")?;
        self.vector /= norm;
        Ok(())
    }

    fn checked_norm(&self, quantity: &'static str) -> Result<f64, GeometryError> {
        let norm = self.norm();
        if norm > 0.0 && norm.is_finite() {
            Ok(norm)
        } else {
            Err(GeometryError::ZeroNormVector { quantity })
        }
    }

    /// Azimuthal angle `atan2(s_y, s_x)` in radians, in `(-π, π]`.
    ///
    /// On the poles, where the in-plane component vanishes relative to the vector
    /// length (see [`POLE_TOLERANCE`]), the azimuth is defined as exactly `0`.
    pub fn theta(&self) -> Result<f64, GeometryError> {
        let norm = self.checked_norm("theta")?;
        let in_plane = self.vector.x.hypot(self.vector.y);
        if in_plane <= POLE_TOLERANCE * norm {
            return Ok(0.0);
        }
        let theta = self.vector.y.atan2(self.vector.x);
        // A negative-zero y component lands on -π; fold it onto π.
        Ok(if theta == -PI { PI } else { theta })
    }

    /// Polar angle `arccos(s_z / |s|)` in radians, in `[0, π]`.
    pub fn phi(&self) -> Result<f64, GeometryError> {
        let norm = self.checked_norm("phi")?;
        Ok((self.vector.z / norm).clamp(-1.0, 1.0).acos())
    }

    pub fn angles(&self) -> Result<SphericalAngles, GeometryError> {
        Ok(SphericalAngles::new(self.theta()?, self.phi()?))
    }

    /// Rotation matrix `Rz(θ) · Ry(φ)` taking the frame's z axis onto the spin direction.
    pub fn matrix(&self) -> Result<Matrix3<f64>, GeometryError> {
        let SphericalAngles { theta, phi } = self.angles()?;
        Ok(rotation_z(theta) * rotation_y(phi))
    }

    /// Z-y-z Euler angles of [`SpinVector::matrix`]; `gamma` is always `0` since a
    /// direction carries no roll about itself.
    pub fn euler_angles(&self) -> Result<EulerAngles, GeometryError> {
        let alpha = self.theta()?;
        let (x, y, z) = (self.vector.x, self.vector.y, self.vector.z);
        Ok(EulerAngles::new(alpha, x.hypot(y).atan2(z), 0.0))
    }

    /// The vector re-expressed in the frame whose z axis is the global +z.
    pub fn xyz(&self) -> Vector3<f64> {
        matrix_between_vectors(&self.normal, &Vector3::z()) * self.vector
    }

    /// Rotates the spin in place by `angle` about `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthAxis`] if `axis` is the zero vector.
    pub fn rotate(
        &mut self,
        axis: &Vector3<f64>,
        angle: f64,
        unit: AngleUnit,
    ) -> Result<(), GeometryError> {
        let rotation = rotate_about_axis(axis, unit.to_radians(angle))?;
        self.vector = rotation * self.vector;
        Ok(())
    }

    /// Applies a linear operator to the spin in place.
    ///
    /// A 4x4 matrix is treated as a homogeneous transform: only its upper-left 3x3
    /// block is used and the translation is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidMatrixShape`] for any other shape; the spin is
    /// left untouched.
    pub fn apply_matrix<R, C, S>(&mut self, matrix: &Matrix<f64, R, C, S>) -> Result<(), GeometryError>
    where
        R: Dim,
        C: Dim,
        S: RawStorage<f64, R, C>,
    {
        let (rows, cols) = matrix.shape();
        if !matches!((rows, cols), (3, 3) | (4, 4)) {
            return Err(GeometryError::InvalidMatrixShape { rows, cols });
        }
        let linear = Matrix3::from_fn(|r, c| matrix[(r, c)]);
        self.vector = linear * self.vector;
        Ok(())
    }

    /// Reflects the spin through the plane whose normal is `plane_normal`.
    pub fn mirror(&mut self, plane_normal: &Vector3<f64>) -> Result<(), GeometryError> {
        let reflection = reflection_matrix(plane_normal)?;
        self.vector = reflection * self.vector;
        Ok(())
    }

    /// Generates the symmetry images of this spin.
    ///
    /// The oracle is asked for the orbit of the current vector; every orbit entry
    /// becomes a spin with the same moment and normal, in orbit order.
    pub fn images<O: OrbitOracle + ?Sized>(&self, oracle: &O) -> Vec<SpinVector> {
        oracle
            .get_orbit(&self.vector)
            .into_iter()
            .map(|vector| SpinVector {
                vector,
                m: self.m,
                normal: self.normal,
                axes: self.axes,
            })
            .collect()
    }

    /// Returns `true` if both spins have the same direction and moment within `tolerance`.
    pub fn approx_eq(&self, other: &SpinVector, tolerance: f64) -> bool {
        (self.vector - other.vector).amax() <= tolerance && (self.m - other.m).abs() <= tolerance
    }
}

impl fmt::Display for SpinVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spin [{}, {}, {}], S = {}",
            self.vector.x, self.vector.y, self.vector.z, self.m
        )
    }
}

/// Step-by-step construction of a [`SpinVector`].
///
/// Unset components fall back to the default `(0, 0, 1)` direction and unit moment.
/// Normalization is on unless disabled with [`SpinVectorBuilder::normalize`].
#[derive(Debug, Clone)]
pub struct SpinVectorBuilder {
    s_x: Option<f64>,
    s_y: Option<f64>,
    s_z: Option<f64>,
    m: Option<f64>,
    normal: Option<Vector3<f64>>,
    normalize: bool,
}

impl Default for SpinVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinVectorBuilder {
    pub fn new() -> Self {
        Self {
            s_x: None,
            s_y: None,
            s_z: None,
            m: None,
            normal: None,
            normalize: true,
        }
    }

    pub fn s_x(mut self, value: f64) -> Self {
        self.s_x = Some(value);
        self
    }
    pub fn s_y(mut self, value: f64) -> Self {
        self.s_y = Some(value);
        self
    }
    pub fn s_z(mut self, value: f64) -> Self {
        self.s_z = Some(value);
        self
    }
    pub fn components(self, s_x: f64, s_y: f64, s_z: f64) -> Self {
        self.s_x(s_x).s_y(s_y).s_z(s_z)
    }
    pub fn m(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }
    pub fn normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = Some(normal);
        self
    }
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn build(self) -> Result<SpinVector, GeometryError> {
        let (normal, axes) = match self.normal {
            Some(normal) => (normal, CartesianAxes::from_normal(&normal)?),
            None => (Vector3::z(), CartesianAxes::canonical()),
        };

        let mut spin = SpinVector {
            vector: Vector3::new(
                self.s_x.unwrap_or(0.0),
                self.s_y.unwrap_or(0.0),
                self.s_z.unwrap_or(1.0),
            ),
            m: self.m.unwrap_or(1.0),
            normal,
            axes,
        };

        if self.normalize {
            spin.normalize()?;
        }
        Ok(spin)
    }
}

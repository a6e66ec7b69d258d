use crate::core::utils::geometry::{rotation_y, rotation_z};
use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;

/// The unit in which angles are supplied to the spin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Angles are given in degrees and converted before use.
    #[default]
    Degrees,
    /// Angles are already in radians.
    Radians,
}

impl AngleUnit {
    /// Converts `value`, expressed in this unit, to radians.
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value.to_radians(),
            AngleUnit::Radians => value,
        }
    }

    /// Converts `value` in radians to this unit.
    pub fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value.to_degrees(),
            AngleUnit::Radians => value,
        }
    }

    pub fn from_radians_flag(radians: bool) -> Self {
        if radians {
            AngleUnit::Radians
        } else {
            AngleUnit::Degrees
        }
    }
}

/// Spherical orientation of a spin relative to its reference frame, in radians.
///
/// `theta` is the azimuth measured in the frame's xy-plane from the x axis and
/// `phi` is the polar angle measured from the frame's z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalAngles {
    pub theta: f64,
    pub phi: f64,
}

impl SphericalAngles {
    pub fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Builds angles from values in `unit`.
    pub fn from_unit(theta: f64, phi: f64, unit: AngleUnit) -> Self {
        Self {
            theta: unit.to_radians(theta),
            phi: unit.to_radians(phi),
        }
    }

    /// Returns `(theta, phi)` in degrees.
    pub fn to_degrees(self) -> (f64, f64) {
        (self.theta.to_degrees(), self.phi.to_degrees())
    }

    /// The unit direction these angles describe, in frame coordinates.
    pub fn direction(&self) -> Vector3<f64> {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vector3::new(cos_theta * sin_phi, sin_theta * sin_phi, cos_phi)
    }
}

/// Euler angles in the z-y-z convention, in radians.
///
/// The corresponding rotation is `Rz(alpha) · Ry(beta) · Rz(gamma)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl EulerAngles {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    pub fn to_matrix(&self) -> Matrix3<f64> {
        rotation_z(self.alpha) * rotation_y(self.beta) * rotation_z(self.gamma)
    }
}

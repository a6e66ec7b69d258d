use super::spin::SpinVector;
use nalgebra::Point3;

/// An atomic site in a crystal, optionally carrying a magnetic spin.
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticSite {
    /// Unique label within its structure (e.g., "Fe1").
    pub label: String,
    /// Chemical element or species symbol.
    pub element: String,
    /// Position in fractional coordinates.
    pub position: Point3<f64>,
    /// The spin on this site; `None` for non-magnetic sites.
    pub spin: Option<SpinVector>,
}

impl MagneticSite {
    pub fn new(label: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            label: label.to_string(),
            element: element.to_string(),
            position,
            spin: None,
        }
    }

    pub fn with_spin(mut self, spin: SpinVector) -> Self {
        self.spin = Some(spin);
        self
    }

    pub fn is_magnetic(&self) -> bool {
        self.spin.is_some()
    }
}

use nalgebra::Vector3;

/// Source of symmetry-equivalent images of a point or vector.
///
/// This is the only contract the spin engine needs from a space group: given a
/// triple, return the finite, ordered sequence of its images. Implementations must
/// be deterministic for a fixed group and include the identity image when the group
/// contains the identity operation.
pub trait OrbitOracle {
    fn get_orbit(&self, point: &Vector3<f64>) -> Vec<Vector3<f64>>;
}

impl<F> OrbitOracle for F
where
    F: Fn(&Vector3<f64>) -> Vec<Vector3<f64>>,
{
    fn get_orbit(&self, point: &Vector3<f64>) -> Vec<Vector3<f64>> {
        self(point)
    }
}

use super::spin::SpinVector;
use nalgebra::Point3;

/// One symmetry-generated copy of a site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteImage {
    /// Label of the site this image was generated from.
    pub site_label: String,
    pub element: String,
    /// Index of the symmetry operation that produced this image.
    pub operation_index: usize,
    /// Fractional position of the image.
    pub position: Point3<f64>,
    /// The transformed spin, if the parent site is magnetic.
    pub spin: Option<SpinVector>,
}

use crate::core::models::image::SiteImage;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// One row of the image table. Angles are in degrees; spin columns stay empty for
/// non-magnetic sites, and the angle columns also for zero-length spins.
#[derive(Debug, Serialize)]
struct ImageRecord<'a> {
    label: &'a str,
    element: &'a str,
    op: usize,
    x: f64,
    y: f64,
    z: f64,
    s_x: Option<f64>,
    s_y: Option<f64>,
    s_z: Option<f64>,
    m: Option<f64>,
    theta: Option<f64>,
    phi: Option<f64>,
}

impl<'a> From<&'a SiteImage> for ImageRecord<'a> {
    fn from(image: &'a SiteImage) -> Self {
        let spin = image.spin.as_ref();
        let angles = spin.and_then(|s| s.angles().ok());
        Self {
            label: &image.site_label,
            element: &image.element,
            op: image.operation_index,
            x: image.position.x,
            y: image.position.y,
            z: image.position.z,
            s_x: spin.map(|s| s.s_x()),
            s_y: spin.map(|s| s.s_y()),
            s_z: spin.map(|s| s.s_z()),
            m: spin.map(|s| s.m()),
            theta: angles.map(|a| a.theta.to_degrees()),
            phi: angles.map(|a| a.phi.to_degrees()),
        }
    }
}

/// Writes the images as CSV, with a header row, to `writer`.
pub fn write_images<W: Write>(images: &[SiteImage], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for image in images {
        csv_writer.serialize(ImageRecord::from(image))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_images_to_path<P: AsRef<Path>>(
    images: &[SiteImage],
    path: P,
) -> Result<(), ImageTableError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| ImageTableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_images(images, file).map_err(|e| ImageTableError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

use crate::core::models::angles::AngleUnit;
use crate::core::models::site::MagneticSite;
use crate::core::models::spin::SpinVector;
use crate::core::models::structure::{MagneticStructure, StructureError};
use crate::core::symmetry::group::SymmetryGroup;
use crate::core::symmetry::operation::OperationParseError;
use crate::core::utils::geometry::GeometryError;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const INLINE_SOURCE: &str = "<inline>";

/// Represents errors that can occur while loading a magnetic structure file.
#[derive(Debug, Error)]
pub enum StructureFileError {
    /// The file could not be read from disk.
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The content is not valid TOML or does not match the expected layout.
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    /// A site declares a spin that cannot be constructed (zero vector or zero normal).
    #[error("Invalid spin on site '{label}': {source}")]
    InvalidSpin {
        label: String,
        source: GeometryError,
    },
    /// A symmetry operation string is malformed.
    #[error("Invalid symmetry operation #{index}: {source}")]
    InvalidOperation {
        index: usize,
        source: OperationParseError,
    },
    /// The sites do not form a valid structure (e.g., duplicate labels).
    #[error("Invalid structure: {0}")]
    Structure(#[from] StructureError),
}

/// Optional processing settings stored alongside a structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct StructureSettings {
    pub position_tolerance: Option<f64>,
    pub wrap_positions: Option<bool>,
}

/// A magnetic structure together with its symmetry operations, as read from TOML.
///
/// ```toml
/// name = "example"
///
/// [symmetry]
/// operations = ["x,y,z", "-x,-y,z,-1"]
///
/// [[sites]]
/// label = "Fe1"
/// position = [0.0, 0.0, 0.0]
/// spin = { vector = [0.0, 0.0, 1.0], moment = 2.2 }
///
/// [[sites]]
/// label = "Mn1"
/// position = [0.5, 0.5, 0.5]
/// spin = { theta = 45.0, phi = 90.0, unit = "degrees" }
/// ```
#[derive(Debug, Clone)]
pub struct StructureFile {
    pub structure: MagneticStructure,
    pub group: SymmetryGroup,
    pub settings: StructureSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStructureFile {
    name: Option<String>,
    symmetry: Option<RawSymmetry>,
    #[serde(default)]
    sites: Vec<RawSite>,
    #[serde(default)]
    settings: StructureSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSymmetry {
    operations: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    label: String,
    element: Option<String>,
    position: [f64; 3],
    spin: Option<RawSpin>,
}

/// A spin table is either a vector form or an angle form; mixing keys of both is rejected.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSpin {
    Vector(RawVectorSpin),
    Angles(RawAngleSpin),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVectorSpin {
    vector: [f64; 3],
    moment: Option<f64>,
    normal: Option<[f64; 3]>,
    normalize: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAngleSpin {
    theta: f64,
    phi: f64,
    moment: Option<f64>,
    normal: Option<[f64; 3]>,
    unit: Option<AngleUnit>,
}

impl RawSpin {
    fn build(self) -> Result<SpinVector, GeometryError> {
        match self {
            RawSpin::Vector(RawVectorSpin {
                vector,
                moment,
                normal,
                normalize,
            }) => {
                let [s_x, s_y, s_z] = vector;
                let mut builder = SpinVector::builder()
                    .components(s_x, s_y, s_z)
                    .m(moment.unwrap_or(1.0))
                    .normalize(normalize.unwrap_or(true));
                if let Some(normal) = normal {
                    builder = builder.normal(Vector3::from(normal));
                }
                builder.build()
            }
            RawSpin::Angles(RawAngleSpin {
                theta,
                phi,
                moment,
                normal,
                unit,
            }) => SpinVector::from_angles(
                theta,
                phi,
                moment,
                unit.unwrap_or_default(),
                normal.map(Vector3::from),
            ),
        }
    }
}

/// Guesses the element symbol from a site label such as `Fe1` or `O2a`.
fn element_from_label(label: &str) -> String {
    label
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect()
}

impl StructureFile {
    /// Reads and validates a structure file.
    ///
    /// # Errors
    ///
    /// Returns [`StructureFileError`] if the file cannot be read, is not valid TOML, or
    /// contains invalid spins, operations or duplicate site labels.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, StructureFileError> {
        let path = path.as_ref();
        debug!("Loading structure file from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| StructureFileError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses a structure from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, StructureFileError> {
        Self::parse(content, INLINE_SOURCE)
    }

    fn parse(content: &str, source_name: &str) -> Result<Self, StructureFileError> {
        let raw: RawStructureFile =
            toml::from_str(content).map_err(|e| StructureFileError::Toml {
                path: source_name.to_string(),
                source: e,
            })?;

        let group = match raw.symmetry {
            Some(symmetry) => SymmetryGroup::from_strings(&symmetry.operations)
                .map_err(|(index, source)| StructureFileError::InvalidOperation { index, source })?,
            None => {
                debug!("No symmetry section in '{}'; using the identity group.", source_name);
                SymmetryGroup::identity()
            }
        };

        let mut structure = MagneticStructure::new(raw.name.as_deref().unwrap_or(""));
        for raw_site in raw.sites {
            let element = raw_site
                .element
                .unwrap_or_else(|| element_from_label(&raw_site.label));
            let mut site = MagneticSite::new(
                &raw_site.label,
                &element,
                Point3::from(raw_site.position),
            );
            if let Some(raw_spin) = raw_site.spin {
                let spin = raw_spin
                    .build()
                    .map_err(|source| StructureFileError::InvalidSpin {
                        label: raw_site.label.clone(),
                        source,
                    })?;
                site = site.with_spin(spin);
            }
            structure.add_site(site)?;
        }

        debug!(
            "Loaded structure '{}' with {} site(s) and {} symmetry operation(s).",
            structure.name(),
            structure.len(),
            group.len()
        );

        Ok(Self {
            structure,
            group,
            settings: raw.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const TOLERANCE: f64 = 1e-9;

    const EXAMPLE: &str = r#"
        name = "test-structure"

        [symmetry]
        operations = ["x,y,z", "-x,-y,z", "x,y,-z,-1"]

        [[sites]]
        label = "Fe1"
        position = [0.0, 0.0, 0.0]
        spin = { vector = [0.0, 0.0, 2.0], moment = 2.2 }

        [[sites]]
        label = "Mn1"
        element = "Mn"
        position = [0.5, 0.5, 0.5]
        spin = { theta = 90.0, phi = 90.0 }

        [[sites]]
        label = "O1"
        position = [0.25, 0.25, 0.0]

        [settings]
        position-tolerance = 1e-3
        wrap-positions = false
    "#;

    #[test]
    fn from_toml_str_parses_sites_group_and_settings() {
        let file = StructureFile::from_toml_str(EXAMPLE).unwrap();
        assert_eq!(file.structure.name(), "test-structure");
        assert_eq!(file.structure.len(), 3);
        assert_eq!(file.group.len(), 3);
        assert!(file.group.operations()[2].time_reversal);
        assert_eq!(
            file.settings,
            StructureSettings {
                position_tolerance: Some(1e-3),
                wrap_positions: Some(false),
            }
        );
    }

    #[test]
    fn vector_spins_are_normalized_and_keep_moment() {
        let file = StructureFile::from_toml_str(EXAMPLE).unwrap();
        let id = file.structure.find_site_by_label("Fe1").unwrap();
        let site = file.structure.site(id).unwrap();
        let spin = site.spin.as_ref().unwrap();
        assert_eq!(site.element, "Fe");
        assert!((spin.vector() - Vector3::z()).amax() < TOLERANCE);
        assert_eq!(spin.m(), 2.2);
    }

    #[test]
    fn angle_spins_default_to_degrees() {
        let file = StructureFile::from_toml_str(EXAMPLE).unwrap();
        let id = file.structure.find_site_by_label("Mn1").unwrap();
        let spin = file.structure.site(id).unwrap().spin.clone().unwrap();
        assert!((spin.vector() - Vector3::y()).amax() < TOLERANCE);
    }

    #[test]
    fn sites_without_spin_are_non_magnetic() {
        let file = StructureFile::from_toml_str(EXAMPLE).unwrap();
        let id = file.structure.find_site_by_label("O1").unwrap();
        let site = file.structure.site(id).unwrap();
        assert!(!site.is_magnetic());
        assert_eq!(site.element, "O");
    }

    #[test]
    fn missing_symmetry_section_yields_identity_group() {
        let file = StructureFile::from_toml_str(
            r#"
            [[sites]]
            label = "Co1"
            position = [0.0, 0.0, 0.0]
            "#,
        )
        .unwrap();
        assert_eq!(file.group, SymmetryGroup::identity());
        assert_eq!(file.settings, StructureSettings::default());
    }

    #[test]
    fn zero_spin_vector_is_reported_with_site_label() {
        let result = StructureFile::from_toml_str(
            r#"
            [[sites]]
            label = "Fe1"
            position = [0.0, 0.0, 0.0]
            spin = { vector = [0.0, 0.0, 0.0] }
            "#,
        );
        match result {
            Err(StructureFileError::InvalidSpin { label, source }) => {
                assert_eq!(label, "Fe1");
                assert!(source.is_domain());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_operation_is_reported_with_index() {
        let result = StructureFile::from_toml_str(
            r#"
            [symmetry]
            operations = ["x,y,z", "x,y"]
            "#,
        );
        assert!(matches!(
            result,
            Err(StructureFileError::InvalidOperation { index: 1, .. })
        ));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let result = StructureFile::from_toml_str(
            r#"
            [[sites]]
            label = "Fe1"
            position = [0.0, 0.0, 0.0]

            [[sites]]
            label = "Fe1"
            position = [0.5, 0.5, 0.5]
            "#,
        );
        assert!(matches!(
            result,
            Err(StructureFileError::Structure(StructureError::DuplicateLabel(_)))
        ));
    }

    #[test]
    fn angle_spins_accept_radians() {
        let file = StructureFile::from_toml_str(
            r#"
            [[sites]]
            label = "Co1"
            position = [0.0, 0.0, 0.0]
            spin = { theta = 0.0, phi = 3.141592653589793, unit = "radians", moment = 1.5 }
            "#,
        )
        .unwrap();
        let id = file.structure.find_site_by_label("Co1").unwrap();
        let spin = file.structure.site(id).unwrap().spin.clone().unwrap();
        assert!((spin.vector() + Vector3::z()).amax() < TOLERANCE);
        assert_eq!(spin.m(), 1.5);
    }

    #[test]
    fn spin_tables_mixing_vector_and_angle_keys_are_rejected() {
        for spin in [
            "{ vector = [0.0, 0.0, 1.0], theta = 10.0, phi = 20.0 }",
            "{ theta = 10.0, phi = 20.0, normalize = false }",
            "{ vector = [0.0, 0.0, 1.0], unit = \"degrees\" }",
        ] {
            let content = format!(
                "[[sites]]\nlabel = \"Fe1\"\nposition = [0.0, 0.0, 0.0]\nspin = {spin}\n"
            );
            let result = StructureFile::from_toml_str(&content);
            assert!(
                matches!(result, Err(StructureFileError::Toml { .. })),
                "accepted spin table {spin}"
            );
        }
    }

    #[test]
    fn vector_spins_can_skip_normalization() {
        let file = StructureFile::from_toml_str(
            r#"
            [[sites]]
            label = "Fe1"
            position = [0.0, 0.0, 0.0]
            spin = { vector = [0.0, 0.0, 2.0], normalize = false }
            "#,
        )
        .unwrap();
        let id = file.structure.find_site_by_label("Fe1").unwrap();
        let spin = file.structure.site(id).unwrap().spin.clone().unwrap();
        assert_eq!(spin.vector(), Vector3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        let result = StructureFile::from_toml_str(
            r#"
            [settings]
            tolerance = 1.0
            "#,
        );
        assert!(matches!(result, Err(StructureFileError::Toml { .. })));
    }

    #[test]
    fn read_from_path_loads_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("structure.toml");
        let mut file = File::create(&file_path).unwrap();
        write!(file, "{}", EXAMPLE).unwrap();

        let loaded = StructureFile::read_from_path(&file_path).unwrap();
        assert_eq!(loaded.structure.len(), 3);
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = StructureFile::read_from_path(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(StructureFileError::Io { .. })));
    }
}

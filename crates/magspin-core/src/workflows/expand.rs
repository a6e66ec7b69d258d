use crate::core::models::image::SiteImage;
use crate::core::models::site::MagneticSite;
use crate::core::models::spin::SpinVector;
use crate::core::models::structure::MagneticStructure;
use crate::core::symmetry::group::{SymmetryGroup, fractional_distance, wrap_fractional};
use crate::core::symmetry::orbit::OrbitOracle;
use crate::engine::config::ExpansionConfig;
use crate::engine::error::EngineError;
use nalgebra::Point3;
use tracing::{debug, info, instrument, trace, warn};

const SPIN_TOLERANCE: f64 = 1e-6;

/// Expands every site of `structure` into its images under `group`.
///
/// Images are produced site by site in insertion order and, within a site, in
/// operation order. When several operations map a site onto the same position
/// (within `config.position_tolerance`), only the first is kept.
///
/// # Errors
///
/// Returns [`EngineError::Config`] for an invalid configuration and
/// [`EngineError::EmptyGroup`] if `group` has no operations.
#[instrument(skip_all, name = "expand_workflow")]
pub fn run(
    structure: &MagneticStructure,
    group: &SymmetryGroup,
    config: &ExpansionConfig,
) -> Result<Vec<SiteImage>, EngineError> {
    config.validate()?;
    if group.is_empty() {
        return Err(EngineError::EmptyGroup);
    }
    if !group.contains_identity() {
        warn!("The symmetry group does not contain the identity; original sites may be missing from the output.");
    }

    info!(
        "Expanding {} site(s) of '{}' under {} symmetry operation(s).",
        structure.len(),
        structure.name(),
        group.len()
    );

    let mut images = Vec::new();
    for (_, site) in structure.sites_iter() {
        let site_images = expand_site(site, group, config);
        debug!(
            "Site '{}' has {} unique image(s).",
            site.label,
            site_images.len()
        );
        images.extend(site_images);
    }

    info!("Generated {} site image(s).", images.len());
    Ok(images)
}

fn expand_site(
    site: &MagneticSite,
    group: &SymmetryGroup,
    config: &ExpansionConfig,
) -> Vec<SiteImage> {
    let positions = group.get_orbit(&site.position.coords);
    let spins: Vec<Option<SpinVector>> = match &site.spin {
        Some(spin) => spin.images(&group.moments()).into_iter().map(Some).collect(),
        None => vec![None; positions.len()],
    };

    let mut accepted: Vec<SiteImage> = Vec::with_capacity(positions.len());
    for (operation_index, (position, spin)) in positions.into_iter().zip(spins).enumerate() {
        let position = if config.wrap_positions {
            wrap_fractional(&position, config.position_tolerance)
        } else {
            position
        };

        let duplicate = accepted.iter().find(|image| {
            fractional_distance(&image.position.coords, &position, config.wrap_positions)
                <= config.position_tolerance
        });
        if let Some(existing) = duplicate {
            match (&existing.spin, &spin) {
                (Some(kept), Some(candidate)) if !kept.approx_eq(candidate, SPIN_TOLERANCE) => {
                    warn!(
                        "Site '{}': operation #{} maps onto the image of operation #{} with a different spin ({} vs {}); keeping the first.",
                        site.label, operation_index, existing.operation_index, candidate, kept
                    );
                }
                _ => trace!(
                    "Site '{}': operation #{} duplicates the image of operation #{}.",
                    site.label, operation_index, existing.operation_index
                ),
            }
            continue;
        }

        accepted.push(SiteImage {
            site_label: site.label.clone(),
            element: site.element.clone(),
            operation_index,
            position: Point3::from(position),
            spin,
        });
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{ConfigError, ExpansionConfigBuilder};
    use nalgebra::Vector3;

    const TOLERANCE: f64 = 1e-9;

    fn structure_with(sites: Vec<MagneticSite>) -> MagneticStructure {
        let mut structure = MagneticStructure::new("test");
        for site in sites {
            structure.add_site(site).unwrap();
        }
        structure
    }

    fn fe_site(position: Point3<f64>, spin: Vector3<f64>) -> MagneticSite {
        MagneticSite::new("Fe1", "Fe", position)
            .with_spin(SpinVector::from_vector(spin, Some(2.0), None).unwrap())
    }

    fn group(operations: &[&str]) -> SymmetryGroup {
        SymmetryGroup::from_strings(operations).unwrap()
    }

    #[test]
    fn identity_group_returns_each_site_once() {
        let structure = structure_with(vec![
            fe_site(Point3::new(0.1, 0.2, 0.3), Vector3::z()),
            MagneticSite::new("O1", "O", Point3::new(0.5, 0.5, 0.5)),
        ]);
        let images = run(&structure, &SymmetryGroup::identity(), &ExpansionConfig::default())
            .unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].site_label, "Fe1");
        assert_eq!(images[0].operation_index, 0);
        assert!(images[0].spin.is_some());
        assert_eq!(images[1].site_label, "O1");
        assert!(images[1].spin.is_none());
    }

    #[test]
    fn general_position_yields_one_image_per_operation() {
        let structure = structure_with(vec![fe_site(Point3::new(0.1, 0.2, 0.3), Vector3::x())]);
        let images = run(
            &structure,
            &group(&["x,y,z", "-x,-y,z"]),
            &ExpansionConfig::default(),
        )
        .unwrap();

        assert_eq!(images.len(), 2);
        assert!((images[1].position.coords - Vector3::new(0.9, 0.8, 0.3)).amax() < TOLERANCE);
        let spin = images[1].spin.as_ref().unwrap();
        assert!((spin.vector() - Vector3::new(-1.0, 0.0, 0.0)).amax() < TOLERANCE);
        assert_eq!(spin.m(), 2.0);
    }

    #[test]
    fn special_position_is_deduplicated() {
        let structure = structure_with(vec![fe_site(Point3::origin(), Vector3::z())]);
        let images = run(
            &structure,
            &group(&["x,y,z", "-x,-y,-z", "-x,-y,z"]),
            &ExpansionConfig::default(),
        )
        .unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].operation_index, 0);
    }

    #[test]
    fn inversion_preserves_axial_spin() {
        let structure = structure_with(vec![fe_site(Point3::new(0.1, 0.2, 0.3), Vector3::x())]);
        let images = run(
            &structure,
            &group(&["x,y,z", "-x,-y,-z"]),
            &ExpansionConfig::default(),
        )
        .unwrap();

        assert_eq!(images.len(), 2);
        let spin = images[1].spin.as_ref().unwrap();
        assert!((spin.vector() - Vector3::x()).amax() < TOLERANCE);
    }

    #[test]
    fn conflicting_spin_on_same_position_keeps_first_operation() {
        let structure = structure_with(vec![fe_site(Point3::origin(), Vector3::z())]);
        let images = run(
            &structure,
            &group(&["x,y,z", "x,y,z,-1"]),
            &ExpansionConfig::default(),
        )
        .unwrap();

        assert_eq!(images.len(), 1);
        let spin = images[0].spin.as_ref().unwrap();
        assert!((spin.vector() - Vector3::z()).amax() < TOLERANCE);
    }

    #[test]
    fn lattice_translations_collapse_only_when_wrapping() {
        let structure = structure_with(vec![fe_site(Point3::new(0.25, 0.0, 0.0), Vector3::z())]);
        let operations = group(&["x,y,z", "x+1,y,z"]);

        let wrapped = run(&structure, &operations, &ExpansionConfig::default()).unwrap();
        assert_eq!(wrapped.len(), 1);

        let config = ExpansionConfigBuilder::new()
            .position_tolerance(1e-4)
            .wrap_positions(false)
            .build()
            .unwrap();
        let unwrapped = run(&structure, &operations, &config).unwrap();
        assert_eq!(unwrapped.len(), 2);
        assert!((unwrapped[1].position.x - 1.25).abs() < TOLERANCE);
    }

    #[test]
    fn unwrapped_positions_keep_negative_coordinates() {
        let structure = structure_with(vec![fe_site(Point3::new(0.1, 0.2, 0.3), Vector3::z())]);
        let config = ExpansionConfig {
            wrap_positions: false,
            ..ExpansionConfig::default()
        };
        let images = run(&structure, &group(&["x,y,z", "-x,-y,z"]), &config).unwrap();
        assert!((images[1].position.coords - Vector3::new(-0.1, -0.2, 0.3)).amax() < TOLERANCE);
    }

    #[test]
    fn group_without_identity_still_expands() {
        let structure = structure_with(vec![fe_site(Point3::new(0.1, 0.2, 0.3), Vector3::z())]);
        let images = run(&structure, &group(&["-x,-y,z"]), &ExpansionConfig::default()).unwrap();
        assert_eq!(images.len(), 1);
        assert!((images[0].position.coords - Vector3::new(0.9, 0.8, 0.3)).amax() < TOLERANCE);
    }

    #[test]
    fn empty_group_is_rejected() {
        let structure = structure_with(vec![fe_site(Point3::origin(), Vector3::z())]);
        let result = run(
            &structure,
            &SymmetryGroup::new(Vec::new()),
            &ExpansionConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::EmptyGroup)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let structure = structure_with(vec![fe_site(Point3::origin(), Vector3::z())]);
        let config = ExpansionConfig {
            position_tolerance: -1.0,
            ..ExpansionConfig::default()
        };
        let result = run(&structure, &SymmetryGroup::identity(), &config);
        assert!(matches!(
            result,
            Err(EngineError::Config {
                source: ConfigError::InvalidParameter { .. }
            })
        ));
    }
}

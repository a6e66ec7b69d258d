use crate::cli::ImagesArgs;
use crate::config::PartialExpansionConfig;
use crate::error::{CliError, Result};
use magspin::core::io::image_table;
use magspin::core::io::structure_file::StructureFile;
use magspin::core::models::image::SiteImage;
use magspin::workflows;
use tracing::{info, warn};

/// Loads the structure, resolves the expansion settings and runs the expansion workflow.
pub fn expand(args: &ImagesArgs) -> Result<Vec<SiteImage>> {
    info!("Loading magnetic structure from {:?}", &args.input);
    let file = StructureFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let structure_settings = PartialExpansionConfig::from(&file.settings);
    let partial = match &args.config {
        Some(path) => PartialExpansionConfig::from_file(path)?.or(structure_settings),
        None => structure_settings,
    };
    let config = partial.merge_with_cli(args)?;
    info!(
        "Expanding with position tolerance {} ({}).",
        config.position_tolerance,
        if config.wrap_positions { "wrapped" } else { "unwrapped" }
    );

    let images = workflows::expand::run(&file.structure, &file.group, &config)?;
    if images.is_empty() {
        warn!("The structure has no sites; no images were generated.");
    }
    Ok(images)
}

pub fn run(args: &ImagesArgs) -> Result<()> {
    let images = expand(args)?;

    match &args.output {
        Some(path) => {
            image_table::write_images_to_path(&images, path).map_err(|e| {
                CliError::FileWriting {
                    path: path.clone(),
                    source: e.into(),
                }
            })?;
            println!("Wrote {} site image(s) to {}", images.len(), path.display());
        }
        None => {
            image_table::write_images(&images, std::io::stdout().lock())
                .map_err(std::io::Error::from)?;
        }
    }
    Ok(())
}

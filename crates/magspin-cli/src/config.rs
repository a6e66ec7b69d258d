use crate::cli::ImagesArgs;
use crate::error::{CliError, Result};
use magspin::core::io::structure_file::StructureSettings;
use magspin::engine::config::{
    DEFAULT_POSITION_TOLERANCE, DEFAULT_WRAP_POSITIONS, ExpansionConfig, ExpansionConfigBuilder,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Expansion settings from a settings file or a structure's `[settings]` table.
///
/// Both sources share the key layout of [`StructureSettings`].
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct PartialExpansionConfig(StructureSettings);

impl From<&StructureSettings> for PartialExpansionConfig {
    fn from(settings: &StructureSettings) -> Self {
        Self(settings.clone())
    }
}

impl PartialExpansionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading expansion settings from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Fills the values missing here from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self(StructureSettings {
            position_tolerance: self.0.position_tolerance.or(fallback.0.position_tolerance),
            wrap_positions: self.0.wrap_positions.or(fallback.0.wrap_positions),
        })
    }

    /// Resolves the final configuration. Command-line flags take precedence over the
    /// values held here, which take precedence over the library defaults.
    pub fn merge_with_cli(self, args: &ImagesArgs) -> Result<ExpansionConfig> {
        let wrap_positions = if args.no_wrap {
            false
        } else {
            self.0.wrap_positions.unwrap_or(DEFAULT_WRAP_POSITIONS)
        };

        ExpansionConfigBuilder::new()
            .position_tolerance(
                args.tolerance
                    .or(self.0.position_tolerance)
                    .unwrap_or(DEFAULT_POSITION_TOLERANCE),
            )
            .wrap_positions(wrap_positions)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

use thiserror::Error;

pub const DEFAULT_POSITION_TOLERANCE: f64 = 1e-4;
pub const DEFAULT_WRAP_POSITIONS: bool = true;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Controls how sites are expanded into symmetry images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionConfig {
    /// Fractional-coordinate distance below which two images count as the same position.
    pub position_tolerance: f64,
    /// Reduce image positions into the unit cell `[0, 1)` and compare them periodically.
    pub wrap_positions: bool,
}

impl ExpansionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.position_tolerance.is_finite() || self.position_tolerance < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "position_tolerance",
                reason: format!(
                    "expected a finite, non-negative number, got {}",
                    self.position_tolerance
                ),
            });
        }
        Ok(())
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            wrap_positions: DEFAULT_WRAP_POSITIONS,
        }
    }
}

#[derive(Default)]
pub struct ExpansionConfigBuilder {
    position_tolerance: Option<f64>,
    wrap_positions: Option<bool>,
}

impl ExpansionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position_tolerance(mut self, tolerance: f64) -> Self {
        self.position_tolerance = Some(tolerance);
        self
    }
    pub fn wrap_positions(mut self, wrap: bool) -> Self {
        self.wrap_positions = Some(wrap);
        self
    }

    pub fn build(self) -> Result<ExpansionConfig, ConfigError> {
        let config = ExpansionConfig {
            position_tolerance: self
                .position_tolerance
                .ok_or(ConfigError::MissingParameter("position_tolerance"))?,
            wrap_positions: self
                .wrap_positions
                .ok_or(ConfigError::MissingParameter("wrap_positions"))?,
        };
        config.validate()?;
        Ok(config)
    }
}

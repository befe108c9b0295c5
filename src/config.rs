//! # Configuration
//!
//! Every tunable of the engine lives in one [`EngineConfig`], grouped into sections
//! that mirror the subsystems. All sections default field by field, so a JSON file
//! only has to name what it changes:
//!
//! ```json
//! {
//!     "world": { "seed": 7, "dimensions": { "width": 32, "height": 40, "depth": 32 } },
//!     "physics": { "gravity": -12.0 }
//! }
//! ```

use std::{fs::File, io::BufReader, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::{
    environment::{CloudSettings, DayCycleSettings},
    player::{controller::PhysicsSettings, interaction::InteractionSettings},
    voxels::{
        generation::{terrain::TerrainSettings, vegetation::VegetationSettings},
        grid::GridDimensions,
    },
};

/// The lowest world that still fits the terrain's base height and headroom.
pub const MIN_WORLD_HEIGHT: usize = 11;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for an [`EngineConfig`].
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// The values parse but cannot describe a playable world.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// World shape and seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Size of the voxel grid.
    pub dimensions: GridDimensions,
    /// Cells at or below this height that end up empty are filled with water.
    pub water_level: i32,
    /// Generation seed. A random one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            dimensions: GridDimensions::default(),
            water_level: 12,
            seed: None,
        }
    }
}

impl WorldSettings {
    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}

/// All engine settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World shape and seed.
    pub world: WorldSettings,
    /// Height maps, layering and caves.
    pub terrain: TerrainSettings,
    /// Tree placement and shape.
    pub vegetation: VegetationSettings,
    /// Player movement.
    pub physics: PhysicsSettings,
    /// Block breaking and placing.
    pub interaction: InteractionSettings,
    /// Sun and sky.
    pub day_cycle: DayCycleSettings,
    /// Cloud layer.
    pub clouds: CloudSettings,
}

impl EngineConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would otherwise produce an unplayable world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = self.world.dimensions;
        if dims.width == 0 || dims.height == 0 || dims.depth == 0 {
            return Err(ConfigError::Invalid(format!(
                "world dimensions must be non-zero, got {}x{}x{}",
                dims.width, dims.height, dims.depth
            )));
        }
        if dims.height < MIN_WORLD_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "world height must be at least {MIN_WORLD_HEIGHT}, got {}",
                dims.height
            )));
        }
        if self.world.water_level < 0 || self.world.water_level as usize >= dims.height {
            return Err(ConfigError::Invalid(format!(
                "water level {} must lie inside the world height {}",
                self.world.water_level, dims.height
            )));
        }
        if self.interaction.ray_step <= 0.0 || self.interaction.reach <= 0.0 {
            return Err(ConfigError::Invalid(
                "interaction ray step and reach must be positive".to_string(),
            ));
        }
        if self.physics.max_dt <= 0.0 {
            return Err(ConfigError::Invalid(
                "physics max_dt must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads and validates an [`EngineConfig`] from a JSON file.
///
/// # Arguments
/// * `path` - Path of the JSON file
///
/// # Returns
/// The configuration, or the first error met while reading, parsing or validating it
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: EngineConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.world.water_level, 12);
        assert_eq!(config.world.dimensions, GridDimensions::new(64, 40, 64));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{
                "world": { "seed": 7, "dimensions": { "width": 32, "height": 24, "depth": 16 } },
                "physics": { "gravity": -12.0 },
                "interaction": { "default_block": "stone" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.resolve_seed(), 7);
        assert_eq!(config.world.dimensions, GridDimensions::new(32, 24, 16));
        assert_eq!(config.physics.gravity, -12.0);
        assert_eq!(config.physics.jump_velocity, 7.0);
        assert_eq!(config.interaction.default_block, BlockType::Stone);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EngineConfig::from_json_str("{ world: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn validation_rejects_unplayable_worlds() {
        let mut config = EngineConfig::default();
        config.world.dimensions = GridDimensions::new(0, 40, 64);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.world.dimensions.height = 10;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.world.water_level = 40;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.interaction.reach = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.physics.max_dt = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config("this/file/does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn config_survives_a_trip_through_json() {
        let mut config = EngineConfig::default();
        config.world.seed = Some(99);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }
}

//! World configuration
//!
//! Every tunable of generation, meshing and streaming lives here. Missing JSON
//! fields fall back to their defaults, so a config file only needs to name what
//! it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::streaming::StreamingParams;
use crate::terrain::{BiomeWeights, TerrainParams};
use crate::voxel::chunk::ChunkDims;

/// Seed used when none is configured
pub const DEFAULT_SEED: u32 = 12345;

/// Complete configuration of a world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    pub chunk: ChunkDims,
    pub terrain: TerrainParams,
    pub biome_weights: BiomeWeights,
    pub streaming: StreamingParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            chunk: ChunkDims::default(),
            terrain: TerrainParams::default(),
            biome_weights: BiomeWeights::default(),
            streaming: StreamingParams::default(),
        }
    }
}

impl WorldConfig {
    /// Default configuration with a freshly drawn seed
    pub fn with_random_seed() -> Self {
        Self {
            seed: fastrand::u32(..),
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded world config from {} (seed {})", path.display(), config.seed);
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section for values generation cannot work with
    pub fn validate(&self) -> Result<()> {
        self.chunk.validate()?;
        self.terrain.validate()?;
        self.biome_weights.validate()?;
        self.streaming.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.chunk, ChunkDims::new(15, 90, 15));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "seed": 7, "streaming": { "far": 60.0 }, "biome_weights": { "height": 3.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.streaming.far, 60.0);
        assert_eq!(config.streaming.max_cached_chunks, StreamingParams::default().max_cached_chunks);
        assert_eq!(config.biome_weights.height, 3.0);
        assert_eq!(config.biome_weights.temperature, 6.0);
        assert_eq!(config.terrain, TerrainParams::default());
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let err = WorldConfig::from_json_str(r#"{ "chunk": { "width": 0, "height": 90, "depth": 15 } }"#);
        assert!(matches!(err, Err(Error::Config(_))));

        let err = WorldConfig::from_json_str(r#"{ "chunk": { "width": 256, "height": 256, "depth": 256 } }"#);
        assert!(matches!(err, Err(Error::Config(_))));

        let err = WorldConfig::from_json_str(r#"{ "streaming": { "horizontal_fov": 0.0 } }"#);
        assert!(matches!(err, Err(Error::Config(_))));

        let err = WorldConfig::from_json_str("{ not json");
        assert!(matches!(err, Err(Error::Json(_))));
    }

    #[test]
    fn test_load_round_trip() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("world.json");

        let mut config = WorldConfig { seed: 424242, ..Default::default() };
        config.streaming.far = 45.0;
        std::fs::write(&path, config.to_json_string().unwrap()).unwrap();

        let loaded = WorldConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let err = WorldConfig::load(temp_dir.path().join("missing.json"));
        assert!(matches!(err, Err(Error::Io(_))));
    }

    #[test]
    fn test_random_seed_keeps_defaults() {
        let config = WorldConfig::with_random_seed();
        assert_eq!(config.terrain, TerrainParams::default());
        assert!(config.validate().is_ok());
    }
}

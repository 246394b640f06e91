//! Noise-based procedural terrain generation
//!
//! Column heights come from three noise layers (continentalness, erosion and
//! peaks/valleys), each shaped by a remap curve and mixed with fixed weights.
//! Temperature and humidity pick the biome, which in turn pulls the height
//! towards its preferred range and decides the material bands.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use super::biome::{BiomeBlend, BiomeTable};
use super::layers::{apply_recipe, ColumnCursor, Jitter};
use super::noise_field::{to_unit, NoiseField, NoiseFields};
use super::tree;
use crate::config::WorldConfig;
use crate::core::{Error, Result};
use crate::math::Spline;
use crate::voxel::block::BlockType;
use crate::voxel::chunk::{Chunk, ChunkCoord, ChunkDims};

/// Sampling parameters of one fractal noise layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    /// Multiplier applied to the sample position
    pub frequency: f32,
    pub octaves: u32,
    pub persistence: f32,
}

impl NoiseLayer {
    pub const fn new(frequency: f32, octaves: u32, persistence: f32) -> Self {
        Self { frequency, octaves, persistence }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(Error::config(format!("{} frequency must be positive", name)));
        }
        if self.octaves == 0 {
            return Err(Error::config(format!("{} needs at least one octave", name)));
        }
        if !(self.persistence.is_finite() && self.persistence > 0.0) {
            return Err(Error::config(format!("{} persistence must be positive", name)));
        }
        Ok(())
    }
}

/// Mixing weights of the three height layers, must sum to 1
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerWeights {
    pub continentalness: f32,
    pub erosion: f32,
    pub peaks_valleys: f32,
}

impl Default for LayerWeights {
    fn default() -> Self {
        Self { continentalness: 0.35, erosion: 0.4, peaks_valleys: 0.25 }
    }
}

impl LayerWeights {
    pub fn validate(&self) -> Result<()> {
        let all = [self.continentalness, self.erosion, self.peaks_valleys];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::config(format!("layer weights must be non-negative, got {:?}", self)));
        }
        let sum: f32 = all.iter().sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(Error::config(format!("layer weights must sum to 1, got {}", sum)));
        }
        Ok(())
    }
}

/// Control points of the three height remap curves
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainCurves {
    pub continentalness: Vec<(f32, f32)>,
    pub erosion: Vec<(f32, f32)>,
    pub peaks_valleys: Vec<(f32, f32)>,
}

impl Default for TerrainCurves {
    fn default() -> Self {
        Self {
            continentalness: Spline::continentalness().points().to_vec(),
            erosion: Spline::erosion().points().to_vec(),
            peaks_valleys: Spline::peaks_valleys().points().to_vec(),
        }
    }
}

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub horizontal_scale: f32, // World position multiplier for height sampling
    pub height_scale: f32,     // Height of a normalized 1.0 surface, in voxels
    pub water_level: f32,
    pub continentalness: NoiseLayer,
    pub peaks_valleys: NoiseLayer,
    pub erosion: NoiseLayer,
    /// Persistence divisor where the base erosion sample is negative
    pub erosion_damping: f32,
    pub layer_weights: LayerWeights,
    pub curves: TerrainCurves,
    pub climate_frequency: f32,
    pub climate_octaves: u32,
    pub temperature_persistence: f32,
    pub humidity_persistence: f32,
    /// Cooling applied as height leaves the middle of the range
    pub temperature_height_bias: f32,
    /// Per-column probability of a tree in wooded biomes
    pub tree_chance: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            horizontal_scale: 1.4,
            height_scale: 120.0,
            water_level: 29.95,
            continentalness: NoiseLayer::new(1.0 / 64.0, 4, 0.4),
            peaks_valleys: NoiseLayer::new(1.0 / 256.0, 6, 0.4),
            erosion: NoiseLayer::new(1.0 / 512.0, 4, 0.8),
            erosion_damping: 1.5,
            layer_weights: LayerWeights::default(),
            curves: TerrainCurves::default(),
            climate_frequency: 0.005,
            climate_octaves: 4,
            temperature_persistence: 0.5,
            humidity_persistence: 0.7,
            temperature_height_bias: 0.6,
            tree_chance: 1.0 / 200.0,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("horizontal_scale", self.horizontal_scale),
            ("height_scale", self.height_scale),
            ("erosion_damping", self.erosion_damping),
            ("climate_frequency", self.climate_frequency),
            ("temperature_persistence", self.temperature_persistence),
            ("humidity_persistence", self.humidity_persistence),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !self.water_level.is_finite() || !self.temperature_height_bias.is_finite() {
            return Err(Error::config("water_level and temperature_height_bias must be finite"));
        }
        if self.climate_octaves == 0 {
            return Err(Error::config("climate needs at least one octave"));
        }
        if !(0.0..=1.0).contains(&self.tree_chance) {
            return Err(Error::config(format!("tree_chance must be in [0, 1], got {}", self.tree_chance)));
        }
        self.continentalness.validate("continentalness")?;
        self.peaks_valleys.validate("peaks_valleys")?;
        self.erosion.validate("erosion")?;
        self.layer_weights.validate()?;
        self.splines().map(|_| ())
    }

    fn splines(&self) -> Result<[Spline; 3]> {
        Ok([
            Spline::new(self.curves.continentalness.clone())?,
            Spline::new(self.curves.erosion.clone())?,
            Spline::new(self.curves.peaks_valleys.clone())?,
        ])
    }
}

/// Climate of one world column before biome selection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    /// Normalized terrain height in [0, 1]
    pub base_height: f32,
    pub temperature: f32,
    pub humidity: f32,
}

/// Procedural terrain generator
pub struct TerrainGenerator {
    seed: u32,
    dims: ChunkDims,
    params: TerrainParams,
    fields: NoiseFields,
    continentalness: Spline,
    erosion: Spline,
    peaks_valleys: Spline,
    biomes: BiomeTable,
}

impl TerrainGenerator {
    /// Create a terrain generator from a validated world configuration
    pub fn new(config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let [continentalness, erosion, peaks_valleys] = config.terrain.splines()?;

        log::debug!(
            "Terrain generator: seed {}, chunk {}, height scale {}",
            config.seed,
            config.chunk,
            config.terrain.height_scale
        );

        Ok(Self {
            seed: config.seed,
            dims: config.chunk,
            params: config.terrain.clone(),
            fields: NoiseFields::new(config.seed),
            continentalness,
            erosion,
            peaks_valleys,
            biomes: BiomeTable::standard_with_weights(config.biome_weights),
        })
    }

    /// Get terrain parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn biomes(&self) -> &BiomeTable {
        &self.biomes
    }

    fn layer(&self, field: NoiseField, layer: &NoiseLayer, x: f32, y: f32, persistence: f32) -> f32 {
        let f = layer.frequency;
        to_unit(self.fields.octave_sample(field, x * f, y * f, layer.octaves, persistence))
    }

    /// Normalized terrain height in [0, 1] at a sample position
    ///
    /// Callers working in world space should multiply by
    /// `params().horizontal_scale` first, as [`Self::column_climate`] does.
    pub fn height(&self, x: f32, y: f32) -> f32 {
        let p = &self.params;

        let c = self.layer(NoiseField::Continentalness, &p.continentalness, x, y, p.continentalness.persistence);
        let pv = self.layer(NoiseField::PeaksValleys, &p.peaks_valleys, x, y, p.peaks_valleys.persistence);

        // Eroded regions get a smoother second pass
        let ef = p.erosion.frequency;
        let mut erosion_persistence = p.erosion.persistence;
        if self.fields.sample(NoiseField::Erosion, x * ef, y * ef) < 0.0 {
            erosion_persistence /= p.erosion_damping;
        }
        let e = self.layer(NoiseField::Erosion, &p.erosion, x, y, erosion_persistence);

        let w = &p.layer_weights;
        let h = w.continentalness * self.continentalness.sample(c)
            + w.erosion * self.erosion.sample(e)
            + w.peaks_valleys * self.peaks_valleys.sample(pv);
        h.clamp(0.0, 1.0)
    }

    /// Base height, temperature and humidity of a world column
    pub fn column_climate(&self, world_x: f32, world_z: f32) -> ColumnSample {
        let p = &self.params;
        let hs = p.horizontal_scale;
        let base_height = self.height(world_x * hs, world_z * hs);

        let f = p.climate_frequency;
        let temperature = to_unit(self.fields.octave_sample(
            NoiseField::Temperature,
            world_x * f,
            world_z * f,
            p.climate_octaves,
            p.temperature_persistence,
        ));
        let humidity = to_unit(self.fields.octave_sample(
            NoiseField::Humidity,
            world_x * f,
            world_z * f,
            p.climate_octaves,
            p.humidity_persistence,
        ));

        // Colder towards both extremes of height
        let d = base_height - 0.5;
        let temperature = (temperature - p.temperature_height_bias * d * d).clamp(0.0, 1.0);

        ColumnSample { base_height, temperature, humidity }
    }

    /// Biome blend and surface height in voxels for a column
    pub fn surface_height(&self, sample: &ColumnSample) -> (BiomeBlend, f32) {
        let blend = self
            .biomes
            .blend(sample.temperature, sample.humidity, sample.base_height);
        let normalized = sample.base_height * 0.5 + blend.height * 0.5;
        let height = (normalized * self.params.height_scale).clamp(0.0, self.dims.height as f32);
        (blend, height)
    }

    /// Fill one column of a chunk from the noise fields
    pub fn fill_column(&self, chunk: &mut Chunk, local_x: u32, local_z: u32) {
        let origin = chunk.world_origin_voxel();
        let world_x = (origin.x + local_x as i32) as f32;
        let world_z = (origin.z + local_z as i32) as f32;
        let sample = self.column_climate(world_x, world_z);
        self.fill_column_with(chunk, local_x, local_z, &sample);
    }

    /// Fill one column of a chunk using a precomputed climate
    pub fn fill_column_with(&self, chunk: &mut Chunk, local_x: u32, local_z: u32, sample: &ColumnSample) {
        let origin = chunk.world_origin_voxel();
        let (x, z) = (local_x as i32, local_z as i32);
        let world_x = origin.x + x;
        let world_z = origin.z + z;

        let (blend, height) = self.surface_height(sample);
        let jitter = Jitter::new(&self.fields, world_x as f32, world_z as f32);
        let p = &self.params;

        chunk.set_block(x, 0, z, BlockType::Stone);

        let mut cursor = ColumnCursor::new(chunk, x, z, 1);
        let sand_top = p.water_level + 4.0 + 3.0 * jitter.sample(0.05);
        cursor.fill_to(sand_top.min(height), BlockType::Sand);
        apply_recipe(blend.biome, &mut cursor, height, &jitter);

        let surface = cursor.y();
        if blend.biome.supports_trees()
            && surface as f32 > p.water_level
            && tree::should_grow(world_x, world_z, self.seed, p.tree_chance)
        {
            tree::stamp_tree(cursor.chunk_mut(), IVec3::new(x, surface, z));
        }
    }

    /// Generate and mesh a whole chunk
    ///
    /// Fails with `Error::Config` for coordinates whose voxels have no `i32`
    /// world position.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Result<Chunk> {
        let mut chunk = Chunk::new(coord, self.dims)?;
        for z in 0..self.dims.depth {
            for x in 0..self.dims.width {
                self.fill_column(&mut chunk, x, z);
            }
        }
        chunk.rebuild_mesh();

        log::debug!(
            "Generated chunk {}: {} solid voxels, {} quads",
            coord,
            chunk.solid_count(),
            chunk.mesh().quad_count()
        );
        Ok(chunk)
    }
}

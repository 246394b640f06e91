//! Biome system based on temperature, humidity and height
//!
//! Every biome prefers a range on each of the three climate axes. A column is
//! assigned the biome whose preferred ranges it deviates from least, and its
//! height is pulled towards a blend of the preferred heights of the biomes
//! whose climate it matches.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Biome types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeKind {
    SnowyMountains,
    Forest,
    Plains,
    StonyMountains,
    Desert,
    Jungle,
    Tundra,
    Badlands,
}

impl BiomeKind {
    /// Whether trees may grow in this biome
    pub fn supports_trees(self) -> bool {
        matches!(self, BiomeKind::Plains | BiomeKind::Forest)
    }
}

/// Closed preference range on one climate axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn mid(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    pub fn half_width(&self) -> f32 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, v: f32) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Distance of `v` from the middle of `range`, in half-widths
///
/// 0 at the midpoint, 1 at either edge, larger outside.
pub fn deviation(v: f32, range: &Range) -> f32 {
    let half = range.half_width();
    let dist = (v - range.mid()).abs();
    if half <= f32::EPSILON {
        if dist <= f32::EPSILON { 0.0 } else { f32::INFINITY }
    } else {
        dist / half
    }
}

fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Lower bound of a biome's blend weight before squaring
const BLEND_FLOOR: f32 = 0.01;

/// A biome definition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Biome {
    pub kind: BiomeKind,
    pub temperature: Range,
    pub humidity: Range,
    pub height: Range,
}

/// Per-axis weights of the classification distance
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeWeights {
    pub temperature: f32,
    pub humidity: f32,
    pub height: f32,
}

impl Default for BiomeWeights {
    fn default() -> Self {
        Self { temperature: 6.0, humidity: 4.0, height: 7.0 }
    }
}

impl BiomeWeights {
    pub fn validate(&self) -> Result<()> {
        let all = [self.temperature, self.humidity, self.height];
        if all.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(Error::config(format!(
                "biome weights must be positive, got {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// Result of blending: the weighted preferred height and the classified biome
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeBlend {
    /// Normalized height in [0, 1]
    pub height: f32,
    pub biome: BiomeKind,
}

/// Fixed set of biomes plus the classifier
#[derive(Clone, Debug)]
pub struct BiomeTable {
    biomes: Vec<Biome>,
    weights: BiomeWeights,
}

impl BiomeTable {
    /// Create a table from definitions
    pub fn new(biomes: Vec<Biome>, weights: BiomeWeights) -> Result<Self> {
        if biomes.is_empty() {
            return Err(Error::config("biome table needs at least one biome"));
        }
        weights.validate()?;
        Ok(Self { biomes, weights })
    }

    /// The eight standard biomes with default weights
    pub fn standard() -> Self {
        Self::standard_with_weights(BiomeWeights::default())
    }

    /// The eight standard biomes with custom weights
    pub fn standard_with_weights(weights: BiomeWeights) -> Self {
        let biome = |kind, t: (f32, f32), hu: (f32, f32), h: (f32, f32)| Biome {
            kind,
            temperature: Range::new(t.0, t.1),
            humidity: Range::new(hu.0, hu.1),
            height: Range::new(h.0, h.1),
        };
        Self {
            biomes: vec![
                biome(BiomeKind::SnowyMountains, (0.0, 0.3), (0.0, 0.3), (0.7, 1.0)),
                biome(BiomeKind::Forest, (0.4, 0.8), (0.3, 0.7), (0.3, 0.5)),
                biome(BiomeKind::Plains, (0.0, 0.4), (0.3, 0.5), (0.3, 0.6)),
                biome(BiomeKind::StonyMountains, (0.5, 0.7), (0.0, 0.3), (0.6, 1.0)),
                biome(BiomeKind::Desert, (0.7, 1.0), (0.0, 0.3), (0.0, 0.4)),
                biome(BiomeKind::Jungle, (0.7, 1.0), (0.7, 1.0), (0.1, 0.4)),
                biome(BiomeKind::Tundra, (0.3, 0.5), (0.0, 0.3), (0.5, 0.8)),
                biome(BiomeKind::Badlands, (0.8, 1.0), (0.3, 0.7), (0.2, 0.5)),
            ],
            weights,
        }
    }

    pub fn biomes(&self) -> &[Biome] {
        &self.biomes
    }

    pub fn weights(&self) -> &BiomeWeights {
        &self.weights
    }

    /// Look up a biome definition by kind
    pub fn get(&self, kind: BiomeKind) -> Option<&Biome> {
        self.biomes.iter().find(|b| b.kind == kind)
    }

    fn distance(&self, biome: &Biome, temperature: f32, humidity: f32, height: f32) -> f32 {
        deviation(temperature, &biome.temperature) * self.weights.temperature
            + deviation(humidity, &biome.humidity) * self.weights.humidity
            + deviation(height, &biome.height) * self.weights.height
    }

    /// Biome with the smallest weighted deviation; the first listed wins ties
    pub fn classify(&self, temperature: f32, humidity: f32, height: f32) -> &Biome {
        let mut best = &self.biomes[0];
        let mut best_dist = self.distance(best, temperature, humidity, height);
        for biome in &self.biomes[1..] {
            let dist = self.distance(biome, temperature, humidity, height);
            if dist < best_dist {
                best = biome;
                best_dist = dist;
            }
        }
        best
    }

    /// Climate-weighted average of preferred heights, plus the classified biome
    ///
    /// Each biome's weight falls off smoothly as the climate leaves its
    /// temperature and humidity ranges. The floor keeps the total non-zero.
    pub fn blend(&self, temperature: f32, humidity: f32, height: f32) -> BiomeBlend {
        let weights: Vec<f32> = self
            .biomes
            .iter()
            .map(|b| {
                let t = smoothstep(1.0 - deviation(temperature, &b.temperature));
                let hu = smoothstep(1.0 - deviation(humidity, &b.humidity));
                (t * hu).max(BLEND_FLOOR).powi(2)
            })
            .collect();

        let total: f32 = weights.iter().sum();
        let blended = self
            .biomes
            .iter()
            .zip(&weights)
            .map(|(b, w)| w / total * b.height.mid())
            .sum::<f32>();

        BiomeBlend {
            height: blended.clamp(0.0, 1.0),
            biome: self.classify(temperature, humidity, height).kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        let r = Range::new(0.2, 0.6);
        assert!((r.mid() - 0.4).abs() < 1e-6);
        assert!((r.half_width() - 0.2).abs() < 1e-6);
        assert!(r.contains(0.2) && r.contains(0.6));
        assert!(!r.contains(0.61));
    }

    #[test]
    fn test_deviation() {
        let r = Range::new(0.0, 1.0);
        assert_eq!(deviation(0.5, &r), 0.0);
        assert!((deviation(1.0, &r) - 1.0).abs() < 1e-6);
        assert!((deviation(0.0, &r) - 1.0).abs() < 1e-6);
        assert!((deviation(1.5, &r) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_standard_table() {
        let table = BiomeTable::standard();
        assert_eq!(table.biomes().len(), 8);
        assert_eq!(table.weights(), &BiomeWeights::default());
        assert!(table.get(BiomeKind::Badlands).is_some());
    }

    #[test]
    fn test_classify_range_centers() {
        // Each biome's own center classifies back to it
        let table = BiomeTable::standard();
        for biome in table.biomes() {
            let found = table.classify(
                biome.temperature.mid(),
                biome.humidity.mid(),
                biome.height.mid(),
            );
            assert_eq!(found.kind, biome.kind);
        }
    }

    #[test]
    fn test_classify_deterministic() {
        let table = BiomeTable::standard();
        for i in 0..50 {
            let t = i as f32 / 50.0;
            let a = table.classify(t, 1.0 - t, 0.5).kind;
            let b = table.classify(t, 1.0 - t, 0.5).kind;
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_classify_first_wins_ties() {
        let range = Range::new(0.0, 1.0);
        let a = Biome { kind: BiomeKind::Desert, temperature: range, humidity: range, height: range };
        let b = Biome { kind: BiomeKind::Jungle, ..a };
        let table = BiomeTable::new(vec![a, b], BiomeWeights::default()).unwrap();
        assert_eq!(table.classify(0.3, 0.3, 0.3).kind, BiomeKind::Desert);

        let table = BiomeTable::new(vec![b, a], BiomeWeights::default()).unwrap();
        assert_eq!(table.classify(0.3, 0.3, 0.3).kind, BiomeKind::Jungle);
    }

    #[test]
    fn test_plains_climate() {
        let table = BiomeTable::standard();
        assert_eq!(table.classify(0.35, 0.4, 0.45).kind, BiomeKind::Plains);
    }

    #[test]
    fn test_blend_height_in_range() {
        let table = BiomeTable::standard();
        let (lo, hi) = table.biomes().iter().fold((1.0f32, 0.0f32), |(lo, hi), b| {
            (lo.min(b.height.mid()), hi.max(b.height.mid()))
        });
        for i in 0..=20 {
            for j in 0..=20 {
                let t = i as f32 / 20.0;
                let hu = j as f32 / 20.0;
                let blend = table.blend(t, hu, 0.5);
                assert!(blend.height >= lo - 1e-5 && blend.height <= hi + 1e-5);
                assert_eq!(blend.biome, table.classify(t, hu, 0.5).kind);
            }
        }
    }

    #[test]
    fn test_blend_favors_matching_biome() {
        // Deep in the jungle climate the jungle's low preferred height dominates
        let table = BiomeTable::standard();
        let jungle = table.get(BiomeKind::Jungle).unwrap();
        let blend = table.blend(0.85, 0.85, 0.25);
        assert!((blend.height - jungle.height.mid()).abs() < 0.05);
    }

    #[test]
    fn test_rejects_bad_weights() {
        let weights = BiomeWeights { temperature: 0.0, ..BiomeWeights::default() };
        assert!(BiomeTable::new(BiomeTable::standard().biomes().to_vec(), weights).is_err());
        assert!(BiomeTable::new(Vec::new(), BiomeWeights::default()).is_err());
    }

    #[test]
    fn test_supports_trees() {
        assert!(BiomeKind::Plains.supports_trees());
        assert!(BiomeKind::Forest.supports_trees());
        assert!(!BiomeKind::Desert.supports_trees());
        assert!(!BiomeKind::SnowyMountains.supports_trees());
    }
}

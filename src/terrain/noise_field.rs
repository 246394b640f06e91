//! Seeded 2D noise fields
//!
//! Each terrain input (continentalness, erosion, climate, ...) reads its own
//! Perlin generator so the layers vary independently. All fields derive their
//! seed from one world seed.

use noise::{NoiseFn, Perlin};

/// Independent noise inputs used by terrain generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseField {
    Continentalness,
    Erosion,
    PeaksValleys,
    /// Small-scale variation for layer boundaries
    Jitter,
    Temperature,
    Humidity,
}

impl NoiseField {
    pub const ALL: [NoiseField; 6] = [
        NoiseField::Continentalness,
        NoiseField::Erosion,
        NoiseField::PeaksValleys,
        NoiseField::Jitter,
        NoiseField::Temperature,
        NoiseField::Humidity,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Seed offset between consecutive fields
const FIELD_SEED_STRIDE: u32 = 1000;

/// The full set of noise generators for one world seed
#[derive(Clone, Debug)]
pub struct NoiseFields {
    generators: [Perlin; 6],
}

impl NoiseFields {
    /// Create the generators for a world seed
    pub fn new(seed: u32) -> Self {
        let generators = NoiseField::ALL.map(|field| {
            Perlin::new(seed.wrapping_add((field.index() as u32 + 1) * FIELD_SEED_STRIDE))
        });
        Self { generators }
    }

    /// Single-octave sample in [-1, 1]
    pub fn sample(&self, field: NoiseField, x: f32, y: f32) -> f32 {
        let value = self.generators[field.index()].get([x as f64, y as f64]) as f32;
        value.clamp(-1.0, 1.0)
    }

    /// Fractal sample in [-1, 1]
    ///
    /// Octave `i` is sampled at `2^i` times the base frequency and weighted by
    /// `persistence^i`. The sum is clamped, so high persistence saturates rather
    /// than leaving the range.
    pub fn octave_sample(
        &self,
        field: NoiseField,
        x: f32,
        y: f32,
        octaves: u32,
        persistence: f32,
    ) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..octaves {
            total += amplitude * self.sample(field, x * frequency, y * frequency);
            amplitude *= persistence;
            frequency *= 2.0;
        }

        total.clamp(-1.0, 1.0)
    }
}

/// Map a signed noise value to [0, 1]
pub fn to_unit(v: f32) -> f32 {
    (v * 0.5 + 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Perlin is zero on integer lattice points, so sample off-grid.
    const POINTS: [(f32, f32); 5] = [
        (0.37, 0.71),
        (12.3, -4.6),
        (-101.25, 33.8),
        (0.013, 0.027),
        (777.7, 1234.5),
    ];

    #[test]
    fn test_deterministic() {
        let a = NoiseFields::new(42);
        let b = NoiseFields::new(42);
        for field in NoiseField::ALL {
            for (x, y) in POINTS {
                assert_eq!(a.sample(field, x, y), b.sample(field, x, y));
                assert_eq!(
                    a.octave_sample(field, x, y, 4, 0.5),
                    b.octave_sample(field, x, y, 4, 0.5)
                );
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseFields::new(1);
        let b = NoiseFields::new(2);
        let differs = POINTS
            .iter()
            .any(|&(x, y)| a.sample(NoiseField::Continentalness, x, y) != b.sample(NoiseField::Continentalness, x, y));
        assert!(differs);
    }

    #[test]
    fn test_fields_are_independent() {
        let fields = NoiseFields::new(7);
        let differs = POINTS.iter().any(|&(x, y)| {
            fields.sample(NoiseField::Temperature, x, y) != fields.sample(NoiseField::Humidity, x, y)
        });
        assert!(differs);
    }

    #[test]
    fn test_range() {
        let fields = NoiseFields::new(99);
        for i in 0..200 {
            let x = i as f32 * 0.731 - 50.0;
            let y = i as f32 * 1.377 + 3.3;
            for field in NoiseField::ALL {
                let s = fields.sample(field, x, y);
                assert!((-1.0..=1.0).contains(&s));
                // Persistence above one would overflow without clamping
                let o = fields.octave_sample(field, x, y, 6, 1.5);
                assert!((-1.0..=1.0).contains(&o));
            }
        }
    }

    #[test]
    fn test_zero_octaves() {
        let fields = NoiseFields::new(3);
        assert_eq!(fields.octave_sample(NoiseField::Erosion, 0.5, 0.5, 0, 0.5), 0.0);
    }

    #[test]
    fn test_single_octave_matches_sample() {
        let fields = NoiseFields::new(11);
        for (x, y) in POINTS {
            assert_eq!(
                fields.octave_sample(NoiseField::Jitter, x, y, 1, 0.4),
                fields.sample(NoiseField::Jitter, x, y)
            );
        }
    }

    #[test]
    fn test_to_unit() {
        assert_eq!(to_unit(-1.0), 0.0);
        assert_eq!(to_unit(0.0), 0.5);
        assert_eq!(to_unit(1.0), 1.0);
        assert_eq!(to_unit(3.0), 1.0);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoiseFields>();
    }
}

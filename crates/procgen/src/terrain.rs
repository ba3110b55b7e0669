//! Landing terrain: a 1D heightmap with flat pads cut into it.
//!
//! Between consecutive pads the surface rises linearly to a randomized peak at
//! the region midpoint and falls back, so every pad boundary is continuous.
//! The edges of the world outside the outermost pads are flat.
//!
//! **Seed-based determinism:** the only randomness is the per-region peak
//! height, drawn from a `StdRng` seeded with `config.seed`. The same seed
//! always yields the same heightmap.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TerrainError {
    #[error("terrain needs at least one sample")]
    ZeroSamples,
    #[error("terrain needs at least one landing pad")]
    NoPads,
    #[error("pad width must be at least 2 samples, got {0}")]
    PadTooNarrow(usize),
    #[error("pad {pad} spans samples {start}..{end}, outside 0..{samples}")]
    PadOutOfBounds {
        pad: usize,
        start: isize,
        end: isize,
        samples: usize,
    },
    #[error("region after pad {pad} is {len} samples long; at least 3 are needed for a rise and fall")]
    RegionTooShort { pad: usize, len: isize },
    #[error("peak rise range {min}..{max} is empty or not finite")]
    InvalidPeakRange { min: f32, max: f32 },
    #[error("world width must be positive and finite, got {0}")]
    InvalidWorldWidth(f32),
}

/// Configuration for terrain generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of height samples across the world width.
    pub samples: usize,
    /// Number of landing pads, spread evenly across the world.
    pub pad_count: usize,
    /// Width of each pad in samples.
    pub pad_width: usize,
    /// Elevation of the pads and world edges, in meters above the floor.
    pub base_height: f32,
    /// Lower bound of a region's peak above base, in meters.
    pub peak_rise_min: f32,
    /// Upper bound (exclusive) of a region's peak above base, in meters.
    pub peak_rise_max: f32,
    /// Seed for the peak heights. None draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            samples: 4800,
            pad_count: 6,
            pad_width: 100,
            base_height: 10.0,
            peak_rise_min: 20.0,
            peak_rise_max: 70.0,
            seed: None,
        }
    }
}

impl TerrainConfig {
    /// Sample indices of the pad midpoints.
    pub fn pad_centers(&self) -> Vec<usize> {
        (1..=self.pad_count)
            .map(|k| self.samples * k / (self.pad_count + 1))
            .collect()
    }

    fn validate(&self, world_width: f32) -> Result<Vec<usize>, TerrainError> {
        if self.samples == 0 {
            return Err(TerrainError::ZeroSamples);
        }
        if self.pad_count == 0 {
            return Err(TerrainError::NoPads);
        }
        if self.pad_width < 2 {
            return Err(TerrainError::PadTooNarrow(self.pad_width));
        }
        if !(self.peak_rise_min.is_finite()
            && self.peak_rise_max.is_finite()
            && self.peak_rise_min < self.peak_rise_max)
        {
            return Err(TerrainError::InvalidPeakRange {
                min: self.peak_rise_min,
                max: self.peak_rise_max,
            });
        }
        if !(world_width.is_finite() && world_width > 0.0) {
            return Err(TerrainError::InvalidWorldWidth(world_width));
        }

        let centers = self.pad_centers();
        let half = (self.pad_width / 2) as isize;
        for (pad, &center) in centers.iter().enumerate() {
            let start = center as isize - half;
            let end = center as isize + half;
            if start < 0 || end > self.samples as isize {
                return Err(TerrainError::PadOutOfBounds {
                    pad,
                    start,
                    end,
                    samples: self.samples,
                });
            }
        }
        for (pad, pair) in centers.windows(2).enumerate() {
            let len = (pair[1] as isize - half) - (pair[0] as isize + half);
            if len < 3 {
                return Err(TerrainError::RegionTooShort { pad, len });
            }
        }
        Ok(centers)
    }
}

/// Generated terrain, immutable for the lifetime of a flight.
#[derive(Debug, Clone)]
pub struct TerrainModel {
    heights: Vec<f32>,
    pad_centers: Vec<usize>,
    pad_width: usize,
    world_width: f32,
    base_height: f32,
    max_slope: f32,
    seed: u64,
}

impl TerrainModel {
    /// Generate terrain spanning `world_width` meters.
    pub fn generate(config: &TerrainConfig, world_width: f32) -> Result<Self, TerrainError> {
        let pad_centers = config.validate(world_width)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let base = config.base_height;
        let half = config.pad_width / 2;
        // Edges and pads stay at base; only the regions between pads are raised.
        let mut heights = vec![base; config.samples];
        let mut max_slope = 0.0_f32;

        for pair in pad_centers.windows(2) {
            let region_start = pair[0] + half;
            let region_len = (pair[1] - half) - region_start;
            let mid = region_len / 2;
            let fall_len = region_len - 1 - mid;
            let peak = base + rng.gen_range(config.peak_rise_min..config.peak_rise_max);

            for i in 0..=mid {
                let t = i as f32 / mid as f32;
                heights[region_start + i] = base + t * (peak - base);
            }
            for i in (mid + 1)..region_len {
                let t = (i - mid) as f32 / fall_len as f32;
                heights[region_start + i] = peak + t * (base - peak);
            }

            max_slope = max_slope.max(config.peak_rise_max / mid.min(fall_len) as f32);
        }

        log::info!(
            "Generated terrain: {} samples over {:.0} m, {} pads, seed {}",
            config.samples,
            world_width,
            pad_centers.len(),
            seed
        );

        Ok(Self {
            heights,
            pad_centers,
            pad_width: config.pad_width,
            world_width,
            base_height: base,
            max_slope,
            seed,
        })
    }

    /// Build terrain from explicit samples, e.g. for scripted scenarios.
    ///
    /// Pads are taken as given and are not flattened.
    pub fn from_heights(
        heights: Vec<f32>,
        pad_centers: Vec<usize>,
        pad_width: usize,
        world_width: f32,
    ) -> Result<Self, TerrainError> {
        if heights.is_empty() {
            return Err(TerrainError::ZeroSamples);
        }
        if !(world_width.is_finite() && world_width > 0.0) {
            return Err(TerrainError::InvalidWorldWidth(world_width));
        }
        let max_slope = heights
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0, f32::max);
        let base_height = pad_centers
            .first()
            .and_then(|&c| heights.get(c).copied())
            .unwrap_or(heights[0]);
        Ok(Self {
            heights,
            pad_centers,
            pad_width,
            world_width,
            base_height,
            max_slope,
            seed: 0,
        })
    }

    /// All height samples, left to right.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn pad_centers(&self) -> &[usize] {
        &self.pad_centers
    }

    pub fn pad_width(&self) -> usize {
        self.pad_width
    }

    pub fn world_width(&self) -> f32 {
        self.world_width
    }

    pub fn base_height(&self) -> f32 {
        self.base_height
    }

    /// Steepest height change between adjacent samples the generator can produce.
    pub fn max_slope(&self) -> f32 {
        self.max_slope
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Horizontal distance between samples in meters.
    pub fn sample_spacing(&self) -> f32 {
        self.world_width / self.heights.len() as f32
    }

    /// World x-coordinate of a sample.
    pub fn sample_x(&self, index: usize) -> f32 {
        index as f32 * self.sample_spacing()
    }

    /// Nearest sample to a world x-coordinate, or None outside the heightmap.
    pub fn sample_index(&self, x: f32) -> Option<usize> {
        let index = (x / self.sample_spacing()).round();
        if index >= 0.0 && index < self.heights.len() as f32 {
            Some(index as usize)
        } else {
            None
        }
    }

    pub fn height_at(&self, index: usize) -> Option<f32> {
        self.heights.get(index).copied()
    }

    /// Height of the sample nearest to `x`.
    pub fn height_under(&self, x: f32) -> Option<f32> {
        self.sample_index(x).and_then(|i| self.height_at(i))
    }

    /// Sample interval covered by a pad centered at `center`.
    pub fn pad_range(&self, center: usize) -> Range<usize> {
        let half = self.pad_width / 2;
        center.saturating_sub(half)..(center + half).min(self.heights.len())
    }

    /// Sample intervals of all pads, left to right.
    pub fn pads(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.pad_centers.iter().map(|&c| self.pad_range(c))
    }

    /// Whether a sample lies on any landing pad.
    pub fn is_on_pad(&self, index: usize) -> bool {
        self.pads().any(|pad| pad.contains(&index))
    }

    /// World x-coordinate of the pad center closest to `x`.
    pub fn nearest_pad_x(&self, x: f32) -> Option<f32> {
        self.pad_centers
            .iter()
            .map(|&c| self.sample_x(c))
            .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
    }
}

//! Terrain height sampling.
//!
//! The simulation only needs two things from the ground: its extent, to
//! scatter plants, and its height, to stand them on it. `GroundSampler` is that
//! boundary; `TerrainGrid` is a heightmap implementation and `FlatGround` a
//! trivial one.

use serde::{Deserialize, Serialize};

/// Rectangular extent of the ground on the x/z plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainBounds {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
}

impl TerrainBounds {
    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn depth(&self) -> f32 {
        (self.max_z - self.min_z).max(0.0)
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

/// Ground height provider.
pub trait GroundSampler: Send + Sync {
    /// Height of the ground at `(x, z)`. Out-of-range points must still return
    /// a usable height rather than fail.
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Area plants may be scattered over.
    fn bounds(&self) -> TerrainBounds;
}

/// Level ground at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatGround {
    pub height: f32,
    pub bounds: TerrainBounds,
}

impl FlatGround {
    pub fn new(width: f32, depth: f32) -> Self {
        Self {
            height: 0.0,
            bounds: TerrainBounds {
                min_x: 0.0,
                min_z: 0.0,
                max_x: width.max(0.0),
                max_z: depth.max(0.0),
            },
        }
    }
}

impl GroundSampler for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }

    fn bounds(&self) -> TerrainBounds {
        self.bounds
    }
}

/// Grid-based terrain heightmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    /// Number of height samples along x.
    pub width: usize,
    /// Number of height samples along z.
    pub depth: usize,
    /// Distance between samples in world units.
    pub cell_size: f32,
    /// World position of sample (0, 0).
    pub origin_x: f32,
    pub origin_z: f32,
    /// Height samples (row-major, z rows).
    pub heights: Vec<f32>,
}

impl TerrainGrid {
    /// Create a flat heightmap centered on the origin.
    pub fn new(width: usize, depth: usize, cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        let origin_x = -(width.saturating_sub(1) as f32 * cell_size) / 2.0;
        let origin_z = -(depth.saturating_sub(1) as f32 * cell_size) / 2.0;

        Self {
            width,
            depth,
            cell_size,
            origin_x,
            origin_z,
            heights: vec![0.0; width * depth],
        }
    }

    /// Build a heightmap from existing samples. Returns `None` when the sample
    /// count does not match the dimensions.
    pub fn from_heights(width: usize, depth: usize, cell_size: f32, heights: Vec<f32>) -> Option<Self> {
        if heights.len() != width * depth {
            return None;
        }
        let mut grid = Self::new(width, depth, cell_size);
        grid.heights = heights;
        Some(grid)
    }

    /// Create a heightmap with gentle rolling hills.
    pub fn rolling_hills(width: usize, depth: usize, cell_size: f32, amplitude: f32) -> Self {
        let mut grid = Self::new(width, depth, cell_size);
        for gz in 0..depth {
            for gx in 0..width {
                let (x, z) = grid.grid_to_world(gx, gz);
                let h = (x * 0.031).sin() * (z * 0.027).cos()
                    + 0.5 * (x * 0.013 + z * 0.017).sin();
                grid.heights[gz * width + gx] = h * amplitude;
            }
        }
        grid
    }

    /// Get the height sample at grid coordinates.
    pub fn get_sample(&self, gx: usize, gz: usize) -> Option<f32> {
        if gx < self.width && gz < self.depth {
            self.heights.get(gz * self.width + gx).copied()
        } else {
            None
        }
    }

    /// Convert grid coordinates to world coordinates.
    pub fn grid_to_world(&self, gx: usize, gz: usize) -> (f32, f32) {
        (
            self.origin_x + gx as f32 * self.cell_size,
            self.origin_z + gz as f32 * self.cell_size,
        )
    }

    /// Get height at a world position, bilinearly interpolated. Points outside
    /// the grid sample its nearest edge.
    pub fn get_height_at(&self, world_x: f32, world_z: f32) -> f32 {
        if self.width == 0 || self.depth == 0 {
            return 0.0;
        }
        let max_gx = (self.width - 1) as f32;
        let max_gz = (self.depth - 1) as f32;
        let fx = ((world_x - self.origin_x) / self.cell_size).clamp(0.0, max_gx);
        let fz = ((world_z - self.origin_z) / self.cell_size).clamp(0.0, max_gz);
        if !fx.is_finite() || !fz.is_finite() {
            return 0.0;
        }

        let x0 = fx.floor() as usize;
        let z0 = fz.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);
        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let sample = |gx, gz| self.get_sample(gx, gz).unwrap_or(0.0);
        let near = sample(x0, z0) + (sample(x1, z0) - sample(x0, z0)) * tx;
        let far = sample(x0, z1) + (sample(x1, z1) - sample(x0, z1)) * tx;
        near + (far - near) * tz
    }

    /// Get world bounds.
    pub fn get_bounds(&self) -> TerrainBounds {
        TerrainBounds {
            min_x: self.origin_x,
            min_z: self.origin_z,
            max_x: self.origin_x + self.width.saturating_sub(1) as f32 * self.cell_size,
            max_z: self.origin_z + self.depth.saturating_sub(1) as f32 * self.cell_size,
        }
    }
}

impl GroundSampler for TerrainGrid {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.get_height_at(x, z)
    }

    fn bounds(&self) -> TerrainBounds {
        self.get_bounds()
    }
}

//! Spatial partitioning for neighbor queries.
//!
//! Plants never move, so the grid is maintained incrementally on spawn and
//! despawn instead of being rebuilt every tick. Cells are laid out on the
//! ground plane (x, z); queries are full 3D spheres.

use crate::components::Position;
use bevy_ecs::prelude::*;
use std::collections::HashMap;

/// Grid-based spatial partitioning structure.
#[derive(Resource, Debug)]
pub struct SpatialGrid {
    /// Cell size in world units.
    pub cell_size: f32,
    /// Map from cell coordinates to the entries in that cell.
    cells: HashMap<(i32, i32), Vec<SpatialEntry>>,
    /// Reverse lookup: entity to cell.
    entity_cells: HashMap<Entity, (i32, i32)>,
}

/// Entry in a spatial cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub entity: Entity,
    pub position: Position,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl SpatialGrid {
    /// Create a new spatial grid with the given cell size.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 10.0 },
            cells: HashMap::new(),
            entity_cells: HashMap::new(),
        }
    }

    /// Convert world coordinates to cell coordinates.
    #[inline]
    pub fn world_to_cell(&self, x: f32, z: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entity_cells.clear();
    }

    /// Insert an entity at a position, replacing any previous entry for it.
    pub fn insert(&mut self, entity: Entity, position: Position) {
        self.remove(entity);

        let cell = self.world_to_cell(position.x, position.z);
        self.cells
            .entry(cell)
            .or_default()
            .push(SpatialEntry { entity, position });
        self.entity_cells.insert(entity, cell);
    }

    /// Remove an entity from the grid.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(cell) = self.entity_cells.remove(&entity) else {
            return false;
        };
        if let Some(entries) = self.cells.get_mut(&cell) {
            entries.retain(|e| e.entity != entity);
            if entries.is_empty() {
                self.cells.remove(&cell);
            }
        }
        true
    }

    /// Query all entries within `radius` of `center`.
    /// Returns entries sorted by distance (closest first).
    pub fn query_sphere(&self, center: Position, radius: f32) -> Vec<SpatialEntry> {
        if !radius.is_finite() || radius < 0.0 {
            return Vec::new();
        }
        let radius_sq = radius * radius;
        let within = |e: &&SpatialEntry| e.position.distance_squared(&center) <= radius_sq;

        let mut results: Vec<SpatialEntry> = Vec::new();
        let reach = (radius / self.cell_size).ceil() + 1.0;
        let window = (2.0 * reach + 1.0) * (2.0 * reach + 1.0);

        if window >= self.cells.len() as f32 {
            // The window covers more cells than are occupied: scan those instead.
            for entries in self.cells.values() {
                results.extend(entries.iter().filter(within).copied());
            }
        } else {
            let cells_to_check = reach as i32;
            let center_cell = self.world_to_cell(center.x, center.z);
            for dx in -cells_to_check..=cells_to_check {
                for dz in -cells_to_check..=cells_to_check {
                    let cell = (
                        center_cell.0.saturating_add(dx),
                        center_cell.1.saturating_add(dz),
                    );
                    if let Some(entries) = self.cells.get(&cell) {
                        results.extend(entries.iter().filter(within).copied());
                    }
                }
            }
        }

        results.sort_by(|a, b| {
            a.position
                .distance_squared(&center)
                .total_cmp(&b.position.distance_squared(&center))
                .then_with(|| a.entity.cmp(&b.entity))
        });
        results
    }

    /// Get the entry closest to a point, if any lies within `max_radius`.
    pub fn nearest(&self, point: Position, max_radius: f32) -> Option<SpatialEntry> {
        self.query_sphere(point, max_radius).into_iter().next()
    }

    /// Get count of entries in a cell.
    pub fn cell_count(&self, cell: (i32, i32)) -> usize {
        self.cells.get(&cell).map(|v| v.len()).unwrap_or(0)
    }

    /// Get total entry count.
    pub fn total_count(&self) -> usize {
        self.entity_cells.len()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_cells.contains_key(&entity)
    }
}

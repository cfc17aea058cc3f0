//! Uniform-grid spatial index for the per-tick exposure pass.
//!
//! Buckets entity ids by position. Rebuilt from scratch once per tick by the
//! shadow domain — there is no incremental update path. Queries return a
//! candidate set: every entity in a bucket overlapping the rectangle, which
//! may include entities outside the exact rectangle. Callers do the exact
//! geometric test themselves.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::SPATIAL_CELL_SIZE;

#[derive(Resource, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<Entity>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(SPATIAL_CELL_SIZE)
    }
}

impl SpatialGrid {
    /// Cell size is fixed for the lifetime of the grid.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    fn cell_coord(&self, v: f32) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    /// Empties every bucket but keeps their allocations for the next rebuild.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, entity: Entity, pos: Vec2) {
        let key = (self.cell_coord(pos.x), self.cell_coord(pos.y));
        self.cells.entry(key).or_default().push(entity);
    }

    /// Candidate entities for an axis-aligned rectangle. Empty when nothing
    /// overlaps.
    pub fn query_rect(&self, min: Vec2, max: Vec2) -> Vec<Entity> {
        let cx1 = self.cell_coord(min.x);
        let cy1 = self.cell_coord(min.y);
        let cx2 = self.cell_coord(max.x);
        let cy2 = self.cell_coord(max.y);

        let mut results = Vec::new();
        for cx in cx1..=cx2 {
            for cy in cy1..=cy2 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    results.extend_from_slice(bucket);
                }
            }
        }
        results
    }
}

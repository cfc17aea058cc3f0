//! Shadow-casting domain — per-tick exposure computation.
//!
//! Responsible for:
//! - Projecting every obstacle outline along the sun direction and building
//!   one quadrilateral "slab" per outline edge
//! - Rebuilding the spatial index and flagging every entity contained in a
//!   slab as shadowed (first containing slab wins)
//! - The night policy: no geometry is cast after dusk, everything is
//!   uniformly shadowed by fiat and sun-damage cooldowns are held
//! - Publishing slab geometry in ShadowGeometry for the render sink

use bevy::prelude::*;

use crate::shared::*;
use crate::spatial::SpatialGrid;

pub struct ShadowPlugin;

impl Plugin for ShadowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpatialGrid>().add_systems(
            Update,
            (cast_shadows, night_exposure_policy)
                .chain()
                .in_set(TickSet::Shadows)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Displacement every outline vertex is pushed by this tick.
pub fn shadow_displacement(angle: f32, shadow_length: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * SHADOW_STRETCH * shadow_length
}

/// One slab per outline edge: the edge's two vertices plus their projected
/// counterparts, wound so the quad is a simple polygon.
pub fn slabs_for_obstacle(obstacle: &Obstacle, displacement: Vec2) -> Vec<[Vec2; 4]> {
    let near = obstacle.world_outline();
    let far: Vec<Vec2> = near.iter().map(|p| *p + displacement).collect();

    let mut slabs = Vec::with_capacity(near.len());
    for i in 0..near.len() {
        let next = (i + 1) % near.len();
        slabs.push([near[i], near[next], far[next], far[i]]);
    }
    slabs
}

pub fn quad_aabb(quad: &[Vec2; 4]) -> (Vec2, Vec2) {
    let mut min = quad[0];
    let mut max = quad[0];
    for p in &quad[1..] {
        min = min.min(*p);
        max = max.max(*p);
    }
    (min, max)
}

/// Even-odd ray-cast containment test.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// The daytime exposure pass. Resets every flag, rebuilds the spatial grid,
/// then tests slab by slab. An entity already flagged is skipped — the first
/// containing slab wins and further containment checks stop for it.
pub fn cast_shadows(
    cycle: Res<SunCycle>,
    derived: Res<SunDerived>,
    obstacles: Res<ObstacleField>,
    mut grid: ResMut<SpatialGrid>,
    mut geometry: ResMut<ShadowGeometry>,
    mut shadowables: Query<(Entity, &Position, &mut InShadow), With<Shadowable>>,
) {
    // Shadows are only geometrically meaningful while the sun is up.
    if derived.day_progress <= 0.0 {
        return;
    }

    grid.clear();
    for (entity, pos, mut in_shadow) in &mut shadowables {
        in_shadow.0 = false;
        grid.insert(entity, pos.0);
    }

    geometry.slabs.clear();
    let displacement = shadow_displacement(cycle.angle, derived.shadow_length);

    for obstacle in &obstacles.obstacles {
        for quad in slabs_for_obstacle(obstacle, displacement) {
            let (min, max) = quad_aabb(&quad);
            for candidate in grid.query_rect(min, max) {
                let Ok((_, pos, mut in_shadow)) = shadowables.get_mut(candidate) else {
                    continue;
                };
                if in_shadow.0 {
                    continue; // already shadowed
                }
                if point_in_polygon(pos.0, &quad) {
                    in_shadow.0 = true;
                }
            }
            geometry.slabs.push(quad);
        }
    }
}

/// After dusk everything counts as shadowed by policy, not geometry. The
/// sun-damage cooldown is held so no damage window opens at the next dawn's
/// first frame.
pub fn night_exposure_policy(
    derived: Res<SunDerived>,
    mut geometry: ResMut<ShadowGeometry>,
    mut shadowables: Query<(&mut InShadow, Option<&mut ExposureTimers>), With<Shadowable>>,
) {
    if derived.day_progress > 0.0 {
        return;
    }

    geometry.slabs.clear();
    for (mut in_shadow, timers) in &mut shadowables {
        in_shadow.0 = true;
        if let Some(mut timers) = timers {
            timers.sun_damage = NIGHT_COOLDOWN_HOLD_SECS;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn square_obstacle() -> Obstacle {
        Obstacle::new(
            Vec2::ZERO,
            vec![
                Vec2::new(-10.0, -10.0),
                Vec2::new(10.0, -10.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(-10.0, 10.0),
            ],
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_point_in_polygon_square() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(-0.1, 5.0), &square));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // L-shape: the notch must test outside.
        let shape = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 4.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(4.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(2.0, 8.0), &shape));
        assert!(point_in_polygon(Vec2::new(8.0, 2.0), &shape));
        assert!(!point_in_polygon(Vec2::new(8.0, 8.0), &shape));
    }

    #[test]
    fn test_one_slab_per_outline_edge() {
        let obstacle = square_obstacle();
        let slabs = slabs_for_obstacle(&obstacle, Vec2::new(100.0, 0.0));
        assert_eq!(slabs.len(), 4);
    }

    #[test]
    fn test_slab_contains_projected_midpoint() {
        let obstacle = square_obstacle();
        let displacement = Vec2::new(100.0, 0.0);
        let slabs = slabs_for_obstacle(&obstacle, displacement);

        // Halfway along the displacement from the east face midpoint.
        let probe = Vec2::new(60.0, 0.0);
        assert!(
            slabs.iter().any(|q| point_in_polygon(probe, q)),
            "projected midpoint should fall inside a slab"
        );
        // And a point far off to the side must be in none of them.
        let outside = Vec2::new(60.0, 500.0);
        assert!(slabs.iter().all(|q| !point_in_polygon(outside, q)));
    }

    #[test]
    fn test_quad_aabb_bounds_all_corners() {
        let quad = [
            Vec2::new(3.0, -2.0),
            Vec2::new(-1.0, 4.0),
            Vec2::new(7.0, 9.0),
            Vec2::new(0.0, 0.0),
        ];
        let (min, max) = quad_aabb(&quad);
        assert_eq!(min, Vec2::new(-1.0, -2.0));
        assert_eq!(max, Vec2::new(7.0, 9.0));
    }

    #[test]
    fn test_displacement_scales_with_length() {
        let short = shadow_displacement(0.0, MIN_SHADOW_LENGTH);
        let long = shadow_displacement(0.0, MAX_SHADOW_LENGTH);
        assert!(long.x > short.x);
        assert!((short.y).abs() < 1e-4);
        assert!((long.x - SHADOW_STRETCH * MAX_SHADOW_LENGTH).abs() < 1e-3);
    }
}

//! Day-cycle domain — the heartbeat of Shadefield.
//!
//! Responsible for:
//! - Advancing the cyclical sun angle (one-way sawtooth over [-π, π))
//! - Deriving the background color phase and shadow length each tick
//! - Counting days and emitting DayBreakEvent / NightFallEvent on edges

use bevy::prelude::*;
use std::f32::consts::PI;

use crate::shared::*;

pub struct DayCyclePlugin;

impl Plugin for DayCyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            advance_sun
                .in_set(TickSet::DayCycle)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Core step
// ─────────────────────────────────────────────────────────────────────────────

/// Edges produced by one cycle step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleEdges {
    pub daybreak: bool,
    pub nightfall: bool,
}

/// Advances the sun angle by `speed * dt` and wraps to -π once past π.
///
/// The wrap is a one-directional reset, not a modulo: a dt large enough to
/// overshoot a full revolution lands at -π like any other overshoot. Day
/// counting is edge-triggered through a latch so the counter bumps exactly
/// once per completed night, and not on the very first dawn after spawn.
pub fn step_cycle(cycle: &mut SunCycle, dt: f32) -> CycleEdges {
    let was_day = cycle.is_day();
    cycle.angle += cycle.speed * dt;
    if cycle.angle > PI {
        cycle.angle = -PI;
    }

    let mut edges = CycleEdges::default();
    match (was_day, cycle.is_day()) {
        (true, false) => {
            cycle.night_latch = true;
            edges.nightfall = true;
        }
        (false, true) => {
            if cycle.night_latch {
                cycle.night_latch = false;
                cycle.day_count += 1;
            }
            edges.daybreak = true;
        }
        _ => {}
    }
    edges
}

/// Per-frame tick: steps the cycle, refreshes SunDerived, emits edge events.
pub fn advance_sun(
    time: Res<Time>,
    mut cycle: ResMut<SunCycle>,
    mut derived: ResMut<SunDerived>,
    mut daybreak_writer: EventWriter<DayBreakEvent>,
    mut nightfall_writer: EventWriter<NightFallEvent>,
) {
    let edges = step_cycle(&mut cycle, time.delta_secs());

    if edges.daybreak {
        info!("[DayCycle] Dawn — day {}", cycle.day_count);
        daybreak_writer.send(DayBreakEvent {
            day: cycle.day_count,
        });
    }
    if edges.nightfall {
        info!("[DayCycle] Nightfall — day {}", cycle.day_count);
        nightfall_writer.send(NightFallEvent {
            day: cycle.day_count,
        });
    }

    derived.day_progress = cycle.day_progress();
    if cycle.is_day() {
        let t = cycle.day_progress();
        derived.shadow_length = shadow_length_at(t);
        derived.background = background_color_at(t);
    } else {
        derived.shadow_length = MAX_SHADOW_LENGTH;
        derived.background = NIGHT_COLOR;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived-value formulas
// ─────────────────────────────────────────────────────────────────────────────

/// Sun elevation for day-progress `t` in [0, 1]: a clipped parabola that is
/// 1.0 at solar noon and 0 near dawn/dusk. NOON_FLAT_WIDTH > 1 widens the
/// plateau around noon.
pub fn sun_elevation(t: f32) -> f32 {
    let s = 2.0 * t - 1.0; // [-1, 1]
    let clipped = (s.abs() / NOON_FLAT_WIDTH).min(1.0);
    (1.0 - clipped * clipped).max(0.0).sqrt()
}

/// Shadow length for day-progress `t`: longest near dawn/dusk, shortest at
/// noon, interpolated by elevation.
pub fn shadow_length_at(t: f32) -> f32 {
    let elevation = sun_elevation(t);
    MAX_SHADOW_LENGTH + (MIN_SHADOW_LENGTH - MAX_SHADOW_LENGTH) * elevation
}

/// Background tint for day-progress `t`: blue → orange (dawn), orange →
/// green (morning), a long daylight hold, then the mirror ramps into dusk.
pub fn background_color_at(t: f32) -> Color {
    if t < 0.10 {
        lerp_color(NIGHT_COLOR, DAWN_COLOR, t / 0.10)
    } else if t < 0.20 {
        lerp_color(DAWN_COLOR, DAY_COLOR, (t - 0.10) / 0.10)
    } else if t < 0.80 {
        DAY_COLOR
    } else if t < 0.90 {
        lerp_color(DAY_COLOR, DAWN_COLOR, (t - 0.80) / 0.10)
    } else {
        lerp_color(DAWN_COLOR, NIGHT_COLOR, (t - 0.90) / 0.10)
    }
}

fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Per-channel linear interpolation in sRGB space.
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let a = a.to_srgba();
    let b = b.to_srgba();
    Color::srgb(
        lerp_f32(a.red, b.red, t),
        lerp_f32(a.green, b.green, t),
        lerp_f32(a.blue, b.blue, t),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_length_monotonic_dawn_to_noon() {
        let mut prev = shadow_length_at(0.0);
        let mut t = 0.01;
        while t <= 0.5 {
            let len = shadow_length_at(t);
            assert!(
                len <= prev + 1e-6,
                "shadow length should not increase towards noon (t={t}, {len} > {prev})"
            );
            prev = len;
            t += 0.01;
        }
    }

    #[test]
    fn test_shadow_length_monotonic_noon_to_dusk() {
        let mut prev = shadow_length_at(0.5);
        let mut t = 0.51;
        while t <= 1.0 {
            let len = shadow_length_at(t);
            assert!(
                len + 1e-6 >= prev,
                "shadow length should not decrease towards dusk (t={t}, {len} < {prev})"
            );
            prev = len;
            t += 0.01;
        }
    }

    #[test]
    fn test_shadow_length_minimum_at_noon() {
        let noon = shadow_length_at(0.5);
        for t in [0.0, 0.1, 0.25, 0.4, 0.6, 0.75, 0.9, 1.0] {
            assert!(shadow_length_at(t) >= noon);
        }
        assert!((noon - MIN_SHADOW_LENGTH).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_length_bounds() {
        let mut t = 0.0;
        while t <= 1.0 {
            let len = shadow_length_at(t);
            assert!((MIN_SHADOW_LENGTH..=MAX_SHADOW_LENGTH).contains(&len));
            t += 0.05;
        }
    }

    #[test]
    fn test_sun_elevation_peaks_at_noon() {
        assert!((sun_elevation(0.5) - 1.0).abs() < 1e-6);
        assert!(sun_elevation(0.0) < sun_elevation(0.25));
        assert!(sun_elevation(1.0) < sun_elevation(0.75));
    }

    #[test]
    fn test_step_wraps_to_negative_pi() {
        let mut cycle = SunCycle {
            angle: PI - 0.01,
            speed: 1.0,
            ..Default::default()
        };
        let edges = step_cycle(&mut cycle, 0.02);
        assert!((cycle.angle - (-PI)).abs() < 1e-6);
        assert!(edges.nightfall);
        assert!(!cycle.is_day());
    }

    #[test]
    fn test_day_counter_increments_once_per_night() {
        let mut cycle = SunCycle::default();
        assert_eq!(cycle.day_count, 1);

        // First dawn after spawn: no night elapsed, counter stays at 1.
        let edges = step_cycle(&mut cycle, 0.1);
        assert!(edges.daybreak);
        assert_eq!(cycle.day_count, 1);

        // Run through dusk...
        cycle.angle = PI - 0.001;
        let edges = step_cycle(&mut cycle, 0.1);
        assert!(edges.nightfall);
        assert_eq!(cycle.day_count, 1);

        // ...and the whole night. The next dawn bumps the counter once.
        cycle.angle = -0.001;
        let edges = step_cycle(&mut cycle, 0.1);
        assert!(edges.daybreak);
        assert_eq!(cycle.day_count, 2);

        // Further day ticks do not re-trigger.
        let edges = step_cycle(&mut cycle, 0.1);
        assert!(!edges.daybreak);
        assert_eq!(cycle.day_count, 2);
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let mut cycle = SunCycle {
            angle: 0.7,
            ..Default::default()
        };
        let edges = step_cycle(&mut cycle, 0.0);
        assert_eq!(cycle.angle, 0.7);
        assert_eq!(edges, CycleEdges::default());
    }

    #[test]
    fn test_background_holds_daylight_green_midday() {
        for t in [0.25, 0.4, 0.5, 0.7, 0.79] {
            assert_eq!(background_color_at(t), DAY_COLOR);
        }
    }

    #[test]
    fn test_background_ramps_hit_breakpoint_colors() {
        let dawn_end = background_color_at(0.099999).to_srgba();
        let dawn_target = DAWN_COLOR.to_srgba();
        assert!((dawn_end.red - dawn_target.red).abs() < 0.01);

        let dusk_end = background_color_at(0.999999).to_srgba();
        let night_target = NIGHT_COLOR.to_srgba();
        assert!((dusk_end.blue - night_target.blue).abs() < 0.01);
    }
}

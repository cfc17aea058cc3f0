//! Pure growth rules, one branch per habit. No ECS types in here so the
//! whole rule table is testable with plain values.

use crate::shared::*;

/// Advances one plant's accumulators by `dt` (day-fraction units, already
/// scaled by the species' efficiency factor at the call site is NOT assumed —
/// efficiency is applied here) and returns the raw yield fruited this tick.
///
/// `day_progress` is the cyclical time: negative at night, [0, 1) by day.
/// `in_shadow` is this tick's exposure flag; at night the shadow pass holds
/// it true for everything, and the rules rely on that.
pub fn update_plant(
    def: &SpeciesDef,
    upgrade: UpgradeState,
    acc: &mut PlantAccumulators,
    in_shadow: bool,
    dt: f32,
    day_progress: f32,
) -> u32 {
    let is_day = day_progress > 0.0;
    let nightfall_edge = acc.was_day && !is_day;
    let gain = dt * upgrade.efficiency;

    let mut raw = 0;
    match def.habit {
        GrowthHabit::SunSeeking => {
            if is_day {
                if !in_shadow {
                    acc.accumulated_sun += gain;
                    if acc.accumulated_sun >= def.threshold {
                        acc.accumulated_sun = 0.0;
                        raw = def.base_yield;
                    }
                }
            } else {
                acc.accumulated_sun = 0.0;
            }
            // One bonus fruiting per night, on the edge only.
            if nightfall_edge {
                raw += def.base_yield;
            }
        }
        GrowthHabit::ShadeSeeking => {
            if in_shadow {
                acc.shade_accumulated += gain;
                if acc.shade_accumulated >= def.threshold {
                    acc.shade_accumulated = 0.0;
                    raw = def.base_yield;
                }
            } else {
                // Any direct sun wipes the progress.
                acc.shade_accumulated = 0.0;
            }
        }
        GrowthHabit::NightHarvest => {
            if is_day && !in_shadow {
                acc.accumulated_sun += gain;
            }
            if nightfall_edge {
                if acc.accumulated_sun > 0.0 && acc.accumulated_sun <= def.threshold {
                    raw = def.base_yield;
                }
                acc.accumulated_sun = 0.0;
            }
        }
        GrowthHabit::DualPhase => {
            // Night freezes both accumulators; partial progress carries
            // into the next day.
            if is_day {
                if day_progress < 0.5 {
                    if !in_shadow {
                        acc.morning_sun += gain;
                    }
                } else if in_shadow {
                    acc.evening_shade += gain;
                }
                if acc.morning_sun >= def.threshold && acc.evening_shade >= def.evening_threshold {
                    acc.morning_sun = 0.0;
                    acc.evening_shade = 0.0;
                    raw = def.base_yield;
                }
            }
        }
    }

    acc.was_day = is_day;
    raw
}

/// Scales a raw yield by the species' gem multiplier, rounding to nearest.
/// A fruiting plant always pays at least one gem.
pub fn apply_gem_multiplier(raw: u32, multiplier: f32) -> u32 {
    if raw == 0 {
        return 0;
    }
    ((raw as f32 * multiplier).round() as u32).max(1)
}

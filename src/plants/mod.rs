//! Plant domain — placed plants turning exposure into gems.
//!
//! Responsible for:
//! - Ticking every placed plant's accumulators against the growth rules
//! - Applying the per-species upgrade factors (efficiency, gem multiplier)
//! - Emitting PlantYieldEvent and spawning the gem pickups for each fruiting

use bevy::prelude::*;

use crate::shared::*;

pub mod rules;

pub use rules::{apply_gem_multiplier, update_plant};

pub struct PlantEnginePlugin;

impl Plugin for PlantEnginePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (tick_plants, spawn_yield_pickups)
                .chain()
                .in_set(TickSet::Plants)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Runs the growth rules for every placed plant. Plants whose species has no
/// registered rules are left untouched and logged once per tick.
pub fn tick_plants(
    time: Res<Time>,
    cycle: Res<SunCycle>,
    registry: Res<SpeciesRegistry>,
    upgrades: Res<UpgradeLevels>,
    mut plants: Query<(&mut Plant, &Position, &InShadow)>,
    mut yield_writer: EventWriter<PlantYieldEvent>,
) {
    let dt = cycle.day_fraction(time.delta_secs());
    let day_progress = cycle.day_progress();

    for (mut plant, pos, in_shadow) in &mut plants {
        let species = plant.species;
        let Some(def) = registry.get(species) else {
            warn!("[Plants] No growth rules registered for {:?}", species);
            continue;
        };
        let upgrade = upgrades.get(species);

        let raw = update_plant(def, upgrade, &mut plant.acc, in_shadow.0, dt, day_progress);
        if raw > 0 {
            let gems = apply_gem_multiplier(raw, upgrade.gem_multiplier);
            info!("[Plants] {} fruited for {} gems", def.name, gems);
            yield_writer.send(PlantYieldEvent {
                species,
                position: pos.0,
                gems,
            });
        }
    }
}

/// Each fruiting drops a gem pickup at the plant for the player to collect.
pub fn spawn_yield_pickups(mut commands: Commands, mut yields: EventReader<PlantYieldEvent>) {
    for event in yields.read() {
        commands.spawn((Position(event.position), Pickup { gems: event.gems }));
    }
}

//! Data layer — populates all registries at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the
//! SpeciesRegistry and UpgradeCatalog from the hard-coded game-design data
//! in submodules, then transitions into GameState::Playing.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once GameState has advanced past Loading.

mod species;
mod upgrades;

use bevy::prelude::*;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to
/// Playing.
fn load_all_data(
    mut species_registry: ResMut<SpeciesRegistry>,
    mut upgrade_catalog: ResMut<UpgradeCatalog>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    species::populate_species(&mut species_registry);
    info!("  Species loaded: {}", species_registry.species.len());

    upgrades::populate_upgrades(&mut upgrade_catalog);
    info!("  Offers loaded: {}", upgrade_catalog.entries.len());

    next_state.set(GameState::Playing);
}

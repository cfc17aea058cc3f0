mod shared;
mod daycycle;
mod spatial;
mod shadow;
mod plants;
mod economy;
mod effects;
mod hostiles;
mod world;
mod data;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use shared::*;

fn main() {
    App::new()
        // Headless: the simulation runs on MinimalPlugins; presentation is
        // an external consumer of the published state.
        .add_plugins(MinimalPlugins)
        .add_plugins(StatesPlugin)
        .add_plugins(LogPlugin::default())
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<SunCycle>()
        .init_resource::<SunDerived>()
        .init_resource::<ObstacleField>()
        .init_resource::<ShadowGeometry>()
        .init_resource::<Inventory>()
        .init_resource::<UpgradeLevels>()
        .init_resource::<SpeciesRegistry>()
        .init_resource::<UpgradeCatalog>()
        // Events
        .add_event::<DayBreakEvent>()
        .add_event::<NightFallEvent>()
        .add_event::<PlantYieldEvent>()
        .add_event::<SmokePuffEvent>()
        .add_event::<GemChangeEvent>()
        .add_event::<NoticeEvent>()
        .add_event::<PlaceItemEvent>()
        .add_event::<PickUpItemEvent>()
        .add_event::<OpenShopRequest>()
        .add_event::<CloseShopRequest>()
        .add_event::<PurchaseRequest>()
        .add_event::<PurchaseCompletedEvent>()
        .add_event::<RestartRequest>()
        .add_event::<EntityDiedEvent>()
        .add_event::<RequestFulfilledEvent>()
        // The per-frame tick: sun, then shadows, then plants, then effects.
        .configure_sets(
            Update,
            (
                TickSet::DayCycle,
                TickSet::Shadows,
                TickSet::Plants,
                TickSet::Effects,
            )
                .chain(),
        )
        // Domain plugins
        .add_plugins(daycycle::DayCyclePlugin)
        .add_plugins(shadow::ShadowPlugin)
        .add_plugins(plants::PlantEnginePlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(effects::ExposureEffectsPlugin)
        .add_plugins(hostiles::HostilesPlugin)
        .add_plugins(world::WorldPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        .run();
}

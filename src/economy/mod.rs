//! Economy domain — gem wallet, shop houses, and house deliveries.
//!
//! Responsible for:
//! - The gem ledger (GemChangeEvent → Inventory.gems, with stats)
//! - Shop open/browse/purchase/close flow and the modal Shop state
//! - Periodic house delivery requests and their fulfillment

use bevy::prelude::*;

use crate::shared::*;

pub mod gems;
pub mod requests;
pub mod shop;

pub use gems::{apply_gem_changes, GemStats};
pub use requests::{DeliveryRequest, RequestBoard};
pub use shop::ActiveShop;

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GemStats>()
            .init_resource::<ActiveShop>()
            .init_resource::<RequestBoard>()
            // The gain ledger runs in every state so nothing queued at a
            // state boundary is dropped.
            .add_systems(Update, gems::apply_gem_changes)
            .add_systems(
                Update,
                (
                    shop::open_shop,
                    requests::tick_requests,
                    requests::fulfill_requests,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (shop::handle_purchase, shop::close_shop).run_if(in_state(GameState::Shop)),
            )
            .add_systems(
                Update,
                reset_on_restart.run_if(in_state(GameState::GameOver)),
            );
    }
}

/// Clears the domain-private state when the world restarts. The world domain
/// owns the rest of the teardown; both watch the same event.
pub fn reset_on_restart(
    mut requests: EventReader<RestartRequest>,
    mut active_shop: ResMut<ActiveShop>,
    mut board: ResMut<RequestBoard>,
    mut stats: ResMut<GemStats>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    active_shop.offers.clear();
    *board = RequestBoard::default();
    *stats = GemStats::default();
}

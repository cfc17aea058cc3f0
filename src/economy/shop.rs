use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::gems::GemStats;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Resources
// ─────────────────────────────────────────────────────────────────────────────

/// The offer set the player is currently browsing. Re-sampled on every shop
/// open; empty while no shop is open.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveShop {
    pub offers: Vec<UpgradeDef>,
}

/// How many offers a shop presents per visit.
pub const OFFERS_PER_VISIT: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Offer sampling
// ─────────────────────────────────────────────────────────────────────────────

/// A boost with nothing to apply to is a misconfigured catalog entry; it can
/// never be allowed to charge the player for a no-op.
pub fn offer_is_purchasable(def: &UpgradeDef) -> bool {
    match &def.effect {
        OfferEffect::PlantPurchase(_) => true,
        OfferEffect::Boost { applies_to, .. } => !applies_to.is_empty(),
    }
}

/// Draws up to OFFERS_PER_VISIT distinct offers from the catalog:
/// filter out the unpurchasable ones, shuffle, take from the front.
pub fn sample_offers<R: Rng>(catalog: &UpgradeCatalog, rng: &mut R) -> Vec<UpgradeDef> {
    let mut pool: Vec<&UpgradeDef> = Vec::with_capacity(catalog.entries.len());
    for def in &catalog.entries {
        if offer_is_purchasable(def) {
            pool.push(def);
        } else {
            warn!("[Economy] Skipping offer '{}' — boost applies to nothing", def.id);
        }
    }
    pool.shuffle(rng);
    pool.into_iter().take(OFFERS_PER_VISIT).cloned().collect()
}

/// Mutates stock/upgrade state for one purchased offer. Side effects are
/// confined to these two resources by contract.
pub fn apply_offer_effect(
    effect: &OfferEffect,
    inventory: &mut Inventory,
    upgrades: &mut UpgradeLevels,
) {
    match effect {
        OfferEffect::PlantPurchase(species) => {
            inventory.add_plant(*species, 1);
        }
        OfferEffect::Boost {
            applies_to,
            efficiency_bonus,
            gem_multiplier_bonus,
        } => {
            for species in applies_to {
                let state = upgrades.per_species.entry(*species).or_default();
                state.efficiency += efficiency_bonus;
                state.gem_multiplier += gem_multiplier_bonus;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Opens the shop when the player asks for it near a shop house: samples a
/// fresh offer set and suspends the world tick via GameState::Shop.
pub fn open_shop(
    mut requests: EventReader<OpenShopRequest>,
    players: Query<&Position, With<Player>>,
    obstacles: Res<ObstacleField>,
    catalog: Res<UpgradeCatalog>,
    mut active_shop: ResMut<ActiveShop>,
    mut next_state: ResMut<NextState<GameState>>,
    mut notice_writer: EventWriter<NoticeEvent>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let Ok(player_pos) = players.get_single() else {
        return;
    };

    let near_shop = obstacles
        .obstacles
        .iter()
        .any(|o| o.is_shop && o.anchor.distance(player_pos.0) <= SHOP_INTERACT_RADIUS);
    if !near_shop {
        notice_writer.send(NoticeEvent {
            message: "No shop nearby".to_string(),
        });
        return;
    }

    active_shop.offers = sample_offers(&catalog, &mut rand::thread_rng());
    info!("[Economy] Shop opened with {} offers", active_shop.offers.len());
    next_state.set(GameState::Shop);
}

/// Processes PurchaseRequests — the core purchase flow. A successful
/// purchase deducts gems, applies the effect, and closes the shop.
pub fn handle_purchase(
    mut requests: EventReader<PurchaseRequest>,
    active_shop: Res<ActiveShop>,
    mut inventory: ResMut<Inventory>,
    mut upgrades: ResMut<UpgradeLevels>,
    mut stats: ResMut<GemStats>,
    mut completed_writer: EventWriter<PurchaseCompletedEvent>,
    mut notice_writer: EventWriter<NoticeEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for ev in requests.read() {
        let Some(offer) = active_shop.offers.get(ev.offer_index) else {
            warn!(
                "[Economy] Purchase failed — offer index {} out of range",
                ev.offer_index
            );
            continue;
        };

        if inventory.gems < offer.cost {
            info!(
                "[Economy] Cannot afford '{}' (need {}, have {})",
                offer.name, offer.cost, inventory.gems
            );
            notice_writer.send(NoticeEvent {
                message: "Not enough gems".to_string(),
            });
            continue;
        }

        // Commit here, not through the ledger event: a second request in the
        // same frame must be checked against the reduced balance.
        inventory.gems -= offer.cost;
        stats.total_gems_spent = stats.total_gems_spent.saturating_add(offer.cost as u64);
        stats.total_transactions += 1;

        apply_offer_effect(&offer.effect, &mut inventory, &mut upgrades);
        completed_writer.send(PurchaseCompletedEvent {
            offer_id: offer.id.clone(),
            cost: offer.cost,
        });
        info!(
            "[Economy] Purchased '{}' for {} gems. Remaining: {}",
            offer.name, offer.cost, inventory.gems
        );

        next_state.set(GameState::Playing);
    }
}

/// Leaves the shop without buying.
pub fn close_shop(
    mut requests: EventReader<CloseShopRequest>,
    mut active_shop: ResMut<ActiveShop>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    active_shop.offers.clear();
    next_state.set(GameState::Playing);
    info!("[Economy] Shop closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plant_offer(id: &str, species: Species, cost: u32) -> UpgradeDef {
        UpgradeDef {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            cost,
            effect: OfferEffect::PlantPurchase(species),
        }
    }

    fn boost_offer(id: &str, applies_to: Vec<Species>) -> UpgradeDef {
        UpgradeDef {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            cost: 5,
            effect: OfferEffect::Boost {
                applies_to,
                efficiency_bonus: 0.2,
                gem_multiplier_bonus: 0.0,
            },
        }
    }

    #[test]
    fn test_sample_skips_empty_boosts() {
        let catalog = UpgradeCatalog {
            entries: vec![
                plant_offer("a", Species::Cactus, 2),
                boost_offer("broken", vec![]),
                plant_offer("b", Species::Fern, 2),
            ],
        };
        let mut rng = StdRng::seed_from_u64(7);
        let offers = sample_offers(&catalog, &mut rng);
        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| o.id != "broken"));
    }

    #[test]
    fn test_sample_caps_at_three_distinct_offers() {
        let catalog = UpgradeCatalog {
            entries: vec![
                plant_offer("a", Species::Cactus, 2),
                plant_offer("b", Species::Bloomroot, 2),
                plant_offer("c", Species::Fern, 2),
                plant_offer("d", Species::Begonia, 2),
                boost_offer("e", vec![Species::Cactus]),
            ],
        };
        let mut rng = StdRng::seed_from_u64(7);
        let offers = sample_offers(&catalog, &mut rng);
        assert_eq!(offers.len(), OFFERS_PER_VISIT);
        let mut ids: Vec<&str> = offers.iter().map(|o| o.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), OFFERS_PER_VISIT);
    }

    #[test]
    fn test_apply_plant_purchase_restocks() {
        let mut inventory = Inventory::default();
        let mut upgrades = UpgradeLevels::default();
        let before = inventory.plant_count(Species::Fern);
        apply_offer_effect(
            &OfferEffect::PlantPurchase(Species::Fern),
            &mut inventory,
            &mut upgrades,
        );
        assert_eq!(inventory.plant_count(Species::Fern), before + 1);
    }

    #[test]
    fn test_apply_boost_bumps_every_listed_species() {
        let mut inventory = Inventory::default();
        let mut upgrades = UpgradeLevels::default();
        apply_offer_effect(
            &OfferEffect::Boost {
                applies_to: vec![Species::Cactus, Species::Begonia],
                efficiency_bonus: 0.2,
                gem_multiplier_bonus: 0.5,
            },
            &mut inventory,
            &mut upgrades,
        );
        let cactus = upgrades.get(Species::Cactus);
        assert!((cactus.efficiency - 1.2).abs() < 1e-6);
        assert!((cactus.gem_multiplier - 1.5).abs() < 1e-6);
        let fern = upgrades.get(Species::Fern);
        assert!((fern.efficiency - 1.0).abs() < 1e-6);
    }
}

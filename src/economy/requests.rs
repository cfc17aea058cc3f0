use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::gems::GemStats;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Resources
// ─────────────────────────────────────────────────────────────────────────────

/// One house asking for a species to be planted nearby.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub house: Vec2,
    pub species: Species,
    /// Seconds until the request lapses.
    pub remaining: f32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct RequestBoard {
    pub since_last: f32,
    pub active: Vec<DeliveryRequest>,
}

/// Counts down every active request, dropping the lapsed ones. Returns how
/// many lapsed.
pub fn expire_requests(board: &mut RequestBoard, dt: f32) -> usize {
    let before = board.active.len();
    for request in &mut board.active {
        request.remaining -= dt;
    }
    board.active.retain(|r| r.remaining > 0.0);
    before - board.active.len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Every REQUEST_INTERVAL seconds a random non-shop house starts asking for
/// a random species; requests lapse after REQUEST_DURATION seconds.
pub fn tick_requests(
    time: Res<Time>,
    obstacles: Res<ObstacleField>,
    mut board: ResMut<RequestBoard>,
) {
    let dt = time.delta_secs();

    let lapsed = expire_requests(&mut board, dt);
    if lapsed > 0 {
        info!("[Economy] {} delivery request(s) lapsed", lapsed);
    }

    board.since_last += dt;
    if board.since_last < REQUEST_INTERVAL {
        return;
    }
    board.since_last = 0.0;

    let mut rng = rand::thread_rng();
    let houses: Vec<Vec2> = obstacles
        .obstacles
        .iter()
        .filter(|o| !o.is_shop)
        .map(|o| o.anchor)
        .collect();
    let Some(house) = houses.choose(&mut rng).copied() else {
        return;
    };
    let species = Species::ALL[rng.gen_range(0..Species::ALL.len())];

    info!("[Economy] House at {:?} requests {}", house, species.key());
    board.active.push(DeliveryRequest {
        house,
        species,
        remaining: REQUEST_DURATION,
    });
}

/// Fulfills requests: a placed plant of the requested species within
/// DELIVERY_RADIUS of the house is consumed and pays out gems.
pub fn fulfill_requests(
    mut commands: Commands,
    mut board: ResMut<RequestBoard>,
    plants: Query<(Entity, &Plant, &Position)>,
    mut stats: ResMut<GemStats>,
    mut gem_writer: EventWriter<GemChangeEvent>,
    mut fulfilled_writer: EventWriter<RequestFulfilledEvent>,
) {
    // Two requests may not consume the same plant in one tick.
    let mut consumed: Vec<Entity> = Vec::new();
    board.active.retain(|request| {
        let delivery = plants.iter().find(|(entity, plant, pos)| {
            !consumed.contains(entity)
                && plant.species == request.species
                && pos.0.distance(request.house) <= DELIVERY_RADIUS
        });
        let Some((entity, _, _)) = delivery else {
            return true;
        };

        commands.entity(entity).despawn();
        consumed.push(entity);
        stats.deliveries_fulfilled += 1;
        gem_writer.send(GemChangeEvent {
            amount: REQUEST_REWARD_GEMS as i32,
            reason: format!("Delivered {}", request.species.key()),
        });
        fulfilled_writer.send(RequestFulfilledEvent {
            species: request.species,
            gems: REQUEST_REWARD_GEMS,
        });
        info!(
            "[Economy] Delivery of {} fulfilled, +{} gems",
            request.species.key(),
            REQUEST_REWARD_GEMS
        );
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(species: Species, remaining: f32) -> DeliveryRequest {
        DeliveryRequest {
            house: Vec2::ZERO,
            species,
            remaining,
        }
    }

    #[test]
    fn test_expire_drops_only_lapsed_requests() {
        let mut board = RequestBoard {
            since_last: 0.0,
            active: vec![request(Species::Cactus, 5.0), request(Species::Fern, 0.5)],
        };
        assert_eq!(expire_requests(&mut board, 1.0), 1);
        assert_eq!(board.active.len(), 1);
        assert_eq!(board.active[0].species, Species::Cactus);
        assert!((board.active[0].remaining - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_expire_noop_on_empty_board() {
        let mut board = RequestBoard::default();
        assert_eq!(expire_requests(&mut board, 100.0), 0);
    }
}

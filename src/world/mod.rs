//! World domain — the obstacle field and the entities living on it.
//!
//! Responsible for:
//! - Building the house lattice and the player on entering Playing
//! - The place / pick-up collaborator events for plants
//! - Auto-collecting gem pickups near the player
//! - Tearing the world down and rebuilding it on restart

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), build_world)
            .add_systems(
                Update,
                (place_items, pick_up_items, collect_pickups)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                handle_restart.run_if(in_state(GameState::GameOver)),
            );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

const HOUSE_HALF_WIDTH: f32 = 40.0;
const HOUSE_HALF_HEIGHT: f32 = 40.0;
const SCATTERED_HOUSES: usize = 100;
const LATTICE_X_PITCH: f32 = 100.0;
const LATTICE_Y_PITCH: f32 = 65.0;
const LATTICE_RADIUS: i32 = 10;
/// 1-in-21 houses is a shop.
const SHOP_ODDS: u32 = 21;

/// The gabled house silhouette, relative to the anchor.
pub fn house_outline(w: f32, h: f32) -> Vec<Vec2> {
    vec![
        Vec2::new(-w * 0.8, -h * 0.2),
        Vec2::new(0.0, -h * 0.5),
        Vec2::new(w * 0.8, -h * 0.2),
        Vec2::new(w * 0.6, -h * 0.2),
        Vec2::new(w * 0.6, h * 0.9),
        Vec2::new(-w * 0.6, h * 0.9),
        Vec2::new(-w * 0.6, -h * 0.2),
    ]
}

/// No houses on the player's spawn clearing.
pub fn in_spawn_exclusion(x: f32, y: f32) -> bool {
    (300.0..500.0).contains(&x) && (200.0..400.0).contains(&y)
}

fn push_house<R: Rng>(field: &mut ObstacleField, x: f32, y: f32, rng: &mut R) {
    if in_spawn_exclusion(x, y) {
        return;
    }
    let is_shop = rng.gen_range(0..SHOP_ODDS) == 0;
    match Obstacle::new(
        Vec2::new(x, y),
        house_outline(HOUSE_HALF_WIDTH, HOUSE_HALF_HEIGHT),
        is_shop,
    ) {
        Ok(obstacle) => field.obstacles.push(obstacle),
        Err(err) => warn!("[World] Skipping house at ({x}, {y}): {err}"),
    }
}

/// Builds the obstacle field (scattered houses plus a border ring) and spawns
/// the player. A no-op when the world already exists — re-entering Playing
/// from the shop must not rebuild anything.
pub fn build_world(
    mut commands: Commands,
    mut obstacles: ResMut<ObstacleField>,
    players: Query<(), With<Player>>,
) {
    if !obstacles.obstacles.is_empty() || !players.is_empty() {
        return;
    }

    let mut rng = rand::thread_rng();

    for _ in 0..SCATTERED_HOUSES {
        let x = rng.gen_range(-LATTICE_RADIUS..=LATTICE_RADIUS) as f32 * LATTICE_X_PITCH;
        let y = rng.gen_range(-LATTICE_RADIUS..=LATTICE_RADIUS) as f32 * LATTICE_Y_PITCH;
        push_house(&mut obstacles, x, y, &mut rng);
    }

    // Closed ring one cell outside the scatter area.
    let ring = LATTICE_RADIUS + 1;
    for gx in -ring..=ring {
        for gy in -ring..=ring {
            if gx.abs() == ring || gy.abs() == ring {
                push_house(
                    &mut obstacles,
                    gx as f32 * LATTICE_X_PITCH,
                    gy as f32 * LATTICE_Y_PITCH,
                    &mut rng,
                );
            }
        }
    }

    let shops = obstacles.obstacles.iter().filter(|o| o.is_shop).count();
    info!(
        "[World] Built {} houses ({} shops)",
        obstacles.obstacles.len(),
        shops
    );

    commands.spawn((
        Position(PLAYER_SPAWN),
        Player,
        Health(PLAYER_START_HEALTH),
        InShadow(false),
        Shadowable,
        ExposureTimers::default(),
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator events
// ─────────────────────────────────────────────────────────────────────────────

/// Places a plant from stock at the requested position.
pub fn place_items(
    mut commands: Commands,
    mut requests: EventReader<PlaceItemEvent>,
    mut inventory: ResMut<Inventory>,
    mut notice_writer: EventWriter<NoticeEvent>,
) {
    for ev in requests.read() {
        if !inventory.try_take_plant(ev.species) {
            notice_writer.send(NoticeEvent {
                message: format!("No {} in stock", ev.species.key()),
            });
            continue;
        }
        info!("[World] Placed {} at {:?}", ev.species.key(), ev.position);
        commands.spawn((
            Plant::new(ev.species),
            Position(ev.position),
            InShadow(false),
            Shadowable,
            ExposureTimers::default(),
        ));
    }
}

/// Picks up the nearest placed plant in range and refunds it to stock.
/// Nothing in range is a graceful no-op.
pub fn pick_up_items(
    mut commands: Commands,
    mut requests: EventReader<PickUpItemEvent>,
    plants: Query<(Entity, &Plant, &Position)>,
    mut inventory: ResMut<Inventory>,
) {
    for ev in requests.read() {
        let nearest = plants
            .iter()
            .map(|(entity, plant, pos)| (entity, plant.species, pos.0.distance(ev.position)))
            .filter(|(_, _, d)| *d <= ITEM_INTERACT_RADIUS)
            .min_by(|a, b| a.2.total_cmp(&b.2));
        let Some((entity, species, _)) = nearest else {
            continue;
        };
        commands.entity(entity).despawn();
        inventory.add_plant(species, 1);
        info!("[World] Picked up {}", species.key());
    }
}

/// Gems are collected by walking near them.
pub fn collect_pickups(
    mut commands: Commands,
    players: Query<&Position, With<Player>>,
    pickups: Query<(Entity, &Position, &Pickup), Without<Player>>,
    mut gem_writer: EventWriter<GemChangeEvent>,
) {
    let Ok(player_pos) = players.get_single() else {
        return;
    };
    for (entity, pos, pickup) in &pickups {
        if pos.0.distance(player_pos.0) <= PICKUP_COLLECT_RADIUS {
            commands.entity(entity).despawn();
            gem_writer.send(GemChangeEvent {
                amount: pickup.gems as i32,
                reason: "Collected gems".to_string(),
            });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Restart
// ─────────────────────────────────────────────────────────────────────────────

/// Tears down every simulation entity and resets the shared resources, then
/// re-enters Playing so `build_world` runs fresh. Domain-private resources
/// reset themselves by watching the same event.
pub fn handle_restart(
    mut commands: Commands,
    mut requests: EventReader<RestartRequest>,
    entities: Query<Entity, With<Position>>,
    mut obstacles: ResMut<ObstacleField>,
    mut geometry: ResMut<ShadowGeometry>,
    mut cycle: ResMut<SunCycle>,
    mut derived: ResMut<SunDerived>,
    mut inventory: ResMut<Inventory>,
    mut upgrades: ResMut<UpgradeLevels>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    for entity in &entities {
        commands.entity(entity).despawn();
    }
    obstacles.obstacles.clear();
    geometry.slabs.clear();
    *cycle = SunCycle::default();
    *derived = SunDerived::default();
    *inventory = Inventory::default();
    *upgrades = UpgradeLevels::default();

    info!("[World] Restarting");
    next_state.set(GameState::Playing);
}

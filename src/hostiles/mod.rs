//! Hostiles domain — wolves that come out at night.
//!
//! Responsible for:
//! - Spawning a nightly pack at a safe distance from the player
//! - Straight-line pursuit toward the player at fixed speed
//!
//! Wolves carry the full exposure component set, so daylight burns them
//! through the same pipeline as everything else once the damage policy is on.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::shared::*;

pub struct HostilesPlugin;

impl Plugin for HostilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (spawn_night_pack, pursue_player).run_if(in_state(GameState::Playing)),
        );
    }
}

/// Pack size for a given day counter.
pub fn pack_size(day: u32) -> u32 {
    HOSTILE_BASE_COUNT + HOSTILE_PER_DAY * day
}

/// A spawn point at least HOSTILE_MIN_SPAWN_DISTANCE from the player, in a
/// random direction.
fn spawn_point<R: Rng>(player: Vec2, rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = HOSTILE_MIN_SPAWN_DISTANCE + rng.gen_range(0.0..200.0);
    player + Vec2::new(angle.cos(), angle.sin()) * distance
}

/// At each nightfall, spawns the pack for the current day.
pub fn spawn_night_pack(
    mut commands: Commands,
    mut nightfall: EventReader<NightFallEvent>,
    players: Query<&Position, With<Player>>,
) {
    for ev in nightfall.read() {
        let Ok(player_pos) = players.get_single() else {
            continue;
        };
        let count = pack_size(ev.day);
        info!("[Hostiles] Night {} — spawning {} wolves", ev.day, count);

        let mut rng = rand::thread_rng();
        for _ in 0..count {
            commands.spawn((
                Position(spawn_point(player_pos.0, &mut rng)),
                Hostile {
                    speed: HOSTILE_SPEED,
                },
                Health(HOSTILE_HEALTH),
                InShadow(false),
                Shadowable,
                ExposureTimers::default(),
            ));
        }
    }
}

/// Straight-line velocity toward the player. No pathing, no avoidance.
pub fn pursue_player(
    time: Res<Time>,
    players: Query<&Position, (With<Player>, Without<Hostile>)>,
    mut hostiles: Query<(&Hostile, &mut Position), Without<Dead>>,
) {
    let Ok(player_pos) = players.get_single() else {
        return;
    };
    let dt = time.delta_secs();

    for (hostile, mut pos) in &mut hostiles {
        let to_player = player_pos.0 - pos.0;
        let distance = to_player.length();
        if distance <= f32::EPSILON {
            continue;
        }
        let step = hostile.speed * dt;
        if step >= distance {
            pos.0 = player_pos.0;
        } else {
            pos.0 += to_player / distance * step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pack_size_grows_with_days() {
        assert_eq!(pack_size(1), 20);
        assert_eq!(pack_size(2), 30);
        assert!(pack_size(5) > pack_size(4));
    }

    #[test]
    fn test_spawn_point_keeps_minimum_distance() {
        let mut rng = StdRng::seed_from_u64(42);
        let player = Vec2::new(400.0, 300.0);
        for _ in 0..100 {
            let p = spawn_point(player, &mut rng);
            assert!(p.distance(player) >= HOSTILE_MIN_SPAWN_DISTANCE - 1e-3);
        }
    }
}

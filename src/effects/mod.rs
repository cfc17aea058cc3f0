//! Exposure-effects domain — consequences of standing in the sun.
//!
//! Responsible for:
//! - Per-entity cooldown decay (timers may run negative; ≤ 0 is ready)
//! - The togglable sun-damage policy and smoke-puff emission while exposed
//! - Idempotent death handling: Dead marker, player → GameOver, others
//!   despawn

use bevy::prelude::*;

use crate::shared::*;

pub struct ExposureEffectsPlugin;

impl Plugin for ExposureEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SunDamagePolicy>().add_systems(
            Update,
            (decay_cooldowns, apply_exposure, handle_deaths)
                .chain()
                .in_set(TickSet::Effects)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Whether exposed entities take periodic sun damage. Off by default; the
/// toggle is part of the contract so a harsher mode can flip it at runtime.
#[derive(Resource, Debug, Clone)]
pub struct SunDamagePolicy {
    pub enabled: bool,
    pub damage: i32,
    pub cooldown: f32,
}

impl Default for SunDamagePolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            damage: SUN_DAMAGE_AMOUNT,
            cooldown: SUN_DAMAGE_COOLDOWN_SECS,
        }
    }
}

/// What one exposure tick does to an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExposureOutcome {
    pub damage: i32,
    pub puff: bool,
}

/// Pure per-entity step: consults the cooldowns and the policy, re-arms
/// whichever fired. Exposure means daytime and not in shadow; callers skip
/// entities that are covered.
pub fn exposure_step(timers: &mut ExposureTimers, policy: &SunDamagePolicy) -> ExposureOutcome {
    let mut outcome = ExposureOutcome::default();

    if policy.enabled && timers.sun_damage <= 0.0 {
        timers.sun_damage = policy.cooldown;
        outcome.damage = policy.damage;
    }
    if timers.effect <= 0.0 {
        timers.effect = EFFECT_COOLDOWN_SECS;
        outcome.puff = true;
    }
    outcome
}

/// Ticks every cooldown down by the frame delta. No clamping — a timer deep
/// in the negative just means "long since ready".
pub fn decay_cooldowns(time: Res<Time>, mut timers: Query<&mut ExposureTimers>) {
    let dt = time.delta_secs();
    for mut t in &mut timers {
        t.sun_damage -= dt;
        t.effect -= dt;
    }
}

/// Applies sun damage and smoke puffs to every exposed entity.
pub fn apply_exposure(
    derived: Res<SunDerived>,
    policy: Res<SunDamagePolicy>,
    mut exposed: Query<(&Position, &InShadow, &mut ExposureTimers, Option<&mut Health>)>,
    mut puff_writer: EventWriter<SmokePuffEvent>,
) {
    // At night everything is covered by policy; nothing to apply.
    if derived.day_progress <= 0.0 {
        return;
    }

    for (pos, in_shadow, mut timers, health) in &mut exposed {
        if in_shadow.0 {
            continue;
        }
        let outcome = exposure_step(&mut timers, &policy);
        if outcome.damage > 0 {
            if let Some(mut health) = health {
                health.0 -= outcome.damage;
            }
        }
        if outcome.puff {
            puff_writer.send(SmokePuffEvent { position: pos.0 });
        }
    }
}

/// Processes entities whose health hit zero. The Dead marker makes this run
/// exactly once per entity: the player flips the game to GameOver, anything
/// else is despawned.
pub fn handle_deaths(
    mut commands: Commands,
    dying: Query<(Entity, &Health, Option<&Player>), Without<Dead>>,
    mut died_writer: EventWriter<EntityDiedEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (entity, health, player) in &dying {
        if health.0 > 0 {
            continue;
        }
        commands.entity(entity).insert(Dead);
        let was_player = player.is_some();
        died_writer.send(EntityDiedEvent { entity, was_player });

        if was_player {
            warn!("[Effects] Player died — game over");
            next_state.set(GameState::GameOver);
        } else {
            commands.entity(entity).despawn();
        }
    }
}

//! Shared components, resources, events, and states for Shadefield.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::PI;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    /// Shop browsing is modal — the world tick is suspended while open.
    Shop,
    /// Terminal until an explicit RestartRequest.
    GameOver,
}

// ═══════════════════════════════════════════════════════════════════════
// TICK ORDERING — one deterministic pass per frame
// ═══════════════════════════════════════════════════════════════════════

/// The per-tick pipeline. Configured as a chain in `main.rs`:
/// sun advances, then shadows are recast, then plants consume their
/// exposure, then effects apply consequences.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    DayCycle,
    Shadows,
    Plants,
    Effects,
}

// ═══════════════════════════════════════════════════════════════════════
// SUN CYCLE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SunCycle {
    /// Radians in [-π, π). `angle > 0` is day, `angle <= 0` is night.
    pub angle: f32,
    /// Radians per second.
    pub speed: f32,
    pub day_count: u32,
    /// Set at nightfall, cleared at the dawn that bumps `day_count`.
    /// Keeps the counter edge-triggered rather than level-triggered.
    pub night_latch: bool,
}

impl Default for SunCycle {
    fn default() -> Self {
        Self {
            angle: 0.0,
            speed: DAY_SPEED,
            day_count: 1,
            night_latch: false,
        }
    }
}

impl SunCycle {
    pub fn is_day(&self) -> bool {
        self.angle > 0.0
    }

    /// Normalized cyclical time: negative at night, [0, 1) through the day.
    pub fn day_progress(&self) -> f32 {
        self.angle / PI
    }

    /// Converts an elapsed-seconds delta into day-fraction units, the time
    /// base plant accumulators run on.
    pub fn day_fraction(&self, dt_secs: f32) -> f32 {
        self.speed * dt_secs / PI
    }
}

/// Per-tick values derived from SunCycle by the daycycle domain.
/// Read-only for everyone else (shadow casting, presentation sinks).
#[derive(Resource, Debug, Clone)]
pub struct SunDerived {
    pub day_progress: f32,
    pub shadow_length: f32,
    /// Background tint for the presentation layer.
    pub background: Color,
}

impl Default for SunDerived {
    fn default() -> Self {
        Self {
            day_progress: 0.0,
            shadow_length: MAX_SHADOW_LENGTH,
            background: NIGHT_COLOR,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ENTITIES — simulation-owned components
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Recomputed from scratch every shadow pass; never carried over.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct InShadow(pub bool);

/// Marker: this entity participates in the shadow/exposure pass.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Shadowable;

#[derive(Component, Debug, Clone, Copy)]
pub struct Health(pub i32);

/// Per-entity cooldowns, in seconds. Allowed to run negative; anything
/// at or below zero counts as ready.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ExposureTimers {
    pub sun_damage: f32,
    pub effect: f32,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy)]
pub struct Hostile {
    pub speed: f32,
}

/// Idempotency guard: the death handler runs once per entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dead;

/// A collectible gem drop; auto-collected when the player walks near.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup {
    pub gems: u32,
}

// ═══════════════════════════════════════════════════════════════════════
// PLANTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Cactus,
    Bloomroot,
    Fern,
    Begonia,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Cactus,
        Species::Bloomroot,
        Species::Fern,
        Species::Begonia,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Species::Cactus => "cactus",
            Species::Bloomroot => "bloomroot",
            Species::Fern => "fern",
            Species::Begonia => "begonia",
        }
    }
}

/// How a species reacts to sun and shade over the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthHabit {
    /// Accumulates sun while exposed during the day; fruits at a threshold.
    /// Also fruits once on each day→night edge.
    SunSeeking,
    /// Accumulates shade; any sunlight resets the accumulator.
    ShadeSeeking,
    /// Accumulates sun by day; fruits at nightfall only if the total stayed
    /// within a partial cap.
    NightHarvest,
    /// Needs morning sun AND evening shade, each past its own threshold.
    DualPhase,
}

/// Canonical growth-rule row for one species. Single source of truth for
/// both the plant engine and the upgrade catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub species: Species,
    pub name: String,
    pub habit: GrowthHabit,
    /// Primary accumulator threshold, in day-fraction units.
    /// For NightHarvest this is the partial cap (fruits only at or below it).
    pub threshold: f32,
    /// Evening-shade threshold; only meaningful for DualPhase.
    pub evening_threshold: f32,
    pub base_yield: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SpeciesRegistry {
    pub species: HashMap<Species, SpeciesDef>,
}

impl SpeciesRegistry {
    pub fn get(&self, species: Species) -> Option<&SpeciesDef> {
        self.species.get(&species)
    }
}

/// Running exposure totals for one placed plant, in day-fraction units.
/// Only the subset relevant to the species' habit is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantAccumulators {
    pub accumulated_sun: f32,
    pub shade_accumulated: f32,
    pub morning_sun: f32,
    pub evening_shade: f32,
    /// Latch for day→night edge detection.
    pub was_day: bool,
}

impl Default for PlantAccumulators {
    fn default() -> Self {
        Self {
            accumulated_sun: 0.0,
            shade_accumulated: 0.0,
            morning_sun: 0.0,
            evening_shade: 0.0,
            was_day: true,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Plant {
    pub species: Species,
    pub acc: PlantAccumulators,
}

impl Plant {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            acc: PlantAccumulators::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// OBSTACLES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum ObstacleError {
    #[error("obstacle outline needs at least 3 vertices, got {vertices}")]
    DegenerateOutline { vertices: usize },
}

/// A static shadow-casting structure. Immutable after world build.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub anchor: Vec2,
    /// Ordered offsets relative to the anchor; ≥3 points, non-self-intersecting.
    pub outline: Vec<Vec2>,
    /// Shops are regular obstacles to the shadow caster; only the economy
    /// domain cares about this flag.
    pub is_shop: bool,
}

impl Obstacle {
    /// Validates the outline at world-build time so the shadow caster never
    /// has to.
    pub fn new(anchor: Vec2, outline: Vec<Vec2>, is_shop: bool) -> Result<Self, ObstacleError> {
        if outline.len() < 3 {
            return Err(ObstacleError::DegenerateOutline {
                vertices: outline.len(),
            });
        }
        Ok(Self {
            anchor,
            outline,
            is_shop,
        })
    }

    pub fn world_outline(&self) -> Vec<Vec2> {
        self.outline.iter().map(|p| self.anchor + *p).collect()
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

/// Shadow slab geometry computed this tick, published for the render sink.
/// Each slab is one obstacle edge plus its sun-projected counterpart.
#[derive(Resource, Debug, Clone, Default)]
pub struct ShadowGeometry {
    pub slabs: Vec<[Vec2; 4]>,
}

// ═══════════════════════════════════════════════════════════════════════
// ECONOMY — wallet, stock, upgrades
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub gems: u32,
    /// Placeable plants in stock, per species.
    pub plants: HashMap<Species, u32>,
}

impl Default for Inventory {
    fn default() -> Self {
        let mut plants = HashMap::new();
        for species in Species::ALL {
            plants.insert(species, STARTING_PLANTS_PER_SPECIES);
        }
        Self { gems: 0, plants }
    }
}

impl Inventory {
    pub fn plant_count(&self, species: Species) -> u32 {
        self.plants.get(&species).copied().unwrap_or(0)
    }

    pub fn add_plant(&mut self, species: Species, quantity: u32) {
        *self.plants.entry(species).or_insert(0) += quantity;
    }

    /// Removes one plant from stock. Returns false if none were available.
    pub fn try_take_plant(&mut self, species: Species) -> bool {
        match self.plants.get_mut(&species) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Per-species upgrade levels. Both factors start at 1.0 and only ever
/// increase through purchases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpgradeState {
    /// Scales accumulation rate.
    pub efficiency: f32,
    /// Scales fruiting yield (rounded to nearest, floored at 1 when fruiting).
    pub gem_multiplier: f32,
}

impl Default for UpgradeState {
    fn default() -> Self {
        Self {
            efficiency: 1.0,
            gem_multiplier: 1.0,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct UpgradeLevels {
    pub per_species: HashMap<Species, UpgradeState>,
}

impl Default for UpgradeLevels {
    fn default() -> Self {
        let mut per_species = HashMap::new();
        for species in Species::ALL {
            per_species.insert(species, UpgradeState::default());
        }
        Self { per_species }
    }
}

impl UpgradeLevels {
    pub fn get(&self, species: Species) -> UpgradeState {
        self.per_species.get(&species).copied().unwrap_or_default()
    }
}

/// What a catalog entry does when purchased. Side effects are confined to
/// Inventory stock and UpgradeLevels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OfferEffect {
    /// Adds one placeable plant of the species to stock.
    PlantPurchase(Species),
    /// Bumps upgrade factors for every listed species.
    Boost {
        applies_to: Vec<Species>,
        efficiency_bonus: f32,
        gem_multiplier_bonus: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Cost in gems.
    pub cost: u32,
    pub effect: OfferEffect,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct UpgradeCatalog {
    pub entries: Vec<UpgradeDef>,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Night→day edge. Fires exactly once per dawn.
#[derive(Event, Debug, Clone)]
pub struct DayBreakEvent {
    pub day: u32,
}

/// Day→night edge.
#[derive(Event, Debug, Clone)]
pub struct NightFallEvent {
    pub day: u32,
}

/// A plant fruited. `gems` is already multiplier-adjusted.
#[derive(Event, Debug, Clone)]
pub struct PlantYieldEvent {
    pub species: Species,
    pub position: Vec2,
    pub gems: u32,
}

/// Periodic cosmetic emission for an exposed entity (presentation sink).
#[derive(Event, Debug, Clone)]
pub struct SmokePuffEvent {
    pub position: Vec2,
}

/// Gem ledger mutation. Positive = gain, negative = spend.
#[derive(Event, Debug, Clone)]
pub struct GemChangeEvent {
    pub amount: i32,
    pub reason: String,
}

/// Transient user-visible notice ("Not enough gems", …).
#[derive(Event, Debug, Clone)]
pub struct NoticeEvent {
    pub message: String,
}

/// Sent by the input collaborator: place a plant from stock at a position.
#[derive(Event, Debug, Clone)]
pub struct PlaceItemEvent {
    pub species: Species,
    pub position: Vec2,
}

/// Sent by the input collaborator: pick up the nearest placed plant in range.
#[derive(Event, Debug, Clone)]
pub struct PickUpItemEvent {
    pub position: Vec2,
}

/// Sent by the input collaborator while standing near a shop house.
#[derive(Event, Debug, Clone)]
pub struct OpenShopRequest;

#[derive(Event, Debug, Clone)]
pub struct CloseShopRequest;

/// Buy the offer at this index into the current offer set.
#[derive(Event, Debug, Clone)]
pub struct PurchaseRequest {
    pub offer_index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct PurchaseCompletedEvent {
    pub offer_id: String,
    pub cost: u32,
}

/// Leave GameOver and rebuild the world.
#[derive(Event, Debug, Clone)]
pub struct RestartRequest;

/// An entity's health reached zero this tick.
#[derive(Event, Debug, Clone)]
pub struct EntityDiedEvent {
    pub entity: Entity,
    pub was_player: bool,
}

/// A house delivery request was fulfilled.
#[derive(Event, Debug, Clone)]
pub struct RequestFulfilledEvent {
    pub species: Species,
    pub gems: u32,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

/// Radians per second. A full day half-cycle (0 → π) takes ~10.5 s.
pub const DAY_SPEED: f32 = 0.3;

/// World units a shadow extends per unit of shadow length.
pub const SHADOW_STRETCH: f32 = 500.0;
pub const MAX_SHADOW_LENGTH: f32 = 1.5;
pub const MIN_SHADOW_LENGTH: f32 = 0.2;
/// Widens the flat low-shadow region around solar noon.
pub const NOON_FLAT_WIDTH: f32 = 1.8;

pub const NIGHT_COLOR: Color = Color::srgb(0.133, 0.2, 0.266); // #223344
pub const DAWN_COLOR: Color = Color::srgb(0.988, 0.639, 0.066); // #fca311
pub const DAY_COLOR: Color = Color::srgb(0.498, 0.721, 0.36); // #7fb85c

pub const SPATIAL_CELL_SIZE: f32 = 64.0;

pub const PLAYER_SPAWN: Vec2 = Vec2::new(400.0, 300.0);
pub const PLAYER_START_HEALTH: i32 = 1000;
pub const HOSTILE_HEALTH: i32 = 3;
pub const HOSTILE_SPEED: f32 = 40.0;

/// Seconds between sun-damage applications while exposed.
pub const SUN_DAMAGE_COOLDOWN_SECS: f32 = 0.5;
pub const SUN_DAMAGE_AMOUNT: i32 = 1;
/// Seconds between smoke puffs while exposed.
pub const EFFECT_COOLDOWN_SECS: f32 = 0.3;
/// The night pass parks sun-damage cooldowns here so no damage window
/// opens on the first frame after dawn.
pub const NIGHT_COOLDOWN_HOLD_SECS: f32 = 1.0;

pub const HOSTILE_BASE_COUNT: u32 = 10;
pub const HOSTILE_PER_DAY: u32 = 10;
pub const HOSTILE_MIN_SPAWN_DISTANCE: f32 = 300.0;

pub const PICKUP_COLLECT_RADIUS: f32 = 30.0;
pub const ITEM_INTERACT_RADIUS: f32 = 50.0;
pub const SHOP_INTERACT_RADIUS: f32 = 100.0;

pub const STARTING_PLANTS_PER_SPECIES: u32 = 2;

pub const DELIVERY_RADIUS: f32 = 100.0;
/// Seconds between new house requests.
pub const REQUEST_INTERVAL: f32 = 10.0;
/// Seconds a request stays active.
pub const REQUEST_DURATION: f32 = 20.0;
pub const REQUEST_REWARD_GEMS: u32 = 3;

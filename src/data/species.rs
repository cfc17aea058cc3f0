use crate::shared::*;

/// Populate the SpeciesRegistry with the canonical growth-rule table.
///
/// Thresholds are in day-fraction units (a full day is 1.0):
///   cactus    — sun-seeker, fruits every 0.9 of direct sun, plus once at dusk
///   bloomroot — shade-seeker, fruits every 0.9 of shade, sun wipes progress
///   fern      — night-harvest, pays at dusk only if sun stayed in (0, 0.5]
///   begonia   — dual-phase, 0.3 morning sun and 0.3 evening shade
pub fn populate_species(registry: &mut SpeciesRegistry) {
    let defs = vec![
        SpeciesDef {
            species: Species::Cactus,
            name: "Cactus".into(),
            habit: GrowthHabit::SunSeeking,
            threshold: 0.9,
            evening_threshold: 0.0,
            base_yield: 1,
        },
        SpeciesDef {
            species: Species::Bloomroot,
            name: "Bloomroot".into(),
            habit: GrowthHabit::ShadeSeeking,
            threshold: 0.9,
            evening_threshold: 0.0,
            base_yield: 1,
        },
        SpeciesDef {
            species: Species::Fern,
            name: "Fern".into(),
            habit: GrowthHabit::NightHarvest,
            threshold: 0.5,
            evening_threshold: 0.0,
            base_yield: 3,
        },
        SpeciesDef {
            species: Species::Begonia,
            name: "Begonia".into(),
            habit: GrowthHabit::DualPhase,
            threshold: 0.3,
            evening_threshold: 0.3,
            base_yield: 3,
        },
    ];

    for def in defs {
        registry.species.insert(def.species, def);
    }
}

use crate::shared::*;

fn plant(id: &str, name: &str, species: Species, cost: u32) -> UpgradeDef {
    UpgradeDef {
        id: id.into(),
        name: name.into(),
        description: format!("One more {} for your stock", name.to_lowercase()),
        cost,
        effect: OfferEffect::PlantPurchase(species),
    }
}

fn boost(
    id: &str,
    name: &str,
    description: &str,
    cost: u32,
    applies_to: Vec<Species>,
    efficiency_bonus: f32,
    gem_multiplier_bonus: f32,
) -> UpgradeDef {
    UpgradeDef {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        cost,
        effect: OfferEffect::Boost {
            applies_to,
            efficiency_bonus,
            gem_multiplier_bonus,
        },
    }
}

/// Populate the UpgradeCatalog: every species is purchasable for 2 gems,
/// and each has an efficiency boost and a gem-multiplier boost.
pub fn populate_upgrades(catalog: &mut UpgradeCatalog) {
    catalog.entries = vec![
        plant("buy_cactus", "Cactus", Species::Cactus, 2),
        plant("buy_bloomroot", "Bloomroot", Species::Bloomroot, 2),
        plant("buy_fern", "Fern", Species::Fern, 2),
        plant("buy_begonia", "Begonia", Species::Begonia, 2),
        boost(
            "cactus_efficiency",
            "Sun Drinker",
            "Cacti soak up sun 20% faster",
            6,
            vec![Species::Cactus],
            0.2,
            0.0,
        ),
        boost(
            "cactus_gems",
            "Crystal Spines",
            "Cacti fruit 50% more gems",
            5,
            vec![Species::Cactus],
            0.0,
            0.5,
        ),
        boost(
            "bloomroot_efficiency",
            "Deep Roots",
            "Bloomroot gathers shade 20% faster",
            5,
            vec![Species::Bloomroot],
            0.2,
            0.0,
        ),
        boost(
            "bloomroot_gems",
            "Dark Bloom",
            "Bloomroot fruits 40% more gems",
            4,
            vec![Species::Bloomroot],
            0.0,
            0.4,
        ),
        boost(
            "fern_efficiency",
            "Morning Frond",
            "Ferns bank sun 20% faster",
            6,
            vec![Species::Fern],
            0.2,
            0.0,
        ),
        boost(
            "fern_gems",
            "Silver Frond",
            "Ferns fruit 50% more gems",
            5,
            vec![Species::Fern],
            0.0,
            0.5,
        ),
        boost(
            "begonia_balance",
            "Twin Bloom",
            "Begonias need 15% less of both phases",
            8,
            vec![Species::Begonia],
            0.15,
            0.0,
        ),
        boost(
            "begonia_gems",
            "Prism Petals",
            "Begonias fruit 50% more gems",
            6,
            vec![Species::Begonia],
            0.0,
            0.5,
        ),
    ];
}

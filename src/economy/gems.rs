use bevy::prelude::*;

use crate::shared::*;

/// Tracks economy statistics for the session summary.
#[derive(Resource, Debug, Clone, Default)]
pub struct GemStats {
    pub total_gems_earned: u64,
    pub total_gems_spent: u64,
    pub total_transactions: u64,
    pub deliveries_fulfilled: u64,
}

/// One ledger step. Spending past the balance clamps to 0 — callers are
/// expected to validate affordability before sending the event.
pub fn apply_gem_change(balance: u32, amount: i32) -> u32 {
    if amount >= 0 {
        balance.saturating_add(amount as u32)
    } else {
        balance.saturating_sub((-amount) as u32)
    }
}

/// Applies GemChangeEvents to the Inventory wallet and keeps the stats.
pub fn apply_gem_changes(
    mut gem_events: EventReader<GemChangeEvent>,
    mut inventory: ResMut<Inventory>,
    mut stats: ResMut<GemStats>,
) {
    for ev in gem_events.read() {
        let before = inventory.gems;
        inventory.gems = apply_gem_change(before, ev.amount);

        if ev.amount >= 0 {
            stats.total_gems_earned = stats.total_gems_earned.saturating_add(ev.amount as u64);
            info!(
                "[Economy] Gems +{}: {}. New balance: {}",
                ev.amount, ev.reason, inventory.gems
            );
        } else {
            let cost = (-ev.amount) as u32;
            if cost > before {
                warn!(
                    "[Economy] Overspend of {} gems against a balance of {} ({}); balance floors at 0",
                    cost, before, ev.reason
                );
            } else {
                info!(
                    "[Economy] Gems -{}: {}. New balance: {}",
                    cost, ev.reason, inventory.gems
                );
            }
            stats.total_gems_spent = stats
                .total_gems_spent
                .saturating_add(cost.min(before) as u64);
        }
        stats.total_transactions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_gem_change_gain() {
        assert_eq!(apply_gem_change(5, 3), 8);
        assert_eq!(apply_gem_change(0, 0), 0);
    }

    #[test]
    fn test_apply_gem_change_spend() {
        assert_eq!(apply_gem_change(10, -4), 6);
        assert_eq!(apply_gem_change(10, -10), 0);
    }

    #[test]
    fn test_apply_gem_change_overspend_clamps() {
        assert_eq!(apply_gem_change(3, -10), 0);
    }

    #[test]
    fn test_gem_stats_default() {
        let stats = GemStats::default();
        assert_eq!(stats.total_gems_earned, 0);
        assert_eq!(stats.total_gems_spent, 0);
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.deliveries_fulfilled, 0);
    }
}

//! Logistic point (LP) spend per actor and across the party.
use crate::core::aggregate::CostAggregator;
use crate::core::cache::ChangeDetectingCache;
use crate::core::config::{Actor, ActorKind};
use serde::Serialize;
use tracing::debug;

/// Name of the collection holding the last LP seen per actor.
pub const LP_COLLECTION: &str = "lp_spent";

/// LP spent by one actor: its item prices, plus the description's cost hint
/// for NPCs and vehicles.
pub fn compute_lp_cost(actor: &Actor, aggregator: &CostAggregator) -> f64 {
    let free_text = match actor.kind {
        ActorKind::Npc | ActorKind::Vehicle => actor.description.as_deref(),
        ActorKind::Character => None,
    };
    aggregator.aggregate(&actor.items, free_text)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCost {
    pub name: String,
    pub lp: f64,
}

/// Per-item LP of a single actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemBreakdown {
    pub actor: String,
    pub items: Vec<ItemCost>,
    pub total_lp: f64,
    pub max_lp: Option<f64>,
}

pub fn item_breakdown(actor: &Actor) -> ItemBreakdown {
    let items: Vec<ItemCost> = actor
        .items
        .iter()
        .filter_map(|item| match item.price {
            Some(lp) if lp > 0.0 => Some(ItemCost {
                name: item.name.clone(),
                lp,
            }),
            _ => None,
        })
        .collect();
    let total_lp = items.iter().map(|i| i.lp).sum();

    ItemBreakdown {
        actor: actor.name.clone(),
        items,
        total_lp,
        max_lp: actor.max_lp,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorLp {
    pub id: String,
    pub name: String,
    pub lp: f64,
    pub max_lp: Option<f64>,
}

/// LP across all player-owned actors that have spent any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LpSummary {
    pub actors: Vec<ActorLp>,
    pub total_lp: f64,
    /// Sum of the positive maxima only.
    pub total_max_lp: f64,
}

pub fn lp_summary(actors: &[Actor], aggregator: &CostAggregator) -> LpSummary {
    let mut summary = LpSummary {
        actors: Vec::new(),
        total_lp: 0.0,
        total_max_lp: 0.0,
    };

    for actor in actors.iter().filter(|a| a.player_owned) {
        let lp = compute_lp_cost(actor, aggregator);
        if lp <= 0.0 {
            debug!("Skipping {} with no LP spend", actor.name);
            continue;
        }
        summary.total_lp += lp;
        if let Some(max_lp) = actor.max_lp.filter(|m| *m > 0.0) {
            summary.total_max_lp += max_lp;
        }
        summary.actors.push(ActorLp {
            id: actor.id.clone(),
            name: actor.name.clone(),
            lp,
            max_lp: actor.max_lp,
        });
    }
    summary
}

/// Ids of player-owned actors whose LP changed since last observed.
///
/// Each call records the current LP, so a second call with unchanged actors
/// returns nothing.
pub fn refresh_signals(
    actors: &[Actor],
    aggregator: &CostAggregator,
    cache: &ChangeDetectingCache,
) -> Vec<String> {
    actors
        .iter()
        .filter(|a| a.player_owned)
        .filter(|a| cache.has_changed(&a.id, || compute_lp_cost(a, aggregator)))
        .map(|a| a.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Item;
    use crate::store::memory::MemoryCollection;
    use std::sync::Arc;

    fn actor(id: &str, kind: ActorKind, prices: &[Option<f64>]) -> Actor {
        Actor {
            id: id.to_string(),
            name: format!("Actor {id}"),
            kind,
            player_owned: true,
            max_lp: None,
            description: None,
            items: prices
                .iter()
                .enumerate()
                .map(|(i, price)| Item {
                    name: format!("Item {i}"),
                    price: *price,
                })
                .collect(),
            arcane: None,
            powers: vec![],
        }
    }

    #[test]
    fn test_character_ignores_description() {
        let aggregator = CostAggregator::default();
        let mut razor = actor("a1", ActorKind::Character, &[Some(3.0), Some(-1.0), None]);
        razor.description = Some("Cost: 10".to_string());
        assert_eq!(compute_lp_cost(&razor, &aggregator), 3.0);
    }

    #[test]
    fn test_npc_and_vehicle_read_description() {
        let aggregator = CostAggregator::default();
        let mut van = actor("v1", ActorKind::Vehicle, &[Some(2.0)]);
        van.description = Some("<p><strong>Cost:</strong> 6</p>".to_string());
        assert_eq!(compute_lp_cost(&van, &aggregator), 8.0);

        let mut ghoul = actor("n1", ActorKind::Npc, &[]);
        ghoul.description = Some("A hungry ghoul".to_string());
        assert_eq!(compute_lp_cost(&ghoul, &aggregator), 0.0);
    }

    #[test]
    fn test_item_breakdown() {
        let mut razor = actor("a1", ActorKind::Character, &[Some(4.0), Some(0.0), Some(1.5)]);
        razor.max_lp = Some(30.0);
        let breakdown = item_breakdown(&razor);

        assert_eq!(breakdown.items.len(), 2);
        assert_eq!(breakdown.items[0].name, "Item 0");
        assert_eq!(breakdown.items[1].name, "Item 2");
        assert_eq!(breakdown.total_lp, 5.5);
        assert_eq!(breakdown.max_lp, Some(30.0));
    }

    #[test]
    fn test_lp_summary_filters_and_totals() {
        let aggregator = CostAggregator::default();
        let mut a = actor("a", ActorKind::Character, &[Some(5.0)]);
        a.max_lp = Some(20.0);
        let mut b = actor("b", ActorKind::Character, &[Some(3.0)]);
        b.max_lp = Some(-4.0);
        let spirit = actor("c", ActorKind::Character, &[]);
        let mut npc = actor("d", ActorKind::Npc, &[Some(9.0)]);
        npc.player_owned = false;

        let summary = lp_summary(&[a, b, spirit, npc], &aggregator);
        let ids: Vec<_> = summary.actors.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(summary.total_lp, 8.0);
        assert_eq!(summary.total_max_lp, 20.0);
    }

    #[test]
    fn test_refresh_signals() {
        let aggregator = CostAggregator::default();
        let cache = ChangeDetectingCache::new(Some(Arc::new(MemoryCollection::new())));
        let mut actors = vec![
            actor("a", ActorKind::Character, &[Some(5.0)]),
            actor("b", ActorKind::Character, &[]),
        ];
        actors.push({
            let mut npc = actor("c", ActorKind::Npc, &[Some(2.0)]);
            npc.player_owned = false;
            npc
        });

        assert_eq!(refresh_signals(&actors, &aggregator, &cache), vec!["a"]);
        assert!(refresh_signals(&actors, &aggregator, &cache).is_empty());

        actors[1].items.push(Item {
            name: "Cyberdeck".to_string(),
            price: Some(6.0),
        });
        assert_eq!(refresh_signals(&actors, &aggregator, &cache), vec!["b"]);
    }

    #[test]
    fn test_refresh_signals_without_store() {
        let aggregator = CostAggregator::default();
        let actors = vec![actor("a", ActorKind::Character, &[])];
        let cache = ChangeDetectingCache::unavailable();
        assert_eq!(refresh_signals(&actors, &aggregator, &cache), vec!["a"]);
        assert_eq!(refresh_signals(&actors, &aggregator, &cache), vec!["a"]);
    }
}

use super::ui;
use crate::core::aggregate::CostAggregator;
use crate::core::cache::{ChangeDetectingCache, Store};
use crate::core::config::AppConfig;
use crate::core::ledger::{self, ItemBreakdown, LP_COLLECTION, LpSummary};
use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell};
use std::collections::HashSet;
use tracing::{debug, warn};

impl LpSummary {
    /// Renders the party table; actors listed in `changed` get a marker.
    pub fn display_as_table(&self, changed: &HashSet<String>) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Actor"),
            ui::header_cell("LP"),
            ui::header_cell("Max LP"),
            ui::header_cell("Changed"),
        ]);

        for actor in &self.actors {
            table.add_row(vec![
                Cell::new(&actor.name),
                ui::cost_cell(actor.lp),
                ui::format_optional_cell(actor.max_lp),
                ui::flag_cell(changed.contains(&actor.id), "●"),
            ]);
        }

        table.add_row(vec![
            Cell::new("TOTAL").add_attribute(Attribute::Bold),
            ui::total_cell(&ui::format_cost(self.total_lp)),
            ui::total_cell(&ui::format_cost(self.total_max_lp)),
            Cell::new(""),
        ]);

        let mut output = format!("{}\n\n", ui::style_text("LP spend", ui::StyleType::Title));
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total LP", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::spent_of_max(self.total_lp, Some(self.total_max_lp)),
                ui::StyleType::TotalValue
            )
        ));
        output
    }
}

impl ItemBreakdown {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Item"), ui::header_cell("LP")]);

        for item in &self.items {
            table.add_row(vec![Cell::new(&item.name), ui::cost_cell(item.lp)]);
        }
        table.add_row(vec![
            Cell::new("TOTAL").add_attribute(Attribute::Bold),
            ui::total_cell(&ui::format_cost(self.total_lp)),
        ]);

        let over_budget = self.max_lp.is_some_and(|max| self.total_lp > max);
        let total_style = if over_budget {
            ui::StyleType::Error
        } else {
            ui::StyleType::TotalValue
        };

        let mut output = format!(
            "Actor: {}\n\n",
            ui::style_text(&self.actor, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nLP: {}",
            ui::style_text(&ui::spent_of_max(self.total_lp, self.max_lp), total_style)
        ));
        output
    }
}

/// Shows LP spend for the party and flags actors whose spend changed since
/// the previous run.
pub fn run(config: &AppConfig, store: &dyn Store) -> Result<()> {
    let aggregator = CostAggregator::with_label(&config.cost_label)
        .with_context(|| format!("Invalid cost label: {}", config.cost_label))?;

    let collection = store.get_collection(LP_COLLECTION, true, true);
    if collection.is_none() {
        warn!("Persistent LP store unavailable, every actor is reported as changed");
        println!(
            "{}",
            ui::style_text(
                "LP history unavailable: every actor is marked as changed.",
                ui::StyleType::Warning
            )
        );
    }
    let cache = ChangeDetectingCache::new(collection);

    let changed: HashSet<String> = ledger::refresh_signals(&config.actors, &aggregator, &cache)
        .into_iter()
        .collect();
    debug!("Actors with changed LP: {changed:?}");

    let summary = ledger::lp_summary(&config.actors, &aggregator);
    if summary.actors.is_empty() {
        println!("No player-owned actors with LP spend.");
        return Ok(());
    }

    println!("{}", summary.display_as_table(&changed));
    Ok(())
}

/// Shows the per-item LP of one actor.
pub fn run_items(config: &AppConfig, actor: &str) -> Result<()> {
    let actor = config
        .find_actor(actor)
        .with_context(|| format!("No actor named or with id '{actor}'"))?;

    let breakdown = ledger::item_breakdown(actor);
    if breakdown.items.is_empty() {
        println!("{} has no items with an LP cost.", actor.name);
        return Ok(());
    }
    println!("{}", breakdown.display_as_table());
    Ok(())
}

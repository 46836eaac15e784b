//! Casting a power with modifiers against the caster's limits.

use crate::core::catalog::{self, ModifierDef};
use crate::core::config::{Actor, Power};
use crate::core::modifier::{ActiveModifier, ModifierError, ModifierTally, TallyResult};
use serde::Serialize;
use thiserror::Error;

/// Trait roll penalty applied when a cast goes wild.
pub const WILD_MAGIC_PENALTY: i32 = -4;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PowerError {
    #[error("Actor '{0}' has no arcane stats (power limit and mod limit)")]
    NoArcaneStats(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollModifier {
    pub label: String,
    pub value: i32,
}

/// Everything needed to announce and roll a cast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastSummary {
    pub power: String,
    pub actor: String,
    pub base_pp: f64,
    pub power_limit: f64,
    pub mod_limit: usize,
    pub tally: TallyResult,
    pub is_wild_cast: bool,
    pub roll_modifiers: Vec<RollModifier>,
    pub active: Vec<ActiveModifier>,
}

/// One editing session of a power cast.
#[derive(Debug, Clone)]
pub struct PowerCast {
    actor: String,
    power: String,
    base_pp: f64,
    tally: ModifierTally,
}

impl PowerCast {
    /// Sets up a session with the built-in modifiers, the ones listed in the
    /// power's description and the config-defined ones.
    ///
    /// Definitions that fail to load are returned alongside the session.
    pub fn new(
        actor: &Actor,
        power: &Power,
        defs: &[ModifierDef],
    ) -> Result<(Self, Vec<ModifierError>), PowerError> {
        let arcane = actor
            .arcane
            .ok_or_else(|| PowerError::NoArcaneStats(actor.name.clone()))?;
        let (tally, notices) = catalog::build_tally(
            power.description.as_deref(),
            defs,
            arcane.power_limit,
            arcane.mod_limit,
        );
        Ok((
            Self {
                actor: actor.name.clone(),
                power: power.name.clone(),
                base_pp: power.pp,
                tally,
            },
            notices,
        ))
    }

    pub fn tally(&self) -> &ModifierTally {
        &self.tally
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool, ModifierError> {
        self.tally.toggle(id)
    }

    pub fn select(&mut self, group_id: &str, option_id: &str) -> Result<(), ModifierError> {
        self.tally.select(group_id, option_id)
    }

    pub fn summary(&self) -> CastSummary {
        let tally = self.tally.classify(self.base_pp);
        let is_wild_cast = tally.exceeds_either();
        let roll_modifiers = if is_wild_cast {
            vec![RollModifier {
                label: "Wild Magic".to_string(),
                value: WILD_MAGIC_PENALTY,
            }]
        } else {
            Vec::new()
        };

        CastSummary {
            power: self.power.clone(),
            actor: self.actor.clone(),
            base_pp: self.base_pp,
            power_limit: self.tally.value_cap(),
            mod_limit: self.tally.count_cap(),
            tally,
            is_wild_cast,
            roll_modifiers,
            active: self.tally.active_modifiers(),
        }
    }
}

impl CastSummary {
    /// One-line description of the cast, e.g. for a chat log.
    pub fn message(&self) -> String {
        let mut message = format!(
            "Uses {} with {} mods for {} PP",
            self.power, self.tally.total_count, self.tally.total_cost
        );
        if !self.active.is_empty() {
            let mods: Vec<String> = self
                .active
                .iter()
                .map(|m| format!("{} ({} PP)", m.name, m.cost))
                .collect();
            message.push_str(&format!(": {}", mods.join(", ")));
        }
        message
    }
}

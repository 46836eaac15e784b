//! Sources of modifiers for a casting session: the built-in system list,
//! modifiers listed in a power's description, and config-defined extras.

use crate::core::modifier::{Modifier, ModifierError, ModifierTally, RadioGroup, RadioOption, Toggle};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Matches `<li><strong>Name (+N): </strong>hint</li>` list entries.
static POWER_MOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<li><strong>(.*?)\s\(\+(\d)\).*?>(.*?)</li>").unwrap());

pub const POWER_MOD_PREFIX: &str = "powermod_";

/// Modifiers every power can take.
pub fn system_modifiers() -> Vec<(String, Modifier)> {
    let toggle = |id: &str, name: &str, cost: f64, hint: &str| {
        (
            id.to_string(),
            Modifier::Toggle(Toggle::new(name, cost).with_hint(hint)),
        )
    };
    let radio = |id: &str, name: &str, options: Vec<RadioOption>| {
        (
            id.to_string(),
            Modifier::Radio(RadioGroup::with_none(name, options)),
        )
    };

    let mut mods = Vec::new();
    mods.push(radio(
        "armor_piercing",
        "Armour Piercing",
        vec![
            RadioOption::new("ap2", "Armour Piercing +2", 1.0).with_hint("Add 2 AP to damage dealt"),
            RadioOption::new("ap4", "Armour Piercing +4", 2.0).with_hint("Add 4 AP to damage dealt"),
            RadioOption::new("ap6", "Armour Piercing +6", 3.0).with_hint("Add 6 AP to damage dealt"),
        ],
    ));
    mods.push(toggle(
        "fatigue",
        "Fatigue",
        2.0,
        "Only for powers that drain or tax an opponent; cannot cause Incap",
    ));
    mods.push(toggle(
        "glow_shroud",
        "Glow/Shroud",
        1.0,
        "Soft light or deeper shadows in SBT around target",
    ));
    mods.push(toggle(
        "heavy_weapon",
        "Heavy Weapon",
        2.0,
        "The attack counts as a Heavy Weapon",
    ));
    mods.push(toggle(
        "hinder_hurry",
        "Hinder/Hurry",
        1.0,
        "-2 or +2 to target's Pace",
    ));
    mods.push(toggle(
        "lingering_damage",
        "Lingering Damage",
        2.0,
        "Extends damage into next turn, at -1 die step (eg 2d6 -> 2d4)",
    ));
    mods.push(radio(
        "range",
        "Range",
        vec![
            RadioOption::new("double", "Range (double)", 1.0).with_hint("Double listed range"),
            RadioOption::new("triple", "Range (triple)", 2.0).with_hint("Triple listed range"),
        ],
    ));
    mods.push(toggle(
        "selective",
        "Selective",
        1.0,
        "Can pick targets inside spell's Area of Effect",
    ));
    mods
}

/// Pulls power-specific modifiers out of a power description.
///
/// Entries keep document order and get ids `powermod_0`, `powermod_1`, ...
pub fn extract_power_modifiers(description: &str) -> Vec<(String, Modifier)> {
    let mods: Vec<_> = POWER_MOD_RE
        .captures_iter(description)
        .filter_map(|caps| {
            let cost = caps[2].parse::<f64>().ok()?;
            Some(Toggle::new(caps[1].trim(), cost).with_hint(caps[3].trim()))
        })
        .enumerate()
        .map(|(idx, toggle)| (format!("{POWER_MOD_PREFIX}{idx}"), Modifier::Toggle(toggle)))
        .collect();
    debug!("Extracted {} modifiers from power description", mods.len());
    mods
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OptionDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cost: f64,
    pub hint: Option<String>,
}

/// A modifier as written in the config file.
///
/// `type` is kept as a plain string so an unknown tag can be reported
/// without rejecting the whole file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModifierDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub cost: f64,
    pub hint: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionDef>,
    /// Adds a leading zero-cost "none" option to a radio group.
    #[serde(default = "default_true")]
    pub allow_none: bool,
    /// Initially selected option of a radio group.
    pub selected: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ModifierDef {
    pub fn to_modifier(&self) -> Result<Modifier, ModifierError> {
        match self.kind.to_lowercase().as_str() {
            "toggle" => {
                let mut toggle = Toggle::new(&self.name, self.cost);
                toggle.hint = self.hint.clone();
                Ok(Modifier::Toggle(toggle))
            }
            "radio" => {
                let options = self
                    .options
                    .iter()
                    .map(|o| RadioOption {
                        id: o.id.clone(),
                        name: o.name.clone(),
                        cost: o.cost,
                        hint: o.hint.clone(),
                        is_none: false,
                    })
                    .collect();
                let mut group = if self.allow_none {
                    RadioGroup::with_none(&self.name, options)
                } else {
                    RadioGroup::new(&self.name, options)?
                };
                if let Some(selected) = &self.selected {
                    group
                        .select(selected)
                        .map_err(|_| ModifierError::InvalidSelection {
                            group: self.id.clone(),
                            option: selected.clone(),
                        })?;
                }
                Ok(Modifier::Radio(group))
            }
            other => Err(ModifierError::UnknownKind {
                id: self.id.clone(),
                kind: other.to_string(),
            }),
        }
    }
}

/// Builds a tally from the built-in list, the power description and any
/// config-defined modifiers, in that order.
///
/// Bad definitions are skipped and returned as notices; the rest of the
/// tally is still usable.
pub fn build_tally(
    description: Option<&str>,
    defs: &[ModifierDef],
    value_cap: f64,
    count_cap: usize,
) -> (ModifierTally, Vec<ModifierError>) {
    let mut tally = ModifierTally::new(value_cap, count_cap);
    let mut notices = Vec::new();

    let extracted = description.map(extract_power_modifiers).unwrap_or_default();
    let configured = defs.iter().map(|def| def.to_modifier().map(|m| (def.id.clone(), m)));

    let all = system_modifiers()
        .into_iter()
        .chain(extracted)
        .map(Ok)
        .chain(configured);

    for entry in all {
        let result = entry.and_then(|(id, modifier)| tally.insert(id, modifier));
        if let Err(e) = result {
            warn!("Skipping modifier: {e}");
            notices.push(e);
        }
    }
    (tally, notices)
}

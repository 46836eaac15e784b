//! Toggleable and mutually exclusive modifiers, tallied against two caps.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModifierError {
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("Unknown option '{option}' in group '{group}'")]
    UnknownOption { group: String, option: String },
    #[error("Modifier '{0}' is a radio group, select one of its options instead")]
    NotAToggle(String),
    #[error("Modifier '{0}' is not a radio group")]
    NotARadioGroup(String),
    #[error("Duplicate modifier id: {0}")]
    DuplicateId(String),
    #[error("Radio group '{0}' has no options")]
    EmptyGroup(String),
    #[error("Radio group '{group}' cannot start on unknown option '{option}'")]
    InvalidSelection { group: String, option: String },
    #[error("Modifier '{id}' has unknown type '{kind}' (expected 'toggle' or 'radio')")]
    UnknownKind { id: String, kind: String },
}

/// A modifier that is either on or off, independent of all others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub name: String,
    pub cost: f64,
    pub hint: Option<String>,
    pub active: bool,
}

impl Toggle {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            hint: None,
            active: false,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadioOption {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub hint: Option<String>,
    /// A "none" option does not count towards the modifier count.
    pub is_none: bool,
}

impl RadioOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            hint: None,
            is_none: false,
        }
    }

    pub fn none() -> Self {
        Self {
            id: "none".to_string(),
            name: "None".to_string(),
            cost: 0.0,
            hint: None,
            is_none: true,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// A set of options where exactly one is selected at all times.
///
/// The selection is a single index into fixed options, so there is no state
/// in which zero or two options are selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadioGroup {
    name: String,
    options: Vec<RadioOption>,
    selected: usize,
}

impl RadioGroup {
    /// Creates a group with the first option selected.
    pub fn new(name: impl Into<String>, options: Vec<RadioOption>) -> Result<Self, ModifierError> {
        let name = name.into();
        if options.is_empty() {
            return Err(ModifierError::EmptyGroup(name));
        }
        Ok(Self {
            name,
            options,
            selected: 0,
        })
    }

    /// Creates a group led by a zero-cost "none" option, which starts selected.
    pub fn with_none(name: impl Into<String>, options: Vec<RadioOption>) -> Self {
        let mut all = Vec::with_capacity(options.len() + 1);
        all.push(RadioOption::none());
        all.extend(options);
        Self {
            name: name.into(),
            options: all,
            selected: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[RadioOption] {
        &self.options
    }

    pub fn selected(&self) -> &RadioOption {
        &self.options[self.selected]
    }

    pub fn is_selected(&self, option_id: &str) -> bool {
        self.selected().id == option_id
    }

    /// Selects `option_id`, implicitly deselecting its siblings.
    pub fn select(&mut self, option_id: &str) -> Result<(), ModifierError> {
        let index = self
            .options
            .iter()
            .position(|o| o.id == option_id)
            .ok_or_else(|| ModifierError::UnknownOption {
                group: self.name.clone(),
                option: option_id.to_string(),
            })?;
        self.selected = index;
        Ok(())
    }

    pub fn cost(&self) -> f64 {
        self.selected().cost
    }

    pub fn count(&self) -> usize {
        usize::from(!self.selected().is_none)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Modifier {
    Toggle(Toggle),
    Radio(RadioGroup),
}

impl Modifier {
    pub fn name(&self) -> &str {
        match self {
            Modifier::Toggle(t) => &t.name,
            Modifier::Radio(g) => g.name(),
        }
    }

    fn cost(&self) -> f64 {
        match self {
            Modifier::Toggle(t) if t.active => t.cost,
            Modifier::Toggle(_) => 0.0,
            Modifier::Radio(g) => g.cost(),
        }
    }

    fn count(&self) -> usize {
        match self {
            Modifier::Toggle(t) => usize::from(t.active),
            Modifier::Radio(g) => g.count(),
        }
    }
}

/// Classification of the current selection against the caps.
///
/// Derived on every call to [`ModifierTally::classify`], never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TallyResult {
    pub total_count: usize,
    /// Base cost plus modifier cost.
    pub total_cost: f64,
    pub modifier_cost: f64,
    pub exceeds_cost: bool,
    pub exceeds_count: bool,
}

impl TallyResult {
    /// Penalty gate: either cap being exceeded is enough.
    pub fn exceeds_either(&self) -> bool {
        self.exceeds_cost || self.exceeds_count
    }
}

/// A modifier contributing to the current tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveModifier {
    pub id: String,
    pub name: String,
    pub cost: f64,
}

/// The modifiers of one editing session together with their caps.
///
/// Modifiers keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierTally {
    modifiers: Vec<(String, Modifier)>,
    value_cap: f64,
    count_cap: usize,
}

impl ModifierTally {
    pub fn new(value_cap: f64, count_cap: usize) -> Self {
        Self {
            modifiers: Vec::new(),
            value_cap,
            count_cap,
        }
    }

    pub fn value_cap(&self) -> f64 {
        self.value_cap
    }

    pub fn count_cap(&self) -> usize {
        self.count_cap
    }

    pub fn insert(&mut self, id: impl Into<String>, modifier: Modifier) -> Result<(), ModifierError> {
        let id = id.into();
        if self.get(&id).is_some() {
            return Err(ModifierError::DuplicateId(id));
        }
        self.modifiers.push((id, modifier));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|(k, _)| k == id).map(|(_, m)| m)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Modifier, ModifierError> {
        self.modifiers
            .iter_mut()
            .find(|(k, _)| k == id)
            .map(|(_, m)| m)
            .ok_or_else(|| ModifierError::UnknownModifier(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Modifier)> {
        self.modifiers.iter().map(|(k, m)| (k.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Flips a plain toggle and returns its new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, ModifierError> {
        let active = match self.get_mut(id)? {
            Modifier::Toggle(t) => {
                t.active = !t.active;
                t.active
            }
            Modifier::Radio(_) => return Err(ModifierError::NotAToggle(id.to_string())),
        };
        debug!("Toggled modifier {id} -> {active}");
        Ok(active)
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> Result<(), ModifierError> {
        match self.get_mut(id)? {
            Modifier::Toggle(t) => {
                t.active = active;
                Ok(())
            }
            Modifier::Radio(_) => Err(ModifierError::NotAToggle(id.to_string())),
        }
    }

    pub fn select(&mut self, group_id: &str, option_id: &str) -> Result<(), ModifierError> {
        match self.get_mut(group_id)? {
            Modifier::Radio(g) => g.select(option_id)?,
            Modifier::Toggle(_) => return Err(ModifierError::NotARadioGroup(group_id.to_string())),
        }
        debug!("Selected {option_id} in group {group_id}");
        Ok(())
    }

    pub fn active_count(&self) -> usize {
        self.modifiers.iter().map(|(_, m)| m.count()).sum()
    }

    pub fn active_cost(&self) -> f64 {
        self.modifiers.iter().map(|(_, m)| m.cost()).sum()
    }

    pub fn classify(&self, base_cost: f64) -> TallyResult {
        let total_count = self.active_count();
        let modifier_cost = self.active_cost();
        let total_cost = base_cost + modifier_cost;
        TallyResult {
            total_count,
            total_cost,
            modifier_cost,
            exceeds_cost: total_cost > self.value_cap,
            exceeds_count: total_count > self.count_cap,
        }
    }

    /// Active toggles and non-"none" radio selections, in insertion order.
    pub fn active_modifiers(&self) -> Vec<ActiveModifier> {
        self.modifiers
            .iter()
            .filter_map(|(id, m)| match m {
                Modifier::Toggle(t) if t.active => Some(ActiveModifier {
                    id: id.clone(),
                    name: t.name.clone(),
                    cost: t.cost,
                }),
                Modifier::Radio(g) if !g.selected().is_none => Some(ActiveModifier {
                    id: format!("{id}.{}", g.selected().id),
                    name: g.selected().name.clone(),
                    cost: g.selected().cost,
                }),
                _ => None,
            })
            .collect()
    }
}

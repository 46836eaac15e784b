use crate::core::aggregate::{DEFAULT_COST_LABEL, Priced};
use crate::core::catalog::ModifierDef;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Character,
    Npc,
    Vehicle,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Priced for Item {
    fn price(&self) -> Option<f64> {
        self.price
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct ArcaneStats {
    pub power_limit: f64,
    pub mod_limit: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Power {
    pub name: String,
    pub pp: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Actor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ActorKind,
    #[serde(default)]
    pub player_owned: bool,
    #[serde(default)]
    pub max_lp: Option<f64>,
    /// Description or biography text, scanned for a cost hint on NPCs and vehicles.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub arcane: Option<ArcaneStats>,
    #[serde(default)]
    pub powers: Vec<Power>,
}

fn default_cost_label() -> String {
    DEFAULT_COST_LABEL.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub modifiers: Vec<ModifierDef>,
    #[serde(default = "default_cost_label")]
    pub cost_label: String,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "sprawlrunners", "lpcalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "sprawlrunners", "lpcalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn find_actor(&self, name_or_id: &str) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|a| a.id == name_or_id)
            .or_else(|| {
                self.actors
                    .iter()
                    .find(|a| a.name.eq_ignore_ascii_case(name_or_id))
            })
    }
}

impl Actor {
    pub fn find_power(&self, name: &str) -> Option<&Power> {
        self.powers.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

use lpcalc::core::aggregate::CostAggregator;
use lpcalc::core::cache::{ChangeDetectingCache, Store};
use lpcalc::core::config::AppConfig;
use lpcalc::core::ledger::{self, LP_COLLECTION};
use lpcalc::store::KeyValueStore;
use std::fs;
use tracing::info;

mod test_utils {
    use std::path::Path;

    pub fn write_config(dir: &Path, van_cost: u32) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let data_path = dir.join("data");
        let config_content = format!(
            r#"
actors:
  - id: "razor"
    name: "Razor"
    player_owned: true
    max_lp: 30
    items:
      - name: "Smartgun link"
        price: 4
      - name: "Armour jacket"
        price: 2
    arcane:
      power_limit: 5
      mod_limit: 2
    powers:
      - name: "Barrier"
        pp: 2
        description: "<ul><li><strong>Damage (+1): </strong>2d4 damage</li></ul>"
  - id: "van"
    name: "Delivery Van"
    kind: vehicle
    player_owned: true
    description: "<p>Cost: {van_cost}</p>"
  - id: "ghoul"
    name: "Ghoul"
    kind: npc
    items:
      - name: "Claws"
        price: 1
    powers:
      - name: "Frenzy"
        pp: 2
modifiers:
  - id: "weird"
    type: "slider"
    name: "Weird"
data_path: "{}"
"#,
            data_path.display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test]
fn test_lp_command_with_persistent_store() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), 6);

    let result = lpcalc::run_command(lpcalc::AppCommand::Lp, Some(config_path.to_str().unwrap()));
    assert!(result.is_ok(), "Lp command failed with: {:?}", result.err());
    assert!(dir.path().join("data").join("cache").exists());
}

#[test_log::test]
fn test_items_and_power_commands() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), 6);
    let config_path = config_path.to_str().unwrap();

    let result = lpcalc::run_command(
        lpcalc::AppCommand::Items {
            actor: "razor".to_string(),
        },
        Some(config_path),
    );
    assert!(result.is_ok(), "Items command failed with: {:?}", result.err());

    // Unknown modifiers and the bad config entry are reported, not fatal
    let result = lpcalc::run_command(
        lpcalc::AppCommand::Power(lpcalc::cli::power::PowerArgs {
            actor: "Razor".to_string(),
            power: "barrier".to_string(),
            toggles: vec!["powermod_0".to_string(), "missing".to_string()],
            selections: vec!["armor_piercing=ap6".to_string()],
        }),
        Some(config_path),
    );
    assert!(result.is_ok(), "Power command failed with: {:?}", result.err());
}

#[test_log::test]
fn test_power_command_errors() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), 6);
    let config_path = config_path.to_str().unwrap();

    let no_power = lpcalc::run_command(
        lpcalc::AppCommand::Power(lpcalc::cli::power::PowerArgs {
            actor: "Razor".to_string(),
            power: "Bolt".to_string(),
            ..Default::default()
        }),
        Some(config_path),
    );
    assert!(no_power.unwrap_err().to_string().contains("no power named"));

    let no_actor = lpcalc::run_command(
        lpcalc::AppCommand::Power(lpcalc::cli::power::PowerArgs {
            actor: "nobody".to_string(),
            power: "Bolt".to_string(),
            ..Default::default()
        }),
        Some(config_path),
    );
    assert!(no_actor.unwrap_err().to_string().contains("No actor named"));

    let no_arcane = lpcalc::run_command(
        lpcalc::AppCommand::Power(lpcalc::cli::power::PowerArgs {
            actor: "ghoul".to_string(),
            power: "frenzy".to_string(),
            ..Default::default()
        }),
        Some(config_path),
    );
    assert_eq!(
        no_arcane.unwrap_err().to_string(),
        "Actor 'Ghoul' has no arcane stats (power limit and mod limit)"
    );
}

#[test_log::test]
fn test_refresh_signals_across_config_edits() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_path = dir.path().join("data");
    let store = KeyValueStore::new(Some(data_path.as_path()));
    let cache = ChangeDetectingCache::new(store.get_collection(LP_COLLECTION, true, true));
    assert!(cache.is_available());
    let aggregator = CostAggregator::default();

    let config = AppConfig::load_from_path(test_utils::write_config(dir.path(), 6)).unwrap();
    let changed = ledger::refresh_signals(&config.actors, &aggregator, &cache);
    info!(?changed, "First observation");
    assert_eq!(changed, vec!["razor", "van"]);

    let changed = ledger::refresh_signals(&config.actors, &aggregator, &cache);
    assert!(changed.is_empty());

    let config = AppConfig::load_from_path(test_utils::write_config(dir.path(), 9)).unwrap();
    let changed = ledger::refresh_signals(&config.actors, &aggregator, &cache);
    assert_eq!(changed, vec!["van"]);

    let summary = ledger::lp_summary(&config.actors, &aggregator);
    assert_eq!(summary.total_lp, 15.0);
    assert_eq!(summary.total_max_lp, 30.0);
    assert_eq!(summary.actors.len(), 2);
}

#[test_log::test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("nope.yaml");
    let result = lpcalc::run_command(lpcalc::AppCommand::Lp, Some(missing.to_str().unwrap()));
    assert!(result.unwrap_err().to_string().contains("Failed to read config file"));

    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "actors: [").unwrap();
    let result = lpcalc::run_command(lpcalc::AppCommand::Lp, Some(bad.to_str().unwrap()));
    assert!(result.unwrap_err().to_string().contains("Failed to parse config file"));
}

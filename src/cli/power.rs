use super::ui;
use crate::core::config::AppConfig;
use crate::core::modifier::{Modifier, ModifierTally};
use crate::core::power::{CastSummary, PowerCast};
use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, Color};

/// Modifier choices for one cast, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct PowerArgs {
    pub actor: String,
    pub power: String,
    pub toggles: Vec<String>,
    /// `group=option` pairs.
    pub selections: Vec<String>,
}

/// Applies the requested choices and collects every problem instead of
/// stopping at the first one.
pub fn apply_choices(cast: &mut PowerCast, args: &PowerArgs) -> Vec<String> {
    let mut problems = Vec::new();
    for id in &args.toggles {
        if let Err(e) = cast.toggle(id) {
            problems.push(e.to_string());
        }
    }
    for selection in &args.selections {
        match selection.split_once('=') {
            Some((group, option)) => {
                if let Err(e) = cast.select(group.trim(), option.trim()) {
                    problems.push(e.to_string());
                }
            }
            None => problems.push(format!(
                "Invalid selection '{selection}', expected GROUP=OPTION"
            )),
        }
    }
    problems
}

fn modifiers_table(tally: &ModifierTally) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Modifier"),
        ui::header_cell("PP"),
        ui::header_cell("On"),
        ui::header_cell("Hint"),
    ]);

    for (id, modifier) in tally.iter() {
        match modifier {
            Modifier::Toggle(t) => {
                table.add_row(vec![
                    Cell::new(id),
                    Cell::new(&t.name),
                    ui::cost_cell(t.cost),
                    ui::flag_cell(t.active, "✔"),
                    Cell::new(t.hint.as_deref().unwrap_or("")).fg(Color::DarkGrey),
                ]);
            }
            Modifier::Radio(group) => {
                table.add_row(vec![
                    Cell::new(id).add_attribute(Attribute::Bold),
                    Cell::new(group.name()).add_attribute(Attribute::Bold),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new("choose one").fg(Color::DarkGrey),
                ]);
                for option in group.options() {
                    table.add_row(vec![
                        Cell::new(format!("  {id}={}", option.id)),
                        Cell::new(format!("  {}", option.name)),
                        ui::cost_cell(option.cost),
                        ui::flag_cell(group.is_selected(&option.id), "◉"),
                        Cell::new(option.hint.as_deref().unwrap_or("")).fg(Color::DarkGrey),
                    ]);
                }
            }
        }
    }
    table.to_string()
}

impl CastSummary {
    pub fn display(&self) -> String {
        let mut output = format!(
            "{} cast by {}\n\n",
            ui::style_text(&self.power, ui::StyleType::Title),
            self.actor
        );

        let count_style = if self.tally.exceeds_count {
            ui::StyleType::Error
        } else {
            ui::StyleType::TotalValue
        };
        let cost_style = if self.tally.exceeds_cost {
            ui::StyleType::Error
        } else {
            ui::StyleType::TotalValue
        };

        output.push_str(&format!(
            "Base PP: {}\nModifiers: {} ({} PP)\n",
            ui::format_cost(self.base_pp),
            ui::style_text(
                &format!("{} / {}", self.tally.total_count, self.mod_limit),
                count_style
            ),
            ui::format_cost(self.tally.modifier_cost),
        ));
        output.push_str(&format!(
            "Total PP: {}\n",
            ui::style_text(
                &format!(
                    "{} / {}",
                    ui::format_cost(self.tally.total_cost),
                    ui::format_cost(self.power_limit)
                ),
                cost_style
            )
        ));

        if self.is_wild_cast {
            let penalties: Vec<String> = self
                .roll_modifiers
                .iter()
                .map(|m| format!("{} {}", m.label, m.value))
                .collect();
            output.push_str(&format!(
                "\n{}\n",
                ui::style_text(
                    &format!("Wild cast! Roll with {}", penalties.join(", ")),
                    ui::StyleType::Error
                )
            ));
        }

        output.push_str(&format!(
            "\n{}",
            ui::style_text(&self.message(), ui::StyleType::Subtle)
        ));
        output
    }
}

pub fn run(config: &AppConfig, args: &PowerArgs) -> Result<()> {
    let actor = config
        .find_actor(&args.actor)
        .with_context(|| format!("No actor named or with id '{}'", args.actor))?;
    let power = actor
        .find_power(&args.power)
        .with_context(|| format!("{} has no power named '{}'", actor.name, args.power))?;

    let (mut cast, notices) = PowerCast::new(actor, power, &config.modifiers)?;
    let mut problems: Vec<String> = notices.iter().map(|e| e.to_string()).collect();
    problems.extend(apply_choices(&mut cast, args));

    println!("{}", modifiers_table(cast.tally()));
    println!();
    println!("{}", cast.summary().display());

    if !problems.is_empty() {
        ui::print_separator();
        for problem in &problems {
            println!("{}", ui::style_text(problem, ui::StyleType::Warning));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Actor, ActorKind, ArcaneStats, Power};

    fn cast() -> PowerCast {
        let actor = Actor {
            id: "a1".to_string(),
            name: "Razor".to_string(),
            kind: ActorKind::Character,
            player_owned: true,
            max_lp: None,
            description: None,
            items: vec![],
            arcane: Some(ArcaneStats {
                power_limit: 4.0,
                mod_limit: 1,
            }),
            powers: vec![],
        };
        let power = Power {
            name: "Bolt".to_string(),
            pp: 2.0,
            description: None,
        };
        PowerCast::new(&actor, &power, &[]).unwrap().0
    }

    #[test]
    fn test_apply_choices_collects_problems() {
        let mut cast = cast();
        let args = PowerArgs {
            actor: "Razor".to_string(),
            power: "Bolt".to_string(),
            toggles: vec!["fatigue".to_string(), "nope".to_string(), "range".to_string()],
            selections: vec!["range = triple".to_string(), "armor_piercing".to_string()],
        };

        let problems = apply_choices(&mut cast, &args);
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("nope"));
        assert!(problems[1].contains("range"));
        assert!(problems[2].contains("GROUP=OPTION"));

        let summary = cast.summary();
        assert_eq!(summary.tally.total_cost, 6.0);
        assert_eq!(summary.tally.total_count, 2);
        assert!(summary.is_wild_cast);
    }

    #[test]
    fn test_display_mentions_wild_cast() {
        let mut cast = cast();
        cast.toggle("fatigue").unwrap();
        cast.toggle("selective").unwrap();
        let output = cast.summary().display();
        assert!(output.contains("Wild cast!"));
        assert!(output.contains("Wild Magic -4"));

        let table = modifiers_table(cast.tally());
        assert!(table.contains("armor_piercing=ap4"));
        assert!(table.contains("Lingering Damage"));
    }
}

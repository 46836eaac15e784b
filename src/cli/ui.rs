use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Warning,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats a cost without trailing decimals when it is whole.
pub fn format_cost(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Right-aligned cost cell.
pub fn cost_cell(value: f64) -> Cell {
    Cell::new(format_cost(value)).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<f64>` into a `Cell`. `None` is displayed as "??".
pub fn format_optional_cell(value: Option<f64>) -> Cell {
    value.map_or(
        Cell::new("??")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        cost_cell,
    )
}

/// Bold total row cell.
pub fn total_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// Marker cell for flagged rows.
pub fn flag_cell(flagged: bool, marker: &str) -> Cell {
    if flagged {
        Cell::new(marker)
            .fg(Color::Yellow)
            .set_alignment(CellAlignment::Center)
    } else {
        Cell::new("")
    }
}

/// `spent / max`, with `??` for an unknown maximum.
pub fn spent_of_max(spent: f64, max: Option<f64>) -> String {
    let max = max.map_or("??".to_string(), format_cost);
    format!("{} / {max}", format_cost(spent))
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(4.0), "4");
        assert_eq!(format_cost(4.5), "4.50");
        assert_eq!(format_cost(0.0), "0");
    }

    #[test]
    fn test_spent_of_max() {
        assert_eq!(spent_of_max(12.0, Some(30.0)), "12 / 30");
        assert_eq!(spent_of_max(12.0, None), "12 / ??");
    }
}

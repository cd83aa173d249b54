use crate::core::color::{ContrastPalette, WHITE_INK, parse_hex};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Known,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Known => style(text).green().bold(),
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

fn table_color(hex: &str) -> Option<Color> {
    parse_hex(hex).map(|rgb| Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    })
}

/// A cell painted with `hex` and labelled with it, using the palette's
/// ink for the text. Malformed colors render as plain text.
pub fn swatch_cell(hex: &str, palette: &ContrastPalette) -> Cell {
    let Some(background) = table_color(hex) else {
        return Cell::new(hex);
    };
    let ink = palette.text_on(hex);
    let foreground = if ink == WHITE_INK {
        Color::White
    } else {
        table_color(ink).unwrap_or(Color::Black)
    };
    Cell::new(hex).bg(background).fg(foreground)
}

/// Formats an `Option<&str>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell(value: Option<&str>) -> Cell {
    value.map_or(Cell::new("N/A").fg(Color::DarkGrey), Cell::new)
}

/// Creates a spinner shown while reference data loads.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_cell_renders_hex_label() {
        let palette = ContrastPalette::default();
        let cell = swatch_cell("#1A237E", &palette);
        assert_eq!(cell.content(), "#1A237E");

        let plain = swatch_cell("not-a-color", &palette);
        assert_eq!(plain.content(), "not-a-color");
    }

    #[test]
    fn test_optional_cell() {
        assert_eq!(format_optional_cell(None).content(), "N/A");
        assert_eq!(format_optional_cell(Some("x")).content(), "x");
    }
}

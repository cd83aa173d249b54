use super::ui;
use crate::core::color::{darken20, deterministic_color};
use crate::core::{AmcDataset, detect_amc_label};

pub fn detect_output(fund_name: &str, amc: &AmcDataset) -> String {
    let detected = detect_amc_label(fund_name, amc);
    let status = if detected.known {
        ui::style_text("known", ui::StyleType::Known)
    } else {
        ui::style_text("derived", ui::StyleType::Subtle)
    };
    format!("{} ({status})", ui::style_text(&detected.label, ui::StyleType::Title))
}

/// Generated primary and secondary for `name`, one per line.
pub fn color_output(name: &str) -> String {
    let primary = deterministic_color(name);
    let secondary = darken20(&primary).unwrap_or_default();
    format!("{primary}\n{secondary}")
}

use super::ui;
use crate::core::color::ContrastPalette;
use crate::core::{RecordField, ReferenceData, ResolvedRecord, resolve};
use anyhow::{Result, bail};
use comfy_table::Cell;

pub fn records_table(records: &[ResolvedRecord], palette: &ContrastPalette) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ISIN"),
        ui::header_cell("Fund"),
        ui::header_cell("AMC"),
        ui::header_cell("Primary"),
        ui::header_cell("Secondary"),
        ui::header_cell("Logo"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.isin),
            Cell::new(&record.name),
            Cell::new(&record.amc),
            ui::swatch_cell(&record.primary, palette),
            ui::swatch_cell(&record.secondary, palette),
            ui::format_optional_cell(record.logo.as_deref()),
        ]);
    }
    table.to_string()
}

/// Output for a single field. A missing logo prints as an empty line.
pub fn field_output(record: &ResolvedRecord, field: RecordField) -> Result<String> {
    Ok(match field {
        RecordField::Json => serde_json::to_string_pretty(record)?,
        field => record.text(field).unwrap_or_default().to_string(),
    })
}

pub fn run(
    reference: &ReferenceData,
    isins: &[String],
    field: Option<RecordField>,
    palette: &ContrastPalette,
) -> Result<()> {
    let mut records = Vec::with_capacity(isins.len());
    let mut missing = Vec::new();
    for isin in isins {
        match resolve(reference, isin) {
            Some(record) => records.push(record),
            None => {
                eprintln!(
                    "{}",
                    ui::style_text(&format!("ISIN not found: {isin}"), ui::StyleType::Error)
                );
                missing.push(isin.as_str());
            }
        }
    }

    match field {
        Some(field) => {
            for record in &records {
                println!("{}", field_output(record, field)?);
            }
        }
        None if !records.is_empty() => println!("{}", records_table(&records, palette)),
        None => {}
    }

    if !missing.is_empty() {
        bail!("{} ISIN(s) not found: {}", missing.len(), missing.join(", "));
    }
    Ok(())
}

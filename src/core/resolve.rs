//! ISIN to brand record resolution.

use crate::core::color::{darken20, deterministic_color};
use crate::core::detect::detect_amc_label;
use crate::core::reference::{FundOverride, ReferenceData};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub isin: String,
    pub name: String,
    pub amc: String,
    pub primary: String,
    pub secondary: String,
    pub logo: Option<String>,
}

/// A single field of a [`ResolvedRecord`], or the whole record as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Json,
    Primary,
    Secondary,
    Name,
    Amc,
    Logo,
}

impl Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RecordField::Json => "json",
                RecordField::Primary => "primary",
                RecordField::Secondary => "secondary",
                RecordField::Name => "name",
                RecordField::Amc => "amc",
                RecordField::Logo => "logo",
            }
        )
    }
}

impl FromStr for RecordField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(RecordField::Json),
            "primary" => Ok(RecordField::Primary),
            "secondary" => Ok(RecordField::Secondary),
            "name" => Ok(RecordField::Name),
            "amc" => Ok(RecordField::Amc),
            "logo" => Ok(RecordField::Logo),
            _ => Err(anyhow!("Invalid record field: {}", s)),
        }
    }
}

impl ResolvedRecord {
    /// Plain-text value of a field. `None` for a missing logo and for
    /// [`RecordField::Json`], which has no text form.
    pub fn text(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Json => None,
            RecordField::Primary => Some(&self.primary),
            RecordField::Secondary => Some(&self.secondary),
            RecordField::Name => Some(&self.name),
            RecordField::Amc => Some(&self.amc),
            RecordField::Logo => self.logo.as_deref(),
        }
    }
}

/// Darkened `primary`, or the darkened generated color for `amc` when
/// `primary` does not parse.
fn secondary_for(primary: &str, amc: &str) -> String {
    match darken20(primary) {
        Some(secondary) => secondary,
        None => {
            debug!(primary, amc, "Primary color is malformed, deriving secondary");
            let generated = deterministic_color(amc);
            darken20(&generated).unwrap_or(generated)
        }
    }
}

fn merge_override(isin: String, name: String, label: String, found: &FundOverride) -> ResolvedRecord {
    let amc = found.amc.clone().unwrap_or(label);
    let primary = found
        .primary
        .clone()
        .unwrap_or_else(|| deterministic_color(&amc));
    let secondary = found
        .secondary
        .clone()
        .unwrap_or_else(|| secondary_for(&primary, &amc));
    ResolvedRecord {
        isin,
        name,
        amc,
        primary,
        secondary,
        logo: found.logo.clone(),
    }
}

/// Resolves an ISIN to its AMC record. `None` when the ISIN is not in the
/// fund table.
pub fn resolve(reference: &ReferenceData, isin: &str) -> Option<ResolvedRecord> {
    let isin = isin.trim().to_uppercase();
    let base_name = reference.fund_name(&isin)?;
    let found = reference.override_for(&isin);
    let name = found
        .and_then(|o| o.name.clone())
        .unwrap_or_else(|| base_name.to_string());

    let detected = detect_amc_label(&name, reference.amc());

    if let Some(found) = found.filter(|o| o.short_circuits()) {
        debug!(%isin, "Using enriched record");
        return Some(merge_override(isin, name, detected.label, found));
    }

    let label = detected.label;
    let (primary, secondary, logo) = match reference.colors_for(&label) {
        Some(pair) if detected.known => {
            let primary = pair
                .primary
                .clone()
                .unwrap_or_else(|| deterministic_color(&label));
            let secondary = pair
                .secondary
                .clone()
                .unwrap_or_else(|| secondary_for(&primary, &label));
            (primary, secondary, reference.logo_for(&label).map(str::to_string))
        }
        _ => {
            let primary = deterministic_color(&label);
            let secondary = secondary_for(&primary, &label);
            (primary, secondary, None)
        }
    };

    debug!(%isin, amc = %label, known = detected.known, "Resolved record");
    Some(ResolvedRecord {
        isin,
        name,
        amc: label,
        primary,
        secondary,
        logo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::{AmcDataset, FundRecord};

    const AMC_JSON: &str = r##"{
        "colors": [
            {"name": "Quantum", "primaryHex": "#1A237E", "secondaryHex": "#0D1240"},
            {"name": "HDFC Mutual Fund", "primaryHex": "#004C8F"},
            {"name": "Axis Mutual Fund"},
            {"name": "Broken AMC", "primaryHex": "not-a-color"}
        ],
        "logos": [{"name": "Quantum", "logo": "https://quantum.example/logo.png"}],
        "aliases": {"HDFC Mutual Fund": ["HDFC"], "Axis Mutual Fund": ["Axis"], "Broken AMC": ["Broken"]}
    }"##;

    fn fund(isin: &str, name: &str) -> FundRecord {
        FundRecord {
            isin: isin.to_string(),
            name: name.to_string(),
        }
    }

    fn reference(overrides: Vec<FundOverride>) -> ReferenceData {
        let amc: AmcDataset = serde_json::from_str(AMC_JSON).unwrap();
        ReferenceData::new(
            vec![
                fund("INF178L01012", "Quantum Long Term Equity Value Fund"),
                fund("INF179K01BE2", "HDFC Flexi Cap Fund - Growth"),
                fund("INF846K01EW2", "Axis Bluechip Fund"),
                fund("INF000B01AA1", "Broken Value Fund"),
                fund("INF999Z01XY9", "Random Obscure Scheme Fund"),
            ],
            amc,
            overrides,
        )
    }

    #[test]
    fn test_resolve_known_amc_from_table() {
        let record = resolve(&reference(Vec::new()), "inf178l01012").unwrap();
        assert_eq!(
            record,
            ResolvedRecord {
                isin: "INF178L01012".to_string(),
                name: "Quantum Long Term Equity Value Fund".to_string(),
                amc: "Quantum".to_string(),
                primary: "#1A237E".to_string(),
                secondary: "#0D1240".to_string(),
                logo: Some("https://quantum.example/logo.png".to_string()),
            }
        );
    }

    #[test]
    fn test_resolve_quantum_without_table_entry() {
        let data = ReferenceData::new(
            vec![fund("INF178L01012", "Quantum Long Term Equity Value Fund")],
            AmcDataset::default(),
            Vec::new(),
        );
        let record = resolve(&data, "INF178L01012").unwrap();
        assert_eq!(record.amc, "Quantum");
        assert_eq!(record.primary, deterministic_color("Quantum"));
        assert_eq!(record.primary, "#d9723a");
        assert_eq!(record.secondary, "#ad5b2e");
        assert_eq!(record.logo, None);
    }

    #[test]
    fn test_resolve_fills_missing_colors() {
        let data = reference(Vec::new());

        let hdfc = resolve(&data, "INF179K01BE2").unwrap();
        assert_eq!(hdfc.amc, "HDFC Mutual Fund");
        assert_eq!(hdfc.primary, "#004C8F");
        assert_eq!(hdfc.secondary, darken20("#004C8F").unwrap());
        assert_eq!(hdfc.logo, None);

        let axis = resolve(&data, "INF846K01EW2").unwrap();
        assert_eq!(axis.amc, "Axis Mutual Fund");
        assert_eq!(axis.primary, deterministic_color("Axis Mutual Fund"));
        assert_eq!(axis.secondary, darken20(&axis.primary).unwrap());
    }

    #[test]
    fn test_malformed_primary_still_yields_valid_secondary() {
        let record = resolve(&reference(Vec::new()), "INF000B01AA1").unwrap();
        assert_eq!(record.amc, "Broken AMC");
        assert_eq!(record.primary, "not-a-color");
        assert_eq!(
            record.secondary,
            darken20(&deterministic_color("Broken AMC")).unwrap()
        );
    }

    #[test]
    fn test_resolve_unknown_amc() {
        let record = resolve(&reference(Vec::new()), "INF999Z01XY9").unwrap();
        assert_eq!(record.amc, "RANDOM");
        assert_eq!(record.primary, "#b4e732");
        assert_eq!(record.secondary, "#90b828");
        assert_eq!(record.logo, None);
    }

    #[test]
    fn test_resolve_missing_isin() {
        assert!(resolve(&reference(Vec::new()), "INF000000000").is_none());
    }

    #[test]
    fn test_override_merges_per_field() {
        let overrides = vec![FundOverride {
            isin: "INF179K01BE2".to_string(),
            primary: Some("#ff0000".to_string()),
            logo: Some("https://hdfc.example/logo.svg".to_string()),
            ..Default::default()
        }];
        let record = resolve(&reference(overrides), "INF179K01BE2").unwrap();
        assert_eq!(record.amc, "HDFC Mutual Fund");
        assert_eq!(record.primary, "#ff0000");
        assert_eq!(record.secondary, "#cc0000");
        assert_eq!(record.logo.as_deref(), Some("https://hdfc.example/logo.svg"));
    }

    #[test]
    fn test_override_amc_drives_generated_colors() {
        let overrides = vec![FundOverride {
            isin: "INF999Z01XY9".to_string(),
            name: Some("Renamed Scheme".to_string()),
            amc: Some("Quant".to_string()),
            ..Default::default()
        }];
        let record = resolve(&reference(overrides), "INF999Z01XY9").unwrap();
        assert_eq!(record.name, "Renamed Scheme");
        assert_eq!(record.amc, "Quant");
        assert_eq!(record.primary, "#c94426");
        assert_eq!(record.secondary, "#a0361e");
        assert_eq!(record.logo, None);
    }

    #[test]
    fn test_partial_override_only_renames() {
        let overrides = vec![FundOverride {
            isin: "INF178L01012".to_string(),
            name: Some("Quantum Value Fund".to_string()),
            secondary: Some("#000000".to_string()),
            ..Default::default()
        }];
        let record = resolve(&reference(overrides), "INF178L01012").unwrap();
        assert_eq!(record.name, "Quantum Value Fund");
        assert_eq!(record.primary, "#1A237E");
        assert_eq!(record.secondary, "#0D1240");
    }

    #[test]
    fn test_record_field_text() {
        let record = resolve(&reference(Vec::new()), "INF999Z01XY9").unwrap();
        assert_eq!(record.text(RecordField::Amc), Some("RANDOM"));
        assert_eq!(record.text(RecordField::Logo), None);
        assert_eq!(record.text(RecordField::Json), None);
        assert_eq!("secondary".parse::<RecordField>().unwrap(), RecordField::Secondary);
        assert!("colour".parse::<RecordField>().is_err());
    }

    #[test]
    fn test_record_serializes_null_logo() {
        let record = resolve(&reference(Vec::new()), "INF999Z01XY9").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["logo"], serde_json::Value::Null);
        assert_eq!(json["isin"], "INF999Z01XY9");
    }
}

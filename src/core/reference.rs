//! Reference tables: fund names by ISIN and the AMC brand dataset.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use tracing::{debug, warn};

/// A row of the fund list. Missing fields deserialize as empty strings and
/// such rows are skipped when the lookup table is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    #[serde(default)]
    pub isin: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmcColorEntry {
    pub name: String,
    #[serde(default)]
    pub primary_hex: Option<String>,
    #[serde(default)]
    pub secondary_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmcLogoEntry {
    pub name: String,
    pub logo: String,
}

/// AMC name to alias list, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable(Vec<(String, Vec<String>)>);

impl AliasTable {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        AliasTable(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(amc, aliases)| (amc.as_str(), aliases.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for AliasTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AliasTableVisitor;

        impl<'de> Visitor<'de> for AliasTableVisitor {
            type Value = AliasTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of AMC names to alias lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((amc, aliases)) = map.next_entry::<String, Vec<String>>()? {
                    entries.push((amc, aliases));
                }
                Ok(AliasTable(entries))
            }
        }

        deserializer.deserialize_map(AliasTableVisitor)
    }
}

impl Serialize for AliasTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (amc, aliases) in &self.0 {
            map.serialize_entry(amc, aliases)?;
        }
        map.end()
    }
}

/// The AMC dataset as published: colors, logos and aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmcDataset {
    #[serde(default)]
    pub colors: Vec<AmcColorEntry>,
    #[serde(default)]
    pub logos: Vec<AmcLogoEntry>,
    #[serde(default)]
    pub aliases: AliasTable,
}

impl AmcDataset {
    /// Canonical AMC names in table order.
    pub fn amc_names(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(|entry| entry.name.as_str())
    }
}

/// Per-ISIN enrichment. Present fields win over computed ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundOverride {
    #[serde(default)]
    pub isin: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amc: Option<String>,
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

impl FundOverride {
    fn without_blanks(self) -> Self {
        let keep = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        FundOverride {
            isin: self.isin,
            name: keep(self.name),
            amc: keep(self.amc),
            primary: keep(self.primary),
            secondary: keep(self.secondary),
            logo: keep(self.logo),
        }
    }

    /// Whether this record takes over color and logo resolution.
    pub fn short_circuits(&self) -> bool {
        (self.primary.is_some() && self.secondary.is_some())
            || self.logo.is_some()
            || self.amc.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ColorPair {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// Loaded reference data, immutable once built.
#[derive(Debug, Default)]
pub struct ReferenceData {
    funds: HashMap<String, String>,
    amc: AmcDataset,
    colors_by_name: HashMap<String, ColorPair>,
    logos_by_name: HashMap<String, String>,
    overrides: HashMap<String, FundOverride>,
}

fn canonical_isin(isin: &str) -> String {
    isin.trim().to_uppercase()
}

impl ReferenceData {
    /// Builds the lookup tables. For repeated ISINs the first row wins; for
    /// repeated AMC names in the color or logo table the last entry wins.
    pub fn new(funds: Vec<FundRecord>, amc: AmcDataset, overrides: Vec<FundOverride>) -> Self {
        let mut fund_table = HashMap::with_capacity(funds.len());
        for record in funds {
            let isin = canonical_isin(&record.isin);
            if isin.is_empty() || record.name.is_empty() {
                warn!(?record, "Skipping fund row without isin or name");
                continue;
            }
            match fund_table.entry(isin) {
                Entry::Vacant(slot) => {
                    slot.insert(record.name);
                }
                Entry::Occupied(slot) => {
                    debug!("Ignoring duplicate fund row for {}", slot.key());
                }
            }
        }

        let blank_to_none = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        let colors_by_name = amc
            .colors
            .iter()
            .map(|entry| {
                (
                    entry.name.clone(),
                    ColorPair {
                        primary: blank_to_none(&entry.primary_hex),
                        secondary: blank_to_none(&entry.secondary_hex),
                    },
                )
            })
            .collect();
        let logos_by_name = amc
            .logos
            .iter()
            .filter(|entry| !entry.logo.is_empty())
            .map(|entry| (entry.name.clone(), entry.logo.clone()))
            .collect();

        let mut override_table = HashMap::with_capacity(overrides.len());
        for record in overrides {
            let isin = canonical_isin(&record.isin);
            if isin.is_empty() {
                continue;
            }
            override_table
                .entry(isin)
                .or_insert_with(|| record.without_blanks());
        }

        debug!(
            funds = fund_table.len(),
            amcs = amc.colors.len(),
            aliases = amc.aliases.len(),
            overrides = override_table.len(),
            "Built reference data"
        );

        ReferenceData {
            funds: fund_table,
            amc,
            colors_by_name,
            logos_by_name,
            overrides: override_table,
        }
    }

    /// Fund name for an ISIN, matched case-insensitively.
    pub fn fund_name(&self, isin: &str) -> Option<&str> {
        self.funds.get(&canonical_isin(isin)).map(String::as_str)
    }

    pub fn fund_count(&self) -> usize {
        self.funds.len()
    }

    pub fn amc(&self) -> &AmcDataset {
        &self.amc
    }

    pub(crate) fn colors_for(&self, amc: &str) -> Option<&ColorPair> {
        self.colors_by_name.get(amc)
    }

    pub fn logo_for(&self, amc: &str) -> Option<&str> {
        self.logos_by_name.get(amc).map(String::as_str)
    }

    pub fn override_for(&self, isin: &str) -> Option<&FundOverride> {
        self.overrides.get(&canonical_isin(isin))
    }
}

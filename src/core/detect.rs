//! AMC detection from a fund's display name.

use crate::core::reference::AmcDataset;
use serde::Serialize;
use tracing::debug;

/// Longest label kept from the fallback heuristic before it collapses to a
/// single token.
const MAX_FALLBACK_LABEL_LEN: usize = 12;
const MAX_FALLBACK_TOKENS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmcLabel {
    pub label: String,
    pub known: bool,
}

impl AmcLabel {
    fn known(label: &str) -> Self {
        AmcLabel {
            label: label.to_string(),
            known: true,
        }
    }
}

/// Lowercases and collapses every run of characters outside `[a-z0-9]` to a
/// single space, with no leading or trailing space.
pub fn normalize_name(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    let mut gap = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if gap && !normalized.is_empty() {
                normalized.push(' ');
            }
            gap = false;
            normalized.push(ch);
        } else {
            gap = true;
        }
    }
    normalized
}

fn has_word(normalized: &str, word: &str) -> bool {
    normalized.split(' ').any(|token| token == word)
}

fn contains_normalized(haystack: &str, needle: &str) -> bool {
    let needle = normalize_name(needle);
    !needle.is_empty() && haystack.contains(&needle)
}

/// Best-guess AMC label for `fund_name`.
///
/// Checks run in a fixed order and the first hit wins: the whole words
/// `quantum` then `quant`, then every alias in alias-table order, then every
/// canonical name in color-table order. Without a hit the label is built
/// from the name itself and marked unknown.
pub fn detect_amc_label(fund_name: &str, amc: &AmcDataset) -> AmcLabel {
    let normalized = normalize_name(fund_name);

    // "quant" is a prefix of "quantum"
    if has_word(&normalized, "quantum") {
        return AmcLabel::known("Quantum");
    }
    if has_word(&normalized, "quant") {
        return AmcLabel::known("Quant");
    }

    for (name, aliases) in amc.aliases.iter() {
        if let Some(alias) = aliases
            .iter()
            .find(|alias| contains_normalized(&normalized, alias))
        {
            debug!(fund_name, alias = %alias, amc = name, "Matched AMC alias");
            return AmcLabel::known(name);
        }
    }

    if let Some(name) = amc
        .amc_names()
        .find(|name| contains_normalized(&normalized, name))
    {
        debug!(fund_name, amc = name, "Matched AMC name");
        return AmcLabel::known(name);
    }

    let label = fallback_label(&normalized);
    debug!(fund_name, label = %label, "No AMC match, derived label");
    AmcLabel {
        label,
        known: false,
    }
}

fn fallback_label(normalized: &str) -> String {
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    let mut picked: Vec<&str> = tokens
        .iter()
        .copied()
        .take_while(|token| *token != "fund")
        .take(MAX_FALLBACK_TOKENS)
        .collect();
    if picked.is_empty() {
        picked = tokens.iter().copied().take(2).collect();
    }

    let label = picked.join(" ").to_uppercase();
    if label.len() > MAX_FALLBACK_LABEL_LEN {
        picked
            .first()
            .map(|token| token.to_uppercase())
            .unwrap_or_default()
    } else {
        label
    }
}

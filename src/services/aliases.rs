//! Legacy accrual mode aliases
//!
//! Older data sets store renamed modes (`static_per_child`,
//! `unit_price_by_payers`). The alias table is configuration: it is loaded
//! from settings and handed to the engine, and the calculator only ever sees
//! canonical `AccrualMode` values.

use std::collections::BTreeMap;

use crate::models::AccrualMode;

/// Default legacy-name → canonical-name pairs
pub const DEFAULT_ALIASES: [(&str, &str); 2] = [
    ("static_per_child", "static_per_family"),
    ("unit_price_by_payers", "unit_price"),
];

/// Mode name normalization table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeAliases {
    table: BTreeMap<String, String>,
}

impl ModeAliases {
    /// Build from an arbitrary map
    pub fn new(table: BTreeMap<String, String>) -> Self {
        let table = table
            .into_iter()
            .map(|(from, to)| (from.trim().to_string(), to.trim().to_string()))
            .collect();
        Self { table }
    }

    /// A table with no aliases at all
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// The built-in legacy names as an owned map
    pub fn default_table() -> BTreeMap<String, String> {
        DEFAULT_ALIASES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    /// Map a stored mode name to its canonical name
    ///
    /// Unknown names come back unchanged.
    pub fn normalize<'a>(&'a self, mode: &'a str) -> &'a str {
        let mode = mode.trim();
        self.table.get(mode).map(String::as_str).unwrap_or(mode)
    }

    /// Normalize and parse; `None` means the mode is unknown
    pub fn resolve(&self, mode: &str) -> Option<AccrualMode> {
        AccrualMode::parse(self.normalize(mode))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.table.iter()
    }
}

impl Default for ModeAliases {
    fn default() -> Self {
        Self::new(Self::default_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aliases() {
        let aliases = ModeAliases::default();
        assert_eq!(aliases.normalize("static_per_child"), "static_per_family");
        assert_eq!(
            aliases.resolve("unit_price_by_payers"),
            Some(AccrualMode::UnitPrice)
        );
    }

    #[test]
    fn test_identity_fallback() {
        let aliases = ModeAliases::default();
        assert_eq!(aliases.normalize("dynamic_by_payers"), "dynamic_by_payers");
        assert_eq!(aliases.normalize("no_such_mode"), "no_such_mode");
        assert_eq!(aliases.resolve("no_such_mode"), None);
    }

    #[test]
    fn test_injected_table() {
        let mut table = BTreeMap::new();
        table.insert("split_evenly".to_string(), "shared_total_all".to_string());
        let aliases = ModeAliases::new(table);

        assert_eq!(aliases.resolve("split_evenly"), Some(AccrualMode::SharedTotalAll));
        // the built-ins are not implied by a custom table
        assert_eq!(aliases.resolve("static_per_child"), None);
    }

    #[test]
    fn test_empty_table_only_accepts_canonical_names() {
        let aliases = ModeAliases::empty();
        assert!(aliases.is_empty());
        assert_eq!(aliases.resolve("voluntary"), Some(AccrualMode::Voluntary));
    }
}

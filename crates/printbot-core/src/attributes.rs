// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mapping between user-configurable options and the printer attributes that
// describe them.
//
// For every job template option the printer advertises its legal values
// (`<name>-supported`, or `media-ready` for media, which lists the paper
// actually loaded) and its default (`<name>-default`).  `AttributeTable`
// resolves those names once so nothing else concatenates attribute suffixes.

use std::collections::{BTreeMap, HashMap};

use crate::types::{OptionValue, UserSettings};

/// The numeric option edited with increments instead of a value list.
pub const COPIES: &str = "copies";

/// Attribute values as returned by Get-Printer-Attributes, attribute name to
/// values in printer order.
pub type PrinterStatus = BTreeMap<String, Vec<OptionValue>>;

/// Printer attribute names describing one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionKeys {
    /// Attribute listing the legal values.
    pub legal: String,
    /// Attribute holding the printer default.
    pub default: String,
}

impl OptionKeys {
    fn for_option(option: &str) -> Self {
        let legal = match option {
            "media" => "media-ready".to_string(),
            other => format!("{other}-supported"),
        };
        Self {
            legal,
            default: format!("{option}-default"),
        }
    }
}

/// Ordered table of configured options and their attribute names.
#[derive(Debug, Clone, Default)]
pub struct AttributeTable {
    entries: Vec<(String, OptionKeys)>,
}

impl AttributeTable {
    /// Build the table for options in configuration order.
    pub fn new<S: AsRef<str>>(options: &[S]) -> Self {
        let entries = options
            .iter()
            .map(|o| (o.as_ref().to_string(), OptionKeys::for_option(o.as_ref())))
            .collect();
        Self { entries }
    }

    /// Option names in configuration order.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, option: &str) -> bool {
        self.keys(option).is_some()
    }

    pub fn keys(&self, option: &str) -> Option<&OptionKeys> {
        self.entries
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, keys)| keys)
    }

    /// Attribute names to request from the printer: every legal-values key
    /// followed by every default key.
    pub fn query_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(_, keys)| keys.legal.clone())
            .chain(self.entries.iter().map(|(_, keys)| keys.default.clone()))
            .collect()
    }
}

/// Legal values and defaults per option, as last loaded from the printer.
///
/// The empty value (before any load) is valid: menus render without value
/// rows and the default record is empty.
#[derive(Debug, Clone, Default)]
pub struct AvailableAttributes {
    legal: HashMap<String, Vec<OptionValue>>,
    defaults: UserSettings,
    loaded: bool,
}

impl AvailableAttributes {
    /// Pick the attributes named by `table` out of a printer status record.
    pub fn from_status(table: &AttributeTable, status: &PrinterStatus) -> Self {
        let mut legal = HashMap::new();
        let mut defaults = UserSettings::new();

        for (option, keys) in &table.entries {
            if let Some(values) = status.get(&keys.legal) {
                legal.insert(option.clone(), values.clone());
            }
            if let Some(value) = status.get(&keys.default).and_then(|v| v.first()) {
                defaults.insert(option.clone(), value.clone());
            }
        }

        Self {
            legal,
            defaults,
            loaded: true,
        }
    }

    /// Legal values for `option`, empty when unknown or not yet loaded.
    pub fn legal_values(&self, option: &str) -> &[OptionValue] {
        self.legal.get(option).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Printer default for `option`.
    pub fn default_for(&self, option: &str) -> Option<&OptionValue> {
        self.defaults.get(option)
    }

    /// The full printer default record.
    pub fn defaults(&self) -> &UserSettings {
        &self.defaults
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PrintbotError, Result};

/// One printer exposed through the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Short name; also the callback prefix and the storage namespace.
    pub name: String,
    /// `ipp://` or `ipps://` address of the printer.
    pub uri: String,
    /// Attributes shown by `/status`.  Empty means all of them.
    #[serde(default)]
    pub status_attributes: Vec<String>,
    /// Job template options users may change, in menu order.
    #[serde(default)]
    pub job_options: Vec<String>,
}

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name appended to job submitters (`user@bot_name`) until changed with
    /// `/submitter`.
    pub bot_name: String,
    /// Printers in command order; the first is the default target.
    pub printers: Vec<PrinterConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot_name: "printbot".into(),
            printers: vec![PrinterConfig {
                name: "office".into(),
                uri: "ipp://localhost:631/printers/office".into(),
                status_attributes: vec![
                    "printer-state".into(),
                    "printer-state-reasons".into(),
                    "printer-state-message".into(),
                    "marker-names".into(),
                    "marker-levels".into(),
                ],
                job_options: vec![
                    "copies".into(),
                    "media".into(),
                    "sides".into(),
                    "print-quality".into(),
                    "print-color-mode".into(),
                ],
            }],
        }
    }
}

impl AppConfig {
    /// Check the configuration before any printer is constructed.
    pub fn validate(&self) -> Result<()> {
        if self.bot_name.trim().is_empty() {
            return Err(PrintbotError::Config("bot_name must not be empty".into()));
        }
        if self.printers.is_empty() {
            return Err(PrintbotError::Config("at least one printer is required".into()));
        }

        let mut seen = HashSet::new();
        for printer in &self.printers {
            check_name("printer name", &printer.name)?;
            if !seen.insert(printer.name.as_str()) {
                return Err(PrintbotError::Config(format!(
                    "duplicate printer name '{}'",
                    printer.name
                )));
            }
            for option in &printer.job_options {
                check_name("job option", option)?;
            }
        }
        Ok(())
    }
}

/// Names end up inside callback tokens, where `/` and `:` are separators.
fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PrintbotError::Config(format!("{kind} must not be empty")));
    }
    if name.contains([':', '/']) || name.chars().any(char::is_whitespace) {
        return Err(PrintbotError::Config(format!(
            "{kind} '{name}' must not contain ':', '/' or whitespace"
        )));
    }
    Ok(())
}

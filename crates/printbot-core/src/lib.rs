// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printbot: Core types, attribute tables and error definitions shared across
// all crates.

pub mod attributes;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use attributes::{AttributeTable, AvailableAttributes, PrinterStatus};
pub use config::{AppConfig, PrinterConfig};
pub use error::PrintbotError;
pub use types::*;

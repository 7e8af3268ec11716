// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printbot Store. State that survives restarts: a SQLite key/value table,
// the per-chat print settings built on it, and single named values such as
// the job submitter suffix.

pub mod kv;
pub mod settings;
pub mod variable;

pub use kv::{KeyValueStore, SqliteStore};
pub use settings::SettingsStore;
pub use variable::StoredString;

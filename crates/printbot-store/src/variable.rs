// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A single persisted string with a fallback value.

use std::sync::Arc;

use printbot_core::error::Result;

use crate::kv::KeyValueStore;

const NAMESPACE: &str = "variables";

/// Named string stored in the key/value store.  Reads return the fallback
/// until something is stored.
pub struct StoredString {
    store: Arc<dyn KeyValueStore>,
    name: String,
    fallback: String,
}

impl StoredString {
    pub fn new(store: Arc<dyn KeyValueStore>, name: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            fallback: fallback.into(),
        }
    }

    pub fn get(&self) -> Result<String> {
        Ok(self
            .store
            .get(NAMESPACE, &self.name)?
            .unwrap_or_else(|| self.fallback.clone()))
    }

    pub fn set(&self, value: &str) -> Result<()> {
        self.store.set(NAMESPACE, &self.name, value)
    }

    /// Forget the stored value so reads return the fallback again.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(NAMESPACE, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::SqliteStore;

    #[test]
    fn falls_back_until_set() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let var = StoredString::new(store, "officeJobNameAt", "printbot");

        assert_eq!(var.get().unwrap(), "printbot");
        var.set("lab-bot").unwrap();
        assert_eq!(var.get().unwrap(), "lab-bot");
        var.clear().unwrap();
        assert_eq!(var.get().unwrap(), "printbot");
    }
}

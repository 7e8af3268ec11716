// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-chat print settings.
//
// Each chat stores only the options it changed ("overrides") as one JSON
// record.  Reads overlay those overrides on the printer's default record, so
// a chat that never touched the menu, or pressed "Clear all", sees exactly
// the printer defaults.

use std::sync::{Arc, PoisonError, RwLock};

use printbot_core::error::Result;
use printbot_core::types::{ChatId, OptionValue, UserSettings};
use tracing::{debug, warn};

use crate::kv::KeyValueStore;

/// Print settings of every chat for one printer.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    defaults: RwLock<UserSettings>,
}

impl SettingsStore {
    /// Settings for `printer`, stored under the `<printer>UserSettings`
    /// namespace.  The default record starts empty.
    pub fn new(store: Arc<dyn KeyValueStore>, printer: &str) -> Self {
        Self {
            store,
            namespace: format!("{printer}UserSettings"),
            defaults: RwLock::new(UserSettings::new()),
        }
    }

    /// Replace the default record, typically once printer attributes load.
    /// Applies to every chat immediately, including chats reset earlier.
    pub fn set_defaults(&self, defaults: UserSettings) {
        debug!(namespace = %self.namespace, count = defaults.len(), "default settings replaced");
        *self.defaults.write().unwrap_or_else(PoisonError::into_inner) = defaults;
    }

    pub fn defaults(&self) -> UserSettings {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The options this chat changed, without defaults.
    pub fn overrides(&self, chat: ChatId) -> Result<UserSettings> {
        let Some(json) = self.store.get(&self.namespace, &chat.to_string())? else {
            return Ok(UserSettings::new());
        };

        match serde_json::from_str(&json) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(%chat, error = %e, "stored settings unreadable, treating as empty");
                Ok(UserSettings::new())
            }
        }
    }

    /// Effective settings: defaults overlaid with the chat's overrides.
    pub fn get(&self, chat: ChatId) -> Result<UserSettings> {
        let mut settings = self.defaults();
        settings.extend(self.overrides(chat)?);
        Ok(settings)
    }

    /// Effective value of one option, `None` when neither the chat nor the
    /// printer sets it.
    pub fn get_property(&self, chat: ChatId, option: &str) -> Result<Option<OptionValue>> {
        if let Some(value) = self.overrides(chat)?.remove(option) {
            return Ok(Some(value));
        }
        Ok(self
            .defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(option)
            .cloned())
    }

    /// Set one option for a chat.  `None` drops the override so the option
    /// falls back to the printer default.
    pub fn set_property(&self, chat: ChatId, option: &str, value: Option<OptionValue>) -> Result<()> {
        let mut overrides = self.overrides(chat)?;
        match value {
            Some(value) => {
                overrides.insert(option.to_string(), value);
            }
            None => {
                overrides.remove(option);
            }
        }
        self.write(chat, &overrides)
    }

    /// Drop every override of a chat.
    pub fn reset(&self, chat: ChatId) -> Result<()> {
        debug!(%chat, namespace = %self.namespace, "settings reset");
        self.store.remove(&self.namespace, &chat.to_string())
    }

    fn write(&self, chat: ChatId, overrides: &UserSettings) -> Result<()> {
        if overrides.is_empty() {
            return self.store.remove(&self.namespace, &chat.to_string());
        }
        let json = serde_json::to_string(overrides)?;
        self.store.set(&self.namespace, &chat.to_string(), &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::SqliteStore;

    const CHAT: ChatId = ChatId(42);

    fn make_settings() -> SettingsStore {
        let store = Arc::new(SqliteStore::open_in_memory().expect("open in-memory store"));
        SettingsStore::new(store, "office")
    }

    fn printer_defaults() -> UserSettings {
        let mut defaults = UserSettings::new();
        defaults.insert("copies".into(), OptionValue::Integer(1));
        defaults.insert("media".into(), "A4".into());
        defaults
    }

    #[test]
    fn unknown_chat_gets_defaults() {
        let settings = make_settings();
        assert!(settings.get(CHAT).unwrap().is_empty());

        settings.set_defaults(printer_defaults());
        assert_eq!(settings.get(CHAT).unwrap(), printer_defaults());
    }

    #[test]
    fn writes_merge_over_defaults() {
        let settings = make_settings();
        settings.set_defaults(printer_defaults());

        settings
            .set_property(CHAT, "media", Some("Letter".into()))
            .unwrap();

        let record = settings.get(CHAT).unwrap();
        assert_eq!(record.get("media"), Some(&OptionValue::from("Letter")));
        assert_eq!(record.get("copies"), Some(&OptionValue::Integer(1)));
        assert_eq!(settings.overrides(CHAT).unwrap().len(), 1);
    }

    #[test]
    fn reset_after_defaults_load_returns_defaults() {
        let settings = make_settings();
        settings.set_property(CHAT, "copies", Some(OptionValue::Integer(5))).unwrap();
        settings.set_defaults(printer_defaults());

        settings.reset(CHAT).unwrap();
        assert_eq!(settings.get(CHAT).unwrap(), printer_defaults());

        settings.reset(CHAT).unwrap();
        assert_eq!(settings.get(CHAT).unwrap(), printer_defaults());
    }

    #[test]
    fn none_clears_override() {
        let settings = make_settings();
        settings.set_defaults(printer_defaults());
        settings.set_property(CHAT, "media", Some("Letter".into())).unwrap();

        settings.set_property(CHAT, "media", None).unwrap();

        assert_eq!(
            settings.get_property(CHAT, "media").unwrap(),
            Some(OptionValue::from("A4"))
        );
        assert!(settings.overrides(CHAT).unwrap().is_empty());
    }

    #[test]
    fn chats_do_not_share_settings() {
        let settings = make_settings();
        settings.set_property(CHAT, "copies", Some(OptionValue::Integer(3))).unwrap();

        assert_eq!(settings.get_property(ChatId(7), "copies").unwrap(), None);
        assert_eq!(
            settings.get_property(CHAT, "copies").unwrap(),
            Some(OptionValue::Integer(3))
        );
    }

    #[test]
    fn printers_do_not_share_settings() {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let office = SettingsStore::new(Arc::clone(&store), "office");
        let lab = SettingsStore::new(store, "lab");

        office.set_property(CHAT, "copies", Some(OptionValue::Integer(2))).unwrap();

        assert!(lab.get(CHAT).unwrap().is_empty());
    }

    #[test]
    fn unreadable_record_is_treated_as_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        store.set("officeUserSettings", "42", "not json").unwrap();
        let settings = SettingsStore::new(store, "office");

        assert!(settings.get(CHAT).unwrap().is_empty());
    }
}

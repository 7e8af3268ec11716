// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Applies decoded button presses to a chat's settings.
//
// | Action          | Settings                          | Next view     | Ack              |
// |-----------------|-----------------------------------|---------------|------------------|
// | SetValue        | option = value (absent clears)    | unchanged     | "option = value" |
// | SetValueAndBack | option = value                    | Root          | "option = value" |
// | AddValue        | option = max((old or 1) + d, 1)   | Leaf(option)  | "option = new"   |
// | NavigateTo      | -                                 | Leaf(option)  | ""               |
// | NavigateBack    | -                                 | Root          | ""               |
// | ClearAll        | reset to printer defaults         | Root          | "All print settings removed" |
// | Exit            | -                                 | summary       | ""               |
//
// An action that names no option, names an option that is not configured,
// or carries a non-numeric delta is acknowledged with empty text and
// changes nothing.

use printbot_core::attributes::AttributeTable;
use printbot_core::error::Result;
use printbot_core::types::{ChatId, OptionValue};
use printbot_store::SettingsStore;
use tracing::{debug, instrument};

use crate::codec::{ActionKind, MenuAction};

pub const CLEARED_ACK: &str = "All print settings removed";

/// Where the menu is, derived from the action just handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Root,
    Leaf(String),
}

/// What to do with the message holding the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    /// Leave the message alone.
    Unchanged,
    /// Replace the keyboard with the one for this view.
    Keyboard(View),
    /// Replace the message with the settings summary, dropping the keyboard.
    Summary,
}

/// Result of one button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Acknowledgment text, possibly empty.  Always sent.
    pub ack: String,
    pub render: Render,
}

impl Outcome {
    fn new(ack: impl Into<String>, render: Render) -> Self {
        Self {
            ack: ack.into(),
            render,
        }
    }

    /// Empty acknowledgment, nothing else.
    pub fn ignored() -> Self {
        Self::new("", Render::Unchanged)
    }
}

/// The settings state machine of one printer's menu.
pub struct Dispatcher<'a> {
    settings: &'a SettingsStore,
    table: &'a AttributeTable,
}

impl<'a> Dispatcher<'a> {
    pub fn new(settings: &'a SettingsStore, table: &'a AttributeTable) -> Self {
        Self { settings, table }
    }

    /// Apply `action` for `chat`.  Errors come only from the settings store.
    #[instrument(skip_all, fields(%chat, kind = ?action.kind))]
    pub fn apply(&self, chat: ChatId, action: &MenuAction) -> Result<Outcome> {
        match action.kind {
            ActionKind::NavigateBack => Ok(Outcome::new("", Render::Keyboard(View::Root))),
            ActionKind::Exit => Ok(Outcome::new("", Render::Summary)),
            ActionKind::ClearAll => {
                self.settings.reset(chat)?;
                Ok(Outcome::new(CLEARED_ACK, Render::Keyboard(View::Root)))
            }
            ActionKind::NavigateTo => Ok(match self.configured_option(action) {
                Some(option) => Outcome::new("", Render::Keyboard(View::Leaf(option.to_string()))),
                None => Outcome::ignored(),
            }),
            ActionKind::SetValue | ActionKind::SetValueAndBack => {
                let Some(option) = self.configured_option(action) else {
                    return Ok(Outcome::ignored());
                };
                self.settings.set_property(chat, option, action.value.clone())?;

                let effective = self.settings.get_property(chat, option)?;
                let render = if action.kind == ActionKind::SetValue {
                    Render::Unchanged
                } else {
                    Render::Keyboard(View::Root)
                };
                Ok(Outcome::new(assignment(option, effective.as_ref()), render))
            }
            ActionKind::AddValue => {
                let Some(option) = self.configured_option(action) else {
                    return Ok(Outcome::ignored());
                };
                let Some(delta) = action.value.as_ref().and_then(OptionValue::as_integer) else {
                    debug!(option, "non-numeric delta ignored");
                    return Ok(Outcome::ignored());
                };

                let base = self
                    .settings
                    .get_property(chat, option)?
                    .and_then(|v| v.as_integer())
                    .unwrap_or(1);
                let new = base.saturating_add(delta).max(1);
                self.settings.set_property(chat, option, Some(OptionValue::Integer(new)))?;

                Ok(Outcome::new(
                    assignment(option, Some(&OptionValue::Integer(new))),
                    Render::Keyboard(View::Leaf(option.to_string())),
                ))
            }
        }
    }

    /// The action's option when present and configured.
    fn configured_option<'b>(&self, action: &'b MenuAction) -> Option<&'b str> {
        let option = action.option.as_deref()?;
        if self.table.contains(option) {
            Some(option)
        } else {
            debug!(option, "action for unconfigured option ignored");
            None
        }
    }
}

fn assignment(option: &str, value: Option<&OptionValue>) -> String {
    match value {
        Some(value) => format!("{option} = {value}"),
        None => format!("{option} = default"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use printbot_core::types::UserSettings;
    use printbot_store::SqliteStore;

    use super::*;

    const CHAT: ChatId = ChatId(42);

    struct Fixture {
        settings: SettingsStore,
        table: AttributeTable,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(SqliteStore::open_in_memory().expect("open in-memory store"));
            Self {
                settings: SettingsStore::new(store, "office"),
                table: AttributeTable::new(&["copies", "media", "sides"]),
            }
        }

        fn apply(&self, kind: ActionKind, option: Option<&str>, value: Option<OptionValue>) -> Outcome {
            Dispatcher::new(&self.settings, &self.table)
                .apply(CHAT, &MenuAction::new(kind, option, value))
                .unwrap()
        }

        fn copies(&self) -> Option<OptionValue> {
            self.settings.get_property(CHAT, "copies").unwrap()
        }
    }

    fn printer_defaults() -> UserSettings {
        let mut defaults = UserSettings::new();
        defaults.insert("copies".into(), OptionValue::Integer(1));
        defaults.insert("media".into(), "A4".into());
        defaults
    }

    #[test]
    fn set_value_stays_on_current_keyboard() {
        let fx = Fixture::new();
        let outcome = fx.apply(ActionKind::SetValue, Some("copies"), Some(OptionValue::Integer(3)));

        assert_eq!(outcome, Outcome::new("copies = 3", Render::Unchanged));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(3)));
    }

    #[test]
    fn set_value_and_back_returns_to_root() {
        let fx = Fixture::new();
        let outcome = fx.apply(ActionKind::SetValueAndBack, Some("media"), Some("Letter".into()));

        assert_eq!(outcome, Outcome::new("media = Letter", Render::Keyboard(View::Root)));
    }

    #[test]
    fn absent_value_restores_printer_default() {
        let fx = Fixture::new();
        fx.settings.set_defaults(printer_defaults());
        fx.apply(ActionKind::SetValueAndBack, Some("media"), Some("Letter".into()));

        let outcome = fx.apply(ActionKind::SetValue, Some("media"), None);

        assert_eq!(outcome.ack, "media = A4");
        assert!(fx.settings.overrides(CHAT).unwrap().is_empty());
    }

    #[test]
    fn add_value_from_nothing_starts_at_one() {
        let fx = Fixture::new();
        let outcome = fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(5)));

        assert_eq!(fx.copies(), Some(OptionValue::Integer(6)));
        assert_eq!(
            outcome,
            Outcome::new("copies = 6", Render::Keyboard(View::Leaf("copies".into())))
        );
    }

    #[test]
    fn add_value_never_goes_below_one() {
        let fx = Fixture::new();
        fx.apply(ActionKind::SetValue, Some("copies"), Some(OptionValue::Integer(2)));

        fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(-1)));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(1)));

        fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(-1)));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(1)));

        fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(-100)));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(1)));
    }

    #[test]
    fn repeated_decrements_from_nothing_stay_at_one() {
        let fx = Fixture::new();
        for _ in 0..3 {
            fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(-1)));
            assert_eq!(fx.copies(), Some(OptionValue::Integer(1)));
        }
    }

    #[test]
    fn large_decrement_after_increment_floors_at_one() {
        let fx = Fixture::new();
        fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(5)));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(6)));

        let outcome = fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(-100)));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(1)));
        assert_eq!(outcome.ack, "copies = 1");
    }

    #[test]
    fn add_value_over_text_uses_base_one() {
        let fx = Fixture::new();
        fx.apply(ActionKind::SetValue, Some("copies"), Some("many".into()));

        fx.apply(ActionKind::AddValue, Some("copies"), Some(OptionValue::Integer(1)));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(2)));
    }

    #[test]
    fn add_value_with_text_delta_is_ignored() {
        let fx = Fixture::new();
        let outcome = fx.apply(ActionKind::AddValue, Some("copies"), Some("lots".into()));

        assert_eq!(outcome, Outcome::ignored());
        assert_eq!(fx.copies(), None);
    }

    #[test]
    fn navigation_round_trip_ends_at_root() {
        let fx = Fixture::new();
        let to = fx.apply(ActionKind::NavigateTo, Some("media"), None);
        let back = fx.apply(ActionKind::NavigateBack, None, None);

        assert_eq!(to, Outcome::new("", Render::Keyboard(View::Leaf("media".into()))));
        assert_eq!(back, Outcome::new("", Render::Keyboard(View::Root)));
        assert!(fx.settings.get(CHAT).unwrap().is_empty());
    }

    #[test]
    fn clear_all_is_idempotent_and_restores_defaults() {
        let fx = Fixture::new();
        fx.settings.set_defaults(printer_defaults());
        fx.apply(ActionKind::SetValue, Some("copies"), Some(OptionValue::Integer(4)));

        let first = fx.apply(ActionKind::ClearAll, None, None);
        let after_first = fx.settings.get(CHAT).unwrap();
        let second = fx.apply(ActionKind::ClearAll, None, None);

        assert_eq!(first, Outcome::new(CLEARED_ACK, Render::Keyboard(View::Root)));
        assert_eq!(first, second);
        assert_eq!(after_first, printer_defaults());
        assert_eq!(fx.settings.get(CHAT).unwrap(), printer_defaults());
    }

    #[test]
    fn exit_renders_summary_without_changes() {
        let fx = Fixture::new();
        fx.apply(ActionKind::SetValue, Some("copies"), Some(OptionValue::Integer(2)));

        let outcome = fx.apply(ActionKind::Exit, None, None);

        assert_eq!(outcome, Outcome::new("", Render::Summary));
        assert_eq!(fx.copies(), Some(OptionValue::Integer(2)));
    }

    #[test]
    fn missing_option_is_acknowledged_and_ignored() {
        let fx = Fixture::new();
        for kind in [ActionKind::SetValue, ActionKind::SetValueAndBack, ActionKind::AddValue, ActionKind::NavigateTo] {
            assert_eq!(fx.apply(kind, None, Some(OptionValue::Integer(1))), Outcome::ignored());
        }
        assert!(fx.settings.overrides(CHAT).unwrap().is_empty());
    }

    #[test]
    fn unconfigured_option_is_ignored() {
        let fx = Fixture::new();
        let outcome = fx.apply(ActionKind::SetValue, Some("finishings"), Some(OptionValue::Integer(4)));

        assert_eq!(outcome, Outcome::ignored());
        assert!(fx.settings.overrides(CHAT).unwrap().is_empty());
    }

    #[test]
    fn copies_and_media_scenario() {
        let fx = Fixture::new();
        fx.apply(ActionKind::NavigateTo, Some("copies"), None);
        fx.apply(ActionKind::SetValue, Some("copies"), Some(OptionValue::Integer(5)));
        fx.apply(ActionKind::NavigateBack, None, None);
        fx.apply(ActionKind::NavigateTo, Some("media"), None);
        let last = fx.apply(ActionKind::SetValueAndBack, Some("media"), Some("A4".into()));

        let mut expected = UserSettings::new();
        expected.insert("copies".into(), OptionValue::Integer(5));
        expected.insert("media".into(), "A4".into());
        assert_eq!(fx.settings.get(CHAT).unwrap(), expected);
        assert_eq!(last.render, Render::Keyboard(View::Root));
    }
}

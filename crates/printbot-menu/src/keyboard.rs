// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inline keyboards for the settings menu.
//
// Root:   one row per configured option, then [Exit, Clear all].
// Leaf:   one row per legal value, then [Back, Default].
// Copies: quick-set rows, an adjustment row, then [Back, Default].
//
// Keyboards are plain data; the chat transport turns them into the
// platform's markup.

use printbot_core::attributes::{AttributeTable, AvailableAttributes, COPIES};
use printbot_core::types::OptionValue;
use tracing::warn;

use crate::codec::{ActionKind, CallbackCodec, EncodeError};
use crate::dispatcher::View;

pub const EXIT_LABEL: &str = "Exit";
pub const CLEAR_ALL_LABEL: &str = "Clear all";
pub const BACK_LABEL: &str = "Back";
pub const DEFAULT_LABEL: &str = "Default";

/// Absolute copy counts offered on the copies keyboard, one inner slice per
/// row.
const COPIES_QUICK_SET: &[&[i64]] = &[&[1, 2, 3], &[5, 10, 20]];

/// Relative copy adjustments, all on one row.
const COPIES_ADJUSTMENTS: &[i64] = &[1, 5, 10, -1];

/// One inline button: visible label plus callback token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub callback: String,
}

/// Rows of buttons, top to bottom.
pub type Keyboard = Vec<Vec<Button>>;

/// Builds the keyboards of one printer's menu.
#[derive(Debug, Clone)]
pub struct MenuBuilder {
    codec: CallbackCodec,
    table: AttributeTable,
}

impl MenuBuilder {
    /// Fails when an option's navigation token, or a root control token,
    /// cannot be encoded.
    pub fn new(codec: CallbackCodec, table: AttributeTable) -> Result<Self, EncodeError> {
        for option in table.options() {
            codec.encode(ActionKind::NavigateTo, Some(option), None)?;
        }
        codec.encode(ActionKind::Exit, None, None)?;
        codec.encode(ActionKind::ClearAll, None, None)?;

        Ok(Self { codec, table })
    }

    pub fn codec(&self) -> &CallbackCodec {
        &self.codec
    }

    pub fn table(&self) -> &AttributeTable {
        &self.table
    }

    /// The keyboard for `view`.
    pub fn render(&self, view: &View, available: &AvailableAttributes) -> Keyboard {
        match view {
            View::Root => self.build_root(),
            View::Leaf(option) => self.build_leaf(option, available),
        }
    }

    pub fn build_root(&self) -> Keyboard {
        let mut rows: Keyboard = self
            .table
            .options()
            .filter_map(|option| self.button(option, ActionKind::NavigateTo, Some(option), None))
            .map(|button| vec![button])
            .collect();

        rows.push(
            [
                self.button(EXIT_LABEL, ActionKind::Exit, None, None),
                self.button(CLEAR_ALL_LABEL, ActionKind::ClearAll, None, None),
            ]
            .into_iter()
            .flatten()
            .collect(),
        );
        rows
    }

    /// Value keyboard for `option`.  Values come in printer order; without
    /// loaded attributes only the Back/Default row is shown.
    pub fn build_leaf(&self, option: &str, available: &AvailableAttributes) -> Keyboard {
        let mut rows = if option == COPIES {
            self.copies_rows()
        } else {
            available
                .legal_values(option)
                .iter()
                .filter_map(|value| {
                    self.button(&value.to_string(), ActionKind::SetValueAndBack, Some(option), Some(value))
                })
                .map(|button| vec![button])
                .collect()
        };

        rows.push(
            [
                self.button(BACK_LABEL, ActionKind::NavigateBack, None, None),
                self.button(
                    DEFAULT_LABEL,
                    ActionKind::SetValue,
                    Some(option),
                    available.default_for(option),
                ),
            ]
            .into_iter()
            .flatten()
            .collect(),
        );
        rows
    }

    fn copies_rows(&self) -> Keyboard {
        let mut rows: Keyboard = COPIES_QUICK_SET
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|&n| {
                        self.button(&n.to_string(), ActionKind::SetValue, Some(COPIES), Some(&OptionValue::Integer(n)))
                    })
                    .collect()
            })
            .collect();

        rows.push(
            COPIES_ADJUSTMENTS
                .iter()
                .filter_map(|&delta| {
                    self.button(&format!("{delta:+}"), ActionKind::AddValue, Some(COPIES), Some(&OptionValue::Integer(delta)))
                })
                .collect(),
        );
        rows
    }

    /// A button, or `None` (with a warning) when its token does not fit.
    fn button(
        &self,
        text: &str,
        kind: ActionKind,
        option: Option<&str>,
        value: Option<&OptionValue>,
    ) -> Option<Button> {
        match self.codec.encode(kind, option, value) {
            Ok(callback) => Some(Button {
                text: text.to_string(),
                callback,
            }),
            Err(e) => {
                warn!(?kind, ?option, %text, error = %e, "button skipped");
                None
            }
        }
    }
}

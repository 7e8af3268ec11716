// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only settings summary shown when the menu is closed.

use printbot_core::types::UserSettings;
use teloxide::utils::html::escape;

/// HTML message listing `settings` as pretty JSON under a bold heading.
pub fn settings_summary(printer: &str, settings: &UserSettings) -> String {
    let json = serde_json::to_string_pretty(settings).unwrap_or_else(|_| "{}".to_string());
    format!(
        "<b>{} printer settings</b>\n<code>{}</code>",
        escape(printer),
        escape(&json)
    )
}

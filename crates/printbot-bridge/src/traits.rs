// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits for the chat platform and file hosting.

use async_trait::async_trait;
use printbot_core::error::Result;
use printbot_core::types::{ChatId, MessageId};
use printbot_menu::Keyboard;

/// Edits and acknowledgments on the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Replace the inline keyboard of a message.
    async fn edit_keyboard(&self, chat: ChatId, message: MessageId, keyboard: &Keyboard) -> Result<()>;

    /// Replace a message's text with HTML, dropping its keyboard.
    async fn edit_text_html(&self, chat: ChatId, message: MessageId, html: &str) -> Result<()>;

    /// Acknowledge a button press.  Empty text acknowledges silently.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()>;
}

/// Resolves platform file ids and downloads content.
#[async_trait]
pub trait FileResolver: Send + Sync {
    /// Download URL for an uploaded file.
    async fn file_url(&self, file_id: &str) -> Result<String>;

    /// Fetch the bytes behind `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

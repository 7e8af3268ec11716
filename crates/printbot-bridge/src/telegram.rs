// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Telegram implementations of the bridge traits, on top of teloxide.

use async_trait::async_trait;
use printbot_core::error::{PrintbotError, Result};
use printbot_core::types::{ChatId, MessageId};
use printbot_menu::Keyboard;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::{debug, instrument};

use crate::http::HttpFetcher;
use crate::traits::{ChatTransport, FileResolver};

/// Convert a menu keyboard into Telegram inline markup.
pub fn inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.text.clone(), button.callback.clone()))
            .collect::<Vec<_>>()
    }))
}

fn tg_chat(chat: ChatId) -> teloxide::types::ChatId {
    teloxide::types::ChatId(chat.0)
}

fn tg_message(message: MessageId) -> teloxide::types::MessageId {
    teloxide::types::MessageId(message.0)
}

/// Edits that leave the message as it was are rejected by Telegram with
/// "message is not modified"; those count as done.
fn edit_result<T>(result: std::result::Result<T, RequestError>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            debug!("message already up to date");
            Ok(())
        }
        Err(e) => Err(PrintbotError::Transport(e.to_string())),
    }
}

/// `ChatTransport` sending through the Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    #[instrument(skip(self, keyboard), fields(%chat, rows = keyboard.len()))]
    async fn edit_keyboard(&self, chat: ChatId, message: MessageId, keyboard: &Keyboard) -> Result<()> {
        let result = self
            .bot
            .edit_message_reply_markup(tg_chat(chat), tg_message(message))
            .reply_markup(inline_markup(keyboard))
            .await;
        edit_result(result)
    }

    #[instrument(skip(self, html), fields(%chat))]
    async fn edit_text_html(&self, chat: ChatId, message: MessageId, html: &str) -> Result<()> {
        let result = self
            .bot
            .edit_message_text(tg_chat(chat), tg_message(message), html)
            .parse_mode(ParseMode::Html)
            .await;
        edit_result(result)
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        let mut request = self.bot.answer_callback_query(callback_id);
        if !text.is_empty() {
            request = request.text(text);
        }
        request
            .await
            .map(|_| ())
            .map_err(|e| PrintbotError::Transport(e.to_string()))
    }
}

/// `FileResolver` for files uploaded to Telegram and for public links.
#[derive(Clone)]
pub struct TelegramFiles {
    bot: Bot,
    http: HttpFetcher,
}

impl TelegramFiles {
    pub fn new(bot: Bot, http: HttpFetcher) -> Self {
        Self { bot, http }
    }
}

#[async_trait]
impl FileResolver for TelegramFiles {
    #[instrument(skip(self))]
    async fn file_url(&self, file_id: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(file_id)
            .await
            .map_err(|e| PrintbotError::Transport(e.to_string()))?;
        Ok(download_url(self.bot.api_url().as_str(), self.bot.token(), &file.path))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.http.fetch(url).await
    }
}

/// `<api>/file/bot<token>/<path>`, the Bot API download location.
fn download_url(api_url: &str, token: &str, path: &str) -> String {
    format!(
        "{}/file/bot{token}/{}",
        api_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use printbot_menu::Button;

    #[test]
    fn download_url_joins_parts() {
        assert_eq!(
            download_url("https://api.telegram.org/", "123:abc", "documents/file_1.pdf"),
            "https://api.telegram.org/file/bot123:abc/documents/file_1.pdf"
        );
        assert_eq!(
            download_url("http://localhost:8081", "t", "/x.pdf"),
            "http://localhost:8081/file/bott/x.pdf"
        );
    }

    #[test]
    fn markup_keeps_rows() {
        let keyboard = vec![
            vec![Button { text: "copies".into(), callback: "C:copies:".into() }],
            vec![
                Button { text: "Exit".into(), callback: "E::".into() },
                Button { text: "Clear all".into(), callback: "F::".into() },
            ],
        ];
        let markup = inline_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[1].len(), 2);
        assert_eq!(markup.inline_keyboard[1][1].text, "Clear all");
    }

    #[test]
    fn not_modified_counts_as_success() {
        let result: std::result::Result<(), RequestError> =
            Err(RequestError::Api(ApiError::MessageNotModified));
        assert!(edit_result(result).is_ok());
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory collaborators for tests and dry runs.
//
// Each stub records what it was asked to do so callers can assert on the
// exact sequence of edits, acknowledgments, downloads and print jobs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use printbot_core::attributes::PrinterStatus;
use printbot_core::error::{PrintbotError, Result};
use printbot_core::types::{ChatId, MessageId, PrintRequest};
use printbot_menu::Keyboard;
use printbot_print::PrinterClient;

use crate::traits::{ChatTransport, FileResolver};

/// One call made on a `RecordingTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    EditKeyboard {
        chat: ChatId,
        message: MessageId,
        keyboard: Keyboard,
    },
    EditText {
        chat: ChatId,
        message: MessageId,
        html: String,
    },
    Answer {
        callback_id: String,
        text: String,
    },
}

/// `ChatTransport` that only records calls.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of message edits, keyboard or text.
    pub fn edit_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, TransportCall::Answer { .. }))
            .count()
    }

    /// Acknowledgment texts in order.
    pub fn answers(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Answer { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_keyboard(&self) -> Option<Keyboard> {
        self.calls().into_iter().rev().find_map(|c| match c {
            TransportCall::EditKeyboard { keyboard, .. } => Some(keyboard),
            _ => None,
        })
    }

    fn record(&self, call: TransportCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn edit_keyboard(&self, chat: ChatId, message: MessageId, keyboard: &Keyboard) -> Result<()> {
        self.record(TransportCall::EditKeyboard {
            chat,
            message,
            keyboard: keyboard.clone(),
        });
        Ok(())
    }

    async fn edit_text_html(&self, chat: ChatId, message: MessageId, html: &str) -> Result<()> {
        self.record(TransportCall::EditText {
            chat,
            message,
            html: html.to_string(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        self.record(TransportCall::Answer {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// `FileResolver` serving fixed content.
///
/// File ids resolve to `stub://files/<id>`; any URL with registered content
/// can be fetched, everything else fails with `Fetch`.
#[derive(Debug, Default)]
pub struct StaticFiles {
    content: Mutex<HashMap<String, Vec<u8>>>,
    fetched: Mutex<Vec<String>>,
}

impl StaticFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` at `url`.
    pub fn insert(&self, url: &str, bytes: &[u8]) {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), bytes.to_vec());
    }

    /// Serve `bytes` for an uploaded file id.
    pub fn insert_upload(&self, file_id: &str, bytes: &[u8]) {
        self.insert(&Self::upload_url(file_id), bytes);
    }

    pub fn upload_url(file_id: &str) -> String {
        format!("stub://files/{file_id}")
    }

    /// URLs fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl FileResolver for StaticFiles {
    async fn file_url(&self, file_id: &str) -> Result<String> {
        Ok(Self::upload_url(file_id))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .ok_or_else(|| PrintbotError::Fetch(format!("no content at {url}")))
    }
}

/// `PrinterClient` answering from a fixed attribute record and keeping every
/// submitted job.
#[derive(Debug, Default)]
pub struct FakePrinter {
    status: PrinterStatus,
    offline: bool,
    jobs: Mutex<Vec<PrintRequest>>,
    identified: Mutex<u32>,
}

impl FakePrinter {
    pub fn new(status: PrinterStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// A printer that fails every request as unreachable.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn jobs(&self) -> Vec<PrintRequest> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn identify_count(&self) -> u32 {
        *self.identified.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(PrintbotError::PrinterUnavailable("fake printer is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PrinterClient for FakePrinter {
    async fn printer_status(&self, attributes: &[String]) -> Result<PrinterStatus> {
        self.check_online()?;
        if attributes.is_empty() {
            return Ok(self.status.clone());
        }
        Ok(self
            .status
            .iter()
            .filter(|(name, _)| attributes.contains(name))
            .map(|(name, values)| (name.clone(), values.clone()))
            .collect())
    }

    async fn identify(&self) -> Result<bool> {
        self.check_online()?;
        *self.identified.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(true)
    }

    async fn print_file(&self, request: PrintRequest) -> Result<()> {
        self.check_online()?;
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(())
    }
}

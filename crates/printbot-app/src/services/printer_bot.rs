// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One printer as exposed through the chat.
//
// A `PrinterBot` owns everything that is per printer: the attribute cache,
// the chats' settings, the submitter suffix and the settings menu.  Chat
// handlers call into it with platform-neutral types; the collaborators
// (printer, files, chat transport) are trait objects so tests can swap in
// the stubs from `printbot-bridge`.

use std::sync::{Arc, PoisonError, RwLock};

use printbot_bridge::{ChatTransport, FileResolver};
use printbot_core::attributes::{AttributeTable, AvailableAttributes, PrinterStatus};
use printbot_core::config::PrinterConfig;
use printbot_core::error::{PrintbotError, Result};
use printbot_core::human_errors::humanize_error;
use printbot_core::types::{
    CallbackEvent, ChatId, ChatUser, DocumentType, InboundDocument, MessageId, PrintRequest, UserSettings,
};
use printbot_menu::{CallbackCodec, Decoded, Dispatcher, Keyboard, MenuBuilder, Render, View, settings_summary};
use printbot_print::PrinterClient;
use printbot_store::{KeyValueStore, SettingsStore, StoredString};
use reqwest::Url;
use tracing::{debug, info, instrument, warn};

/// How a callback event related to this printer's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackHandling {
    /// The token was ours and has been acknowledged.
    Handled,
    /// The token belongs to another menu; nothing was sent.
    Foreign,
    /// The token could not be decoded; logged, nothing was sent.
    Malformed,
}

/// The external services a printer instance talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub printer: Arc<dyn PrinterClient>,
    pub files: Arc<dyn FileResolver>,
    pub transport: Arc<dyn ChatTransport>,
}

pub struct PrinterBot {
    config: PrinterConfig,
    collaborators: Collaborators,
    settings: SettingsStore,
    submitter_suffix: StoredString,
    menu: MenuBuilder,
    available: RwLock<AvailableAttributes>,
}

impl PrinterBot {
    /// Build the instance for `config`.  Fails when an option name cannot be
    /// carried by a callback token.
    pub fn new(
        config: PrinterConfig,
        bot_name: &str,
        store: Arc<dyn KeyValueStore>,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let codec = CallbackCodec::new(Some(&config.name))
            .map_err(|e| PrintbotError::Config(format!("printer '{}': {e}", config.name)))?;
        let menu = MenuBuilder::new(codec, AttributeTable::new(&config.job_options))
            .map_err(|e| PrintbotError::Config(format!("printer '{}': {e}", config.name)))?;

        let settings = SettingsStore::new(Arc::clone(&store), &config.name);
        let submitter_suffix = StoredString::new(store, format!("{}JobNameAt", config.name), bot_name);

        Ok(Self {
            config,
            collaborators,
            settings,
            submitter_suffix,
            menu,
            available: RwLock::new(AvailableAttributes::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    // -- Printer attributes --------------------------------------------------

    /// Query legal values and defaults of the configured options and make
    /// the defaults the base record of every chat.
    #[instrument(skip(self), fields(printer = %self.config.name))]
    pub async fn load(&self) -> Result<()> {
        let names = self.menu.table().query_names();
        let status = self.collaborators.printer.printer_status(&names).await?;
        let available = AvailableAttributes::from_status(self.menu.table(), &status);

        self.settings.set_defaults(available.defaults().clone());
        info!(
            defaults = available.defaults().len(),
            attributes = status.len(),
            "printer attributes loaded"
        );
        *self.available.write().unwrap_or_else(PoisonError::into_inner) = available;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.available
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loaded()
    }

    /// The configured status attributes, or all of them when none are
    /// configured.
    pub async fn status(&self) -> Result<PrinterStatus> {
        self.collaborators
            .printer
            .printer_status(&self.config.status_attributes)
            .await
    }

    /// Ask the printer to make itself noticed.
    pub async fn beep(&self) -> Result<bool> {
        self.collaborators.printer.identify().await
    }

    // -- Printing ------------------------------------------------------------

    /// Print the file behind a public link, with printer defaults only.
    /// Returns `submitter/jobName`.
    #[instrument(skip(self, user), fields(printer = %self.config.name))]
    pub async fn print_from_url(&self, url: &str, user: &ChatUser) -> Result<String> {
        let job_name = job_name_from_url(url)?;
        let content = self.collaborators.files.fetch(url).await?;
        let file_type = DocumentType::from_file_name(&job_name).map(|t| t.mime_type().to_string());

        self.submit(user, job_name, content, file_type, None).await
    }

    /// Print an uploaded document with the chat's settings.  Returns
    /// `submitter/jobName`.
    #[instrument(skip(self, document, user), fields(printer = %self.config.name, %chat, file_id = %document.file_id))]
    pub async fn print_from_document(
        &self,
        chat: ChatId,
        document: &InboundDocument,
        user: &ChatUser,
    ) -> Result<String> {
        let url = self.collaborators.files.file_url(&document.file_id).await?;
        let content = self.collaborators.files.fetch(&url).await?;

        let job_name = document
            .file_name
            .clone()
            .unwrap_or_else(|| document.file_id.clone());
        let file_type = document
            .mime_type
            .clone()
            .or_else(|| DocumentType::from_file_name(&job_name).map(|t| t.mime_type().to_string()));
        let settings = self.settings.get(chat)?;

        self.submit(user, job_name, content, file_type, Some(settings)).await
    }

    async fn submit(
        &self,
        user: &ChatUser,
        job_name: String,
        content: Vec<u8>,
        file_type: Option<String>,
        job_attributes: Option<UserSettings>,
    ) -> Result<String> {
        let submitter = self.submitter(user)?;
        let receipt = format!("{submitter}/{job_name}");

        self.collaborators
            .printer
            .print_file(PrintRequest {
                content,
                job_name,
                submitter,
                file_type,
                job_attributes,
            })
            .await?;

        info!(%receipt, "job submitted");
        Ok(receipt)
    }

    /// `display_name@suffix`, the suffix defaulting to the bot name.
    pub fn submitter(&self, user: &ChatUser) -> Result<String> {
        Ok(format!("{}@{}", user.display_name(), self.submitter_suffix.get()?))
    }

    /// Change the submitter suffix; an empty suffix restores the bot name.
    pub fn set_submitter(&self, suffix: &str) -> Result<()> {
        let suffix = suffix.trim();
        if suffix.is_empty() {
            self.submitter_suffix.clear()
        } else {
            self.submitter_suffix.set(suffix)
        }
    }

    // -- Settings menu -------------------------------------------------------

    /// Root keyboard, or the leaf keyboard of `option`.
    pub fn keyboard(&self, option: Option<&str>) -> Keyboard {
        match option {
            None => self.render(&View::Root),
            Some(option) => self.render(&View::Leaf(option.to_string())),
        }
    }

    fn render(&self, view: &View) -> Keyboard {
        let available = self.available.read().unwrap_or_else(PoisonError::into_inner);
        self.menu.render(view, &available)
    }

    /// HTML summary of a chat's effective settings.
    pub fn settings_summary(&self, chat: ChatId) -> Result<String> {
        Ok(settings_summary(&self.config.name, &self.settings.get(chat)?))
    }

    /// Handle one button press.  Every token of this menu that decodes is
    /// acknowledged exactly once, and at most one message edit is made.
    #[instrument(skip(self, event), fields(printer = %self.config.name, callback_id = %event.id))]
    pub async fn handle_callback(&self, event: &CallbackEvent) -> Result<CallbackHandling> {
        let Some(data) = event.data.as_deref() else {
            debug!("callback without data");
            return Ok(CallbackHandling::Foreign);
        };

        let action = match self.menu.codec().decode(data) {
            Ok(Decoded::Action(action)) => action,
            Ok(Decoded::Foreign) => {
                debug!(data, "callback for another menu");
                return Ok(CallbackHandling::Foreign);
            }
            Err(e) => {
                warn!(data, error = %e, "malformed callback dropped");
                return Ok(CallbackHandling::Malformed);
            }
        };

        let transport = &self.collaborators.transport;
        let Some((chat, message)) = event.origin else {
            debug!("callback without originating message");
            transport.answer_callback(&event.id, "").await?;
            return Ok(CallbackHandling::Handled);
        };

        let outcome = match Dispatcher::new(&self.settings, self.menu.table()).apply(chat, &action) {
            Ok(outcome) => outcome,
            Err(e) => {
                transport
                    .answer_callback(&event.id, &humanize_error(&e).message)
                    .await?;
                return Err(e);
            }
        };

        let edited = self.apply_render(chat, message, &outcome.render).await;
        transport.answer_callback(&event.id, &outcome.ack).await?;
        edited?;

        Ok(CallbackHandling::Handled)
    }

    async fn apply_render(&self, chat: ChatId, message: MessageId, render: &Render) -> Result<()> {
        let transport = &self.collaborators.transport;
        match render {
            Render::Unchanged => Ok(()),
            Render::Keyboard(view) => {
                let keyboard = self.render(view);
                transport.edit_keyboard(chat, message, &keyboard).await
            }
            Render::Summary => {
                let summary = self.settings_summary(chat)?;
                transport.edit_text_html(chat, message, &summary).await
            }
        }
    }
}

/// The job name of a printable link: its last path segment, which must look
/// like a file name.
fn job_name_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| PrintbotError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PrintbotError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    // A trailing slash leaves an empty last segment, which is a page.
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| last.contains('.'))
        .map(str::to_string)
        .ok_or_else(|| PrintbotError::NotAFile(url.to_string()))
}

/// One `name: values` line per attribute.
pub fn format_status(status: &PrinterStatus) -> String {
    if status.is_empty() {
        return "The printer reported no status attributes.".to_string();
    }
    status
        .iter()
        .map(|(name, values)| {
            let values: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("{name}: {}", values.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

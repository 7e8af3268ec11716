// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: loads the configuration, opens storage and builds
// one `PrinterBot` per configured printer.
//
// The SQLite store is shared by every printer; each one keeps its data under
// its own namespaces.  All fields are Arc-wrapped so the struct can be handed
// to teloxide as a dependency and cloned into spawned tasks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use printbot_bridge::http::HttpFetcher;
use printbot_bridge::{ChatTransport, FileResolver, TelegramFiles, TelegramTransport};
use printbot_core::config::{AppConfig, PrinterConfig};
use printbot_core::error::{PrintbotError, Result};
use printbot_core::types::CallbackEvent;
use printbot_print::IppClient;
use printbot_store::{KeyValueStore, SqliteStore};
use teloxide::Bot;
use tracing::{info, warn};

use super::data_dir;
use super::printer_bot::{CallbackHandling, Collaborators, PrinterBot};

const DATABASE_FILE: &str = "printbot.db";

#[derive(Clone)]
pub struct AppServices {
    config: Arc<AppConfig>,
    printers: Arc<Vec<Arc<PrinterBot>>>,
    data_dir: PathBuf,
}

impl AppServices {
    /// Initialise all services.  Call once at startup.
    ///
    /// Reads (or creates) the configuration, opens the database in the data
    /// directory and wires every printer to IPP and Telegram.
    pub fn init(bot: Bot) -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let config = load_config(&data_dir::config_path(&dir))?;
        let store = Arc::new(SqliteStore::open(dir.join(DATABASE_FILE))?);
        Self::with_telegram(config, dir, store, bot)
    }

    /// Like `init`, but settings live in memory only.
    pub fn fallback(bot: Bot) -> Result<Self> {
        let dir = data_dir::data_dir();
        let config = load_config(&data_dir::config_path(&dir))?;
        let store = Arc::new(SqliteStore::open_in_memory()?);
        Self::with_telegram(config, dir, store, bot)
    }

    fn with_telegram(config: AppConfig, dir: PathBuf, store: Arc<dyn KeyValueStore>, bot: Bot) -> Result<Self> {
        let transport: Arc<dyn ChatTransport> = Arc::new(TelegramTransport::new(bot.clone()));
        let files: Arc<dyn FileResolver> = Arc::new(TelegramFiles::new(bot, HttpFetcher::new()?));

        Self::new(config, dir, store, |printer| {
            Ok(Collaborators {
                printer: Arc::new(IppClient::new(&printer.uri)?),
                files: Arc::clone(&files),
                transport: Arc::clone(&transport),
            })
        })
    }

    /// Build the printers of a validated configuration.  `collaborators`
    /// supplies the external services of each printer.
    pub fn new(
        config: AppConfig,
        data_dir: PathBuf,
        store: Arc<dyn KeyValueStore>,
        mut collaborators: impl FnMut(&PrinterConfig) -> Result<Collaborators>,
    ) -> Result<Self> {
        config.validate()?;

        let printers = config
            .printers
            .iter()
            .map(|printer| {
                let bot = PrinterBot::new(
                    printer.clone(),
                    &config.bot_name,
                    Arc::clone(&store),
                    collaborators(printer)?,
                )?;
                info!(printer = %printer.name, uri = %printer.uri, "printer configured");
                Ok(Arc::new(bot))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config: Arc::new(config),
            printers: Arc::new(printers),
            data_dir,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn printers(&self) -> &[Arc<PrinterBot>] {
        &self.printers
    }

    /// The named printer, or the first configured one.
    pub fn printer(&self, name: Option<&str>) -> Result<&Arc<PrinterBot>> {
        match name {
            Some(name) => self
                .printers
                .iter()
                .find(|p| p.name() == name)
                .ok_or_else(|| PrintbotError::UnknownPrinter(name.to_string())),
            None => self
                .printers
                .first()
                .ok_or_else(|| PrintbotError::Config("no printers configured".into())),
        }
    }

    /// Load printer attributes in the background.  Failures are logged and
    /// the menus keep working without value lists.
    pub fn spawn_attribute_loads(&self) {
        for printer in self.printers.iter() {
            let printer = Arc::clone(printer);
            tokio::spawn(async move {
                if let Err(e) = printer.load().await {
                    warn!(printer = %printer.name(), error = %e, "printer attributes unavailable");
                }
            });
        }
    }

    /// Offer a button press to each printer until one claims it.
    pub async fn handle_callback(&self, event: &CallbackEvent) -> Result<CallbackHandling> {
        for printer in self.printers.iter() {
            match printer.handle_callback(event).await? {
                CallbackHandling::Foreign => continue,
                handled => return Ok(handled),
            }
        }
        Ok(CallbackHandling::Foreign)
    }
}

// -- Config persistence -------------------------------------------------------

/// Read the configuration, writing the defaults on first run.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let config = AppConfig::default();
            persist_config(path, &config)?;
            info!(path = %path.display(), "default configuration written");
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}

fn persist_config(path: &Path, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printbot: Telegram front-end for IPP printers
//
// Entry point. Initialises logging, backend services and the per-printer
// attribute loads, then runs the teloxide dispatcher until Ctrl-C.
// The bot token is read from TELOXIDE_TOKEN.

mod commands;
mod handlers;
mod services;

use std::sync::Arc;

use teloxide::prelude::*;

use services::app_services::AppServices;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Printbot starting");

    let bot = Bot::from_env();

    let svc = match AppServices::init(bot.clone()) {
        Ok(s) => {
            tracing::info!(data_dir = %s.data_dir().display(), "backend services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "persistent storage failed, using in-memory fallback");
            match AppServices::fallback(bot.clone()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "cannot start");
                    std::process::exit(1);
                }
            }
        }
    };
    tracing::info!(
        printers = svc.printers().len(),
        bot_name = %svc.config().bot_name,
        "configuration loaded"
    );

    svc.spawn_attribute_loads();

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![Arc::new(svc)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Printbot stopped");
}

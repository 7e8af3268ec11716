// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// teloxide update handlers.
//
// Converts Telegram updates into the platform-neutral types of
// `printbot-core` and hands them to the right `PrinterBot`.  Failures are
// answered with a humanized reply in the chat and logged.

use std::sync::Arc;

use printbot_bridge::telegram::inline_markup;
use printbot_core::error::{PrintbotError, Result};
use printbot_core::human_errors::{Severity, humanize_error};
use printbot_core::types::{CallbackEvent, ChatId, ChatUser, InboundDocument, MessageId};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{Document, User};
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use crate::commands::{Command, caption_printer, printer_only, value_and_printer};
use crate::services::app_services::AppServices;
use crate::services::printer_bot::format_status;

type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
type HandlerResult = std::result::Result<(), HandlerError>;

/// The update tree handed to the teloxide dispatcher.
pub fn schema() -> UpdateHandler<HandlerError> {
    let command_handler = teloxide::filter_command::<Command, _>().endpoint(handle_command);
    let document_handler = dptree::filter(|msg: Message| msg.document().is_some()).endpoint(handle_document);

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(document_handler);
    let query_handler = Update::filter_callback_query().endpoint(handle_callback);

    dptree::entry().branch(message_handler).branch(query_handler)
}

// -- Conversions ----------------------------------------------------------------

fn chat_user(user: &User) -> ChatUser {
    ChatUser {
        id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

fn inbound_document(document: &Document) -> InboundDocument {
    InboundDocument {
        file_id: document.file.id.clone(),
        file_name: document.file_name.clone(),
        mime_type: document.mime_type.as_ref().map(|m| m.essence_str().to_string()),
    }
}

fn callback_event(query: &CallbackQuery) -> CallbackEvent {
    CallbackEvent {
        id: query.id.clone(),
        data: query.data.clone(),
        origin: query
            .message
            .as_ref()
            .map(|m| (ChatId(m.chat.id.0), MessageId(m.id.0))),
    }
}

/// Reply for a failed request.  Failures only the operator can fix are
/// logged as errors.
fn failure_reply(context: &str, err: &PrintbotError) -> String {
    let human = humanize_error(err);
    match human.severity {
        Severity::Permanent => error!(context, error = %err, "request failed, operator action needed"),
        Severity::Transient | Severity::ActionRequired => {
            warn!(context, severity = ?human.severity, error = %err, "request failed")
        }
    }
    human.to_reply()
}

// -- Endpoints ----------------------------------------------------------------------

async fn handle_command(bot: Bot, msg: Message, cmd: Command, svc: Arc<AppServices>) -> HandlerResult {
    let Some(user) = msg.from().map(chat_user) else {
        return Ok(());
    };

    if let Command::Settings(args) = &cmd {
        return send_settings_menu(&bot, &msg, &svc, printer_only(args)).await;
    }

    let reply = match run_command(&svc, &cmd, &user).await {
        Ok(text) => text,
        Err(e) => failure_reply("command", &e),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn run_command(svc: &AppServices, cmd: &Command, user: &ChatUser) -> Result<String> {
    match cmd {
        Command::Help => {
            let names: Vec<&str> = svc.printers().iter().map(|p| p.name()).collect();
            Ok(format!(
                "{}\n\nPrinters: {} (default: {})",
                Command::descriptions(),
                names.join(", "),
                svc.printer(None)?.name()
            ))
        }
        Command::Print(args) => {
            let args = value_and_printer(args);
            let Some(url) = args.value else {
                return Ok("Usage: /print <url> [printer]".to_string());
            };
            let receipt = svc.printer(args.printer)?.print_from_url(url, user).await?;
            Ok(format!("Printing {receipt}"))
        }
        Command::Status(args) => {
            let printer = svc.printer(printer_only(args))?;
            let status = printer.status().await?;
            Ok(format!("{}\n{}", printer.name(), format_status(&status)))
        }
        Command::Beep(args) => {
            let printer = svc.printer(printer_only(args))?;
            Ok(if printer.beep().await? {
                format!("{} should be beeping now.", printer.name())
            } else {
                format!("{} can't beep.", printer.name())
            })
        }
        Command::Submitter(args) => {
            let args = value_and_printer(args);
            let printer = svc.printer(args.printer)?;
            printer.set_submitter(args.value.unwrap_or(""))?;
            Ok(format!(
                "Jobs on {} are now submitted as {}",
                printer.name(),
                printer.submitter(user)?
            ))
        }
        Command::Settings(_) => Ok(String::new()),
    }
}

async fn send_settings_menu(bot: &Bot, msg: &Message, svc: &AppServices, printer: Option<&str>) -> HandlerResult {
    let printer = match svc.printer(printer) {
        Ok(printer) => printer,
        Err(e) => {
            bot.send_message(msg.chat.id, failure_reply("settings menu", &e)).await?;
            return Ok(());
        }
    };

    let mut text = format!("Print settings for {}", printer.name());
    if !printer.is_loaded() {
        text.push_str(" (printer options are still loading)");
    }
    bot.send_message(msg.chat.id, text)
        .reply_markup(inline_markup(&printer.keyboard(None)))
        .await?;
    Ok(())
}

async fn handle_document(bot: Bot, msg: Message, svc: Arc<AppServices>) -> HandlerResult {
    let (Some(user), Some(document)) = (msg.from().map(chat_user), msg.document()) else {
        return Ok(());
    };

    // Only a caption naming a configured printer selects it.
    let named = caption_printer(msg.caption()).filter(|name| svc.printer(Some(*name)).is_ok());
    let chat = ChatId(msg.chat.id.0);

    let reply = match svc.printer(named) {
        Ok(printer) => match printer
            .print_from_document(chat, &inbound_document(document), &user)
            .await
        {
            Ok(receipt) => format!("Printing {receipt}"),
            Err(e) => failure_reply("document", &e),
        },
        Err(e) => failure_reply("document", &e),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_callback(q: CallbackQuery, svc: Arc<AppServices>) -> HandlerResult {
    let event = callback_event(&q);
    match svc.handle_callback(&event).await {
        Ok(handling) => info!(?handling, "callback processed"),
        Err(e) => error!(error = %e, "callback failed"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reply_is_the_humanized_text() {
        let err = PrintbotError::NotAFile("https://host/".into());
        assert_eq!(failure_reply("command", &err), humanize_error(&err).to_reply());

        let err = PrintbotError::Config("no printers configured".into());
        assert!(failure_reply("command", &err).contains("bot operator"));
    }
}

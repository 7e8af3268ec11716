// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bot commands and their argument parsing.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Send me a document to print it. Commands:")]
pub enum Command {
    #[command(description = "show this help.")]
    Help,
    #[command(description = "print a file from a link: /print <url> [printer]")]
    Print(String),
    #[command(description = "change your print settings: /settings [printer]")]
    Settings(String),
    #[command(description = "show printer status: /status [printer]")]
    Status(String),
    #[command(description = "make the printer beep: /beep [printer]")]
    Beep(String),
    #[command(description = "set the name after @ on your jobs: /submitter <name> [printer]")]
    Submitter(String),
}

/// `<value> [printer]` arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueArgs<'a> {
    pub value: Option<&'a str>,
    pub printer: Option<&'a str>,
}

pub fn value_and_printer(args: &str) -> ValueArgs<'_> {
    let mut words = args.split_whitespace();
    ValueArgs {
        value: words.next(),
        printer: words.next(),
    }
}

/// `[printer]` arguments.
pub fn printer_only(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

/// Printer named in a document caption, if any.
pub fn caption_printer(caption: Option<&str>) -> Option<&str> {
    caption.and_then(printer_only)
}

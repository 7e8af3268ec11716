// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer collaborator interface.

use async_trait::async_trait;

use printbot_core::attributes::PrinterStatus;
use printbot_core::error::Result;
use printbot_core::types::PrintRequest;

/// Operations the bot needs from a printer.
#[async_trait]
pub trait PrinterClient: Send + Sync {
    /// Fetch the named attributes.  An empty list asks for all of them.
    async fn printer_status(&self, attributes: &[String]) -> Result<PrinterStatus>;

    /// Ask the printer to make itself noticed (beep, flash).  `Ok(false)`
    /// means the printer answered but declined.
    async fn identify(&self) -> Result<bool>;

    /// Submit one job and wait for the printer to accept it.
    async fn print_file(&self, request: PrintRequest) -> Result<()>;
}

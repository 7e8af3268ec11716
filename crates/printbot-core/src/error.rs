// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Printbot.

use thiserror::Error;

/// Top-level error type for all Printbot operations.
#[derive(Debug, Error)]
pub enum PrintbotError {
    // -- Printer errors --
    #[error("IPP request failed: {0}")]
    IppRequest(String),

    #[error("printer did not respond: {0}")]
    PrinterUnavailable(String),

    #[error("unknown printer: {0}")]
    UnknownPrinter(String),

    // -- Submission input --
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("URL {0} is not a file that can be printed")]
    NotAFile(String),

    #[error("download failed: {0}")]
    Fetch(String),

    // -- Chat transport --
    #[error("chat transport error: {0}")]
    Transport(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintbotError>;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Chat replies for failed operations.
//
// Every technical error is mapped to a plain sentence plus a suggestion the
// user can act on from inside the chat.

use crate::error::PrintbotError;

/// Who can fix the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Printer or network hiccup; sending again may work.
    Transient,
    /// The user has to change something (link, file, printer name).
    ActionRequired,
    /// Needs the bot operator.
    Permanent,
}

/// A failure phrased for the chat user.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

impl HumanError {
    /// Text sent back into the chat.
    pub fn to_reply(&self) -> String {
        format!("{} {}", self.message, self.suggestion)
    }
}

/// Convert a `PrintbotError` into a reply a chat user can act on.
pub fn humanize_error(err: &PrintbotError) -> HumanError {
    match err {
        PrintbotError::IppRequest(detail) => humanize_ipp_error(detail),

        PrintbotError::PrinterUnavailable(_) => HumanError {
            message: "The printer isn't answering.".into(),
            suggestion: "It may be switched off or offline. Try again in a moment.".into(),
            severity: Severity::Transient,
        },

        PrintbotError::UnknownPrinter(name) => HumanError {
            message: format!("There is no printer called '{name}'."),
            suggestion: "Send /help to see the available printers.".into(),
            severity: Severity::ActionRequired,
        },

        PrintbotError::InvalidUrl { url, .. } => HumanError {
            message: format!("'{url}' doesn't look like a link."),
            suggestion: "Send a full address such as https://example.com/file.pdf.".into(),
            severity: Severity::ActionRequired,
        },

        PrintbotError::NotAFile(_) => HumanError {
            message: "That link points to a page, not a file.".into(),
            suggestion: "Send a link that ends in a file name such as report.pdf.".into(),
            severity: Severity::ActionRequired,
        },

        PrintbotError::Fetch(_) => HumanError {
            message: "The file couldn't be downloaded.".into(),
            suggestion: "Check the link opens in a browser, then send it again.".into(),
            severity: Severity::Transient,
        },

        PrintbotError::Transport(_) => HumanError {
            message: "The chat service had a problem.".into(),
            suggestion: "Try again in a moment.".into(),
            severity: Severity::Transient,
        },

        PrintbotError::Database(_) | PrintbotError::Io(_) | PrintbotError::Serialization(_) => {
            HumanError {
                message: "Your print settings couldn't be saved.".into(),
                suggestion: "Try again. If this keeps happening, tell the bot operator.".into(),
                severity: Severity::Permanent,
            }
        }

        PrintbotError::Config(detail) => HumanError {
            message: "The bot is misconfigured.".into(),
            suggestion: format!("Tell the bot operator. ({detail})"),
            severity: Severity::Permanent,
        },
    }
}

/// Parse IPP-specific error details into readable messages.
fn humanize_ipp_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();
    // Status codes arrive both as keywords and as Debug names
    // (`client-error-document-format-not-supported` vs
    // `ClientErrorDocumentFormatNotSupported`).
    let squashed = lower.replace(['-', '_'], "");

    if lower.contains("timed out") || lower.contains("connection refused") {
        HumanError {
            message: "The printer didn't respond.".into(),
            suggestion: "It might be busy or turned off. Try again in a moment.".into(),
            severity: Severity::Transient,
        }
    } else if squashed.contains("clienterrordocumentformat") {
        HumanError {
            message: "The printer doesn't understand this file type.".into(),
            suggestion: "Convert the file to PDF and send it again.".into(),
            severity: Severity::ActionRequired,
        }
    } else if squashed.contains("clienterrorattributes") || squashed.contains("clienterrornotpossible") {
        HumanError {
            message: "The printer can't handle your print settings.".into(),
            suggestion: "Open /settings and pick different values, or press Clear all.".into(),
            severity: Severity::ActionRequired,
        }
    } else if squashed.contains("mediaempty") {
        HumanError {
            message: "The printer is out of paper.".into(),
            suggestion: "Add paper and send the file again.".into(),
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "The printer reported a problem.".into(),
            suggestion: format!("Try again later. (Detail: {detail})"),
            severity: Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        let err = PrintbotError::IppRequest("Get-Printer-Attributes timed out after 15s".into());
        assert_eq!(humanize_error(&err).severity, Severity::Transient);
    }

    #[test]
    fn page_link_asks_for_a_file() {
        let human = humanize_error(&PrintbotError::NotAFile("https://host/".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.to_reply().contains("report.pdf"));
    }

    #[test]
    fn rejected_settings_point_to_menu() {
        let err = PrintbotError::IppRequest("Print-Job returned status ClientErrorAttributesOrValuesNotSupported".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("/settings"));
    }

    #[test]
    fn storage_failure_is_permanent() {
        let human = humanize_error(&PrintbotError::Database("disk I/O error".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }
}

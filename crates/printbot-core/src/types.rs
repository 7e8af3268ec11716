// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Printbot print front-end.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity of a chat.  Every per-user record is keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a message inside a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i32);

/// The chat user who triggered an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl ChatUser {
    /// Name shown as the job submitter: the username, or `first_last` when
    /// the user has none.  A missing last name leaves the underscore.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) => username.clone(),
            None => format!("{}_{}", self.first_name, self.last_name.as_deref().unwrap_or_default()),
        }
    }
}

/// A platform-hosted file sent to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundDocument {
    /// Opaque platform file id.
    pub file_id: String,
    /// Declared file name, if the client sent one.
    pub file_name: Option<String>,
    /// Declared MIME type, if the client sent one.
    pub mime_type: Option<String>,
}

/// A button press delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    /// Id used to acknowledge the press.
    pub id: String,
    /// Raw callback payload.
    pub data: Option<String>,
    /// Chat and message the pressed keyboard belongs to.  Absent when the
    /// message is too old for the platform to report it.
    pub origin: Option<(ChatId, MessageId)>,
}

/// Scalar value of a print option.
///
/// Integers cover `copies` and enum-valued IPP attributes, text covers
/// keywords such as `media` or `sides`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Integer(i64),
    Text(String),
}

impl OptionValue {
    /// Numeric reading of the value.  Text such as `"+5"` or `" -1"` counts.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(s) => {
                let trimmed = s.trim();
                trimmed.strip_prefix('+').unwrap_or(trimmed).parse().ok()
            }
        }
    }

    /// Convert a JSON scalar.  Floats, booleans, arrays and objects have no
    /// option representation.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(Self::Integer),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(n) => serde_json::Value::from(*n),
            Self::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One chat's print options, option name to chosen value.
pub type UserSettings = BTreeMap<String, OptionValue>;

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    PlainText,
    PostScript,
    Pcl,
}

impl DocumentType {
    /// MIME type string for IPP `document-format`.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::PlainText => "text/plain",
            Self::PostScript => "application/postscript",
            Self::Pcl => "application/vnd.hp-pcl",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "txt" => Some(Self::PlainText),
            "ps" | "eps" => Some(Self::PostScript),
            "pcl" => Some(Self::Pcl),
            _ => None,
        }
    }

    /// Infer document type from a file name such as `report.PDF`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

/// Everything the printer needs to accept one job.
#[derive(Debug, Clone)]
pub struct PrintRequest {
    /// Raw document bytes.
    pub content: Vec<u8>,
    /// Name shown in the printer queue.
    pub job_name: String,
    /// `requesting-user-name` of the job.
    pub submitter: String,
    /// MIME type for `document-format`; the printer sniffs when absent.
    pub file_type: Option<String>,
    /// Per-user job template attributes.
    pub job_attributes: Option<UserSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: Option<&str>, last: Option<&str>) -> ChatUser {
        ChatUser {
            id: 7,
            username: username.map(str::to_string),
            first_name: "Ada".into(),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn display_name_prefers_username() {
        assert_eq!(user(Some("ada"), Some("Lovelace")).display_name(), "ada");
        assert_eq!(user(None, Some("Lovelace")).display_name(), "Ada_Lovelace");
        assert_eq!(user(None, None).display_name(), "Ada_");
    }

    #[test]
    fn option_value_numeric_reading() {
        assert_eq!(OptionValue::Integer(3).as_integer(), Some(3));
        assert_eq!(OptionValue::from("+5").as_integer(), Some(5));
        assert_eq!(OptionValue::from("-1").as_integer(), Some(-1));
        assert_eq!(OptionValue::from("A4").as_integer(), None);
    }

    #[test]
    fn option_value_json_scalars_only() {
        assert_eq!(
            OptionValue::from_json(&serde_json::json!(0)),
            Some(OptionValue::Integer(0))
        );
        assert_eq!(
            OptionValue::from_json(&serde_json::json!("")),
            Some(OptionValue::Text(String::new()))
        );
        assert_eq!(OptionValue::from_json(&serde_json::json!(1.5)), None);
        assert_eq!(OptionValue::from_json(&serde_json::json!(true)), None);
        assert_eq!(OptionValue::from_json(&serde_json::json!([1])), None);
    }

    #[test]
    fn settings_serialize_as_plain_json() {
        let mut settings = UserSettings::new();
        settings.insert("copies".into(), OptionValue::Integer(2));
        settings.insert("media".into(), "A4".into());
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"copies":2,"media":"A4"}"#);
        let back: UserSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn document_type_from_file_name() {
        assert_eq!(DocumentType::from_file_name("report.PDF"), Some(DocumentType::Pdf));
        assert_eq!(DocumentType::from_file_name("scan.tar.gz"), None);
        assert_eq!(DocumentType::from_file_name("README"), None);
    }
}

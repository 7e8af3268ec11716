// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback tokens carried by inline keyboard buttons.
//
// Format:  [prefix "/"] tag ":" option ":" value
//
//   tag     one character naming the action (see `ActionKind::tag`)
//   option  option name, empty when the action has none
//   value   JSON scalar (`5`, `"A4"`), empty when absent
//
// The value is everything after the second colon, so JSON strings may
// contain colons.  Telegram limits callback data to 64 bytes; `encode` is
// the only place that limit is checked.

use printbot_core::types::OptionValue;
use thiserror::Error;

/// Longest callback payload the chat platform accepts, in bytes.
pub const MAX_CALLBACK_LEN: usize = 64;

/// What a button press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Store a value and stay on the current keyboard.
    SetValue,
    /// Store a value and return to the root keyboard.
    SetValueAndBack,
    /// Open the leaf keyboard of an option.
    NavigateTo,
    /// Return to the root keyboard.
    NavigateBack,
    /// Replace the keyboard with a settings summary.
    Exit,
    /// Drop every override of the chat.
    ClearAll,
    /// Add a signed delta to a numeric option.
    AddValue,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::SetValue,
        ActionKind::SetValueAndBack,
        ActionKind::NavigateTo,
        ActionKind::NavigateBack,
        ActionKind::Exit,
        ActionKind::ClearAll,
        ActionKind::AddValue,
    ];

    pub fn tag(self) -> char {
        match self {
            ActionKind::SetValue => 'A',
            ActionKind::SetValueAndBack => 'B',
            ActionKind::NavigateTo => 'C',
            ActionKind::NavigateBack => 'D',
            ActionKind::Exit => 'E',
            ActionKind::ClearAll => 'F',
            ActionKind::AddValue => 'G',
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let mut chars = tag.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Self::ALL.into_iter().find(|kind| kind.tag() == c)
    }
}

/// A decoded button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    pub kind: ActionKind,
    pub option: Option<String>,
    pub value: Option<OptionValue>,
}

impl MenuAction {
    pub fn new(kind: ActionKind, option: Option<&str>, value: Option<OptionValue>) -> Self {
        Self {
            kind,
            option: option.map(str::to_string),
            value,
        }
    }
}

/// Outcome of decoding a token that is well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The token belongs to this menu.
    Action(MenuAction),
    /// The token belongs to another menu sharing the bot.
    Foreign,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("callback token is {len} bytes, limit is {MAX_CALLBACK_LEN}")]
    TooLong { len: usize },

    #[error("option name '{0}' cannot be used in a callback token")]
    InvalidOption(String),

    #[error("menu prefix '{0}' cannot be used in a callback token")]
    InvalidPrefix(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("unknown action tag '{0}'")]
    UnknownTag(String),

    #[error("option name '{0}' contains illegal characters")]
    InvalidOption(String),

    #[error("value '{0}' is not a JSON integer or string")]
    InvalidValue(String),
}

/// Encoder and decoder for one menu's tokens.
#[derive(Debug, Clone, Default)]
pub struct CallbackCodec {
    prefix: Option<String>,
}

impl CallbackCodec {
    /// Codec whose tokens carry `prefix`, or none.
    pub fn new(prefix: Option<&str>) -> Result<Self, EncodeError> {
        if let Some(p) = prefix
            && (p.is_empty() || !is_token_safe(p))
        {
            return Err(EncodeError::InvalidPrefix(p.to_string()));
        }
        Ok(Self {
            prefix: prefix.map(str::to_string),
        })
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn encode(
        &self,
        kind: ActionKind,
        option: Option<&str>,
        value: Option<&OptionValue>,
    ) -> Result<String, EncodeError> {
        let option = option.unwrap_or("");
        if !is_token_safe(option) {
            return Err(EncodeError::InvalidOption(option.to_string()));
        }

        let value = value.map(|v| v.to_json().to_string()).unwrap_or_default();
        let token = match &self.prefix {
            Some(prefix) => format!("{prefix}/{}:{option}:{value}", kind.tag()),
            None => format!("{}:{option}:{value}", kind.tag()),
        };

        if token.len() > MAX_CALLBACK_LEN {
            return Err(EncodeError::TooLong { len: token.len() });
        }
        Ok(token)
    }

    pub fn decode(&self, token: &str) -> Result<Decoded, DecodeError> {
        let fields: Vec<&str> = token.splitn(3, ':').collect();
        let [head, option, value] = fields[..] else {
            return Err(DecodeError::FieldCount(fields.len()));
        };

        let (prefix, tag) = match head.split_once('/') {
            Some((prefix, tag)) => (Some(prefix), tag),
            None => (None, head),
        };
        if prefix != self.prefix.as_deref() {
            return Ok(Decoded::Foreign);
        }

        let kind = ActionKind::from_tag(tag).ok_or_else(|| DecodeError::UnknownTag(tag.to_string()))?;

        if !is_token_safe(option) {
            return Err(DecodeError::InvalidOption(option.to_string()));
        }
        let option = (!option.is_empty()).then(|| option.to_string());

        let value = if value.is_empty() {
            None
        } else {
            let json: serde_json::Value =
                serde_json::from_str(value).map_err(|_| DecodeError::InvalidValue(value.to_string()))?;
            Some(OptionValue::from_json(&json).ok_or_else(|| DecodeError::InvalidValue(value.to_string()))?)
        };

        Ok(Decoded::Action(MenuAction { kind, option, value }))
    }
}

/// Names used inside tokens must not contain the field separators.
fn is_token_safe(name: &str) -> bool {
    !name.contains([':', '/'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> CallbackCodec {
        CallbackCodec::default()
    }

    fn decode_action(codec: &CallbackCodec, token: &str) -> MenuAction {
        match codec.decode(token).expect("token decodes") {
            Decoded::Action(action) => action,
            Decoded::Foreign => panic!("token {token} treated as foreign"),
        }
    }

    #[test]
    fn wire_format_matches_tags() {
        let codec = plain();
        assert_eq!(
            codec.encode(ActionKind::SetValue, Some("copies"), Some(&OptionValue::Integer(5))).unwrap(),
            "A:copies:5"
        );
        assert_eq!(
            codec.encode(ActionKind::SetValueAndBack, Some("media"), Some(&"A4".into())).unwrap(),
            "B:media:\"A4\""
        );
        assert_eq!(codec.encode(ActionKind::NavigateBack, None, None).unwrap(), "D::");
    }

    #[test]
    fn every_kind_round_trips() {
        let codec = plain();
        let value = OptionValue::from("two-sided-long-edge");
        for kind in ActionKind::ALL {
            let token = codec.encode(kind, Some("sides"), Some(&value)).unwrap();
            let action = decode_action(&codec, &token);
            assert_eq!(action, MenuAction::new(kind, Some("sides"), Some(value.clone())));
        }
    }

    #[test]
    fn absent_value_differs_from_zero_and_empty_string() {
        let codec = plain();
        let absent = codec.encode(ActionKind::SetValue, Some("copies"), None).unwrap();
        let zero = codec.encode(ActionKind::SetValue, Some("copies"), Some(&OptionValue::Integer(0))).unwrap();
        let empty = codec.encode(ActionKind::SetValue, Some("media"), Some(&"".into())).unwrap();

        assert_eq!(decode_action(&codec, &absent).value, None);
        assert_eq!(decode_action(&codec, &zero).value, Some(OptionValue::Integer(0)));
        assert_eq!(decode_action(&codec, &empty).value, Some(OptionValue::from("")));
    }

    #[test]
    fn absent_option_round_trips() {
        let codec = plain();
        let token = codec.encode(ActionKind::ClearAll, None, None).unwrap();
        assert_eq!(decode_action(&codec, &token), MenuAction::new(ActionKind::ClearAll, None, None));
    }

    #[test]
    fn colons_inside_values_survive() {
        let codec = plain();
        let value = OptionValue::from("a:b:c");
        let token = codec.encode(ActionKind::SetValue, Some("media"), Some(&value)).unwrap();
        assert_eq!(decode_action(&codec, &token).value, Some(value));
    }

    #[test]
    fn negative_delta_round_trips() {
        let codec = plain();
        let token = codec.encode(ActionKind::AddValue, Some("copies"), Some(&OptionValue::Integer(-1))).unwrap();
        assert_eq!(token, "G:copies:-1");
        assert_eq!(decode_action(&codec, &token).value, Some(OptionValue::Integer(-1)));
    }

    #[test]
    fn length_limit_is_exact() {
        let codec = plain();
        // "A:" + option + ":" + "1" is 4 bytes of framing around the option.
        let fits = "o".repeat(MAX_CALLBACK_LEN - 4);
        let token = codec.encode(ActionKind::SetValue, Some(&fits), Some(&OptionValue::Integer(1))).unwrap();
        assert_eq!(token.len(), MAX_CALLBACK_LEN);

        let too_long = "o".repeat(MAX_CALLBACK_LEN - 3);
        assert_eq!(
            codec.encode(ActionKind::SetValue, Some(&too_long), Some(&OptionValue::Integer(1))),
            Err(EncodeError::TooLong { len: MAX_CALLBACK_LEN + 1 })
        );
    }

    #[test]
    fn separators_in_option_names_are_rejected() {
        let codec = plain();
        assert!(matches!(
            codec.encode(ActionKind::NavigateTo, Some("a:b"), None),
            Err(EncodeError::InvalidOption(_))
        ));
        assert!(matches!(CallbackCodec::new(Some("of/fice")), Err(EncodeError::InvalidPrefix(_))));
        assert!(matches!(CallbackCodec::new(Some("")), Err(EncodeError::InvalidPrefix(_))));
    }

    #[test]
    fn prefixed_tokens_round_trip() {
        let codec = CallbackCodec::new(Some("office")).unwrap();
        let token = codec.encode(ActionKind::NavigateTo, Some("media"), None).unwrap();
        assert_eq!(token, "office/C:media:");
        assert_eq!(decode_action(&codec, &token), MenuAction::new(ActionKind::NavigateTo, Some("media"), None));
    }

    #[test]
    fn other_prefixes_are_foreign() {
        let office = CallbackCodec::new(Some("office")).unwrap();
        let lab = CallbackCodec::new(Some("lab")).unwrap();

        let token = lab.encode(ActionKind::Exit, None, None).unwrap();
        assert_eq!(office.decode(&token), Ok(Decoded::Foreign));
        assert_eq!(plain().decode(&token), Ok(Decoded::Foreign));
        assert_eq!(office.decode("E::"), Ok(Decoded::Foreign));
    }

    #[test]
    fn missing_field_is_malformed() {
        assert_eq!(plain().decode("A:copies"), Err(DecodeError::FieldCount(2)));
        assert_eq!(plain().decode(""), Err(DecodeError::FieldCount(1)));
    }

    #[test]
    fn unknown_tag_is_malformed() {
        assert_eq!(plain().decode("Z:copies:1"), Err(DecodeError::UnknownTag("Z".into())));
        assert_eq!(plain().decode("AB:copies:1"), Err(DecodeError::UnknownTag("AB".into())));
    }

    #[test]
    fn non_scalar_values_are_malformed() {
        assert!(matches!(plain().decode("A:copies:[1,2]"), Err(DecodeError::InvalidValue(_))));
        assert!(matches!(plain().decode("A:copies:true"), Err(DecodeError::InvalidValue(_))));
        assert!(matches!(plain().decode("A:media:A4"), Err(DecodeError::InvalidValue(_))));
    }
}

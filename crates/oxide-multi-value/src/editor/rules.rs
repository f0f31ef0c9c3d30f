//! Text rules checked by [`InputEditor`](super::InputEditor) on a filled-in row.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Message reported for a row that does not hold an email address.
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").ok());

/// A check on the text of one row.
#[derive(Clone)]
pub enum TextRule {
    /// The text is an email address.
    Email,
    /// The whole text matches `pattern`, otherwise `message` is reported.
    Pattern { pattern: Regex, message: String },
}

impl TextRule {
    /// Builds a [`TextRule::Pattern`], anchoring `pattern` to the whole text.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::Pattern {
            pattern: Regex::new(&format!("^(?:{pattern})$"))?,
            message: message.into(),
        })
    }

    /// Returns the message for `text` when the rule rejects it.
    pub fn violation(&self, text: &str) -> Option<String> {
        match self {
            Self::Email => {
                let accepted = EMAIL.as_ref().is_some_and(|email| email.is_match(text));
                (!accepted).then(|| INVALID_EMAIL_MESSAGE.to_string())
            }
            Self::Pattern { pattern, message } => {
                (!pattern.is_match(text)).then(|| message.clone())
            }
        }
    }
}

impl fmt::Debug for TextRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("Email"),
            Self::Pattern { pattern, .. } => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
        }
    }
}

//! Splits a single argument token into an optional name and value.
//!
//! Accepted shapes:
//! - `-Name=Value`, `Name=Value`, `-Name="Value"`, `-Name='Value'`
//! - `-Flag` (name only, no value)
//! - `Value` (positional)

/// One command-line token after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgumentToken {
    pub raw_text: String,
    pub name: Option<String>,
    pub value: Option<String>,
}

impl ParsedArgumentToken {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// True for blank input, which carries neither name nor value.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.value.is_none()
    }
}

pub fn parse_argument(token: &str) -> ParsedArgumentToken {
    let raw_text = token.to_string();
    let trimmed = token.trim();

    if trimmed.is_empty() {
        return ParsedArgumentToken {
            raw_text,
            name: None,
            value: None,
        };
    }

    if let Some((name, value)) = trimmed.split_once('=') {
        let name = name.trim_start_matches('-').trim();
        let value = strip_quotes(value).to_string();
        if name.is_empty() {
            return ParsedArgumentToken {
                raw_text,
                name: None,
                value: Some(value),
            };
        }
        return ParsedArgumentToken {
            raw_text,
            name: Some(name.to_string()),
            value: Some(value),
        };
    }

    if trimmed.starts_with('-') {
        let flag = trimmed.trim_start_matches('-');
        if !flag.is_empty() {
            return ParsedArgumentToken {
                raw_text,
                name: Some(flag.to_string()),
                value: None,
            };
        }
    }

    ParsedArgumentToken {
        raw_text,
        name: None,
        value: Some(strip_quotes(trimmed).to_string()),
    }
}

/// Remove one layer of matching single or double quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

//! Shell pattern matching for the trim expansions.
//!
//! Supported syntax:
//!
//! - Any single character (`?`)
//! - Any character sequence (`*`), including `/` and the empty sequence
//! - Bracket expression (`[...]`)
//!     - Character literals and ranges (e.g. `a-z`)
//!     - Complement (`[!...]` or `[^...]`)
//!     - Character classes (`[:alpha:]`), matching ASCII characters only
//! - Backslash escapes (`\*` matches a literal `*`)
//!
//! A pattern is converted to an anchored regular expression.


use std::fmt::Write;

use regex::Regex;
use thiserror::Error;

const CHAR_CLASSES: [&str; 12] = [
    "alnum", "alpha", "blank", "cntrl", "digit", "graph", "lower", "print", "punct", "space",
    "upper", "xdigit",
];

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Unclosed bracket expression")]
    UnclosedBracket,
    #[error("Pattern ends with a lone backslash")]
    TrailingBackslash,
    #[error("Unknown character class '{0}'")]
    UnknownCharClass(String),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Which candidate to remove when several match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLength {
    Shortest,
    Longest,
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let mut regex = String::with_capacity(pattern.len() * 2 + 8);
        regex.push_str("^(?s:");
        fmt_regex(pattern, &mut regex)?;
        regex.push_str(")$");
        Ok(Self {
            regex: Regex::new(&regex)?,
        })
    }

    /// Tests whether the whole of `value` matches.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Removes the shortest or longest matching prefix of `value`.
    ///
    /// Returns `None` when no prefix matches.
    pub fn strip_prefix<'a>(&self, value: &'a str, length: MatchLength) -> Option<&'a str> {
        let mut ends = boundaries(value);
        if length == MatchLength::Longest {
            ends.reverse();
        }
        ends.into_iter()
            .find(|&end| self.is_match(&value[..end]))
            .map(|end| &value[end..])
    }

    /// Removes the shortest or longest matching suffix of `value`.
    ///
    /// Returns `None` when no suffix matches.
    pub fn strip_suffix<'a>(&self, value: &'a str, length: MatchLength) -> Option<&'a str> {
        let mut starts = boundaries(value);
        if length == MatchLength::Shortest {
            starts.reverse();
        }
        starts
            .into_iter()
            .find(|&start| self.is_match(&value[start..]))
            .map(|start| &value[..start])
    }
}

/// Byte offsets of every char boundary in `value`, both ends included.
fn boundaries(value: &str) -> Vec<usize> {
    value
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(value.len()))
        .collect()
}

fn fmt_regex(pattern: &str, regex: &mut String) -> Result<(), PatternError> {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '\\' => {
                let c = chars.next().ok_or(PatternError::TrailingBackslash)?;
                regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            }
            '[' => {
                chars = fmt_bracket(chars, regex)?;
            }
            c => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    Ok(())
}

/// Converts a bracket expression whose opening `[` was already consumed,
/// returning the iterator positioned after the closing `]`.
fn fmt_bracket<'a>(
    mut chars: std::str::Chars<'a>,
    regex: &mut String,
) -> Result<std::str::Chars<'a>, PatternError> {
    let mut class = String::from("[");
    let mut ahead = chars.clone();
    if let Some('!' | '^') = ahead.next() {
        class.push('^');
        chars = ahead;
    }
    let mut first = true;
    loop {
        let c = chars.next().ok_or(PatternError::UnclosedBracket)?;
        match c {
            ']' if !first => break,
            '[' if chars.clone().next() == Some(':') => {
                chars.next();
                let rest = chars.as_str();
                let end = rest.find(":]").ok_or(PatternError::UnclosedBracket)?;
                let name = &rest[..end];
                if !CHAR_CLASSES.contains(&name) {
                    return Err(PatternError::UnknownCharClass(name.to_owned()));
                }
                let _ = write!(class, "[:{name}:]");
                chars = rest[end + 2..].chars();
            }
            '\\' => {
                let c = chars.next().ok_or(PatternError::TrailingBackslash)?;
                push_class_char(&mut class, c);
            }
            '-' if !first && chars.clone().next().is_some_and(|c| c != ']') => {
                class.push('-');
            }
            c => push_class_char(&mut class, c),
        }
        first = false;
    }
    class.push(']');
    regex.push_str(&class);
    Ok(chars)
}

fn push_class_char(class: &mut String, c: char) {
    if c.is_alphanumeric() {
        class.push(c);
    } else {
        let _ = write!(class, "\\x{{{:X}}}", c as u32);
    }
}

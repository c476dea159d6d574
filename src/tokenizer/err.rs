use thiserror::Error;

use super::pos::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidIdentifierStart(char),
    UnterminatedExpansion,
    UnknownModifier(String),
    ExpectedInteger(Option<char>),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifierStart(ch) => f.write_fmt(format_args!(
                "Expected identifier to start with a letter or underscore, got '{}'",
                ch
            )),
            Self::UnterminatedExpansion => f.write_str("Unterminated expansion"),
            Self::UnknownModifier(m) => {
                f.write_fmt(format_args!("Unsupported expansion modifier '{}'", m))
            }
            Self::ExpectedInteger(Some(ch)) => {
                f.write_fmt(format_args!("Expected an integer, got '{}'", ch))
            }
            Self::ExpectedInteger(None) => f.write_str("Expected an integer"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    kind: ErrorKind,
    position: Position,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind().fmt(f)?;
        f.write_fmt(format_args!(" on {}", self.position))
    }
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

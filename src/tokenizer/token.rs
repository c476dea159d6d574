use super::pos::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Characters,
    /// `$$` or `\$`, value holds the text that would have been expanded.
    Escaped,
    SimpleExpansion,
    StartExpansion,
    ExpansionOperator,
    Offset,
    Length,
    Pattern,
    EndExpansion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: String, position: Position) -> Self {
        Self {
            kind,
            value,
            position,
        }
    }
}

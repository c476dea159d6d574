pub mod ast;

use std::iter::Peekable;

use thiserror::Error;

use crate::tokenizer::{
    err::SyntaxError,
    token::{Token, TokenKind},
    tokenize, TokenizerResult,
};

use self::ast::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input")]
    Eof,
    #[error("Unexpected token {0:?}")]
    Unexpected(Token),
    #[error("Invalid substring index '{0}'")]
    InvalidInteger(String),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses `input` into an [`Expression`].
///
/// Fails on the first grammar violation; no partial tree is returned.
pub fn parse(input: &str) -> ParseResult<Expression> {
    Parser::new(tokenize(input)).parse()
}

macro_rules! match_kind {
    ($($kind:ident)|+) => {
        $( Some(Ok(Token {kind: TokenKind::$kind, ..})) )|+
    };
}

pub struct Parser<I>
where
    I: Iterator<Item = TokenizerResult>,
{
    tokens: Peekable<I>,
}

impl<I> Parser<I>
where
    I: Iterator<Item = TokenizerResult>,
{
    pub fn new(tokenizer: I) -> Self {
        Self {
            tokens: tokenizer.peekable(),
        }
    }

    pub fn parse(&mut self) -> ParseResult<Expression> {
        let mut items = Vec::new();
        loop {
            match self.tokens.peek() {
                None => return Err(ParseError::Eof),
                Some(Err(_)) => return self.take_err(),
                match_kind!(Eof) => return Ok(Expression::new(items)),
                Some(Ok(_)) => items.push(self.parse_item()?),
            };
        }
    }

    /// Parses the body of a default value or required message,
    /// consuming the closing brace.
    fn parse_expansion_value(&mut self) -> ParseResult<Expression> {
        let mut items = Vec::new();
        loop {
            match self.tokens.peek() {
                None => return Err(ParseError::Eof),
                Some(Err(_)) => return self.take_err(),
                match_kind!(EndExpansion) => {
                    self.tokens.next();
                    return Ok(Expression::new(items));
                }
                match_kind!(Eof) => return Err(ParseError::Unexpected(self.take_cur()?)),
                Some(Ok(_)) => items.push(self.parse_item()?),
            };
        }
    }

    fn parse_item(&mut self) -> ParseResult<ExpressionItem> {
        let token = self.take_cur()?;
        let expansion = match token.kind {
            TokenKind::Characters => return Ok(ExpressionItem::Text(token.value)),
            TokenKind::Escaped => Expansion::Escaped {
                potential_identifier: token.value,
            },
            TokenKind::SimpleExpansion => Expansion::Variable {
                identifier: token.value,
            },
            TokenKind::StartExpansion => self.parse_modified_expansion(token.value)?,
            _ => return Err(ParseError::Unexpected(token)),
        };
        Ok(ExpressionItem::Expansion(expansion))
    }

    fn parse_modified_expansion(&mut self, identifier: String) -> ParseResult<Expansion> {
        let token = self.expect(TokenKind::ExpansionOperator)?;
        match token.value.as_str() {
            "-" => Ok(Expansion::UnsetValueDefault {
                identifier,
                content: self.parse_expansion_value()?,
            }),
            ":-" => Ok(Expansion::EmptyValueDefault {
                identifier,
                content: self.parse_expansion_value()?,
            }),
            "?" => Ok(Expansion::Required {
                identifier,
                message: self.parse_expansion_value()?,
            }),
            ":" => {
                let offset = self.parse_integer(TokenKind::Offset)?;
                let length = match self.tokens.peek() {
                    match_kind!(Length) => Some(self.parse_integer(TokenKind::Length)?),
                    _ => None,
                };
                self.expect(TokenKind::EndExpansion)?;
                Ok(Expansion::Substring {
                    identifier,
                    offset,
                    length,
                })
            }
            "#" => Ok(Expansion::PrefixTrimShortest {
                identifier,
                pattern: self.parse_pattern()?,
            }),
            "##" => Ok(Expansion::PrefixTrimLongest {
                identifier,
                pattern: self.parse_pattern()?,
            }),
            "%" => Ok(Expansion::SuffixTrimShortest {
                identifier,
                pattern: self.parse_pattern()?,
            }),
            "%%" => Ok(Expansion::SuffixTrimLongest {
                identifier,
                pattern: self.parse_pattern()?,
            }),
            _ => Err(ParseError::Unexpected(token)),
        }
    }

    fn parse_integer(&mut self, kind: TokenKind) -> ParseResult<i64> {
        let token = self.expect(kind)?;
        token
            .value
            .parse()
            .map_err(|_| ParseError::InvalidInteger(token.value))
    }

    fn parse_pattern(&mut self) -> ParseResult<String> {
        let pattern = self.expect(TokenKind::Pattern)?.value;
        self.expect(TokenKind::EndExpansion)?;
        Ok(pattern)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        match self.tokens.next() {
            None => Err(ParseError::Eof),
            Some(Ok(token)) if token.kind == kind => Ok(token),
            Some(Ok(token)) => Err(ParseError::Unexpected(token)),
            Some(Err(e)) => Err(ParseError::Syntax(e)),
        }
    }

    fn take_cur(&mut self) -> ParseResult<Token> {
        Ok(self.tokens.next().ok_or(ParseError::Eof)??)
    }

    fn take_err<T>(&mut self) -> ParseResult<T> {
        match self.tokens.next() {
            Some(Err(e)) => Err(ParseError::Syntax(e)),
            Some(Ok(token)) => Err(ParseError::Unexpected(token)),
            None => Err(ParseError::Eof),
        }
    }
}

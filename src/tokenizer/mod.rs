use std::collections::VecDeque;

use self::{
    err::{ErrorKind, SyntaxError},
    pos::Position,
    token::*,
};

pub mod err;
pub mod pos;
pub mod token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Escape,
    Dollar,
    SimpleExpansion,
    BraceExpansionStart,
    BraceExpansionName,
    ColonOperator,
    PrefixOperator,
    SuffixOperator,
    SubstringOffset,
    SubstringLength,
    Pattern,
    PatternEscape,
    ExpansionValue,
}

pub type TokenizerResult = Result<Token, SyntaxError>;

#[inline(always)]
fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[inline(always)]
fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[inline(always)]
fn is_integer_start(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '+'
}

/// Tokenizes `input`, yielding tokens up to and including [`TokenKind::Eof`].
pub fn tokenize(input: &str) -> Tokenizer<std::str::Chars<'_>> {
    Tokenizer::new(input.chars())
}

/// A character-level state machine producing [`Token`]s.
///
/// The input iterator must be cheaply clonable: escaped expansions peek at
/// the text that follows them without consuming it.
#[derive(Debug)]
pub struct Tokenizer<I>
where
    I: Iterator<Item = char> + Clone,
{
    input: I,
    done: bool,
    state: State,
    return_states: VecDeque<State>,
    queue: VecDeque<Token>,
    buf: String,
    buf_pos: Position,
    cc: Option<char>,
    reconsume: bool,
    line: usize,
    column: usize,
    expansion_stack: VecDeque<Position>,
}

impl<I> Iterator for Tokenizer<I>
where
    I: Iterator<Item = char> + Clone,
{
    type Item = TokenizerResult;

    fn next(&mut self) -> Option<Self::Item> {
        while self.queue.is_empty() && !self.done {
            if let Err(e) = self.run() {
                self.done = true;
                self.queue.clear();
                return Some(Err(e));
            }
        }
        self.queue.pop_front().map(Ok)
    }
}

impl<I> Tokenizer<I>
where
    I: Iterator<Item = char> + Clone,
{
    pub fn new(input: I) -> Self {
        Self {
            input,
            done: false,
            state: State::Text,
            return_states: VecDeque::with_capacity(8),
            queue: VecDeque::with_capacity(4),
            buf: String::with_capacity(64),
            buf_pos: Position::new(1, 1),
            reconsume: false,
            cc: None,
            line: 1,
            column: 0,
            expansion_stack: VecDeque::with_capacity(8),
        }
    }

    #[allow(clippy::unit_arg)]
    fn run(&mut self) -> Result<(), SyntaxError> {
        match self.state {
            State::Text => match self.consume_the_next_character() {
                None => {
                    self.flush_buffer(TokenKind::Characters);
                    Ok(self.emit_eof())
                }
                Some('\\') => {
                    self.return_states.push_back(self.state);
                    Ok(self.switch_to(State::Escape))
                }
                Some('$') => {
                    self.return_states.push_back(self.state);
                    Ok(self.switch_to(State::Dollar))
                }
                Some(c) => Ok(self.buffer(c)),
            },
            State::Escape => match self.consume_the_next_character() {
                None => {
                    self.buffer('\\');
                    Ok(self.reconsume_in_return_state())
                }
                Some('$') => {
                    self.emit_escaped();
                    Ok(self.switch_to_return_state())
                }
                Some(c) => {
                    self.buffer('\\');
                    self.buffer(c);
                    Ok(self.switch_to_return_state())
                }
            },
            State::Dollar => match self.consume_the_next_character() {
                Some('$') => {
                    self.emit_escaped();
                    Ok(self.switch_to_return_state())
                }
                Some('{') => {
                    let dollar = Position::new(self.line, self.column.saturating_sub(1));
                    self.expansion_stack.push_back(dollar);
                    self.flush_buffer(TokenKind::Characters);
                    Ok(self.switch_to(State::BraceExpansionStart))
                }
                Some(c) if is_identifier_start(c) => {
                    self.flush_buffer(TokenKind::Characters);
                    self.buffer(c);
                    Ok(self.switch_to(State::SimpleExpansion))
                }
                Some(c) if c.is_ascii_digit() => self.err(ErrorKind::InvalidIdentifierStart(c)),
                Some(_) | None => {
                    self.buffer('$');
                    Ok(self.reconsume_in_return_state())
                }
            },
            State::SimpleExpansion => match self.consume_the_next_character() {
                Some(c) if is_identifier_char(c) => Ok(self.buffer(c)),
                _ => {
                    self.flush_buffer(TokenKind::SimpleExpansion);
                    Ok(self.reconsume_in_return_state())
                }
            },
            State::BraceExpansionStart => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some(c) if is_identifier_start(c) => {
                    self.buffer(c);
                    Ok(self.switch_to(State::BraceExpansionName))
                }
                Some(c) => self.err(ErrorKind::InvalidIdentifierStart(c)),
            },
            State::BraceExpansionName => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some(c) if is_identifier_char(c) => Ok(self.buffer(c)),
                Some('}') => {
                    self.expansion_stack.pop_back();
                    self.flush_buffer(TokenKind::SimpleExpansion);
                    Ok(self.switch_to_return_state())
                }
                Some(':') => {
                    self.flush_buffer(TokenKind::StartExpansion);
                    Ok(self.switch_to(State::ColonOperator))
                }
                Some(c @ ('-' | '?')) => {
                    self.flush_buffer(TokenKind::StartExpansion);
                    self.emit(TokenKind::ExpansionOperator, c.to_string());
                    Ok(self.switch_to(State::ExpansionValue))
                }
                Some('#') => {
                    self.flush_buffer(TokenKind::StartExpansion);
                    Ok(self.switch_to(State::PrefixOperator))
                }
                Some('%') => {
                    self.flush_buffer(TokenKind::StartExpansion);
                    Ok(self.switch_to(State::SuffixOperator))
                }
                Some(c) => self.err(ErrorKind::UnknownModifier(c.to_string())),
            },
            State::ColonOperator => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some('-') => {
                    self.emit(TokenKind::ExpansionOperator, ":-".to_string());
                    Ok(self.switch_to(State::ExpansionValue))
                }
                // `${V: -1}` is a substring, `${V:-1}` a default value.
                Some(' ') => {
                    self.emit(TokenKind::ExpansionOperator, ":".to_string());
                    Ok(self.switch_to(State::SubstringOffset))
                }
                Some(c) if is_integer_start(c) => {
                    self.emit(TokenKind::ExpansionOperator, ":".to_string());
                    self.buffer(c);
                    Ok(self.switch_to(State::SubstringOffset))
                }
                Some(c @ ('=' | '?')) => self.err(ErrorKind::UnknownModifier(format!(":{c}"))),
                Some(c) => self.err(ErrorKind::ExpectedInteger(Some(c))),
            },
            State::PrefixOperator => match self.consume_the_next_character() {
                Some('#') => {
                    self.emit(TokenKind::ExpansionOperator, "##".to_string());
                    Ok(self.switch_to(State::Pattern))
                }
                _ => {
                    self.emit(TokenKind::ExpansionOperator, "#".to_string());
                    Ok(self.reconsume_in(State::Pattern))
                }
            },
            State::SuffixOperator => match self.consume_the_next_character() {
                Some('%') => {
                    self.emit(TokenKind::ExpansionOperator, "%%".to_string());
                    Ok(self.switch_to(State::Pattern))
                }
                _ => {
                    self.emit(TokenKind::ExpansionOperator, "%".to_string());
                    Ok(self.reconsume_in(State::Pattern))
                }
            },
            State::SubstringOffset => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some(c @ ('+' | '-')) if self.buf.is_empty() => Ok(self.buffer(c)),
                Some(c) if c.is_ascii_digit() => Ok(self.buffer(c)),
                Some(':') => {
                    self.flush_integer(TokenKind::Offset)?;
                    Ok(self.switch_to(State::SubstringLength))
                }
                Some('}') => {
                    self.flush_integer(TokenKind::Offset)?;
                    Ok(self.end_expansion())
                }
                Some(c) => self.err(ErrorKind::ExpectedInteger(Some(c))),
            },
            State::SubstringLength => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some(c @ ('+' | '-')) if self.buf.is_empty() => Ok(self.buffer(c)),
                Some(c) if c.is_ascii_digit() => Ok(self.buffer(c)),
                Some('}') => {
                    self.flush_integer(TokenKind::Length)?;
                    Ok(self.end_expansion())
                }
                Some(c) => self.err(ErrorKind::ExpectedInteger(Some(c))),
            },
            State::Pattern => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some('}') => {
                    self.take_buffer(TokenKind::Pattern);
                    Ok(self.end_expansion())
                }
                Some('\\') => {
                    self.buffer('\\');
                    Ok(self.switch_to(State::PatternEscape))
                }
                Some(c) => Ok(self.buffer(c)),
            },
            State::PatternEscape => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some(c) => {
                    self.buffer(c);
                    Ok(self.switch_to(State::Pattern))
                }
            },
            State::ExpansionValue => match self.consume_the_next_character() {
                None => self.unterminated_expansion(),
                Some('}') => {
                    self.flush_buffer(TokenKind::Characters);
                    Ok(self.end_expansion())
                }
                Some('\\') => {
                    self.return_states.push_back(self.state);
                    Ok(self.switch_to(State::Escape))
                }
                Some('$') => {
                    self.return_states.push_back(self.state);
                    Ok(self.switch_to(State::Dollar))
                }
                Some(c) => Ok(self.buffer(c)),
            },
        }
    }

    fn switch_to(&mut self, state: State) {
        self.state = state;
    }

    fn switch_to_return_state(&mut self) {
        self.state = self.return_states.pop_back().unwrap_or(State::Text);
    }

    fn reconsume_in(&mut self, state: State) {
        self.reconsume = true;
        self.state = state;
    }

    fn reconsume_in_return_state(&mut self) {
        let state = self.return_states.pop_back().unwrap_or(State::Text);
        self.reconsume_in(state);
    }

    fn consume_the_next_character(&mut self) -> Option<char> {
        if self.reconsume {
            self.reconsume = false;
        } else {
            self.cc = self.input.next().map(|c| {
                if c == '\n' {
                    self.line += 1;
                    self.column = 0;
                } else {
                    self.column += 1;
                }
                c
            });
        }
        self.cc
    }

    /// Returns what an escaped `$` would have expanded: an identifier,
    /// a complete `{...}` body, or nothing.
    fn potential_identifier(&self) -> String {
        let mut ahead = self.input.clone().peekable();
        if ahead.peek() == Some(&'{') {
            let mut body = String::new();
            for c in ahead {
                body.push(c);
                if c == '}' {
                    return body;
                }
            }
            String::new()
        } else {
            ahead.take_while(|c| is_identifier_char(*c)).collect()
        }
    }

    fn emit(&mut self, kind: TokenKind, value: String) {
        self.queue.push_back(Token::new(kind, value, self.cur_pos()))
    }

    fn emit_eof(&mut self) {
        let pos = Position::new(self.line, self.column + 1);
        self.queue
            .push_back(Token::new(TokenKind::Eof, "".to_string(), pos));
        self.done = true;
    }

    fn emit_escaped(&mut self) {
        self.flush_buffer(TokenKind::Characters);
        let value = self.potential_identifier();
        self.emit(TokenKind::Escaped, value);
    }

    fn end_expansion(&mut self) {
        self.expansion_stack.pop_back();
        self.emit(TokenKind::EndExpansion, "}".to_string());
        self.switch_to_return_state();
    }

    fn flush_buffer(&mut self, kind: TokenKind) {
        if !self.buf.is_empty() {
            self.take_buffer(kind);
        }
    }

    /// Emits the buffer even when empty.
    fn take_buffer(&mut self, kind: TokenKind) {
        let pos = if self.buf.is_empty() {
            self.cur_pos()
        } else {
            self.buf_pos
        };
        let value = std::mem::take(&mut self.buf);
        self.queue.push_back(Token::new(kind, value, pos));
    }

    fn flush_integer(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        if !self.buf.chars().any(|c| c.is_ascii_digit()) {
            return self.err(ErrorKind::ExpectedInteger(self.cc));
        }
        self.take_buffer(kind);
        Ok(())
    }

    fn buffer(&mut self, c: char) {
        if self.buf.is_empty() {
            self.buf_pos = self.cur_pos();
        }
        self.buf.push(c);
    }

    fn cur_pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn err<T>(&self, kind: ErrorKind) -> Result<T, SyntaxError> {
        Err(SyntaxError::new(kind, self.cur_pos()))
    }

    fn unterminated_expansion(&mut self) -> Result<(), SyntaxError> {
        let pos = self
            .expansion_stack
            .pop_back()
            .unwrap_or_else(|| self.cur_pos());
        Err(SyntaxError::new(ErrorKind::UnterminatedExpansion, pos))
    }
}

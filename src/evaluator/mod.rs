use thiserror::Error;

use crate::{
    env::Environment,
    glob::{MatchLength, Pattern},
    parser::ast::{Expansion, Expression, ExpressionItem},
};

#[cfg(test)]
mod tests;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("${name}: {message}")]
    RequiredVariable { name: String, message: String },
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Evaluates `expr` against `env`.
pub fn evaluate<E>(expr: &Expression, env: &E) -> EvaluationResult<String>
where
    E: Environment + ?Sized,
{
    Evaluator::new(env).evaluate(expr)
}

#[derive(Debug)]
pub(crate) struct Evaluator<'e, E>
where
    E: Environment + ?Sized,
{
    env: &'e E,
}

impl<'e, E> Evaluator<'e, E>
where
    E: Environment + ?Sized,
{
    pub fn new(env: &'e E) -> Self {
        Self { env }
    }

    pub fn evaluate(&self, expr: &Expression) -> EvaluationResult<String> {
        let mut result = String::with_capacity(64);
        for item in expr.items() {
            match item {
                ExpressionItem::Text(text) => result.push_str(text),
                ExpressionItem::Expansion(expansion) => {
                    result.push_str(&self.evaluate_expansion(expansion)?)
                }
            }
        }
        Ok(result)
    }

    fn evaluate_expansion(&self, expansion: &Expansion) -> EvaluationResult<String> {
        let result = match expansion {
            Expansion::Escaped { .. } => "$".to_owned(),
            Expansion::Variable { identifier } => self.resolve(identifier),
            Expansion::EmptyValueDefault {
                identifier,
                content,
            } => match self.env.lookup(identifier) {
                None => self.evaluate(content)?,
                Some(value) if value.is_empty() => self.evaluate(content)?,
                Some(value) => value,
            },
            Expansion::UnsetValueDefault {
                identifier,
                content,
            } => match self.env.lookup(identifier) {
                None => self.evaluate(content)?,
                Some(value) => value,
            },
            Expansion::Required {
                identifier,
                message,
            } => match self.env.lookup(identifier) {
                None => return self.required_error(identifier, message),
                Some(value) => value,
            },
            Expansion::Substring {
                identifier,
                offset,
                length,
            } => substring(&self.resolve(identifier), *offset, *length),
            Expansion::PrefixTrimShortest {
                identifier,
                pattern,
            } => self.trim(identifier, pattern, |p, v| {
                p.strip_prefix(v, MatchLength::Shortest)
            }),
            Expansion::PrefixTrimLongest {
                identifier,
                pattern,
            } => self.trim(identifier, pattern, |p, v| {
                p.strip_prefix(v, MatchLength::Longest)
            }),
            Expansion::SuffixTrimShortest {
                identifier,
                pattern,
            } => self.trim(identifier, pattern, |p, v| {
                p.strip_suffix(v, MatchLength::Shortest)
            }),
            Expansion::SuffixTrimLongest {
                identifier,
                pattern,
            } => self.trim(identifier, pattern, |p, v| {
                p.strip_suffix(v, MatchLength::Longest)
            }),
        };
        Ok(result)
    }

    /// Looks up a variable, treating unset as empty.
    fn resolve(&self, name: &str) -> String {
        self.env.lookup(name).unwrap_or_default()
    }

    fn required_error<T>(&self, name: &str, message: &Expression) -> EvaluationResult<T> {
        let mut message = self.evaluate(message)?;
        if message.is_empty() {
            message.push_str("not set");
        }
        Err(EvaluationError::RequiredVariable {
            name: name.to_owned(),
            message,
        })
    }

    /// Applies a trim. A malformed pattern or a missing match leaves the
    /// value unchanged.
    fn trim<F>(&self, name: &str, pattern: &str, strip: F) -> String
    where
        F: for<'v> Fn(&Pattern, &'v str) -> Option<&'v str>,
    {
        let value = self.resolve(name);
        match Pattern::new(pattern) {
            Ok(pattern) => strip(&pattern, &value)
                .map(ToOwned::to_owned)
                .unwrap_or(value),
            Err(_) => value,
        }
    }
}

/// Bash-style `${NAME:offset:length}` over the characters of `value`.
///
/// Out of range offsets and lengths are clamped, never an error.
pub(crate) fn substring(value: &str, offset: i64, length: Option<i64>) -> String {
    let chars: Vec<char> = value.chars().collect();
    let n = chars.len() as i64;
    let from = if offset < 0 {
        n.saturating_add(offset).max(0)
    } else {
        offset.min(n)
    };
    let to = match length {
        None => n,
        Some(length) if length >= 0 => from.saturating_add(length).min(n),
        Some(length) => n.saturating_add(length).max(from),
    };
    chars[from as usize..to as usize].iter().collect()
}

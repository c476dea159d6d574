//! Bash-style parameter expansion for strings.
//!
//! ```
//! use interpolate::{interpolate, MapEnv};
//!
//! let env = MapEnv::from_iter([("BUILDKITE_COMMIT", "1adf998e39f647b4b25842f107c6ed9d30a3a7c7")]);
//! let result = interpolate(&env, "commit ${BUILDKITE_COMMIT:0:7} on ${BRANCH:-main}").unwrap();
//! assert_eq!("commit 1adf998 on main", result);
//! ```
//!
//! Supported forms:
//!
//! | Form                    | Result                                              |
//! |-------------------------|-----------------------------------------------------|
//! | `$NAME`, `${NAME}`      | value of `NAME`, empty when unset                   |
//! | `${NAME-default}`       | `default` when `NAME` is unset                      |
//! | `${NAME:-default}`      | `default` when `NAME` is unset or empty             |
//! | `${NAME?message}`       | error when `NAME` is unset                          |
//! | `${NAME:offset:length}` | character substring, negative values count from end |
//! | `${NAME#pat}`           | value with shortest prefix matching `pat` removed   |
//! | `${NAME##pat}`          | value with longest prefix matching `pat` removed    |
//! | `${NAME%pat}`           | value with shortest suffix matching `pat` removed   |
//! | `${NAME%%pat}`          | value with longest suffix matching `pat` removed    |
//! | `$$`, `\$`              | a literal `$`                                       |

use thiserror::Error;

pub use env::{Environment, MapEnv, ProcessEnv, SliceEnv};
pub use evaluator::{EvaluationError, EvaluationResult};
pub use glob::{MatchLength, Pattern, PatternError};
pub use parser::{
    ast::{Expansion, Expression, ExpressionItem},
    ParseError, ParseResult,
};
pub use tokenizer::{
    err::{ErrorKind, SyntaxError},
    pos::Position,
    token::{Token, TokenKind},
};

mod env;
mod evaluator;
mod glob;
mod parser;
mod tokenizer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterpolateError {
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error(transparent)]
    EvaluationError(#[from] EvaluationError),
}

/// Parses `input` into a reusable [`Expression`].
pub fn parse(input: &str) -> ParseResult<Expression> {
    parser::parse(input)
}

/// Evaluates a parsed expression against `env`.
pub fn evaluate<E>(expr: &Expression, env: &E) -> EvaluationResult<String>
where
    E: Environment + ?Sized,
{
    evaluator::evaluate(expr, env)
}

/// Parses and evaluates `input` in one go.
pub fn interpolate<E>(env: &E, input: &str) -> Result<String, InterpolateError>
where
    E: Environment + ?Sized,
{
    let expr = parser::parse(input)?;
    Ok(evaluator::evaluate(&expr, env)?)
}

/// Lists the variables referenced by `input`, in order of appearance.
///
/// Duplicates are kept. Escaped dollars contribute nothing.
pub fn identifiers(input: &str) -> ParseResult<Vec<String>> {
    Ok(parser::parse(input)?.identifiers())
}

use std::str::FromStr;

use crate::{
    env::Environment,
    evaluator::{EvaluationResult, Evaluator},
};

use super::{parse, ParseError};

/// A parsed input: literal text and expansions, in concatenation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression(Vec<ExpressionItem>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionItem {
    Text(String),
    Expansion(Expansion),
}

/// A `$`-triggered construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// `$NAME` or `${NAME}`
    Variable { identifier: String },
    /// `${NAME:-content}`
    EmptyValueDefault {
        identifier: String,
        content: Expression,
    },
    /// `${NAME-content}`
    UnsetValueDefault {
        identifier: String,
        content: Expression,
    },
    /// `${NAME?message}`
    Required {
        identifier: String,
        message: Expression,
    },
    /// `${NAME:offset}` or `${NAME:offset:length}`
    Substring {
        identifier: String,
        offset: i64,
        length: Option<i64>,
    },
    /// `${NAME#pattern}`
    PrefixTrimShortest { identifier: String, pattern: String },
    /// `${NAME##pattern}`
    PrefixTrimLongest { identifier: String, pattern: String },
    /// `${NAME%pattern}`
    SuffixTrimShortest { identifier: String, pattern: String },
    /// `${NAME%%pattern}`
    SuffixTrimLongest { identifier: String, pattern: String },
    /// `$$` or `\$`, evaluating to a literal `$`.
    ///
    /// The text that would otherwise have been expanded follows as a regular
    /// [`ExpressionItem::Text`]; it is only recorded here for inspection.
    Escaped { potential_identifier: String },
}

impl Expression {
    pub fn new(items: Vec<ExpressionItem>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[ExpressionItem] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Evaluates this expression against `env`.
    pub fn evaluate<E>(&self, env: &E) -> EvaluationResult<String>
    where
        E: Environment + ?Sized,
    {
        Evaluator::new(env).evaluate(self)
    }

    /// Returns every referenced identifier, nested ones included,
    /// in order of appearance. Duplicates are kept.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers = Vec::new();
        self.collect_identifiers(&mut identifiers);
        identifiers
    }

    fn collect_identifiers(&self, out: &mut Vec<String>) {
        for item in &self.0 {
            if let ExpressionItem::Expansion(expansion) = item {
                if let Some(identifier) = expansion.identifier() {
                    out.push(identifier.to_owned());
                }
                match expansion {
                    Expansion::EmptyValueDefault { content, .. }
                    | Expansion::UnsetValueDefault { content, .. } => {
                        content.collect_identifiers(out)
                    }
                    Expansion::Required { message, .. } => message.collect_identifiers(out),
                    _ => (),
                }
            }
        }
    }
}

impl From<Vec<ExpressionItem>> for Expression {
    fn from(items: Vec<ExpressionItem>) -> Self {
        Self(items)
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Expansion {
    /// The variable this expansion reads, if any.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Variable { identifier }
            | Self::EmptyValueDefault { identifier, .. }
            | Self::UnsetValueDefault { identifier, .. }
            | Self::Required { identifier, .. }
            | Self::Substring { identifier, .. }
            | Self::PrefixTrimShortest { identifier, .. }
            | Self::PrefixTrimLongest { identifier, .. }
            | Self::SuffixTrimShortest { identifier, .. }
            | Self::SuffixTrimLongest { identifier, .. } => Some(identifier),
            Self::Escaped { .. } => None,
        }
    }
}

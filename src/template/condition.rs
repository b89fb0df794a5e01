//! Condition expressions for `@if` and `@else-if`
//!
//! The grammar is intentionally small:
//!
//! ```text
//! condition := key | key "==" literal | key "!=" literal
//! literal   := "..." | '...' | null | bare-word
//! ```
//!
//! Parentheses and boolean connectives are not part of it, and keys are flat.

use chumsky::prelude::*;
use thiserror::Error;

use super::model::{Model, Value};

#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid condition '{input}': {reason}")]
pub struct ConditionError {
    pub input: String,
    pub reason: String,
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Matches an absent key or a null value
    Null,
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals { key: String, literal: Literal },
    NotEquals { key: String, literal: Literal },
    /// Bare key
    Truthy(String),
}

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Equal,
    NotEqual,
}

fn condition_parser<'a>() -> impl Parser<'a, &'a str, Condition, extra::Err<Rich<'a, char>>> + Clone
{
    let key = any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '-')
        .repeated()
        .at_least(1)
        .collect::<String>();

    let double_quoted = just('"')
        .ignore_then(none_of("\"").repeated().collect::<String>())
        .then_ignore(just('"'));
    let single_quoted = just('\'')
        .ignore_then(none_of("'").repeated().collect::<String>())
        .then_ignore(just('\''));
    let bare = any()
        .filter(|c: &char| !c.is_whitespace())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(|word| {
            if word.eq_ignore_ascii_case("null") {
                Literal::Null
            } else {
                Literal::Text(word)
            }
        });
    let literal = choice((
        double_quoted.map(Literal::Text),
        single_quoted.map(Literal::Text),
        bare,
    ));

    let comparison = choice((
        just("==").to(Comparison::Equal),
        just("!=").to(Comparison::NotEqual),
    ));

    let expression = key
        .padded()
        .then(comparison.then(literal.padded()).or_not())
        .map(|(key, rest)| match rest {
            None => Condition::Truthy(key),
            Some((Comparison::Equal, literal)) => Condition::Equals { key, literal },
            Some((Comparison::NotEqual, literal)) => Condition::NotEquals { key, literal },
        });

    expression.then_ignore(end())
}

impl Condition {
    pub fn parse(input: &str) -> Result<Self, ConditionError> {
        condition_parser()
            .parse(input)
            .into_result()
            .map_err(|errs| ConditionError {
                input: input.to_string(),
                reason: errs
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            })
    }

    /// Evaluate against a model; absent keys behave like null
    pub fn evaluate(&self, model: &Model) -> bool {
        match self {
            Condition::Equals { key, literal } => equals(model.get(key), literal),
            Condition::NotEquals { key, literal } => !equals(model.get(key), literal),
            Condition::Truthy(key) => match model.get(key) {
                Some(Value::Bool(b)) => *b,
                None | Some(Value::Null) => false,
                Some(value) => !value.to_string().eq_ignore_ascii_case("false"),
            },
        }
    }
}

fn equals(value: Option<&Value>, literal: &Literal) -> bool {
    match (value, literal) {
        (None | Some(Value::Null), Literal::Null) => true,
        (None | Some(Value::Null), Literal::Text(_)) => false,
        (Some(_), Literal::Null) => false,
        (Some(value), Literal::Text(text)) => value.to_string() == *text,
    }
}

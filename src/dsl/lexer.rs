//! Tokenizer for the query language.
//!
//! Grammar:
//!
//! query    = term ("," term)*
//! term     = field (operator value)?
//! field    = [A-Za-z_]+
//! value    = word (" " word)*
//! word     = [A-Za-z0-9_]+
//! operator = ">=" | "<=" | "!=" | "<>" | ":" | "=" | "<" | ">"
//!
//! Terms are read greedily from the start of the query. The first term that
//! fails to parse, or anything other than a comma after a term, ends the
//! sequence; terms already read are kept.

use std::iter::FusedIterator;

use winnow::ascii::multispace0;
use winnow::combinator::{alt, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::take_while;

use super::ast::{Operator, RawToken, Rejection};

// Manually define PResult for resilience against winnow version changes
type PResult<T> = Result<T, winnow::error::ErrMode<winnow::error::ContextError>>;

fn lex_field<'i>(input: &mut &'i str) -> PResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_').parse_next(input)
}

fn lex_word<'i>(input: &mut &'i str) -> PResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

/// Words joined by single spaces, so `gain 1 gold` needs no quoting.
fn lex_value<'i>(input: &mut &'i str) -> PResult<&'i str> {
    (lex_word, repeat::<_, _, (), _, _>(0.., (' ', lex_word)))
        .take()
        .parse_next(input)
}

fn lex_operator(input: &mut &str) -> PResult<Operator> {
    alt((
        // Multi-char operators first
        ">=".value(Operator::Ge),
        "<=".value(Operator::Le),
        "!=".value(Operator::Ne),
        "<>".value(Operator::LtGt),
        // Single-char operators
        ":".value(Operator::Colon),
        "=".value(Operator::Eq),
        "<".value(Operator::Lt),
        ">".value(Operator::Gt),
    ))
    .parse_next(input)
}

/// Lex one term. An operator without a value is left unconsumed.
fn lex_term(input: &mut &str) -> PResult<RawToken> {
    let field = lex_field.parse_next(input)?;
    let comparison = opt((lex_operator, lex_value)).parse_next(input)?;

    Ok(match comparison {
        Some((op, value)) => RawToken::term(field, op.symbol(), value),
        None => RawToken::field(field),
    })
}

/// Lazy, single-pass sequence of terms read from a query string.
#[derive(Debug)]
pub struct Terms<'a> {
    remaining: &'a str,
    started: bool,
    done: bool,
}

impl<'a> Terms<'a> {
    fn new(input: &'a str) -> Self {
        Terms {
            remaining: input,
            started: false,
            done: false,
        }
    }

    fn stop(&mut self) {
        self.done = true;
        let leftover = self.remaining.trim();
        if !leftover.is_empty() {
            tracing::debug!(
                "Query truncated: {}",
                Rejection::MalformedTerm(leftover.to_string())
            );
        }
    }
}

impl Iterator for Terms<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        if self.done {
            return None;
        }

        let checkpoint = self.remaining;
        let parsed = if self.started {
            preceded((multispace0, ',', multispace0), lex_term).parse_next(&mut self.remaining)
        } else {
            preceded(multispace0, lex_term).parse_next(&mut self.remaining)
        };

        match parsed {
            Ok(token) => {
                self.started = true;
                Some(token)
            }
            Err(_) => {
                self.remaining = checkpoint;
                self.stop();
                None
            }
        }
    }
}

impl FusedIterator for Terms<'_> {}

/// Split a query into terms. Never fails: unparseable input yields an empty
/// sequence.
pub fn tokenize(input: &str) -> Terms<'_> {
    Terms::new(input)
}

//! Splits a query into include and exclude predicate maps.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::ast::{LookupKey, Predicate, Rejection, Value};
use super::lexer::tokenize;
use super::resolver::Resolver;

/// Positive and negative predicate maps for one query.
///
/// The maps are independent: the same key may appear in both when a query
/// names it with both signs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedQuery {
    pub includes: BTreeMap<LookupKey, Value>,
    pub excludes: BTreeMap<LookupKey, Value>,
}

impl ResolvedQuery {
    /// No filters at all: callers should return every record.
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Last write wins per key.
    fn insert(&mut self, predicate: Predicate) {
        let key = predicate.key();
        let target = if predicate.negated {
            &mut self.excludes
        } else {
            &mut self.includes
        };
        target.insert(key, predicate.value);
    }
}

impl Resolver {
    /// Resolve every term of `raw`. With `allowed`, predicates on any other
    /// canonical field are dropped.
    pub fn partition(&self, raw: &str, allowed: Option<&HashSet<String>>) -> ResolvedQuery {
        let mut query = ResolvedQuery::default();

        for token in tokenize(raw) {
            let Some(predicate) = self.resolve(&token) else {
                continue;
            };

            if let Some(allowed) = allowed {
                if !allowed.contains(&predicate.field) {
                    tracing::debug!("{}", Rejection::DisallowedField(predicate.field));
                    continue;
                }
            }

            query.insert(predicate);
        }

        query
    }
}

/// Partition with the built-in synonyms and default policy.
pub fn partition(raw: &str, allowed: Option<&HashSet<String>>) -> ResolvedQuery {
    Resolver::builtin().partition(raw, allowed)
}

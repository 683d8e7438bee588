//! Turns raw terms into typed predicates.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

use super::ast::{ComparisonKind, Operator, Predicate, RawToken, Rejection, Value};
use super::synonyms::SynonymTable;

static BUILTIN: LazyLock<Resolver> = LazyLock::new(Resolver::default);

/// How `=`, `:`, `!=` and `<>` treat integer values.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ContainsPolicy {
    /// Integers cannot be "contained": match them exactly.
    #[default]
    #[serde(rename = "exact")]
    NumericExact,
    /// Substring match regardless of value type.
    #[serde(rename = "contains")]
    AlwaysContains,
}

impl FromStr for ContainsPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "exact" => Ok(ContainsPolicy::NumericExact),
            "contains" => Ok(ContainsPolicy::AlwaysContains),
            _ => Err(format!("invalid numeric_contains: {value}")),
        }
    }
}

/// Synonym table plus contains policy. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    synonyms: SynonymTable,
    policy: ContainsPolicy,
}

impl Resolver {
    pub fn new(synonyms: SynonymTable, policy: ContainsPolicy) -> Self {
        Resolver { synonyms, policy }
    }

    /// Built-in synonyms, default policy.
    pub fn builtin() -> &'static Resolver {
        &BUILTIN
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn policy(&self) -> ContainsPolicy {
        self.policy
    }

    /// Resolve a term, reporting why it was rejected.
    pub fn try_resolve(&self, token: &RawToken) -> Result<Predicate, Rejection> {
        let [field, op, raw_value] = token.parts() else {
            return Err(Rejection::Incomplete(token.parts().len()));
        };
        let op: Operator = op.parse()?;

        let field = self.synonyms.expand(field).to_string();
        let value = Value::from_raw(raw_value);
        let kind = if op.is_contains_family()
            && value.is_integer()
            && self.policy == ContainsPolicy::NumericExact
        {
            ComparisonKind::Exact
        } else {
            op.kind()
        };

        Ok(Predicate {
            field,
            kind,
            value,
            negated: op.is_negative(),
        })
    }

    /// Resolve a term; rejected terms yield nothing.
    pub fn resolve(&self, token: &RawToken) -> Option<Predicate> {
        match self.try_resolve(token) {
            Ok(predicate) => Some(predicate),
            Err(rejection) => {
                tracing::debug!("Dropped term {:?}: {}", token.parts(), rejection);
                None
            }
        }
    }
}

/// Resolve with the built-in synonyms and default policy.
pub fn resolve(token: &RawToken) -> Option<Predicate> {
    Resolver::builtin().resolve(token)
}

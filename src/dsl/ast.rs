//! Core types for the query language.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One comma-delimited term as split out by the tokenizer.
///
/// Well-formed terms are either `[field]` or `[field, operator, value]`, but
/// callers may build arbitrary part lists; the resolver rejects anything that
/// is not a proper triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    parts: Vec<String>,
}

impl RawToken {
    /// A term with no operator, e.g. `drone`.
    pub fn field(field: impl Into<String>) -> Self {
        RawToken {
            parts: vec![field.into()],
        }
    }

    /// A full `field operator value` term.
    pub fn term(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        RawToken {
            parts: vec![field.into(), operator.into(), value.into()],
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<String> {
        self.parts
    }
}

impl From<Vec<String>> for RawToken {
    fn from(parts: Vec<String>) -> Self {
        RawToken { parts }
    }
}

impl<const N: usize> From<[&str; N]> for RawToken {
    fn from(parts: [&str; N]) -> Self {
        RawToken {
            parts: parts.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Comparison operator as written in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Colon, // :
    Eq,    // =
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=
    Ne,    // !=
    LtGt,  // <>
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Colon,
        Operator::Eq,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::Ne,
        Operator::LtGt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Colon => ":",
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Ne => "!=",
            Operator::LtGt => "<>",
        }
    }

    /// Comparison kind before numeric degradation.
    pub fn kind(self) -> ComparisonKind {
        match self {
            Operator::Colon | Operator::Eq | Operator::Ne | Operator::LtGt => {
                ComparisonKind::Contains
            }
            Operator::Gt => ComparisonKind::GreaterThan,
            Operator::Ge => ComparisonKind::GreaterOrEqual,
            Operator::Lt => ComparisonKind::LessThan,
            Operator::Le => ComparisonKind::LessOrEqual,
        }
    }

    /// `!=` and `<>` route their predicate to the exclude set.
    pub fn is_negative(self) -> bool {
        matches!(self, Operator::Ne | Operator::LtGt)
    }

    pub fn is_contains_family(self) -> bool {
        self.kind() == ComparisonKind::Contains
    }
}

impl FromStr for Operator {
    type Err = Rejection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == value)
            .ok_or_else(|| Rejection::UnknownOperator(value.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How a predicate compares a record field against its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonKind {
    /// Case-insensitive substring match.
    Contains,
    /// Equality; what the contains-family degrades to for integer values.
    Exact,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ComparisonKind {
    /// Suffix appended to the field name in ORM-style lookup keys.
    pub fn lookup_suffix(self) -> &'static str {
        match self {
            ComparisonKind::Contains => "__icontains",
            ComparisonKind::Exact => "",
            ComparisonKind::GreaterThan => "__gt",
            ComparisonKind::GreaterOrEqual => "__gte",
            ComparisonKind::LessThan => "__lt",
            ComparisonKind::LessOrEqual => "__lte",
        }
    }
}

/// A typed predicate value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl Value {
    /// All-digit text becomes an integer; everything else stays text.
    ///
    /// Digit strings too large for `i64` stay text.
    pub fn from_raw(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return Value::Integer(n);
            }
        }
        Value::Text(raw.to_string())
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Composite map key: canonical field plus comparison kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupKey {
    pub field: String,
    pub kind: ComparisonKind,
}

impl LookupKey {
    pub fn new(field: impl Into<String>, kind: ComparisonKind) -> Self {
        LookupKey {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.field, self.kind.lookup_suffix())
    }
}

impl Serialize for LookupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved filter predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub kind: ComparisonKind,
    pub value: Value,
    /// Written with `!=` or `<>`.
    pub negated: bool,
}

impl Predicate {
    pub fn key(&self) -> LookupKey {
        LookupKey::new(self.field.clone(), self.kind)
    }
}

/// Why a term contributed no predicate. Never surfaced to callers as an
/// error; the offending term is dropped and the rejection logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("malformed term at '{0}'")]
    MalformedTerm(String),

    #[error("expected field, operator and value, got {0} part(s)")]
    Incomplete(usize),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("field '{0}' is not filterable")]
    DisallowedField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_kinds() {
        assert_eq!(Operator::Eq.kind(), ComparisonKind::Contains);
        assert_eq!(Operator::Colon.kind(), ComparisonKind::Contains);
        assert_eq!(Operator::Ne.kind(), ComparisonKind::Contains);
        assert_eq!(Operator::LtGt.kind(), ComparisonKind::Contains);
        assert_eq!(Operator::Gt.kind(), ComparisonKind::GreaterThan);
        assert_eq!(Operator::Ge.kind(), ComparisonKind::GreaterOrEqual);
        assert_eq!(Operator::Lt.kind(), ComparisonKind::LessThan);
        assert_eq!(Operator::Le.kind(), ComparisonKind::LessOrEqual);
    }

    #[test]
    fn test_operator_from_symbol() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>(), Ok(op));
        }
        assert_eq!(
            "invalid".parse::<Operator>(),
            Err(Rejection::UnknownOperator("invalid".into()))
        );
    }

    #[test]
    fn test_operator_families() {
        let contains: Vec<_> = Operator::ALL
            .into_iter()
            .filter(|op| op.is_contains_family())
            .collect();
        assert_eq!(
            contains,
            vec![Operator::Colon, Operator::Eq, Operator::Ne, Operator::LtGt]
        );

        let negative: Vec<_> = Operator::ALL
            .into_iter()
            .filter(|op| op.is_negative())
            .collect();
        assert_eq!(negative, vec![Operator::Ne, Operator::LtGt]);
    }

    #[test]
    fn test_value_typing() {
        assert_eq!(Value::from_raw("5"), Value::Integer(5));
        assert_eq!(Value::from_raw("007"), Value::Integer(7));
        assert_eq!(Value::from_raw("5a"), Value::Text("5a".into()));
        assert_eq!(Value::from_raw("gain 1"), Value::Text("gain 1".into()));
        assert_eq!(Value::from_raw(""), Value::Text(String::new()));
        assert_eq!(
            Value::from_raw("99999999999999999999"),
            Value::Text("99999999999999999999".into())
        );
    }

    #[test]
    fn test_lookup_key_display() {
        assert_eq!(
            LookupKey::new("gold", ComparisonKind::Contains).to_string(),
            "gold__icontains"
        );
        assert_eq!(LookupKey::new("gold", ComparisonKind::Exact).to_string(), "gold");
        assert_eq!(
            LookupKey::new("attack", ComparisonKind::GreaterOrEqual).to_string(),
            "attack__gte"
        );
    }
}

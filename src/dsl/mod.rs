//! Compact filter language for flat records.
//!
//! Syntax: a comma-separated list of independent terms.
//!   field=value             - contains (exact match for integers)
//!   field:value             - same as `=`
//!   field!=value            - exclude matches (also `<>`)
//!   field>n, field<=n, ...  - ordering comparison
//!
//! Example: `gold>3,frontline=1,a=gain XXXX,name!=head`
//!
//! Short aliases (`au`, `n`, `fl`, ...) expand to canonical field names.
//! Malformed input never fails: bad terms are dropped and the query
//! truncated, down to "no filters" for an unparseable string.

mod ast;
mod eval;
mod lexer;
mod partition;
mod resolver;
mod synonyms;

pub use ast::*;
pub use eval::{Record, evaluate_predicate, evaluate_query};
pub use lexer::{Terms, tokenize};
pub use partition::{ResolvedQuery, partition};
pub use resolver::{ContainsPolicy, Resolver, resolve};
pub use synonyms::{BUILTIN_SYNONYMS, SynonymError, SynonymTable};

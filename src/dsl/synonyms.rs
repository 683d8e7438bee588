//! Field-name aliases.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Short aliases accepted in place of canonical field names.
pub const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    ("n", "name"),
    ("au", "gold"),
    ("g", "green"),
    ("b", "blue"),
    ("r", "red"),
    ("e", "energy"),
    ("x", "attack"),
    ("h", "health"),
    ("su", "supply"),
    ("fl", "frontline"),
    ("f", "fragile"),
    ("bl", "blocker"),
    ("p", "prompt"),
    ("s", "stamina"),
    ("l", "lifespan"),
    ("bt", "build_time"),
    ("et", "exhaust_turn"),
    ("ea", "exhaust_ability"),
    ("pos", "position"),
    ("a", "abilities"),
];

static BUILTIN: LazyLock<SynonymTable> = LazyLock::new(|| SynonymTable {
    aliases: BUILTIN_SYNONYMS
        .iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect(),
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynonymError {
    #[error("alias '{alias}' maps to '{canonical}', which is itself an alias")]
    Chained { alias: String, canonical: String },

    #[error("alias '{0}' has an empty name or target")]
    Empty(String),
}

/// Alias to canonical field name. Canonical names are never aliases
/// themselves, so expansion is a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    aliases: HashMap<String, String>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        SynonymTable::builtin().clone()
    }
}

impl SynonymTable {
    pub fn new<I, K, V>(pairs: I) -> Result<Self, SynonymError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let aliases = pairs
            .into_iter()
            .map(|(alias, canonical)| (alias.into(), canonical.into()))
            .collect();
        let table = SynonymTable { aliases };
        table.validate()?;
        Ok(table)
    }

    /// The built-in alias table, initialized once.
    pub fn builtin() -> &'static SynonymTable {
        &BUILTIN
    }

    /// Copy of this table with `overrides` layered on top.
    pub fn merged<'a, I>(&self, overrides: I) -> Result<Self, SynonymError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut aliases = self.aliases.clone();
        aliases.extend(
            overrides
                .into_iter()
                .map(|(alias, canonical)| (alias.clone(), canonical.clone())),
        );
        let table = SynonymTable { aliases };
        table.validate()?;
        Ok(table)
    }

    /// Canonical name for `field`, or `field` itself. Exact, case-sensitive.
    pub fn expand<'a>(&'a self, field: &'a str) -> &'a str {
        self.aliases.get(field).map(String::as_str).unwrap_or(field)
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn validate(&self) -> Result<(), SynonymError> {
        for (alias, canonical) in &self.aliases {
            if alias.is_empty() || canonical.is_empty() {
                return Err(SynonymError::Empty(alias.clone()));
            }
            if self.aliases.contains_key(canonical) {
                return Err(SynonymError::Chained {
                    alias: alias.clone(),
                    canonical: canonical.clone(),
                });
            }
        }
        Ok(())
    }
}

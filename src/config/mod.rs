use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::dsl::{ContainsPolicy, Resolver, SynonymTable};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QueryConfig {
    /// Extra aliases, layered over the built-in table.
    #[serde(default)]
    pub synonyms: HashMap<String, String>,
    /// Filterable fields. Defaults to every field seen in the records.
    #[serde(default)]
    pub allowed_fields: Option<Vec<String>>,
    #[serde(default = "default_order_by")]
    pub order_by: String,
    #[serde(default)]
    pub numeric_contains: ContainsPolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            synonyms: HashMap::new(),
            allowed_fields: None,
            order_by: default_order_by(),
            numeric_contains: ContainsPolicy::default(),
        }
    }
}

fn default_order_by() -> String {
    "name".to_string()
}

impl QueryConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()
            .with_context(|| format!("Config: Failed to read {:?}", path))?;
        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("Config: Invalid query configuration in {:?}", path))?;
        // Surface bad aliases at load time rather than on first query
        config.resolver()?;
        Ok(config)
    }

    pub fn resolver(&self) -> anyhow::Result<Resolver> {
        let synonyms = SynonymTable::builtin()
            .merged(&self.synonyms)
            .context("Config: Invalid synonyms")?;
        Ok(Resolver::new(synonyms, self.numeric_contains))
    }

    pub fn allowed_set(&self) -> Option<HashSet<String>> {
        self.allowed_fields
            .as_ref()
            .map(|fields| fields.iter().cloned().collect())
    }
}

//! In-memory record store driven by resolved queries.
//!
//! Records are flat JSON objects. Listing applies the include predicates as a
//! filter pass and the exclude predicates as a reject pass, then orders the
//! result by a single default key.

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::config::QueryConfig;
use crate::dsl::{Record, ResolvedQuery, Resolver, evaluate_query};

#[derive(Debug)]
pub struct RecordStore {
    records: Vec<Record>,
    allowed: HashSet<String>,
    resolver: Resolver,
    order_by: String,
}

impl RecordStore {
    /// Load records from `.json` (array), `.jsonl`/`.ndjson` or `.yaml`/`.yml`.
    pub fn load(path: &Path, config: &QueryConfig) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Store: Failed to read {:?}", path))?;
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let values = match ext.as_str() {
            "json" => serde_json::from_str::<Vec<JsonValue>>(&contents)
                .with_context(|| format!("Store: Invalid JSON array in {:?}", path))?,
            "jsonl" | "ndjson" => parse_json_lines(&contents)
                .with_context(|| format!("Store: Invalid JSON lines in {:?}", path))?,
            "yaml" | "yml" => serde_yaml::from_str::<Vec<JsonValue>>(&contents)
                .with_context(|| format!("Store: Invalid YAML sequence in {:?}", path))?,
            _ => anyhow::bail!(
                "Store: Unsupported records format {:?}; use .json, .jsonl or .yaml",
                path
            ),
        };

        let records = into_records(values)?;
        tracing::info!("Store: loaded {} records from {:?}", records.len(), path);
        Self::from_records(records, config)
    }

    pub fn from_records(records: Vec<Record>, config: &QueryConfig) -> Result<Self> {
        let allowed = config
            .allowed_set()
            .unwrap_or_else(|| records.iter().flat_map(|r| r.keys().cloned()).collect());

        Ok(RecordStore {
            records,
            allowed,
            resolver: config.resolver()?,
            order_by: config.order_by.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Filterable field names, sorted.
    pub fn fields(&self) -> Vec<&str> {
        let sorted: BTreeSet<&str> = self.allowed.iter().map(String::as_str).collect();
        sorted.into_iter().collect()
    }

    /// Resolve query text against this store's fields and aliases.
    pub fn resolve(&self, raw: &str) -> ResolvedQuery {
        self.resolver.partition(raw, Some(&self.allowed))
    }

    /// Records matching `query`, ordered by the default key. Absent or
    /// empty query text lists everything.
    pub fn list(&self, query: Option<&str>) -> Vec<&Record> {
        let resolved = query.map(|raw| self.resolve(raw)).unwrap_or_default();
        if resolved.is_empty() {
            tracing::debug!("Store: no filters applied");
        } else {
            tracing::debug!(
                "Store: {} include(s), {} exclude(s)",
                resolved.includes.len(),
                resolved.excludes.len()
            );
        }

        let mut matched: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| evaluate_query(&resolved, record))
            .collect();
        matched.sort_by(|a, b| compare_field(a.get(&self.order_by), b.get(&self.order_by)));
        matched
    }
}

fn parse_json_lines(contents: &str) -> Result<Vec<JsonValue>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))
        })
        .collect()
}

fn into_records(values: Vec<JsonValue>) -> Result<Vec<Record>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            JsonValue::Object(map) => Ok(map),
            other => Err(anyhow::anyhow!(
                "Store: record {} is not an object: {}",
                i + 1,
                other
            )),
        })
        .collect()
}

/// Ascending; missing and null sort last, mixed types by kind.
fn compare_field(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (JsonValue::Number(x), JsonValue::Number(y)) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
            (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
            (a, b) => kind_rank(a).cmp(&kind_rank(b)),
        },
    }
}

fn present(value: Option<&JsonValue>) -> Option<&JsonValue> {
    value.filter(|v| !v.is_null())
}

fn kind_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Bool(_) => 0,
        JsonValue::Number(_) => 1,
        JsonValue::String(_) => 2,
        JsonValue::Array(_) => 3,
        JsonValue::Object(_) => 4,
        JsonValue::Null => 5,
    }
}

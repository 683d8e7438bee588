use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use unitq::config::QueryConfig;
use unitq::dsl::{ContainsPolicy, Record, ResolvedQuery};
use unitq::store::RecordStore;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Records file (.json, .jsonl, .yaml)
    #[arg(short, long)]
    pub records: PathBuf,

    /// Query configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Filter query, e.g. "gold>3,fl=1,name!=head"
    #[arg(short, long)]
    pub query: Option<String>,

    /// How `=`, `:`, `!=` and `<>` match integers (exact, contains)
    #[arg(long)]
    pub numeric_contains: Option<ContainsPolicy>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print the resolved include/exclude maps instead of records
    #[arg(long)]
    pub explain: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum OutputFormat {
    #[value(name = "json")]
    Json,
    #[value(name = "jsonl")]
    Jsonl,
}

pub fn load_config(cli: &Cli) -> Result<QueryConfig> {
    let mut config = match &cli.config {
        Some(path) => QueryConfig::load(path)?,
        None => QueryConfig::default(),
    };
    if let Some(policy) = cli.numeric_contains {
        config.numeric_contains = policy;
    }
    Ok(config)
}

pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = load_config(cli)?;
    let store = RecordStore::load(&cli.records, &config)?;
    tracing::info!("Filterable fields: {}", store.fields().join(", "));

    let query = cli.query.as_deref().filter(|q| !q.trim().is_empty());

    if cli.explain {
        let resolved = query.map(|raw| store.resolve(raw)).unwrap_or_default();
        return write_explain(out, &resolved);
    }

    let records = store.list(query);
    tracing::info!("Matched {} of {} records", records.len(), store.len());
    write_records(out, &records, cli.format)
}

fn write_explain(out: &mut impl Write, resolved: &ResolvedQuery) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, resolved)
        .context("CLI: Failed to write resolved query")?;
    writeln!(out)?;
    Ok(())
}

fn write_records(out: &mut impl Write, records: &[&Record], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)
                .context("CLI: Failed to write records")?;
            writeln!(out)?;
        }
        OutputFormat::Jsonl => {
            for record in records {
                serde_json::to_writer(&mut *out, record)
                    .context("CLI: Failed to write records")?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

//! Record file loading.
//!
//! Reads the document-store export: either one JSON array of records or one
//! JSON record per line.

use super::{InMemoryRepository, LoadedRecord};
use crate::error::{ErrorContext, Result, SedsError};
use crate::model::RawRecord;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout of a record file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DataFileFormat {
    /// Detect from the first non-whitespace character
    #[default]
    Auto,
    /// A single JSON array of records
    Json,
    /// One JSON record per line
    #[value(alias = "ndjson")]
    JsonLines,
}

impl std::fmt::Display for DataFileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Json => write!(f, "json"),
            Self::JsonLines => write!(f, "json-lines"),
        }
    }
}

/// Load a record file into an in-memory repository.
pub fn load_records(path: &Path, format: DataFileFormat) -> Result<InMemoryRepository> {
    tracing::info!("Loading records from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| SedsError::io(path, e))?;
    let repo = parse_records_str(&content, format)
        .with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(
        "Loaded {} records for {} states",
        repo.record_count(),
        repo.state_count()
    );
    let rejected: Vec<&str> = repo.rejected_states().collect();
    if !rejected.is_empty() {
        tracing::warn!("Invalid records withheld for: {}", rejected.join(", "));
    }
    Ok(repo)
}

/// Parse record file content.
///
/// A record that fails validation withholds its state (see
/// [`InMemoryRepository`]) without affecting other states. Malformed JSON and
/// invalid records naming no state fail the whole parse.
pub fn parse_records_str(content: &str, format: DataFileFormat) -> Result<InMemoryRepository> {
    let format = match format {
        DataFileFormat::Auto => detect_format(content),
        other => other,
    };

    let raw: Vec<RawRecord> = match format {
        DataFileFormat::Json | DataFileFormat::Auto => serde_json::from_str(content)?,
        DataFileFormat::JsonLines => content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<RawRecord>(line).with_context(|| format!("line {}", i + 1))
            })
            .collect::<Result<_>>()?,
    };

    let mut loaded: Vec<LoadedRecord> = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for (index, record) in raw.into_iter().enumerate() {
        let state = record.state.clone().filter(|s| !s.trim().is_empty());
        let converted = record.into_series_record().with_context(|| match &state {
            Some(state) => format!("record {index} ({state})"),
            None => format!("record {index}"),
        });
        match (converted, state) {
            (Ok(Some(record)), _) => loaded.push(LoadedRecord::Valid(record)),
            (Ok(None), _) => skipped += 1,
            (Err(error), Some(state)) => {
                tracing::warn!("Rejecting {}: {}", state, error.describe());
                loaded.push(LoadedRecord::Rejected { state, error });
            }
            (Err(error), None) => return Err(error),
        }
    }
    if skipped > 0 {
        tracing::debug!("Filtered out {} unclassifiable records", skipped);
    }

    Ok(InMemoryRepository::from_loaded(loaded))
}

fn detect_format(content: &str) -> DataFileFormat {
    if content.trim_start().starts_with('[') {
        DataFileFormat::Json
    } else {
        DataFileFormat::JsonLines
    }
}

//! In-memory repository.

use super::EnergyRepository;
use crate::error::{Result, SedsError, StoreErrorKind};
use crate::model::SeriesRecord;
use indexmap::IndexMap;
use xxhash_rust::xxh3::xxh3_64;

/// One entry of a loaded record file.
#[derive(Debug)]
pub enum LoadedRecord {
    /// A record that passed boundary validation
    Valid(SeriesRecord),
    /// A record of `state` that failed validation
    Rejected { state: String, error: SedsError },
}

/// First validation failure recorded for a state.
#[derive(Debug, Clone)]
struct Rejection {
    context: String,
    kind: StoreErrorKind,
}

impl Rejection {
    fn from_error(error: SedsError) -> Self {
        match error {
            SedsError::Store { context, source } => Self {
                context,
                kind: source,
            },
            other => Self {
                context: "record validation".to_string(),
                kind: StoreErrorKind::InvalidSeries(other.describe()),
            },
        }
    }

    fn to_error(&self) -> SedsError {
        SedsError::store(self.context.clone(), self.kind.clone())
    }
}

#[derive(Debug, Clone, Default)]
struct StateRecords {
    records: Vec<SeriesRecord>,
    rejection: Option<Rejection>,
}

/// Repository holding every record in memory, grouped by state.
///
/// A state with an invalid record keeps its place in [`states`] but its
/// records are withheld: [`records_for_state`] returns the validation
/// error, so the pipeline excludes that state alone.
///
/// [`states`]: EnergyRepository::states
/// [`records_for_state`]: EnergyRepository::records_for_state
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: IndexMap<String, StateRecords>,
    content_hash: u64,
}

impl InMemoryRepository {
    /// Group records by state (first-seen order) and hash the snapshot.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = SeriesRecord>) -> Self {
        Self::from_loaded(records.into_iter().map(LoadedRecord::Valid))
    }

    /// Group loaded entries by state, keeping each state's first rejection.
    #[must_use]
    pub fn from_loaded(entries: impl IntoIterator<Item = LoadedRecord>) -> Self {
        let mut grouped: IndexMap<String, StateRecords> = IndexMap::new();
        for entry in entries {
            match entry {
                LoadedRecord::Valid(record) => grouped
                    .entry(record.state().to_string())
                    .or_default()
                    .records
                    .push(record),
                LoadedRecord::Rejected { state, error } => {
                    let slot = grouped.entry(state).or_default();
                    if slot.rejection.is_none() {
                        slot.rejection = Some(Rejection::from_error(error));
                    }
                }
            }
        }
        let content_hash = calculate_content_hash(&grouped);
        Self {
            records: grouped,
            content_hash,
        }
    }

    /// Total number of valid records across all states.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.values().map(|s| s.records.len()).sum()
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.records.len()
    }

    /// Names of states withheld because of an invalid record.
    pub fn rejected_states(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|(_, s)| s.rejection.is_some())
            .map(|(state, _)| state.as_str())
    }
}

impl EnergyRepository for InMemoryRepository {
    fn states(&self) -> Result<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }

    fn records_for_state(&self, state: &str) -> Result<Vec<SeriesRecord>> {
        let entry = self.records.get(state).ok_or_else(|| {
            SedsError::store(
                "records_for_state",
                StoreErrorKind::UnknownState(state.to_string()),
            )
        })?;
        match &entry.rejection {
            Some(rejection) => Err(rejection.to_error()),
            None => Ok(entry.records.clone()),
        }
    }

    fn snapshot_hash(&self) -> Result<u64> {
        Ok(self.content_hash)
    }
}

/// Hash every record's canonical JSON, sorted so record order is irrelevant.
///
/// Rejections are hashed by state and message.
fn calculate_content_hash(records: &IndexMap<String, StateRecords>) -> u64 {
    let mut encoded: Vec<Vec<u8>> = records
        .values()
        .flat_map(|s| &s.records)
        .filter_map(|record| serde_json::to_vec(record).ok())
        .collect();
    encoded.extend(records.iter().filter_map(|(state, s)| {
        s.rejection
            .as_ref()
            .map(|r| format!("rejected:{state}:{}:{}", r.context, r.kind).into_bytes())
    }));
    encoded.sort_unstable();

    let mut hasher_input = Vec::new();
    for bytes in encoded {
        hasher_input.extend((bytes.len() as u64).to_le_bytes());
        hasher_input.extend(bytes);
    }
    xxh3_64(&hasher_input)
}

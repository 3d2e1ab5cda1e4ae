//! Energy record store adapter.
//!
//! The pipeline reads records through the [`EnergyRepository`] trait. The
//! caller constructs a repository once and injects it; nothing here holds a
//! global connection.
//!
//! ```no_run
//! use seds_index::store::{load_records, DataFileFormat, EnergyRepository};
//! use std::path::Path;
//!
//! let repo = load_records(Path::new("seds.json"), DataFileFormat::Auto)?;
//! for state in repo.states()? {
//!     println!("{state}: {} series", repo.records_for_state(&state)?.len());
//! }
//! # Ok::<(), seds_index::SedsError>(())
//! ```

mod file;
mod memory;

pub use file::{load_records, parse_records_str, DataFileFormat};
pub use memory::{InMemoryRepository, LoadedRecord};

use crate::error::Result;
use crate::model::SeriesRecord;

/// Read-only access to per-state series records.
pub trait EnergyRepository: Send + Sync {
    /// Full names of every state with records, in a stable order.
    fn states(&self) -> Result<Vec<String>>;

    /// All validated records for one state.
    fn records_for_state(&self, state: &str) -> Result<Vec<SeriesRecord>>;

    /// Content hash of the whole dataset.
    ///
    /// Equal datasets hash equal regardless of record order; any change to a
    /// record changes the hash.
    fn snapshot_hash(&self) -> Result<u64>;
}

impl<R: EnergyRepository + ?Sized> EnergyRepository for &R {
    fn states(&self) -> Result<Vec<String>> {
        (**self).states()
    }

    fn records_for_state(&self, state: &str) -> Result<Vec<SeriesRecord>> {
        (**self).records_for_state(state)
    }

    fn snapshot_hash(&self) -> Result<u64> {
        (**self).snapshot_hash()
    }
}

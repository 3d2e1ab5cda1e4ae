//! Data model for state energy series.
//!
//! Raw store documents are validated into typed [`SeriesRecord`]s at the
//! repository boundary. The assembler turns those into [`SectorTable`]s
//! aligned on the fixed 1960–2017 year index, grouped per state in a
//! [`StateProfile`].

mod record;
mod series;
mod states;
mod table;
mod taxonomy;

pub use record::*;
pub use series::*;
pub use states::*;
pub use table::*;
pub use taxonomy::*;

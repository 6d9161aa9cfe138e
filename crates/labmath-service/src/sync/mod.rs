//! Mirror-then-record bookkeeping shared by every record kind.

pub mod sweep;
pub mod tracker;

pub use sweep::{SweepReport, sync_all};
pub use tracker::{push_and_record, record_outcome};

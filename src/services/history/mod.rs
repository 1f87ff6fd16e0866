//! History aggregation: the bounded, ordered list of visible input rows.
//!
//! `HistoryAggregator` merges repeats and simple-key runs into existing rows
//! and inserts everything else at the newest end; `sweeper` ages rows out.
//! Nothing here locks or logs above debug level; `CaptureSession` owns the
//! aggregator behind its mutex.

mod aggregator;
mod entry;
mod store;
mod sweeper;

pub use aggregator::{is_groupable, AddOutcome, HistoryAggregator, HistorySettings, REPEAT_WINDOW};
pub use entry::{split_repeat_suffix, HistoryEntry};
pub use store::{Direction, History};
pub use sweeper::sweep;

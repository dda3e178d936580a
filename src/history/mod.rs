// History module
// Public interface for the append-only request/response log

mod log;

pub use log::{HistoryEntry, RequestLog};

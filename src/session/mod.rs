//! Interactive entry of records and absence periods.
//!
//! The entry dialog is an explicit state machine over typed inputs; the date
//! parser turns free-form text into the dates it consumes.

mod date_parser;
mod entry;

pub use date_parser::{parse_flexible_date, resolve_date};
pub use entry::{
    EntryKind, EntrySession, MIN_SHIFT_HOURS, PendingRecord, SessionEvent, SessionInput,
    SessionState, validate_shift_hours,
};

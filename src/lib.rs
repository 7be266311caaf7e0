//! Shift ledger for employees on a rotating four-crew schedule.
//!
//! Each crew follows the same four-day cycle (day shift, night shift, rest
//! day, day off) offset by one day per crew from a fixed epoch. On top of
//! that schedule the crate records what each employee actually did per
//! day, books vacation and sick periods, reconciles a month of records
//! against the plan and produces an approximate monthly pay estimate.
//!
//! The [`api`] module serves all of this over HTTP; [`store`] keeps the
//! data in SQLite.

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;

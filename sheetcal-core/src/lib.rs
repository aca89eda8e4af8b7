//! Core types for sheetcal.
//!
//! This crate turns spreadsheet rows into calendar requests and reconciles
//! the results back into the rows:
//! - `row` decodes the positional cells of a row
//! - `event` builds the provider-neutral event request
//! - `sync` runs one pass over a block of rows
//! - `calendar`, `store` and `notify` are the seams to the outside world

pub mod action;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod notify;
pub mod row;
pub mod store;
pub mod sync;

pub use action::Action;
pub use error::{SyncError, SyncResult};
pub use row::{Row, RowBlock, RowResult};
pub use sync::{RowOutcome, SyncReport, Synchronizer};

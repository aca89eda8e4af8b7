//! Positional row model.
//!
//! A row is twelve cells wide. Cells arrive untyped (as JSON values) from
//! the store, and trailing empty cells may be missing entirely.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde_json::Value;

use crate::action::ActionCell;
use crate::error::{SyncError, SyncResult};

/// Number of columns a row spans.
pub const COLUMN_COUNT: usize = 12;

/// 0-based column positions.
pub mod column {
    pub const ACTION: usize = 0;
    pub const TITLE: usize = 4;
    pub const DESCRIPTION: usize = 5;
    pub const ATTENDEES: usize = 6;
    pub const NOTIFY: usize = 7;
    pub const STATUS: usize = 8;
    pub const EVENT_ID: usize = 9;
    pub const START: usize = 10;
    pub const END: usize = 11;
}

/// Text layouts accepted for timestamp cells.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A contiguous block of rows, addressed by 1-based row numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    pub first_row: u32,
    pub row_count: u32,
}

impl RowBlock {
    pub fn new(first_row: u32, last_row: u32) -> SyncResult<Self> {
        if first_row == 0 {
            return Err(SyncError::Config("row numbers start at 1".into()));
        }
        if last_row < first_row {
            return Err(SyncError::Config(format!(
                "last row {last_row} is before first row {first_row}"
            )));
        }
        Ok(RowBlock {
            first_row,
            row_count: last_row - first_row + 1,
        })
    }

    pub fn last_row(&self) -> u32 {
        // row_count >= 1, so this never exceeds the last_row given to new()
        self.first_row + (self.row_count - 1)
    }

    pub fn row_numbers(&self) -> std::ops::RangeInclusive<u32> {
        self.first_row..=self.last_row()
    }
}

/// The (status, event id) pair written back to a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult {
    pub status: String,
    pub event_id: String,
}

impl RowResult {
    pub fn new(status: impl Into<String>, event_id: impl Into<String>) -> Self {
        RowResult {
            status: status.into(),
            event_id: event_id.into(),
        }
    }

    pub fn into_values(self) -> [String; 2] {
        [self.status, self.event_id]
    }
}

/// One decoded row.
///
/// Timestamps stay raw until an action needs them, so a Delete row with
/// garbage in its time columns still goes through.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based row number in the sheet
    pub number: u32,
    pub action: ActionCell,
    pub title: String,
    pub description: String,
    /// Newline-delimited attendee emails
    pub attendee_emails: String,
    pub notify: bool,
    pub prior_status: String,
    pub event_id: String,
    pub start_time: Value,
    pub end_time: Value,
}

impl Row {
    pub fn from_cells(number: u32, cells: &[Value]) -> Self {
        let cell = |index: usize| cells.get(index).unwrap_or(&Value::Null);

        Row {
            number,
            action: ActionCell::parse(&cell_text(cell(column::ACTION))),
            title: cell_text(cell(column::TITLE)),
            description: cell_text(cell(column::DESCRIPTION)),
            attendee_emails: cell_text(cell(column::ATTENDEES)),
            notify: cell_flag(cell(column::NOTIFY)),
            prior_status: cell_text(cell(column::STATUS)),
            event_id: cell_text(cell(column::EVENT_ID)),
            start_time: cell(column::START).clone(),
            end_time: cell(column::END).clone(),
        }
    }

    pub fn has_event_id(&self) -> bool {
        !self.event_id.is_empty()
    }

    /// The stored pair, echoed back when an action is refused or fails.
    pub fn prior_result(&self) -> RowResult {
        RowResult::new(self.prior_status.clone(), self.event_id.clone())
    }

    pub fn start(&self) -> SyncResult<NaiveDateTime> {
        parse_timestamp(&self.start_time)
            .ok_or_else(|| SyncError::invalid_row(self.number, invalid_time("start", &self.start_time)))
    }

    pub fn end(&self) -> SyncResult<NaiveDateTime> {
        parse_timestamp(&self.end_time)
            .ok_or_else(|| SyncError::invalid_row(self.number, invalid_time("end", &self.end_time)))
    }
}

fn invalid_time(which: &str, value: &Value) -> String {
    format!("invalid {which} time: {value}")
}

/// Render a cell as text. Empty and missing cells become "".
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// A checkbox cell, or the text "true" in any case.
pub fn cell_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Parse a timestamp cell: a spreadsheet serial number or ISO-style text.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_serial),
        Value::String(s) => {
            let s = s.trim();
            TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        }
        _ => None,
    }
}

/// Spreadsheet serial dates count days from 1899-12-30, with the time of
/// day as the fraction.
fn from_serial(days: f64) -> Option<NaiveDateTime> {
    if !days.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (days * 86_400.0).round();
    if seconds.abs() > i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(TimeDelta::try_seconds(seconds as i64)?)
}

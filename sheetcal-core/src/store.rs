//! The tabular store collaborator.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{SyncError, SyncResult};
use crate::row::{COLUMN_COUNT, RowBlock, RowResult, column};

/// A result to be written to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWrite {
    pub row: u32,
    pub result: RowResult,
}

/// Where rows come from and where results go.
pub trait RowStore {
    /// Read the block's rows in order. Trailing empty rows may be omitted.
    fn read_rows(&self, block: RowBlock) -> impl Future<Output = SyncResult<Vec<Vec<Value>>>>;

    /// Write each (status, event id) pair into its row's status columns.
    fn write_results(&self, writes: &[RowWrite]) -> impl Future<Output = SyncResult<()>>;

    /// Clear the action column over the whole block.
    fn clear_actions(&self, block: RowBlock) -> impl Future<Output = SyncResult<()>>;
}

/// A sheet held in memory. Rows are keyed by their 1-based number.
#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: Mutex<BTreeMap<u32, Vec<Value>>>,
    write_calls: Mutex<usize>,
    clear_calls: Mutex<usize>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(self, number: u32, cells: Vec<Value>) -> Self {
        self.lock_rows().insert(number, cells);
        self
    }

    /// A copy of the row, padded to full width.
    pub fn row(&self, number: u32) -> Vec<Value> {
        let mut cells = self.lock_rows().get(&number).cloned().unwrap_or_default();
        cells.resize(COLUMN_COUNT, Value::Null);
        cells
    }

    pub fn cell(&self, number: u32, column: usize) -> Value {
        self.row(number).swap_remove(column)
    }

    /// Number of `write_results` calls that wrote at least one row.
    pub fn write_calls(&self) -> usize {
        *self.write_calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn clear_calls(&self) -> usize {
        *self.clear_calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, BTreeMap<u32, Vec<Value>>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RowStore for MemorySheet {
    async fn read_rows(&self, block: RowBlock) -> SyncResult<Vec<Vec<Value>>> {
        let rows = self.lock_rows();
        let mut block_rows: Vec<Vec<Value>> = block
            .row_numbers()
            .map(|n| rows.get(&n).cloned().unwrap_or_default())
            .collect();

        // Mirror the Sheets API, which drops trailing empty rows.
        while block_rows.last().is_some_and(|r| r.is_empty()) {
            block_rows.pop();
        }
        Ok(block_rows)
    }

    async fn write_results(&self, writes: &[RowWrite]) -> SyncResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut rows = self.lock_rows();
        for write in writes {
            if write.row == 0 {
                return Err(SyncError::Sheet("row numbers start at 1".into()));
            }
            let cells = rows.entry(write.row).or_default();
            if cells.len() < COLUMN_COUNT {
                cells.resize(COLUMN_COUNT, Value::Null);
            }
            let [status, event_id] = write.result.clone().into_values();
            cells[column::STATUS] = Value::String(status);
            cells[column::EVENT_ID] = Value::String(event_id);
        }
        *self.write_calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    async fn clear_actions(&self, block: RowBlock) -> SyncResult<()> {
        let mut rows = self.lock_rows();
        for number in block.row_numbers() {
            if let Some(cell) = rows.get_mut(&number).and_then(|r| r.get_mut(column::ACTION)) {
                *cell = Value::Null;
            }
        }
        *self.clear_calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

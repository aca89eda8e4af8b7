//! One sync pass over a block of rows.
//!
//! Rows are handled strictly in order. Results are collected in memory and
//! written back in one go once every row has been processed, after which the
//! action column of the whole block is cleared.
//!
//! Update and Delete failures are recovered: the user is alerted and the row
//! keeps its stored status and id. A failed Add aborts the pass. Results of
//! the rows before it are still written back so their new event ids are not
//! lost, but nothing is cleared.

use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::action::{Action, ActionCell};
use crate::calendar::CalendarApi;
use crate::error::{SyncError, SyncResult};
use crate::event::EventRequest;
use crate::notify::{Alert, Notifier};
use crate::row::{Row, RowBlock, RowResult};
use crate::store::{RowStore, RowWrite};

/// Settings fixed for the lifetime of a synchronizer.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub calendar_id: String,
    pub time_zone: Tz,
}

/// What happened to a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Empty action cell
    Skipped,
    /// Action cell held something other than Add, Update or Delete
    Unrecognized(String),
    /// The calendar accepted the action
    Applied { action: Action, result: RowResult },
    /// The action was refused or failed; the stored values are kept
    Kept { action: Action, result: RowResult },
}

impl RowOutcome {
    /// The pair to write back, if any.
    pub fn result(&self) -> Option<&RowResult> {
        match self {
            RowOutcome::Applied { result, .. } | RowOutcome::Kept { result, .. } => Some(result),
            RowOutcome::Skipped | RowOutcome::Unrecognized(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub row: u32,
    pub outcome: RowOutcome,
}

/// Per-row outcomes of a pass, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows: Vec<RowReport>,
}

impl SyncReport {
    fn record(&mut self, row: u32, outcome: RowOutcome) {
        self.rows.push(RowReport { row, outcome });
    }

    pub fn writes(&self) -> Vec<RowWrite> {
        self.rows
            .iter()
            .filter_map(|r| {
                r.outcome.result().map(|result| RowWrite {
                    row: r.row,
                    result: result.clone(),
                })
            })
            .collect()
    }

    fn count_applied(&self, action: Action) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Applied { action: a, .. } if a == action))
            .count()
    }

    pub fn added(&self) -> usize {
        self.count_applied(Action::Add)
    }

    pub fn updated(&self) -> usize {
        self.count_applied(Action::Update)
    }

    pub fn deleted(&self) -> usize {
        self.count_applied(Action::Delete)
    }

    pub fn kept(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Kept { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.outcome == RowOutcome::Skipped)
            .count()
    }

    pub fn unrecognized(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Unrecognized(_)))
            .count()
    }
}

/// Applies row actions against a calendar.
pub struct Synchronizer<C, N> {
    calendar: C,
    notifier: N,
    settings: SyncSettings,
}

impl<C: CalendarApi, N: Notifier> Synchronizer<C, N> {
    pub fn new(calendar: C, notifier: N, settings: SyncSettings) -> Self {
        Synchronizer {
            calendar,
            notifier,
            settings,
        }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run one pass over `block`.
    pub async fn sync<S: RowStore>(&self, store: &S, block: RowBlock) -> SyncResult<SyncReport> {
        let rows = store.read_rows(block).await?;
        info!(
            first_row = block.first_row,
            last_row = block.last_row(),
            read = rows.len(),
            "syncing rows"
        );

        let mut report = SyncReport::default();

        for (number, cells) in block.row_numbers().zip(rows.iter()) {
            let row = Row::from_cells(number, cells);

            match self.process(&row).await {
                Ok(outcome) => report.record(row.number, outcome),
                Err(err) => {
                    let writes = report.writes();
                    warn!(
                        row = row.number,
                        flushed = writes.len(),
                        "aborting sync: {err}"
                    );
                    if let Err(flush) = store.write_results(&writes).await {
                        return Err(SyncError::AbortedUnflushed {
                            cause: Box::new(err),
                            flush: Box::new(flush),
                        });
                    }
                    return Err(err);
                }
            }
        }

        store.write_results(&report.writes()).await?;
        store.clear_actions(block).await?;

        info!(
            added = report.added(),
            updated = report.updated(),
            deleted = report.deleted(),
            kept = report.kept(),
            "sync finished"
        );
        Ok(report)
    }

    /// Decide and apply the action of a single row.
    pub async fn process(&self, row: &Row) -> SyncResult<RowOutcome> {
        match &row.action {
            ActionCell::Empty => Ok(RowOutcome::Skipped),
            ActionCell::Unrecognized(tag) => {
                warn!(row = row.number, tag = %tag, "unrecognized action, row left as is");
                Ok(RowOutcome::Unrecognized(tag.clone()))
            }
            ActionCell::Known(action) => {
                debug!(row = row.number, %action, event_id = %row.event_id, "applying");
                match action {
                    Action::Add => self.add(row).await,
                    Action::Update => self.update(row).await,
                    Action::Delete => self.delete(row).await,
                }
            }
        }
    }

    async fn add(&self, row: &Row) -> SyncResult<RowOutcome> {
        if row.has_event_id() {
            warn!(row = row.number, event_id = %row.event_id, "event already exists");
            self.notifier.alert(&Alert::DuplicateCreate {
                row: row.number,
                event_id: row.event_id.clone(),
            });
            return Ok(RowOutcome::Kept {
                action: Action::Add,
                result: row.prior_result(),
            });
        }

        let request = EventRequest::for_create(row, self.settings.time_zone)?;
        let event_id = self
            .calendar
            .create_event(&self.settings.calendar_id, &request)
            .await
            .map_err(|source| SyncError::CreateFailed {
                row: row.number,
                source,
            })?;

        Ok(RowOutcome::Applied {
            action: Action::Add,
            result: RowResult::new(Action::Add.status_label(), event_id),
        })
    }

    async fn update(&self, row: &Row) -> SyncResult<RowOutcome> {
        let request = EventRequest::for_update(row, self.settings.time_zone)?;

        match self
            .calendar
            .update_event(&self.settings.calendar_id, &row.event_id, &request)
            .await
        {
            Ok(event_id) => Ok(RowOutcome::Applied {
                action: Action::Update,
                result: RowResult::new(Action::Update.status_label(), event_id),
            }),
            Err(err) => {
                warn!(row = row.number, event_id = %row.event_id, "update failed: {err}");
                self.notifier.alert(&Alert::UpdateFailed {
                    row: row.number,
                    event_id: row.event_id.clone(),
                    reason: err.to_string(),
                });
                Ok(RowOutcome::Kept {
                    action: Action::Update,
                    result: row.prior_result(),
                })
            }
        }
    }

    async fn delete(&self, row: &Row) -> SyncResult<RowOutcome> {
        match self
            .calendar
            .delete_event(&self.settings.calendar_id, &row.event_id)
            .await
        {
            Ok(()) => Ok(RowOutcome::Applied {
                action: Action::Delete,
                result: RowResult::new(Action::Delete.status_label(), ""),
            }),
            Err(err) => {
                warn!(row = row.number, event_id = %row.event_id, "delete failed: {err}");
                self.notifier.alert(&Alert::DeleteFailed {
                    row: row.number,
                    event_id: row.event_id.clone(),
                    reason: err.to_string(),
                });
                Ok(RowOutcome::Kept {
                    action: Action::Delete,
                    result: row.prior_result(),
                })
            }
        }
    }
}

//! User-facing alerts.

use std::fmt;

/// Conditions the user is told about before a row's fallback result is
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Add on a row that already has an event id
    DuplicateCreate { row: u32, event_id: String },
    UpdateFailed { row: u32, event_id: String, reason: String },
    DeleteFailed { row: u32, event_id: String, reason: String },
}

impl Alert {
    pub fn row(&self) -> u32 {
        match self {
            Alert::DuplicateCreate { row, .. }
            | Alert::UpdateFailed { row, .. }
            | Alert::DeleteFailed { row, .. } => *row,
        }
    }

    /// Short headline, without the row details.
    pub fn headline(&self) -> &'static str {
        match self {
            Alert::DuplicateCreate { .. } => "Error: Event already exists!",
            Alert::UpdateFailed { .. } => "Error: Event not found or failed to update!",
            Alert::DeleteFailed { .. } => "Error: Event not found or failed to delete!",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::DuplicateCreate { row, event_id } => {
                write!(f, "{} (row {row}, event {event_id})", self.headline())
            }
            Alert::UpdateFailed { row, event_id, reason }
            | Alert::DeleteFailed { row, event_id, reason } => {
                write!(f, "{} (row {row}, event '{event_id}': {reason})", self.headline())
            }
        }
    }
}

/// Channel that shows alerts to the user. `alert` blocks until the user
/// has seen it.
pub trait Notifier {
    fn alert(&self, alert: &Alert);
}

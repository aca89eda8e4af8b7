//! The calendar collaborator.

use std::future::Future;

use thiserror::Error;

use crate::event::EventRequest;

/// Failures reported by a calendar backend.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Calendar request failed: {0}")]
    Remote(String),
}

impl CalendarError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CalendarError::NotFound(_))
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Remote calendar operations the synchronizer needs.
///
/// Calls are awaited one at a time, so implementations don't need to be
/// shareable across tasks.
pub trait CalendarApi {
    /// Create an event and return the id the calendar assigned to it.
    fn create_event(
        &self,
        calendar_id: &str,
        event: &EventRequest,
    ) -> impl Future<Output = CalendarResult<String>>;

    /// Replace an existing event and return its id.
    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &EventRequest,
    ) -> impl Future<Output = CalendarResult<String>>;

    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> impl Future<Output = CalendarResult<()>>;
}

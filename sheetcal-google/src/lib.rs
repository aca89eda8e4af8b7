//! Google backends for sheetcal.
//!
//! - `GoogleCalendar` creates, updates and deletes events through the
//!   Calendar API
//! - `GoogleSheet` reads and writes schedule rows through the Sheets v4
//!   REST API
//!
//! Both take a ready OAuth access token; obtaining one is left to the caller.

mod calendar;
mod sheets;

pub use calendar::GoogleCalendar;
pub use sheets::GoogleSheet;

//! Provider-neutral event requests.
//!
//! Rows are turned into these before they reach a calendar. Times are kept
//! as wall-clock text plus a zone identifier, the way calendar APIs take
//! them, so the zone never comes from the row itself.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::SyncResult;
use crate::row::Row;

/// Layout of the wall-clock part of an event time.
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Response status given to every invited attendee.
pub const NEEDS_ACTION: &str = "needsAction";

/// Body of a create or update call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<Attendee>,
    pub guests_can_see_other_guests: bool,
    /// Only set on create; updates never send invitations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_updates: Option<SendUpdates>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    pub response_status: String,
}

/// Who gets notified when an event is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SendUpdates {
    All,
    None,
}

impl SendUpdates {
    pub fn from_notify(notify: bool) -> Self {
        if notify {
            SendUpdates::All
        } else {
            SendUpdates::None
        }
    }
}

impl EventRequest {
    /// Request for a new event, carrying the row's notify flag.
    pub fn for_create(row: &Row, zone: Tz) -> SyncResult<Self> {
        let mut request = Self::from_row(row, zone)?;
        request.send_updates = Some(SendUpdates::from_notify(row.notify));
        Ok(request)
    }

    /// Request replacing an existing event. Same shape as create, no notify flag.
    pub fn for_update(row: &Row, zone: Tz) -> SyncResult<Self> {
        Self::from_row(row, zone)
    }

    fn from_row(row: &Row, zone: Tz) -> SyncResult<Self> {
        Ok(EventRequest {
            summary: row.title.clone(),
            description: row.description.clone(),
            start: EventDateTime::new(row.start()?, zone),
            end: EventDateTime::new(row.end()?, zone),
            attendees: parse_attendees(&row.attendee_emails),
            guests_can_see_other_guests: false,
            send_updates: None,
        })
    }
}

impl EventDateTime {
    pub fn new(local: NaiveDateTime, zone: Tz) -> Self {
        EventDateTime {
            date_time: local.format(LOCAL_DATETIME_FORMAT).to_string(),
            time_zone: zone.name().to_string(),
        }
    }

    /// Resolve the wall-clock time in its zone to an absolute instant.
    ///
    /// Fails for unknown zones and for local times skipped or repeated by a
    /// DST transition.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, String> {
        let zone: Tz = self
            .time_zone
            .parse()
            .map_err(|_| format!("unknown time zone '{}'", self.time_zone))?;
        let local = NaiveDateTime::parse_from_str(&self.date_time, LOCAL_DATETIME_FORMAT)
            .map_err(|e| format!("invalid date-time '{}': {e}", self.date_time))?;

        zone.from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                format!(
                    "'{}' does not name a single instant in {}",
                    self.date_time, self.time_zone
                )
            })
    }
}

/// Split a newline-delimited list of emails into attendees.
///
/// Accepts LF and CRLF. Entries are trimmed and blank lines dropped.
pub fn parse_attendees(raw: &str) -> Vec<Attendee> {
    raw.lines()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(|email| Attendee {
            email: email.to_string(),
            response_status: NEEDS_ACTION.to_string(),
        })
        .collect()
}

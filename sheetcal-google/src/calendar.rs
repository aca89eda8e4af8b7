use google_calendar::Client;
use google_calendar::types::SendUpdates as GoogleSendUpdates;
use sheetcal_core::calendar::{CalendarApi, CalendarError, CalendarResult};
use sheetcal_core::event::{Attendee, EventDateTime, EventRequest, SendUpdates};
use tracing::debug;

/// Google Calendar backend.
pub struct GoogleCalendar {
    client: Client,
}

impl GoogleCalendar {
    /// Client for an already-authorized access token.
    pub fn new(access_token: &str) -> Self {
        GoogleCalendar {
            client: Client::new(
                String::new(),
                String::new(),
                String::new(),
                access_token.to_string(),
                String::new(),
            ),
        }
    }
}

impl CalendarApi for GoogleCalendar {
    async fn create_event(&self, calendar_id: &str, event: &EventRequest) -> CalendarResult<String> {
        let google_event = event.to_google()?;
        let send_updates = send_updates_to_google(event.send_updates.unwrap_or(SendUpdates::None));

        let response = self
            .client
            .events()
            .insert(calendar_id, 0, 0, false, send_updates, false, &google_event)
            .await
            .map_err(|e| classify_error(&e.to_string(), &event.summary))?;

        debug!(event_id = %response.body.id, "created event");
        Ok(response.body.id)
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &EventRequest,
    ) -> CalendarResult<String> {
        if event_id.is_empty() {
            return Err(CalendarError::NotFound("(no event id)".into()));
        }
        let google_event = event.to_google()?;

        let response = self
            .client
            .events()
            .update(
                calendar_id,
                event_id,
                0,
                0,
                false,
                GoogleSendUpdates::None,
                false,
                &google_event,
            )
            .await
            .map_err(|e| classify_error(&e.to_string(), event_id))?;

        Ok(response.body.id)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> CalendarResult<()> {
        if event_id.is_empty() {
            return Err(CalendarError::NotFound("(no event id)".into()));
        }

        self.client
            .events()
            .delete(calendar_id, event_id, false, GoogleSendUpdates::None)
            .await
            .map_err(|e| classify_error(&e.to_string(), event_id))?;

        Ok(())
    }
}

/// Map a client error message onto the calendar error kinds.
///
/// Deleted events answer 410 Gone, unknown ids 404.
fn classify_error(error_str: &str, subject: &str) -> CalendarError {
    if error_str.contains("404")
        || error_str.contains("Not Found")
        || error_str.contains("410")
        || error_str.contains("Gone")
    {
        CalendarError::NotFound(subject.to_string())
    } else {
        CalendarError::Remote(format!("{subject}: {error_str}"))
    }
}

pub(crate) trait ToGoogle {
    fn to_google(&self) -> CalendarResult<google_calendar::types::Event>;
}

impl ToGoogle for EventRequest {
    fn to_google(&self) -> CalendarResult<google_calendar::types::Event> {
        Ok(google_calendar::types::Event {
            summary: self.summary.clone(),
            description: self.description.clone(),
            start: Some(event_time_to_google(&self.start)?),
            end: Some(event_time_to_google(&self.end)?),
            attendees: self.attendees.iter().map(attendee_to_google).collect(),
            guests_can_see_other_guests: self.guests_can_see_other_guests,
            ..Default::default()
        })
    }
}

fn event_time_to_google(time: &EventDateTime) -> CalendarResult<google_calendar::types::EventDateTime> {
    let instant = time.to_utc().map_err(CalendarError::InvalidEvent)?;

    Ok(google_calendar::types::EventDateTime {
        date: None,
        date_time: Some(instant),
        time_zone: time.time_zone.clone(),
    })
}

fn attendee_to_google(attendee: &Attendee) -> google_calendar::types::EventAttendee {
    google_calendar::types::EventAttendee {
        email: attendee.email.clone(),
        display_name: String::new(),
        response_status: attendee.response_status.clone(),
        additional_guests: 0,
        comment: String::new(),
        id: String::new(),
        optional: false,
        organizer: false,
        resource: false,
        self_: false,
    }
}

fn send_updates_to_google(send_updates: SendUpdates) -> GoogleSendUpdates {
    match send_updates {
        SendUpdates::All => GoogleSendUpdates::All,
        SendUpdates::None => GoogleSendUpdates::None,
    }
}

//! Calendar integration -- insert one event per schedule entry.
//!
//! Speaks the Google Calendar v3 events surface with a keyring-held bearer
//! token. The planner never calls this directly; the CLI feeds it the
//! computed slots.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::json;

use crate::integrations::keyring_store;
use crate::integrations::traits::{CalendarSink, Integration};

pub struct CalendarClient {
    token: String,
    api_base: String,
    calendar_id: String,
}

impl CalendarClient {
    /// Load the stored token from the OS keyring (empty string if absent).
    pub fn new(api_base: &str, calendar_id: &str) -> Self {
        let token = keyring_store::get("calendar_token")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }

    /// Build a client with an explicit token.
    pub fn with_token(api_base: &str, calendar_id: &str, token: &str) -> Self {
        Self {
            token: token.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }

    /// Persist a user-provided token to the OS keyring and update
    /// in-memory state.
    pub fn set_credentials(&mut self, token: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("calendar_token", token)?;
        self.token = token.to_string();
        Ok(())
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_base, self.calendar_id)
    }
}

impl CalendarSink for CalendarClient {
    fn create_event(
        &self,
        title: &str,
        description: &str,
        start: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let end = start + Duration::minutes(i64::from(duration_minutes));

        let body = json!({
            "summary": title,
            "description": description,
            "start": { "dateTime": start.to_rfc3339(), "timeZone": "UTC" },
            "end": { "dateTime": end.to_rfc3339(), "timeZone": "UTC" },
        });

        let rt = tokio::runtime::Runtime::new()?;
        let resp: serde_json::Value = rt.block_on(async {
            Client::new()
                .post(self.events_url())
                .bearer_auth(&self.token)
                .json(&body)
                .send()
                .await?
                .json()
                .await
        })?;

        if let Some(err) = resp.get("error") {
            return Err(format!("Calendar API error: {err}").into());
        }

        let event_id = resp["id"]
            .as_str()
            .ok_or("missing event id in response")?
            .to_string();

        Ok(event_id)
    }
}

impl Integration for CalendarClient {
    fn name(&self) -> &str {
        "calendar"
    }

    fn display_name(&self) -> &str {
        "Calendar"
    }

    fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    fn authenticate(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.token.is_empty() {
            return Err("No calendar token stored. Call set_credentials first.".into());
        }

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            Client::new()
                .get(format!(
                    "{}/calendars/{}",
                    self.api_base, self.calendar_id
                ))
                .bearer_auth(&self.token)
                .send(),
        )?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!("Calendar auth check failed: HTTP {}", resp.status()).into())
        }
    }

    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("calendar_token")?;
        self.token.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn create_event_posts_rfc3339_window_and_returns_id() {
        let mut server = mockito::Server::new();
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
        let m = server
            .mock("POST", "/calendars/primary/events")
            .match_body(mockito::Matcher::PartialJson(json!({
                "summary": "#12 Fix login bug",
                "start": { "dateTime": "2026-03-02T07:00:00+00:00" },
                "end": { "dateTime": "2026-03-02T07:45:00+00:00" },
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": "evt_123" }).to_string())
            .create();

        let client = CalendarClient::with_token(&server.url(), "primary", "t0k3n");
        let id = client
            .create_event("#12 Fix login bug", "from ticket", start, 45)
            .unwrap();

        assert_eq!(id, "evt_123");
        m.assert();
    }

    #[test]
    fn create_event_surfaces_api_errors() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/calendars/primary/events")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "error": { "code": 401 } }).to_string())
            .create();

        let client = CalendarClient::with_token(&server.url(), "primary", "bad");
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
        let err = client.create_event("t", "", start, 45).unwrap_err();
        assert!(err.to_string().contains("Calendar API error"));
    }
}

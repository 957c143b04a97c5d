use super::interval::Interval;
use crate::error::{Error, TempoResult};
use crate::utils::time::{format_timestamp, iso_timestamp, parse_timestamp};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Default meeting length used when a request does not name one
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// Status of a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    /// Soft-removed: kept for auditing, ignored by conflict and slot logic
    Cancelled,
}

/// Where a calendar event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    #[default]
    Manual,
    Email,
    Api,
}

/// Calendar event as stored and exchanged over the API.
///
/// Timestamps stay in their textual form so that a stored event with a
/// malformed timestamp can still be listed, and is only rejected once a
/// computation needs its instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub source: EventSource,
    /// Message id of the email this event was created from
    #[serde(default)]
    pub meeting_request_id: Option<String>,
}

impl CalendarEvent {
    /// Create a confirmed manual event with a generated id
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> TempoResult<Self> {
        if start >= end {
            return Err(Error::InvalidEvent(format!(
                "start {} must be before end {}",
                format_timestamp(&start),
                format_timestamp(&end)
            )));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            start_time: format_timestamp(&start),
            end_time: format_timestamp(&end),
            is_all_day: false,
            status: EventStatus::Confirmed,
            source: EventSource::Manual,
            meeting_request_id: None,
        })
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the status
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    /// Parse start and end without checking their order
    pub fn endpoints(&self) -> TempoResult<(NaiveDateTime, NaiveDateTime)> {
        Ok((
            parse_timestamp(&self.start_time)?,
            parse_timestamp(&self.end_time)?,
        ))
    }

    /// Parse the event into an interval, rejecting `start >= end`
    pub fn interval(&self) -> TempoResult<Interval> {
        let (start, end) = self.endpoints()?;
        Interval::new(start, end).ok_or_else(|| {
            Error::InvalidEvent(format!("event '{}' must start before it ends", self.id))
        })
    }
}

/// A free period of fixed length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "iso_timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "iso_timestamp")]
    pub end: NaiveDateTime,
}

impl TimeSlot {
    /// Create a slot, rejecting `start >= end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> TempoResult<Self> {
        Interval::new(start, end)
            .map(Self::from)
            .ok_or_else(|| Error::InvalidEvent("time slot must start before it ends".to_string()))
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl From<Interval> for TimeSlot {
    fn from(interval: Interval) -> Self {
        Self {
            start: interval.start(),
            end: interval.end(),
        }
    }
}

/// Request body for alternative meeting times
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Target date (YYYY-MM-DD)
    pub date: String,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
}

fn default_duration_minutes() -> i64 {
    DEFAULT_DURATION_MINUTES
}

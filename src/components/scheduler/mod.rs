//! Conflict detection and free-slot computation over calendar events.
//!
//! Everything here is a pure function of its inputs. Callers pass in a
//! snapshot of events taken from an [`EventStore`](crate::components::event_store::EventStore).

mod conflict;
pub mod interval;
pub mod models;
mod slots;

pub use conflict::{find_conflict, is_conflicting};
pub use models::{CalendarEvent, EventSource, EventStatus, ScheduleRequest, TimeSlot};
pub use slots::{
    duration_from_minutes, find_available_slots, suggest_alternatives, BusinessHours,
    DEFAULT_BUSINESS_END, DEFAULT_BUSINESS_START, MAX_SUGGESTIONS,
};

use crate::config::Config;
use crate::error::TempoResult;
use crate::utils::time::parse_date;

/// How stored events with unusable timestamps are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Fail the whole computation
    #[default]
    Strict,
    /// Skip the offending event and log a warning
    Lenient,
}

/// Scheduling settings bundled for request handlers
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    hours: BusinessHours,
    policy: TimestampPolicy,
}

impl Scheduler {
    pub fn new(hours: BusinessHours, policy: TimestampPolicy) -> Self {
        Self { hours, policy }
    }

    /// Build a scheduler from the application config
    pub fn from_config(config: &Config) -> TempoResult<Self> {
        let hours = BusinessHours::parse(&config.business_start, &config.business_end)?;
        let policy = if config.lenient_timestamps {
            TimestampPolicy::Lenient
        } else {
            TimestampPolicy::Strict
        };
        Ok(Self::new(hours, policy))
    }

    /// First event in `others` that `candidate` would overlap
    pub fn find_conflict<'a>(
        &self,
        candidate: &CalendarEvent,
        others: &'a [CalendarEvent],
    ) -> TempoResult<Option<&'a CalendarEvent>> {
        find_conflict(candidate, others, self.policy)
    }

    /// Free slots of `duration_minutes` on `date`
    pub fn available_slots(
        &self,
        date: &str,
        duration_minutes: i64,
        events: &[CalendarEvent],
    ) -> TempoResult<Vec<TimeSlot>> {
        parse_date(date)?;
        let duration = duration_from_minutes(duration_minutes)?;
        find_available_slots(date, duration, events, self.hours, self.policy)
    }

    /// Up to [`MAX_SUGGESTIONS`] earliest free slots on `date`
    pub fn suggest_alternatives(
        &self,
        date: &str,
        duration_minutes: i64,
        events: &[CalendarEvent],
    ) -> TempoResult<Vec<TimeSlot>> {
        parse_date(date)?;
        let duration = duration_from_minutes(duration_minutes)?;
        suggest_alternatives(date, duration, events, self.hours, self.policy)
    }
}

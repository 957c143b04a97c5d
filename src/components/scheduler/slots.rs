use super::interval::{free_gaps, merge_overlapping, Interval};
use super::models::{CalendarEvent, TimeSlot};
use super::TimestampPolicy;
use crate::error::{config_error, Error, TempoResult};
use crate::utils::time::{parse_date, parse_time_of_day};
use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::{debug, warn};

/// Default start of business hours
pub const DEFAULT_BUSINESS_START: &str = "09:00";

/// Default end of business hours
pub const DEFAULT_BUSINESS_END: &str = "17:00";

/// How many alternatives are suggested at most
pub const MAX_SUGGESTIONS: usize = 3;

/// Daily window in which slots may be offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    start: NaiveTime,
    end: NaiveTime,
}

impl BusinessHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> TempoResult<Self> {
        if start >= end {
            return Err(config_error("Business hours must start before they end"));
        }
        Ok(Self { start, end })
    }

    /// Parse business hours from two HH:MM strings
    pub fn parse(start: &str, end: &str) -> TempoResult<Self> {
        let start = parse_time_of_day(start)
            .ok_or_else(|| config_error(&format!("Invalid business start time: {}", start)))?;
        let end = parse_time_of_day(end)
            .ok_or_else(|| config_error(&format!("Invalid business end time: {}", end)))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// The business window on `date`
    pub fn window(&self, date: NaiveDate) -> Interval {
        Interval::new(date.and_time(self.start), date.and_time(self.end))
            .expect("business hours are validated on construction")
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self::parse(DEFAULT_BUSINESS_START, DEFAULT_BUSINESS_END)
            .expect("default business hours are valid")
    }
}

/// Convert a minute count into a positive duration
pub fn duration_from_minutes(minutes: i64) -> TempoResult<Duration> {
    Duration::try_minutes(minutes)
        .filter(|duration| *duration > Duration::zero())
        .ok_or_else(|| Error::InvalidDuration(format!("{} minutes", minutes)))
}

/// Compute back-to-back free slots of exactly `duration` on `date`.
///
/// Only events that start and end on `date` and are not cancelled count as
/// busy; events crossing midnight are ignored. Busy intervals are clipped to
/// business hours and merged before the free gaps are walked, and a gap
/// shorter than `duration` yields nothing.
pub fn find_available_slots(
    date: &str,
    duration: Duration,
    events: &[CalendarEvent],
    hours: BusinessHours,
    policy: TimestampPolicy,
) -> TempoResult<Vec<TimeSlot>> {
    let target_date = parse_date(date)?;
    if duration <= Duration::zero() {
        return Err(Error::InvalidDuration(describe_duration(duration)));
    }

    let window = hours.window(target_date);

    let mut busy = busy_intervals(target_date, events, policy)?
        .into_iter()
        .filter_map(|interval| interval.clip(&window))
        .collect::<Vec<_>>();
    busy.sort_by_key(|interval| interval.start());
    let busy = merge_overlapping(&busy);

    let mut slots = Vec::new();
    for gap in free_gaps(&window, &busy) {
        push_slots(&gap, duration, &mut slots);
    }

    debug!(
        "Found {} free slots of {} minutes on {} around {} busy intervals",
        slots.len(),
        duration.num_minutes(),
        target_date,
        busy.len()
    );

    Ok(slots)
}

/// The earliest free slots on `date`, at most [`MAX_SUGGESTIONS`]
pub fn suggest_alternatives(
    date: &str,
    duration: Duration,
    events: &[CalendarEvent],
    hours: BusinessHours,
    policy: TimestampPolicy,
) -> TempoResult<Vec<TimeSlot>> {
    let mut slots = find_available_slots(date, duration, events, hours, policy)?;
    slots.truncate(MAX_SUGGESTIONS);
    Ok(slots)
}

/// Busy intervals of the non-cancelled events lying entirely on `date`, in input order
fn busy_intervals(
    date: NaiveDate,
    events: &[CalendarEvent],
    policy: TimestampPolicy,
) -> TempoResult<Vec<Interval>> {
    let mut busy = Vec::new();

    for event in events.iter().filter(|event| !event.is_cancelled()) {
        let interval = match event.interval() {
            Ok(interval) => interval,
            Err(e) if policy == TimestampPolicy::Lenient => {
                warn!("Skipping event {} in slot search: {}", event.id, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        if interval.start().date() == date && interval.end().date() == date {
            busy.push(interval);
        }
    }

    Ok(busy)
}

/// Whole minutes when exact, otherwise the ISO 8601 form so nothing is rounded away
fn describe_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    if Duration::try_minutes(minutes) == Some(duration) {
        format!("{} minutes", minutes)
    } else {
        duration.to_string()
    }
}

fn push_slots(gap: &Interval, duration: Duration, slots: &mut Vec<TimeSlot>) {
    let mut current = gap.start();
    while let Some(slot_end) = current.checked_add_signed(duration) {
        if slot_end > gap.end() {
            break;
        }
        slots.push(TimeSlot {
            start: current,
            end: slot_end,
        });
        current = slot_end;
    }
}

use super::models::CalendarEvent;
use super::TimestampPolicy;
use crate::error::TempoResult;
use tracing::warn;

/// Find the first non-cancelled event in `others` that overlaps `candidate`.
///
/// The candidate must always parse and start before it ends. Under
/// [`TimestampPolicy::Lenient`] other events that are unparsable or end
/// before they start are skipped instead of failing the check.
pub fn find_conflict<'a>(
    candidate: &CalendarEvent,
    others: &'a [CalendarEvent],
    policy: TimestampPolicy,
) -> TempoResult<Option<&'a CalendarEvent>> {
    let candidate_interval = candidate.interval()?;

    for other in others {
        if other.is_cancelled() {
            continue;
        }

        let other_interval = match other.interval() {
            Ok(interval) => interval,
            Err(e) if policy == TimestampPolicy::Lenient => {
                warn!("Skipping event {} in conflict check: {}", other.id, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        if candidate_interval.overlaps(&other_interval) {
            return Ok(Some(other));
        }
    }

    Ok(None)
}

/// Whether `candidate` overlaps any non-cancelled event in `others`
pub fn is_conflicting(candidate: &CalendarEvent, others: &[CalendarEvent]) -> TempoResult<bool> {
    Ok(find_conflict(candidate, others, TimestampPolicy::Strict)?.is_some())
}

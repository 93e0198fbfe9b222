//! MilestoneScheduler: when is a new life event due?
//!
//! Decisions are made purely from the recorded event history and the newly
//! computed age; requesting and persisting events is the controller's job.

use crate::life::event::LifeEvent;

/// Ages at which a new event is guaranteed to be considered.
pub const MILESTONE_AGES: [u32; 20] = [
    0, 5, 10, 13, 16, 18, 22, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85,
];

/// What the controller should do for the current age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// An uncompleted event exists; present it again, request nothing.
    ResurfacePending,
    /// A milestone was crossed since the last recorded event; request a new
    /// event at the current age.
    RequestMilestone { age: u32 },
    /// No milestone due; the most recent (completed) event is re-surfaced
    /// and the controller requests a fresh filler event at the current age.
    ResurfaceLatest,
    /// Empty history: request the very first event at the starting age.
    RequestFirst { age: u32 },
}

/// The largest milestone at or below `age`, if any.
fn latest_milestone_at_or_below(age: u32) -> Option<u32> {
    MILESTONE_AGES.iter().copied().filter(|&m| m <= age).max()
}

/// Decide whether a new event must be requested for `new_age`.
///
/// A milestone is "newly due" when the largest milestone at or below the
/// new age is greater than the most recent recorded event's age. A single
/// catch-up that crosses several milestones therefore requests exactly one
/// event, at the new age itself; the intermediate milestones are skipped
/// and never backfilled.
pub fn decide(events: &[LifeEvent], new_age: u32) -> ScheduleDecision {
    if events.iter().any(|e| !e.completed) {
        return ScheduleDecision::ResurfacePending;
    }

    let last_recorded_age = match events.last() {
        Some(event) => event.age,
        None => return ScheduleDecision::RequestFirst { age: new_age },
    };

    match latest_milestone_at_or_below(new_age) {
        Some(m) if last_recorded_age < m => ScheduleDecision::RequestMilestone { age: new_age },
        _ => ScheduleDecision::ResurfaceLatest,
    }
}

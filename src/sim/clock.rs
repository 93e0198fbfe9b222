//! ClockAdvancer: real elapsed time into virtual aging
//!
//! One pure transition function. Given the persisted clock and the current
//! wall-clock time it proposes new clock values; the controller applies the
//! proposal atomically together with `last_updated := now`. Nothing here
//! mutates or persists, so re-running from the same persisted state always
//! yields the same proposal.

use jiff::Timestamp;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Proposed clock values produced by [`advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockAdvance {
    pub virtual_months: u32,
    pub age: u32,
    /// Whole real days converted. Zero means the proposal is a no-op.
    pub days_elapsed: u32,
}

impl ClockAdvance {
    pub fn is_noop(&self) -> bool {
        self.days_elapsed == 0
    }
}

/// Convert whole real days since `last_updated` into virtual months at the
/// fixed ratio (2 virtual months per real day by default). Elapsed time
/// under one day, or a clock that ran backwards, proposes no change.
pub fn advance(
    virtual_months_elapsed: u32,
    last_updated: Timestamp,
    now: Timestamp,
    months_per_real_day: u32,
) -> ClockAdvance {
    let elapsed_secs = now.duration_since(last_updated).as_secs();
    let days = (elapsed_secs / SECS_PER_DAY).max(0) as u32;

    let virtual_months = virtual_months_elapsed + months_per_real_day * days;
    ClockAdvance {
        virtual_months,
        age: virtual_months / 12,
        days_elapsed: days,
    }
}

//! Time-slot grid and day periods.
//!
//! # Time Model
//!
//! Exam start times live on a half-hour grid expressed as minutes since
//! midnight. The grid runs 07:00–20:30 and every exam must end by the
//! hard 21:00 cutoff regardless of slot validity.
//!
//! Day periods are the three fixed bands proctor availability is
//! declared against:
//!
//! | Period | Start-hour band |
//! |-----------|-----------------|
//! | Morning | 07:00–12:59 |
//! | Afternoon | 13:00–17:59 |
//! | Evening | 18:00–20:59 |

use serde::{Deserialize, Serialize};

/// Minutes since midnight.
pub type SlotMin = i32;

/// Grid spacing between candidate start times (minutes).
pub const SLOT_STEP_MIN: SlotMin = 30;

/// Earliest slot start: 07:00.
pub const FIRST_SLOT_MIN: SlotMin = 7 * 60;

/// Latest slot start: 20:30.
pub const LAST_SLOT_MIN: SlotMin = 20 * 60 + 30;

/// Hard end-of-day cutoff: no exam may run past 21:00.
pub const DAY_END_CUTOFF_MIN: SlotMin = 21 * 60;

/// One of the three fixed day bands proctor availability is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPeriod {
    /// 07:00–12:59 start hours.
    Morning,
    /// 13:00–17:59 start hours.
    Afternoon,
    /// 18:00–20:59 start hours.
    Evening,
}

impl DayPeriod {
    /// Maps a slot start to its period by starting hour.
    ///
    /// Returns `None` outside all three bands; such a slot has no
    /// available proctors.
    pub fn of_start(slot_min: SlotMin) -> Option<Self> {
        match slot_min / 60 {
            7..=12 => Some(DayPeriod::Morning),
            13..=17 => Some(DayPeriod::Afternoon),
            18..=20 => Some(DayPeriod::Evening),
            _ => None,
        }
    }
}

/// Exam duration as configured by the caller (hours + minutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDuration {
    /// Whole hours.
    pub hours: u32,
    /// Additional minutes.
    pub minutes: u32,
}

impl ExamDuration {
    /// Creates a duration.
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// Total duration in minutes.
    #[inline]
    pub fn total_minutes(&self) -> SlotMin {
        (self.hours * 60 + self.minutes) as SlotMin
    }
}

/// All candidate start slots on the half-hour grid (07:00 through 20:30).
pub fn slot_grid() -> Vec<SlotMin> {
    (FIRST_SLOT_MIN..=LAST_SLOT_MIN)
        .step_by(SLOT_STEP_MIN as usize)
        .collect()
}

/// Whether a start slot is on the grid.
pub fn is_grid_slot(slot_min: SlotMin) -> bool {
    (FIRST_SLOT_MIN..=LAST_SLOT_MIN).contains(&slot_min) && slot_min % SLOT_STEP_MIN == 0
}

/// Valid start slots for a section, given night status and exam length.
///
/// Night classes are confined to evening slots; day classes exclude
/// them. Both sets drop any slot whose end would pass the 21:00 cutoff.
pub fn valid_slots(night_class: bool, duration_min: SlotMin) -> Vec<SlotMin> {
    slot_grid()
        .into_iter()
        .filter(|&s| s + duration_min <= DAY_END_CUTOFF_MIN)
        .filter(|&s| {
            let evening = DayPeriod::of_start(s) == Some(DayPeriod::Evening);
            if night_class { evening } else { !evening }
        })
        .collect()
}

/// Formats a slot as `"HH:MM"`.
pub fn fmt_slot(slot_min: SlotMin) -> String {
    format!("{:02}:{:02}", slot_min / 60, slot_min % 60)
}

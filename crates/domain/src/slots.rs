//! Hourly slot generation for availability windows.
//!
//! An owner publishes a window such as 08:00-11:30 for one day; the window
//! is cut into consecutive one-hour slots, the last one clipped to the
//! window end.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{NewSchedule, ParkingId};
use crate::{DomainError, Result};

/// Length of every slot but the last
pub const SLOT_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub day: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Slot {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Creation payload for an available schedule covering this slot
    pub fn to_new_schedule(&self, parking_id: ParkingId) -> NewSchedule {
        NewSchedule {
            parking_id,
            day: self.day,
            start_time: self.start,
            end_time: self.end,
            available: true,
        }
    }
}

/// A day's availability window.
///
/// Iterating a window is restartable: the value is `Copy`, and every call to
/// `into_iter` yields the same sequence from the beginning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    day: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl SlotWindow {
    /// A window that yields no slots when `start >= end`.
    pub fn new(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end }
    }

    /// Like [`SlotWindow::new`] but rejects an empty window.
    pub fn try_new(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(DomainError::InvalidTimeRange { start, end });
        }
        Ok(Self::new(day, start, end))
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of slots the window produces
    pub fn len(&self) -> usize {
        self.slots().count()
    }

    pub fn slots(&self) -> Slots {
        Slots {
            day: self.day,
            cursor: self.start,
            end: self.end,
            done: self.is_empty(),
        }
    }
}

impl IntoIterator for SlotWindow {
    type Item = Slot;
    type IntoIter = Slots;

    fn into_iter(self) -> Slots {
        self.slots()
    }
}

impl IntoIterator for &SlotWindow {
    type Item = Slot;
    type IntoIter = Slots;

    fn into_iter(self) -> Slots {
        self.slots()
    }
}

/// Iterator over the slots of a [`SlotWindow`]
#[derive(Debug, Clone)]
pub struct Slots {
    day: NaiveDate,
    cursor: NaiveTime,
    end: NaiveTime,
    done: bool,
}

impl Iterator for Slots {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.done || self.cursor >= self.end {
            self.done = true;
            return None;
        }

        // NaiveTime wraps at midnight; a wrap means we are past `end`.
        let (next, wrapped) = self
            .cursor
            .overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
        let slot_end = if wrapped != 0 || next > self.end {
            self.end
        } else {
            next
        };

        let slot = Slot {
            day: self.day,
            start: self.cursor,
            end: slot_end,
        };
        self.cursor = slot_end;
        Some(slot)
    }
}

/// Splits `[start, end)` on `day` into hourly slots.
///
/// Returns an empty vector when `start >= end`; callers must treat that as
/// a rejected window rather than a valid empty schedule.
pub fn generate_slots(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Vec<Slot> {
    SlotWindow::new(day, start, end).into_iter().collect()
}

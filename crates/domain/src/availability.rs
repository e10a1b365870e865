//! Grouping of schedules into a per-day calendar.

use chrono::NaiveDate;
use log::warn;
use std::collections::{BTreeMap, HashSet};

use crate::models::{ParkingId, Reservation, Schedule, ScheduleId};

/// Schedules of one calendar day, ordered by start time
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub schedules: Vec<Schedule>,
    pub available: usize,
    pub unavailable: usize,
}

impl DayGroup {
    fn new(day: NaiveDate, mut schedules: Vec<Schedule>) -> Self {
        // stable: equal start times keep their input order
        schedules.sort_by_key(|s| s.start_time);

        for pair in schedules.windows(2) {
            if pair[0].start_time == pair[1].start_time {
                warn!(
                    "schedules {} and {} both start at {} on {}",
                    pair[0].id, pair[1].id, pair[0].start_time, day
                );
            }
        }

        let available = schedules.iter().filter(|s| s.available).count();
        let unavailable = schedules.len() - available;
        Self {
            day,
            schedules,
            available,
            unavailable,
        }
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

/// A parking's schedules grouped by day, days in ascending order
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleCalendar {
    pub parking_id: ParkingId,
    pub days: Vec<DayGroup>,
    pub available: usize,
    pub unavailable: usize,
}

impl ScheduleCalendar {
    pub fn day(&self, day: NaiveDate) -> Option<&DayGroup> {
        self.days.iter().find(|group| group.day == day)
    }

    pub fn total(&self) -> usize {
        self.available + self.unavailable
    }

    /// All grouped schedules, day by day
    pub fn flatten(&self) -> Vec<Schedule> {
        self.days
            .iter()
            .flat_map(|group| group.schedules.iter().cloned())
            .collect()
    }

    /// Available schedules not held by an active reservation
    pub fn bookable<'a>(&'a self, reservations: &[Reservation]) -> Vec<&'a Schedule> {
        let held: HashSet<ScheduleId> = reservations
            .iter()
            .filter(|r| r.is_active())
            .map(|r| r.schedule_id)
            .collect();

        self.days
            .iter()
            .flat_map(|group| group.schedules.iter())
            .filter(|s| s.available && !held.contains(&s.id))
            .collect()
    }
}

/// Groups the schedules of `parking_id` by calendar day.
///
/// Schedules of other parkings are ignored. Within a day, schedules are
/// sorted by start time; ties keep their original relative order.
pub fn group_by_day(schedules: &[Schedule], parking_id: ParkingId) -> ScheduleCalendar {
    let mut by_day: BTreeMap<NaiveDate, Vec<Schedule>> = BTreeMap::new();
    for schedule in schedules.iter().filter(|s| s.parking_id == parking_id) {
        by_day
            .entry(schedule.day)
            .or_default()
            .push(schedule.clone());
    }

    let days: Vec<DayGroup> = by_day
        .into_iter()
        .map(|(day, group)| DayGroup::new(day, group))
        .collect();
    let available = days.iter().map(|g| g.available).sum();
    let unavailable = days.iter().map(|g| g.unavailable).sum();

    ScheduleCalendar {
        parking_id,
        days,
        available,
        unavailable,
    }
}

/// Splits schedules into `(available, unavailable)`, preserving order.
pub fn partition_by_availability(schedules: &[Schedule]) -> (Vec<&Schedule>, Vec<&Schedule>) {
    schedules.iter().partition(|s| s.available)
}

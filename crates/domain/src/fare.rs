//! Fare computation.
//!
//! Reservations are billed per started hour: a 1h15 stay costs two hours.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Schedule;
use crate::slots::Slot;
use crate::{DomainError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fare {
    pub hours_registered: u32,
    pub total_fare: f64,
}

impl Fare {
    pub fn for_slot(slot: &Slot, unit_price: f64) -> Result<Self> {
        compute_fare(
            slot.day.and_time(slot.start),
            slot.day.and_time(slot.end),
            unit_price,
        )
    }
}

/// Billed hours and total for a stay from `start` to `end`.
///
/// Fails when `end <= start` or when `unit_price` is not a positive,
/// finite number.
pub fn compute_fare(start: NaiveDateTime, end: NaiveDateTime, unit_price: f64) -> Result<Fare> {
    if end <= start {
        return Err(DomainError::InvalidPeriod { start, end });
    }
    if !unit_price.is_finite() || unit_price <= 0.0 {
        return Err(DomainError::InvalidPrice(unit_price));
    }

    // any started hour counts, down to the nanosecond
    let span = end - start;
    let mut hours = span.num_hours();
    if span > Duration::hours(hours) {
        hours += 1;
    }
    let hours_registered = u32::try_from(hours).unwrap_or(u32::MAX);

    Ok(Fare {
        hours_registered,
        total_fare: f64::from(hours_registered) * unit_price,
    })
}

pub fn fare_for_schedule(schedule: &Schedule, unit_price: f64) -> Result<Fare> {
    compute_fare(schedule.starts_at(), schedule.ends_at(), unit_price)
}

/// Sum of independently computed fares; adjacent slots are not merged.
pub fn total_fare<'a, I>(fares: I) -> Fare
where
    I: IntoIterator<Item = &'a Fare>,
{
    fares.into_iter().fold(
        Fare {
            hours_registered: 0,
            total_fare: 0.0,
        },
        |acc, fare| Fare {
            hours_registered: acc.hours_registered.saturating_add(fare.hours_registered),
            total_fare: acc.total_fare + fare.total_fare,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::generate_slots;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn one_hour_bills_one_hour() {
        assert_eq!(
            compute_fare(at(9, 0), at(10, 0), 10.0).unwrap(),
            Fare {
                hours_registered: 1,
                total_fare: 10.0
            }
        );
    }

    #[test]
    fn partial_hours_round_up() {
        assert_eq!(
            compute_fare(at(9, 0), at(10, 15), 10.0).unwrap(),
            Fare {
                hours_registered: 2,
                total_fare: 20.0
            }
        );
        assert_eq!(
            compute_fare(at(9, 0), at(9, 1), 7.5).unwrap().hours_registered,
            1
        );
    }

    #[test]
    fn sub_second_remainders_start_a_new_hour() {
        let start = at(9, 0);
        assert_eq!(
            compute_fare(start, start + Duration::milliseconds(500), 10.0).unwrap(),
            Fare {
                hours_registered: 1,
                total_fare: 10.0
            }
        );
        assert_eq!(
            compute_fare(start, start + Duration::milliseconds(3_600_500), 10.0)
                .unwrap()
                .hours_registered,
            2
        );
        assert_eq!(
            compute_fare(start, start + Duration::milliseconds(3_600_000), 10.0)
                .unwrap()
                .hours_registered,
            1
        );
    }

    #[test]
    fn empty_or_inverted_period_is_rejected() {
        assert_eq!(
            compute_fare(at(9, 0), at(9, 0), 10.0),
            Err(DomainError::InvalidPeriod {
                start: at(9, 0),
                end: at(9, 0)
            })
        );
        assert!(compute_fare(at(10, 0), at(9, 0), 10.0).is_err());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        assert_eq!(
            compute_fare(at(9, 0), at(10, 0), 0.0),
            Err(DomainError::InvalidPrice(0.0))
        );
        assert!(compute_fare(at(9, 0), at(10, 0), f64::NAN).is_err());
    }

    #[test]
    fn schedule_fare_uses_its_day_and_times() {
        let schedule = Schedule {
            id: 1,
            parking_id: 2,
            day: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: chrono::NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: chrono::NaiveTime::from_hms_opt(15, 20, 0).unwrap(),
            available: true,
        };
        assert_eq!(
            fare_for_schedule(&schedule, 12.5).unwrap(),
            Fare {
                hours_registered: 2,
                total_fare: 25.0
            }
        );
    }

    #[test]
    fn multi_slot_fares_are_summed_without_proration() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let slots = generate_slots(
            day,
            chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        );
        let fares: Vec<Fare> = slots
            .iter()
            .map(|slot| Fare::for_slot(slot, 15.0).unwrap())
            .collect();
        let total = total_fare(&fares);
        // 1h + 1h + a 30 minute tail billed as a full hour
        assert_eq!(total.hours_registered, 3);
        assert_eq!(total.total_fare, 45.0);
    }
}

//! parkly domain core
//!
//! Pure scheduling and pricing logic for the parkly parking marketplace.
//! Nothing in this crate performs I/O; every function takes already
//! resolved records and returns plain values or error lists.
//!
//! # Modules
//!
//! - [`slots`] splits an availability window into hourly slots
//! - [`fare`] computes billed hours and total fare for a reservation
//! - [`availability`] filters and groups schedules by calendar day
//! - [`validation`] checks listing and schedule form input
//! - [`batch`] reports the outcome of non-atomic multi-item submissions

pub mod availability;
pub mod batch;
pub mod fare;
pub mod models;
pub mod slots;
pub mod validation;

use chrono::{NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::models::{ParkingId, ReservationStatus, ScheduleId};

pub use availability::{group_by_day, partition_by_availability, DayGroup, ScheduleCalendar};
pub use batch::{BatchFailure, BatchOutcome};
pub use fare::{compute_fare, total_fare, Fare};
pub use slots::{generate_slots, Slot, SlotWindow};
pub use validation::{ListingForm, LocationForm, ScheduleContext, ScheduleForm, Violations};

/// Invariant violations raised by the core.
///
/// These indicate a caller bug rather than bad user input; user input is
/// reported through [`Violations`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("end time {end} is not after start time {start}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    #[error("end {end} is not after start {start}")]
    InvalidPeriod {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("unit price must be a positive number, got {0}")]
    InvalidPrice(f64),

    #[error("reservation cannot move from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("payments require an approved reservation, this one is {0}")]
    PaymentNotAllowed(ReservationStatus),

    #[error("schedule {schedule} belongs to parking {actual}, not {expected}")]
    ParkingMismatch {
        schedule: ScheduleId,
        expected: ParkingId,
        actual: ParkingId,
    },

    #[error("schedule {0} is not available")]
    ScheduleUnavailable(ScheduleId),
}

pub type Result<T> = std::result::Result<T, DomainError>;

/// A convenience module for common imports
pub mod prelude {
    pub use crate::availability::{group_by_day, ScheduleCalendar};
    pub use crate::batch::BatchOutcome;
    pub use crate::fare::{compute_fare, Fare};
    pub use crate::models::*;
    pub use crate::slots::{generate_slots, Slot, SlotWindow};
    pub use crate::validation::{ListingForm, LocationForm, ScheduleForm, Violations};
    pub use crate::DomainError;
}

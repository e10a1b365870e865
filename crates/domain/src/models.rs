//! Records exchanged with the marketplace backend.
//!
//! Field names follow the backend's camelCase JSON bodies.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fare::{fare_for_schedule, Fare};
use crate::{DomainError, Result};

pub type ParkingId = i64;
pub type ScheduleId = i64;
pub type ReservationId = i64;
pub type PaymentId = i64;
pub type ProfileId = i64;
pub type VehicleId = i64;

/// Where a parking is. Always replaced together with its listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    pub street: String,
    pub district: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A published garage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ParkingId,
    pub profile_id: ProfileId,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    /// Price per hour
    pub price: f64,
    pub phone: String,
    pub spaces: u32,
    pub description: String,
    pub location: Location,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

/// Creation and full-replace payload for a listing.
///
/// Built by [`ListingForm::into_new_listing`](crate::validation::ListingForm::into_new_listing)
/// so that it only ever holds validated values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub profile_id: ProfileId,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub price: f64,
    pub phone: String,
    pub spaces: u32,
    pub description: String,
    pub location: Location,
}

/// One bookable interval of a parking on a given day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub parking_id: ParkingId,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub available: bool,
}

impl Schedule {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.day.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.day.and_time(self.end_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub parking_id: ParkingId,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub available: bool,
}

/// Lifecycle of a reservation.
///
/// The host drives `Pending -> Approved -> InProgress -> Completed`;
/// cancellation is possible until the stay has started.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    Pending,
    Approved,
    InProgress,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Cancelled)
                | (Approved, InProgress)
                | (Approved, Cancelled)
                | (InProgress, Completed)
        )
    }

    pub fn transition_to(&self, next: ReservationStatus) -> Result<ReservationStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub guest_id: ProfileId,
    pub host_id: ProfileId,
    pub parking_id: ParkingId,
    pub vehicle_id: VehicleId,
    pub schedule_id: ScheduleId,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hours_registered: u32,
    pub total_fare: f64,
    pub status: ReservationStatus,
}

impl Reservation {
    /// Whether this reservation still holds its schedule.
    pub fn is_active(&self) -> bool {
        self.status != ReservationStatus::Cancelled
    }
}

/// Identity of the guest making a reservation.
///
/// Resolved once by the caller and passed explicitly; nothing in the crate
/// looks up the current user on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestContext {
    pub profile_id: ProfileId,
}

impl GuestContext {
    pub fn new(profile_id: ProfileId) -> Self {
        Self { profile_id }
    }
}

impl From<&Profile> for GuestContext {
    fn from(profile: &Profile) -> Self {
        Self::new(profile.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub guest_id: ProfileId,
    pub host_id: ProfileId,
    pub parking_id: ParkingId,
    pub vehicle_id: VehicleId,
    pub schedule_id: ScheduleId,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hours_registered: u32,
    pub total_fare: f64,
    pub status: ReservationStatus,
}

impl NewReservation {
    /// Drafts the reservation of one schedule slot.
    ///
    /// The fare uses the listing's current price as a snapshot, so
    /// `total_fare == hours_registered * listing.price` at creation time.
    pub fn for_schedule(
        guest: GuestContext,
        listing: &Listing,
        vehicle_id: VehicleId,
        schedule: &Schedule,
    ) -> Result<Self> {
        if schedule.parking_id != listing.id {
            return Err(DomainError::ParkingMismatch {
                schedule: schedule.id,
                expected: listing.id,
                actual: schedule.parking_id,
            });
        }
        if !schedule.available {
            return Err(DomainError::ScheduleUnavailable(schedule.id));
        }

        let Fare {
            hours_registered,
            total_fare,
        } = fare_for_schedule(schedule, listing.price)?;

        Ok(Self {
            guest_id: guest.profile_id,
            host_id: listing.profile_id,
            parking_id: listing.id,
            vehicle_id,
            schedule_id: schedule.id,
            reservation_date: schedule.day,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            hours_registered,
            total_fare,
            status: ReservationStatus::Pending,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub reservation_id: ReservationId,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_last_four: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub reservation_id: ReservationId,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_last_four: Option<String>,
}

impl NewPayment {
    /// Drafts the payment of an approved reservation for its full fare.
    ///
    /// Only the brand and last four digits of `card_number` are kept.
    pub fn for_reservation(
        reservation: &Reservation,
        currency: &str,
        payment_method: &str,
        card_number: Option<&str>,
    ) -> Result<Self> {
        if reservation.status != ReservationStatus::Approved {
            return Err(DomainError::PaymentNotAllowed(reservation.status));
        }

        let digits: Option<String> =
            card_number.map(|n| n.chars().filter(|c| c.is_ascii_digit()).collect());
        let digits = digits.filter(|d| d.len() >= 4);

        Ok(Self {
            reservation_id: reservation.id,
            amount: reservation.total_fare,
            currency: currency.to_string(),
            status: PaymentStatus::Pending,
            payment_method: payment_method.to_string(),
            card_brand: digits.as_deref().map(card_brand).map(str::to_string),
            card_last_four: digits.as_deref().map(|d| d[d.len() - 4..].to_string()),
        })
    }
}

/// Best-effort card network from the leading digits
pub fn card_brand(digits: &str) -> &'static str {
    match digits.as_bytes() {
        [b'4', ..] => "visa",
        [b'5', b'1'..=b'5', ..] => "mastercard",
        [b'2', b'2'..=b'7', ..] => "mastercard",
        [b'3', b'4' | b'7', ..] => "amex",
        [b'3', b'6' | b'8', ..] | [b'3', b'0', ..] => "diners",
        _ => "unknown",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> Listing {
        Listing {
            id: 3,
            profile_id: 40,
            width: 2.5,
            length: 5.0,
            height: 2.1,
            price: 15.0,
            phone: "+51987654321".to_string(),
            spaces: 1,
            description: "Covered garage near the park".to_string(),
            location: Location {
                address: "Av. Larco 123".to_string(),
                street_number: Some("123".to_string()),
                street: "Av. Larco".to_string(),
                district: "Miraflores".to_string(),
                city: "Lima".to_string(),
                latitude: -12.12,
                longitude: -77.03,
            },
            schedules: Vec::new(),
        }
    }

    fn schedule(id: ScheduleId, parking_id: ParkingId, available: bool) -> Schedule {
        Schedule {
            id,
            parking_id,
            day: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            available,
        }
    }

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: 9,
            guest_id: 1,
            host_id: 40,
            parking_id: 3,
            vehicle_id: 2,
            schedule_id: 11,
            reservation_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            hours_registered: 1,
            total_fare: 15.0,
            status,
        }
    }

    #[test]
    fn status_transitions_follow_host_flow() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Approved));

        for status in [Pending, Approved, InProgress, Completed, Cancelled] {
            let has_exit = [Pending, Approved, InProgress, Completed, Cancelled]
                .into_iter()
                .any(|next| status.can_transition_to(next));
            assert_eq!(status.is_terminal(), !has_exit, "{status}");
        }

        assert_eq!(
            Completed.transition_to(Cancelled),
            Err(DomainError::InvalidTransition {
                from: Completed,
                to: Cancelled
            })
        );
    }

    #[test]
    fn draft_reservation_snapshots_listing_price() {
        let draft =
            NewReservation::for_schedule(GuestContext::new(1), &listing(), 2, &schedule(11, 3, true))
                .unwrap();
        assert_eq!(draft.host_id, 40);
        assert_eq!(draft.hours_registered, 2);
        assert_eq!(draft.total_fare, 30.0);
        assert_eq!(draft.status, ReservationStatus::Pending);
    }

    #[test]
    fn draft_reservation_rejects_foreign_or_taken_schedule() {
        let guest = GuestContext::new(1);
        assert!(matches!(
            NewReservation::for_schedule(guest, &listing(), 2, &schedule(11, 4, true)),
            Err(DomainError::ParkingMismatch { expected: 3, actual: 4, .. })
        ));
        assert_eq!(
            NewReservation::for_schedule(guest, &listing(), 2, &schedule(11, 3, false)),
            Err(DomainError::ScheduleUnavailable(11))
        );
    }

    #[test]
    fn payment_requires_approved_reservation() {
        let pending = reservation(ReservationStatus::Pending);
        assert_eq!(
            NewPayment::for_reservation(&pending, "PEN", "card", None),
            Err(DomainError::PaymentNotAllowed(ReservationStatus::Pending))
        );

        let approved = reservation(ReservationStatus::Approved);
        let payment =
            NewPayment::for_reservation(&approved, "PEN", "card", Some("4111 1111 1111 1234"))
                .unwrap();
        assert_eq!(payment.amount, 15.0);
        assert_eq!(payment.card_brand.as_deref(), Some("visa"));
        assert_eq!(payment.card_last_four.as_deref(), Some("1234"));
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn reservation_json_uses_backend_field_names() {
        let value = serde_json::to_value(reservation(ReservationStatus::InProgress)).unwrap();
        assert_eq!(value["hoursRegistered"], json!(1));
        assert_eq!(value["totalFare"], json!(15.0));
        assert_eq!(value["status"], json!("InProgress"));
        assert_eq!(value["startTime"], json!("08:00:00"));
        assert_eq!(value["reservationDate"], json!("2025-06-01"));
    }

    #[test]
    fn listing_without_schedules_deserializes() {
        let mut value = serde_json::to_value(listing()).unwrap();
        value.as_object_mut().unwrap().remove("schedules");
        let parsed: Listing = serde_json::from_value(value).unwrap();
        assert!(parsed.schedules.is_empty());
    }
}

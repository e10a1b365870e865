//! Reservations and multi-slot booking

use async_trait::async_trait;
use log::{info, warn};
use parkly_domain::models::{
    GuestContext, Listing, NewReservation, ProfileId, Reservation, ReservationId,
    ReservationStatus, Schedule, VehicleId,
};
use parkly_domain::BatchOutcome;
use serde::Serialize;

use crate::error::Result;
use crate::fetch::Endpoint;

/// Something that can create one reservation.
///
/// Implemented by [`ReservationClient`]; multi-slot booking only needs
/// this seam.
#[async_trait]
pub trait ReservationGateway: Send + Sync {
    async fn submit_reservation(&self, draft: &NewReservation) -> Result<Reservation>;
}

/// Books each selected schedule as its own reservation.
///
/// All drafts are built before anything is sent, so a schedule from another
/// parking or an unavailable schedule fails the whole call up front. The
/// drafts are then submitted one by one with no rollback: the returned
/// outcome holds the reservations the backend accepted and one failure per
/// rejected slot.
pub async fn reserve_slots<G>(
    gateway: &G,
    guest: GuestContext,
    listing: &Listing,
    vehicle_id: VehicleId,
    schedules: &[Schedule],
) -> Result<BatchOutcome<Reservation>>
where
    G: ReservationGateway + ?Sized,
{
    let drafts = schedules
        .iter()
        .map(|schedule| NewReservation::for_schedule(guest, listing, vehicle_id, schedule))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut outcome = BatchOutcome::new();
    for (index, draft) in drafts.iter().enumerate() {
        match gateway.submit_reservation(draft).await {
            Ok(reservation) => outcome.record_success(reservation),
            Err(err) => {
                warn!(
                    "reservation of schedule {} for guest {} failed: {}",
                    draft.schedule_id, guest.profile_id, err
                );
                let kind = err.api_kind().map(|k| k.as_str());
                outcome.record_failure(index, err.to_string(), kind);
            }
        }
    }

    info!(
        "guest {} reserved {} of {} slots on parking {}",
        guest.profile_id,
        outcome.succeeded_count(),
        outcome.attempted(),
        listing.id
    );
    Ok(outcome)
}

#[derive(Serialize)]
struct StatusUpdate {
    status: ReservationStatus,
}

/// Client for `/reservations`
#[derive(Debug, Clone)]
pub struct ReservationClient {
    endpoint: Endpoint,
}

impl ReservationClient {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub async fn list(&self) -> Result<Vec<Reservation>> {
        self.endpoint.get("").execute().await
    }

    pub async fn get(&self, id: ReservationId) -> Result<Reservation> {
        self.endpoint.get(&id.to_string()).execute().await
    }

    /// Reservations made by a guest
    pub async fn list_for_guest(&self, guest: ProfileId) -> Result<Vec<Reservation>> {
        self.endpoint
            .get(&format!("guest/{}", guest))
            .execute()
            .await
    }

    /// Reservations on a host's parkings
    pub async fn list_for_host(&self, host: ProfileId) -> Result<Vec<Reservation>> {
        self.endpoint
            .get(&format!("host/{}", host))
            .execute()
            .await
    }

    pub async fn create(&self, draft: &NewReservation) -> Result<Reservation> {
        self.endpoint.post("").json(draft)?.execute().await
    }

    /// See [`reserve_slots`]
    pub async fn reserve_slots(
        &self,
        guest: GuestContext,
        listing: &Listing,
        vehicle_id: VehicleId,
        schedules: &[Schedule],
    ) -> Result<BatchOutcome<Reservation>> {
        reserve_slots(self, guest, listing, vehicle_id, schedules).await
    }

    /// Moves a reservation to `next` after checking the transition locally
    pub async fn update_status(
        &self,
        reservation: &Reservation,
        next: ReservationStatus,
    ) -> Result<Reservation> {
        let status = reservation.status.transition_to(next)?;
        self.endpoint
            .put(&format!("{}/status", reservation.id))
            .json(&StatusUpdate { status })?
            .execute()
            .await
    }

    pub async fn approve(&self, reservation: &Reservation) -> Result<Reservation> {
        self.update_status(reservation, ReservationStatus::Approved)
            .await
    }

    pub async fn cancel(&self, reservation: &Reservation) -> Result<Reservation> {
        self.update_status(reservation, ReservationStatus::Cancelled)
            .await
    }
}

#[async_trait]
impl ReservationGateway for ReservationClient {
    async fn submit_reservation(&self, draft: &NewReservation) -> Result<Reservation> {
        self.create(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ApiErrorKind, Error};
    use chrono::{NaiveDate, NaiveTime};
    use parkly_domain::models::Location;
    use parkly_domain::DomainError;
    use reqwest::StatusCode;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Accepts every draft except those for the listed schedules
    struct FakeBackend {
        rejected: HashSet<i64>,
        submitted: Mutex<Vec<i64>>,
    }

    impl FakeBackend {
        fn rejecting(ids: &[i64]) -> Self {
            Self {
                rejected: ids.iter().copied().collect(),
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReservationGateway for FakeBackend {
        async fn submit_reservation(&self, draft: &NewReservation) -> Result<Reservation> {
            self.submitted.lock().unwrap().push(draft.schedule_id);
            if self.rejected.contains(&draft.schedule_id) {
                return Err(Error::Api(ApiError::from_response(
                    StatusCode::CONFLICT,
                    r#"{"message":"schedule already reserved"}"#,
                )));
            }
            Ok(Reservation {
                id: draft.schedule_id + 1000,
                guest_id: draft.guest_id,
                host_id: draft.host_id,
                parking_id: draft.parking_id,
                vehicle_id: draft.vehicle_id,
                schedule_id: draft.schedule_id,
                reservation_date: draft.reservation_date,
                start_time: draft.start_time,
                end_time: draft.end_time,
                hours_registered: draft.hours_registered,
                total_fare: draft.total_fare,
                status: draft.status,
            })
        }
    }

    fn listing() -> Listing {
        Listing {
            id: 8,
            profile_id: 50,
            width: 2.5,
            length: 5.0,
            height: 2.2,
            price: 15.0,
            phone: "987654321".to_string(),
            spaces: 1,
            description: "Garage close to the stadium".to_string(),
            location: Location {
                address: "Calle Uno 1".to_string(),
                street_number: None,
                street: "Calle Uno".to_string(),
                district: "Surco".to_string(),
                city: "Lima".to_string(),
                latitude: -12.1,
                longitude: -77.0,
            },
            schedules: Vec::new(),
        }
    }

    fn schedule(id: i64, hour: u32) -> Schedule {
        Schedule {
            id,
            parking_id: 8,
            day: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
            available: true,
        }
    }

    #[tokio::test]
    async fn partial_failure_keeps_accepted_reservations() {
        let backend = FakeBackend::rejecting(&[2]);
        let schedules = vec![schedule(1, 8), schedule(2, 9), schedule(3, 10)];

        let outcome = reserve_slots(&backend, GuestContext::new(4), &listing(), 6, &schedules)
            .await
            .unwrap();

        assert_eq!(outcome.succeeded_count(), 2);
        assert_eq!(outcome.failed_count(), 1);
        assert_eq!(outcome.failed[0].index, 1);
        assert!(outcome.failed[0].reason.contains("schedule already reserved"));
        assert_eq!(
            outcome.failed[0].kind.as_deref(),
            Some(ApiErrorKind::Conflict.as_str())
        );
        let reserved: Vec<i64> = outcome.succeeded.iter().map(|r| r.schedule_id).collect();
        assert_eq!(reserved, vec![1, 3]);
        assert!(outcome.succeeded.iter().all(|r| r.total_fare == 15.0));
        assert_eq!(*backend.submitted.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn foreign_schedule_fails_before_any_submission() {
        let backend = FakeBackend::rejecting(&[]);
        let mut foreign = schedule(2, 9);
        foreign.parking_id = 99;

        let result = reserve_slots(
            &backend,
            GuestContext::new(4),
            &listing(),
            6,
            &[schedule(1, 8), foreign],
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::Domain(DomainError::ParkingMismatch { schedule: 2, .. }))
        ));
        assert!(backend.submitted.lock().unwrap().is_empty());
    }
}

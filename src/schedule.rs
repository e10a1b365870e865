//! Availability schedules

use chrono::NaiveDate;
use log::{info, warn};
use parkly_domain::models::{NewSchedule, ParkingId, Schedule, ScheduleId};
use parkly_domain::{group_by_day, BatchOutcome, ScheduleCalendar, ScheduleForm, SlotWindow};

use crate::error::Result;
use crate::fetch::Endpoint;

/// Client for `/schedules`.
///
/// There is deliberately no delete operation: the backend exposes none.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    endpoint: Endpoint,
}

impl ScheduleClient {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub async fn list(&self) -> Result<Vec<Schedule>> {
        self.endpoint.get("").execute().await
    }

    pub async fn get(&self, id: ScheduleId) -> Result<Schedule> {
        self.endpoint.get(&id.to_string()).execute().await
    }

    pub async fn list_for_parking(&self, parking_id: ParkingId) -> Result<Vec<Schedule>> {
        self.endpoint
            .get(&format!("parking/{}", parking_id))
            .execute()
            .await
    }

    /// A parking's schedules grouped by day
    pub async fn calendar(&self, parking_id: ParkingId) -> Result<ScheduleCalendar> {
        let schedules = self.list_for_parking(parking_id).await?;
        Ok(group_by_day(&schedules, parking_id))
    }

    /// Creates one schedule covering the whole form window
    pub async fn create(
        &self,
        parking_id: ParkingId,
        form: ScheduleForm,
        today: NaiveDate,
    ) -> Result<Schedule> {
        let new_schedule = form.into_new_schedule(parking_id, today)?;
        self.submit(&new_schedule).await
    }

    /// Cuts the form window into hourly slots and creates one schedule per
    /// slot.
    ///
    /// Slots are submitted one after another; a rejected slot does not stop
    /// the rest, and accepted slots are kept.
    pub async fn create_window(
        &self,
        parking_id: ParkingId,
        form: ScheduleForm,
        today: NaiveDate,
    ) -> Result<BatchOutcome<Schedule>> {
        form.check(today)?;
        let window = SlotWindow::try_new(form.day, form.start_time, form.end_time)?;

        let mut outcome = BatchOutcome::new();
        for (index, slot) in window.into_iter().enumerate() {
            match self.submit(&slot.to_new_schedule(parking_id)).await {
                Ok(schedule) => outcome.record_success(schedule),
                Err(err) => {
                    warn!(
                        "slot {}-{} on {} for parking {} rejected: {}",
                        slot.start, slot.end, slot.day, parking_id, err
                    );
                    let kind = err.api_kind().map(|k| k.as_str());
                    outcome.record_failure(index, err.to_string(), kind);
                }
            }
        }

        info!(
            "parking {}: {} of {} slots created for {}",
            parking_id,
            outcome.succeeded_count(),
            outcome.attempted(),
            form.day
        );
        Ok(outcome)
    }

    async fn submit(&self, new_schedule: &NewSchedule) -> Result<Schedule> {
        self.endpoint.post("").json(new_schedule)?.execute().await
    }
}

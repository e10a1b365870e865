//! Payments for approved reservations

use log::info;
use parkly_domain::models::{NewPayment, Payment, PaymentId, Reservation, ReservationId};

use crate::error::Result;
use crate::fetch::Endpoint;

/// Client for `/payments`.
///
/// The backend records payments; no card data beyond brand and last four
/// digits ever leaves this client.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    endpoint: Endpoint,
    currency: String,
}

impl PaymentClient {
    pub(crate) fn new(endpoint: Endpoint, currency: String) -> Self {
        Self { endpoint, currency }
    }

    pub async fn list(&self) -> Result<Vec<Payment>> {
        self.endpoint.get("").execute().await
    }

    pub async fn get(&self, id: PaymentId) -> Result<Payment> {
        self.endpoint.get(&id.to_string()).execute().await
    }

    pub async fn list_for_reservation(&self, reservation_id: ReservationId) -> Result<Vec<Payment>> {
        self.endpoint
            .get(&format!("reservation/{}", reservation_id))
            .execute()
            .await
    }

    /// Records the payment of an approved reservation for its total fare.
    ///
    /// One payment per reservation is expected but not enforced here.
    pub async fn pay(
        &self,
        reservation: &Reservation,
        payment_method: &str,
        card_number: Option<&str>,
    ) -> Result<Payment> {
        let new_payment =
            NewPayment::for_reservation(reservation, &self.currency, payment_method, card_number)?;
        let payment: Payment = self.endpoint.post("").json(&new_payment)?.execute().await?;
        info!(
            "payment {} of {} {} recorded for reservation {}",
            payment.id, payment.amount, payment.currency, reservation.id
        );
        Ok(payment)
    }
}

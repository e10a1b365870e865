//! Parking listings

use log::{debug, info};
use parkly_domain::models::{Listing, ParkingId, ProfileId};
use parkly_domain::ListingForm;

use crate::error::Result;
use crate::fetch::Endpoint;

/// Client for `/parkings`
#[derive(Debug, Clone)]
pub struct ParkingClient {
    endpoint: Endpoint,
}

impl ParkingClient {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// All published listings
    pub async fn list(&self) -> Result<Vec<Listing>> {
        self.endpoint.get("").execute().await
    }

    pub async fn get(&self, id: ParkingId) -> Result<Listing> {
        self.endpoint.get(&id.to_string()).execute().await
    }

    /// Listings published by one owner
    pub async fn list_by_owner(&self, owner: ProfileId) -> Result<Vec<Listing>> {
        self.endpoint
            .get(&format!("profile/{}", owner))
            .execute()
            .await
    }

    /// Publishes a listing.
    ///
    /// The form is validated first; on any violation nothing is sent and
    /// every broken rule is returned in [`Error::Validation`](crate::error::Error::Validation).
    pub async fn create(&self, owner: ProfileId, form: ListingForm) -> Result<Listing> {
        let new_listing = form.into_new_listing(owner)?;
        let listing: Listing = self.endpoint.post("").json(&new_listing)?.execute().await?;
        info!("published parking {} for profile {}", listing.id, owner);
        Ok(listing)
    }

    /// Replaces a listing, location included
    pub async fn update(&self, id: ParkingId, owner: ProfileId, form: ListingForm) -> Result<Listing> {
        let new_listing = form.into_new_listing(owner)?;
        self.endpoint
            .put(&id.to_string())
            .json(&new_listing)?
            .execute()
            .await
    }

    /// Deletes a listing.
    ///
    /// Whether the backend also removes the listing's schedules and
    /// reservations is not part of its contract; callers should refetch
    /// rather than assume either way.
    pub async fn delete(&self, id: ParkingId) -> Result<()> {
        debug!("deleting parking {}", id);
        self.endpoint.delete(&id.to_string()).execute_empty().await
    }
}

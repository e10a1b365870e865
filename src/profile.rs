//! User profiles

use parkly_domain::models::{Profile, ProfileId};

use crate::error::Result;
use crate::fetch::Endpoint;

/// Client for `/profiles`
#[derive(Debug, Clone)]
pub struct ProfileClient {
    endpoint: Endpoint,
}

impl ProfileClient {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub async fn list(&self) -> Result<Vec<Profile>> {
        self.endpoint.get("").execute().await
    }

    pub async fn get(&self, id: ProfileId) -> Result<Profile> {
        self.endpoint.get(&id.to_string()).execute().await
    }

    /// Resolves the profile of an authenticated user.
    ///
    /// Meant to be called once per session; pass the result on as a
    /// [`GuestContext`](parkly_domain::models::GuestContext) instead of
    /// looking it up again. The `userId` filter is sent to the backend, and
    /// the response is still checked in case the backend ignores it.
    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>> {
        let profiles: Vec<Profile> = self
            .endpoint
            .get("")
            .query("userId", user_id)
            .execute()
            .await?;
        Ok(profiles.into_iter().find(|p| p.user_id == user_id))
    }
}

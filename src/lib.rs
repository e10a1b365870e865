//! parkly Rust client library
//!
//! A client for the parkly parking marketplace backend, providing access to
//! listings, schedules, reservations, payments and profiles. The scheduling
//! and pricing rules live in [`parkly_domain`] and are re-exported as
//! [`domain`].

pub mod config;
pub mod error;
pub mod fetch;
pub mod parking;
pub mod payment;
pub mod profile;
pub mod reservation;
pub mod schedule;

pub use parkly_domain as domain;

use reqwest::Client;

use crate::config::{ClientOptions, ParklyConfig};
use crate::error::{Error, Result};
use crate::fetch::Endpoint;
use crate::parking::ParkingClient;
use crate::payment::PaymentClient;
use crate::profile::ProfileClient;
use crate::reservation::ReservationClient;
use crate::schedule::ScheduleClient;

/// The main entry point for the parkly client
#[derive(Debug, Clone)]
pub struct Parkly {
    /// The backend base URL, without a trailing slash
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl Parkly {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```
    /// use parkly::Parkly;
    ///
    /// let parkly = Parkly::new("http://localhost:8080").unwrap();
    /// let parkings = parkly.parkings();
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use parkly::{Parkly, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_access_token("token");
    /// let parkly = Parkly::new_with_options("http://localhost:8080", options).unwrap();
    /// ```
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Result<Self> {
        Self::from_config(ParklyConfig::new(base_url, options)?)
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: ParklyConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            url: config.base_url(),
            http_client,
            options: config.options,
        })
    }

    /// Create a client from `PARKLY_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(ParklyConfig::from_env()?)
    }

    fn endpoint(&self, resource: &str) -> Endpoint {
        let prefix = self.options.api_prefix.trim_matches('/');
        let base = if prefix.is_empty() {
            format!("{}/{}", self.url, resource)
        } else {
            format!("{}/{}/{}", self.url, prefix, resource)
        };
        Endpoint::new(
            base,
            self.http_client.clone(),
            self.options.access_token.clone(),
        )
    }

    /// Client for parking listings
    pub fn parkings(&self) -> ParkingClient {
        ParkingClient::new(self.endpoint("parkings"))
    }

    /// Client for availability schedules
    pub fn schedules(&self) -> ScheduleClient {
        ScheduleClient::new(self.endpoint("schedules"))
    }

    /// Client for reservations
    pub fn reservations(&self) -> ReservationClient {
        ReservationClient::new(self.endpoint("reservations"))
    }

    /// Client for payments
    pub fn payments(&self) -> PaymentClient {
        PaymentClient::new(
            self.endpoint("payments"),
            self.options.default_currency.clone(),
        )
    }

    /// Client for user profiles
    pub fn profiles(&self) -> ProfileClient {
        ProfileClient::new(self.endpoint("profiles"))
    }
}

impl TryFrom<ParklyConfig> for Parkly {
    type Error = Error;

    fn try_from(config: ParklyConfig) -> Result<Self> {
        Self::from_config(config)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::{ApiError, ApiErrorKind, Error};
    pub use crate::reservation::{reserve_slots, ReservationGateway};
    pub use crate::Parkly;
    pub use parkly_domain::prelude::*;
}

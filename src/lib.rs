//! RTE open data client for Rust.
//!
//! Fetches French electricity consumption from the RTE open data API and
//! returns it as fixed-frequency series on a canonical time grid. Each RTE API
//! surface has its own OAuth2 client credentials; access tokens are cached in
//! memory per service and refreshed shortly before they expire.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::TimeZone;
//! use rte_client::{ApiService, Credential, ForecastType, RteClient};
//!
//! let client = RteClient::builder()
//!     .credential(ApiService::ShortTermConsumption, Credential::new("id", "secret"))
//!     .build()
//!     .unwrap();
//!
//! let start = chrono_tz::CET.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let end = chrono_tz::CET.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
//! let series = client
//!     .fetch_short_term_consumption(start, end, ForecastType::Realised, None)
//!     .unwrap();
//! println!("{series}");
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod auth;
pub mod config;
pub mod connection;
pub mod credentials;
pub mod error;
pub mod frequency;
pub mod models;
pub mod queries;
pub mod reconcile;
pub mod response;
pub mod transport;
pub mod window;

#[cfg(feature = "async")]
pub use async_client::AsyncRteClient;
pub use auth::TokenAuthenticator;
pub use connection::Connection;
pub use credentials::{BearerToken, Credential, CredentialStore, TokenState};
pub use error::{Result, RteError};
pub use frequency::Frequency;
pub use models::{ApiService, CanonicalSeries, ForecastType, RawObservation};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use window::{RequestWindow, WindowBound};

use std::fmt;
use std::time::Duration;

use chrono::TimeDelta;
use chrono_tz::Tz;

// ---------------------------------------------------------------------------
// RteClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`RteClient`] instance.
///
/// Use [`RteClient::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](RteClientBuilder::build) to create the client.
pub struct RteClientBuilder {
    credentials: Vec<(ApiService, Credential)>,
    base_url: String,
    token_url: String,
    timeout: Duration,
    connect_timeout: Duration,
    display_tz: Tz,
    token_margin: TimeDelta,
    transport: Option<Box<dyn Transport>>,
}

impl Default for RteClientBuilder {
    fn default() -> Self {
        Self {
            credentials: Vec::new(),
            base_url: config::RTE_BASE_URL.to_string(),
            token_url: config::TOKEN_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            connect_timeout: config::DEFAULT_CONNECT_TIMEOUT,
            display_tz: config::DISPLAY_TZ,
            token_margin: TimeDelta::seconds(config::TOKEN_EXPIRY_MARGIN_SECS),
            transport: None,
        }
    }
}

impl RteClientBuilder {
    /// Supply the client credentials for one API service.
    ///
    /// Calling this twice for the same service keeps the last credential.
    pub fn credential(mut self, service: ApiService, credential: Credential) -> Self {
        self.credentials.retain(|(s, _)| *s != service);
        self.credentials.push((service, credential));
        self
    }

    /// Supply credentials for several services at once.
    pub fn credentials<I>(mut self, credentials: I) -> Self
    where
        I: IntoIterator<Item = (ApiService, Credential)>,
    {
        for (service, credential) in credentials {
            self = self.credential(service, credential);
        }
        self
    }

    /// Set the API base URL. Defaults to [`config::RTE_BASE_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the OAuth2 token endpoint. Defaults to [`config::TOKEN_URL`].
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Set the overall HTTP request timeout.
    ///
    /// Defaults to 60 seconds. Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the HTTP connect timeout.
    ///
    /// Defaults to 20 seconds. Ignored when a custom transport is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the timezone returned series are presented in. Defaults to CET.
    pub fn display_tz(mut self, tz: Tz) -> Self {
        self.display_tz = tz;
        self
    }

    /// Set how long before expiry a cached token stops being reused.
    ///
    /// Defaults to 5 minutes.
    pub fn token_margin(mut self, margin: TimeDelta) -> Self {
        self.token_margin = margin;
        self
    }

    /// Use a custom [`Transport`] instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// No request is sent: tokens are fetched lazily on the first call that
    /// needs them.
    pub fn build(self) -> Result<RteClient> {
        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new(self.timeout, self.connect_timeout)?),
        };
        let store = CredentialStore::new(&self.token_url, self.credentials);
        let auth = TokenAuthenticator::new(store).with_margin(self.token_margin);
        let conn = Connection::new(transport, auth, self.base_url, self.display_tz);
        Ok(RteClient { conn })
    }
}

// ---------------------------------------------------------------------------
// RteClient
// ---------------------------------------------------------------------------

/// The main entry point for the RTE open data API.
///
/// Wraps a [`Connection`] (which owns the transport and the token cache) and
/// exposes endpoint-specific query interfaces as lightweight borrowing wrappers.
///
/// Created via [`RteClient::builder()`].
pub struct RteClient {
    conn: Connection,
}

impl RteClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> RteClientBuilder {
        RteClientBuilder::default()
    }

    /// Access the consumption query interface.
    pub fn consumption(&self) -> queries::consumption::ConsumptionQuery<'_> {
        queries::consumption::ConsumptionQuery::new(&self.conn)
    }

    /// Fetch short-term consumption for `[start, end)`.
    ///
    /// `frequency` defaults to 15 minutes. See
    /// [`ConsumptionQuery::short_term`](queries::consumption::ConsumptionQuery::short_term).
    pub fn fetch_short_term_consumption(
        &self,
        start: impl Into<WindowBound>,
        end: impl Into<WindowBound>,
        forecast: ForecastType,
        frequency: Option<Frequency>,
    ) -> Result<CanonicalSeries> {
        self.consumption()
            .short_term(start, end, forecast, frequency.unwrap_or_default())
    }

    /// Return a reference to the token authenticator.
    pub fn auth(&self) -> &TokenAuthenticator {
        &self.conn.auth
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for RteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configured: Vec<String> = self
            .conn
            .auth
            .store()
            .configured_services()
            .iter()
            .map(ApiService::to_string)
            .collect();
        write!(
            f,
            "RteClient(base_url={}, services=[{}], tz={})",
            self.conn.base_url(),
            configured.join(", "),
            self.conn.display_tz()
        )
    }
}

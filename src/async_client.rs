//! Async wrapper around [`RteClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all client operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! token refreshes and data requests block on the network.
//!
//! # Example
//!
//! ```no_run
//! use rte_client::{ApiService, AsyncRteClient, Credential, ForecastType, RteClient, WindowBound};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let builder = RteClient::builder()
//!         .credential(ApiService::ShortTermConsumption, Credential::new("id", "secret"));
//!     let client = AsyncRteClient::build(builder).await.unwrap();
//!
//!     let start: WindowBound = "2020-01-01T00:00:00+01:00".parse().unwrap();
//!     let end: WindowBound = "2020-01-02T00:00:00+01:00".parse().unwrap();
//!     let series = client
//!         .fetch_short_term_consumption(start, end, ForecastType::Realised, None)
//!         .await
//!         .unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{Result, RteError};
use crate::frequency::Frequency;
use crate::models::{CanonicalSeries, ForecastType};
use crate::window::WindowBound;
use crate::{RteClient, RteClientBuilder};

/// Async wrapper around [`RteClient`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`RteClient`] is protected
/// by a [`Mutex`] since its token cache uses `RefCell` internally. This also
/// serialises token refreshes across tasks.
pub struct AsyncRteClient {
    inner: Arc<Mutex<RteClient>>,
}

impl AsyncRteClient {
    /// Build the client on the blocking thread pool.
    pub async fn build(builder: RteClientBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let client = builder.build()?;
            Ok(AsyncRteClient::from_client(client))
        })
        .await
        .map_err(|e| RteError::Task(format!("join error: {e}")))?
    }

    /// Wrap an already built client.
    pub fn from_client(client: RteClient) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Run a sync client operation on the blocking thread pool.
    ///
    /// The closure receives an `&RteClient` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&RteClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = client
                .lock()
                .map_err(|_| RteError::Task("client lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| RteError::Task(format!("join error: {e}")))?
    }

    /// Fetch short-term consumption asynchronously.
    ///
    /// Convenience wrapper around [`run()`](Self::run) for
    /// [`RteClient::fetch_short_term_consumption()`].
    pub async fn fetch_short_term_consumption(
        &self,
        start: impl Into<WindowBound>,
        end: impl Into<WindowBound>,
        forecast: ForecastType,
        frequency: Option<Frequency>,
    ) -> Result<CanonicalSeries> {
        let start = start.into();
        let end = end.into();
        self.run(move |c| c.fetch_short_term_consumption(start, end, forecast, frequency))
            .await
    }
}

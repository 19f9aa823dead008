//! Authenticated connection to the RTE API.
//!
//! Owns the transport and the token authenticator, and runs the response gate
//! on every exchange it performs.

use chrono_tz::Tz;
use serde::de::DeserializeOwned;

use crate::auth::TokenAuthenticator;
use crate::config;
use crate::error::Result;
use crate::models::ApiService;
use crate::response::check_response;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Wraps a [`Transport`] together with the [`TokenAuthenticator`] that signs
/// requests sent through it.
pub struct Connection {
    transport: Box<dyn Transport>,
    /// Token cache and refresh logic, one slot per service.
    pub auth: TokenAuthenticator,
    base_url: String,
    display_tz: Tz,
}

impl Connection {
    pub fn new(
        transport: Box<dyn Transport>,
        auth: TokenAuthenticator,
        base_url: impl Into<String>,
        display_tz: Tz,
    ) -> Self {
        Self {
            transport,
            auth,
            base_url: base_url.into(),
            display_tz,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }

    /// Absolute URL for an endpoint path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        config::endpoint_url(&self.base_url, path)
    }

    /// Send `request` without authentication and check the response status.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request)?;
        check_response(&response)?;
        Ok(response)
    }

    /// Authenticate `request` for `service`, send it, and check the response status.
    pub fn send_authenticated(
        &self,
        request: HttpRequest,
        service: ApiService,
    ) -> Result<HttpResponse> {
        let request = self.auth.authenticate(request, service, self.transport.as_ref())?;
        self.send(request)
    }

    /// Authenticated request whose successful body is decoded as JSON.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        service: ApiService,
    ) -> Result<T> {
        self.send_authenticated(request, service)?.json()
    }
}

//! OAuth2 client-credentials authentication with per-service token caching.
//!
//! [`TokenAuthenticator::authenticate`] is the single entry point: it looks up
//! the [`TokenState`](crate::credentials::TokenState) for the target service,
//! refreshes the token when it is missing or too close to expiry, and returns
//! the request with a bearer header attached.

use std::cell::{Ref, RefCell, RefMut};

use base64::prelude::*;
use chrono::{TimeDelta, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::config;
use crate::credentials::{BearerToken, CredentialStore};
use crate::error::{Result, RteError};
use crate::models::ApiService;
use crate::response::check_response;
use crate::transport::{HttpRequest, Transport};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// `Basic base64(client_id:client_secret)`.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let pair = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", BASE64_STANDARD.encode(pair))
}

/// Successful token endpoint payload.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Seconds,
}

/// `expires_in` is documented as an integer but some gateways send it quoted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Seconds {
    Int(i64),
    Text(String),
}

impl Seconds {
    fn get(&self) -> Result<i64> {
        match self {
            Seconds::Int(n) => Ok(*n),
            Seconds::Text(s) => s.trim().parse().map_err(|e| {
                RteError::validation_with(format!("Invalid expires_in value '{}'", s), e)
            }),
        }
    }
}

/// Attaches bearer tokens to outgoing requests, refreshing them as needed.
///
/// Tokens live in a [`CredentialStore`] owned by the authenticator. The store
/// sits behind a `RefCell`, so the authenticator is not `Sync`; share it across
/// threads through a `Mutex`, as the async client does.
#[derive(Debug)]
pub struct TokenAuthenticator {
    store: RefCell<CredentialStore>,
    margin: TimeDelta,
}

impl TokenAuthenticator {
    pub fn new(store: CredentialStore) -> Self {
        Self {
            store: RefCell::new(store),
            margin: TimeDelta::seconds(config::TOKEN_EXPIRY_MARGIN_SECS),
        }
    }

    /// Override the safety margin applied before a token's expiry.
    pub fn with_margin(mut self, margin: TimeDelta) -> Self {
        self.margin = margin;
        self
    }

    pub fn margin(&self) -> TimeDelta {
        self.margin
    }

    pub fn store(&self) -> Ref<'_, CredentialStore> {
        self.store.borrow()
    }

    pub fn store_mut(&self) -> RefMut<'_, CredentialStore> {
        self.store.borrow_mut()
    }

    /// Whether the cached token for `service` must be refreshed before use.
    ///
    /// Fails with [`RteError::Configuration`] if `service` has no credentials.
    pub fn needs_refresh(&self, service: ApiService) -> Result<bool> {
        let store = self.store.borrow();
        let state = store.state(service).ok_or_else(|| missing_credentials(service))?;
        let now = Utc::now();
        Ok(!state
            .token
            .as_ref()
            .is_some_and(|token| token.is_usable_at(now, self.margin)))
    }

    /// Fetch a new token for `service` and store it, replacing the previous one.
    ///
    /// On any failure the cached token is left untouched.
    pub fn refresh_token(&self, service: ApiService, transport: &dyn Transport) -> Result<()> {
        let request = {
            let store = self.store.borrow();
            let state = store.state(service).ok_or_else(|| missing_credentials(service))?;
            let basic = basic_auth_header(
                state.credential.client_id(),
                state.credential.client_secret(),
            );
            let request = HttpRequest::post(state.token_url.as_str())
                .header(CONTENT_TYPE, FORM_URLENCODED)?
                .header(AUTHORIZATION, &basic)?;
            request
        };

        tracing::debug!(%service, url = %request.url, "refreshing access token");
        let response = transport.send(request)?;
        check_response(&response)?;

        let body: TokenResponse = response.json()?;
        let expires_in = body.expires_in.get()?;
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                RteError::validation(format!("Invalid expires_in value '{}'", expires_in))
            })?;

        let mut store = self.store.borrow_mut();
        let state = store
            .state_mut(service)
            .ok_or_else(|| missing_credentials(service))?;
        state.token = Some(BearerToken::new(body.access_token, expires_at));
        tracing::debug!(%service, %expires_at, "access token refreshed");
        Ok(())
    }

    /// Return `request` with an `Authorization: Bearer` header for `service`.
    pub fn authenticate(
        &self,
        mut request: HttpRequest,
        service: ApiService,
        transport: &dyn Transport,
    ) -> Result<HttpRequest> {
        if self.needs_refresh(service)? {
            self.refresh_token(service, transport)?;
        }

        let store = self.store.borrow();
        let token = store
            .state(service)
            .and_then(|state| state.bearer_token())
            .ok_or_else(|| missing_credentials(service))?;
        request.set_header(AUTHORIZATION, &format!("Bearer {}", token))?;
        Ok(request)
    }
}

fn missing_credentials(service: ApiService) -> RteError {
    RteError::Configuration(format!("No credentials provided for RTE {} service", service))
}

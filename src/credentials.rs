//! Per-service client credentials and the token cached for each of them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::models::ApiService;

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// OAuth2 client-credentials pair for one RTE application.
pub struct Credential {
    client_id: String,
    client_secret: SecretString,
}

impl Credential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let client_secret: String = client_secret.into();
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into_boxed_str()),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// BearerToken
// ---------------------------------------------------------------------------

/// An access token together with its expiry.
///
/// The two always travel together so a refresh replaces both at once.
pub struct BearerToken {
    value: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        let value: String = value.into();
        Self {
            value: SecretString::new(value.into_boxed_str()),
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        self.value.expose_secret()
    }

    /// Whether the token stays valid strictly beyond `now + margin`.
    pub fn is_usable_at(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        self.expires_at > now + margin
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TokenState
// ---------------------------------------------------------------------------

/// Everything needed to obtain and reuse a token for one service.
#[derive(Debug)]
pub struct TokenState {
    pub token_url: String,
    pub credential: Credential,
    pub token: Option<BearerToken>,
}

impl TokenState {
    pub fn new(token_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            token_url: token_url.into(),
            credential,
            token: None,
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_ref().map(BearerToken::value)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.as_ref().map(|t| t.expires_at)
    }
}

// ---------------------------------------------------------------------------
// CredentialStore
// ---------------------------------------------------------------------------

/// One slot per known [`ApiService`]: a [`TokenState`] when credentials were
/// supplied, `None` otherwise.
#[derive(Debug)]
pub struct CredentialStore {
    states: BTreeMap<ApiService, Option<TokenState>>,
}

impl CredentialStore {
    /// Build the store. No network activity happens here.
    ///
    /// Services absent from `credentials` get an explicit empty slot.
    pub fn new<I>(token_url: &str, credentials: I) -> Self
    where
        I: IntoIterator<Item = (ApiService, Credential)>,
    {
        let mut supplied: BTreeMap<ApiService, Credential> = credentials.into_iter().collect();
        let states = ApiService::ALL
            .into_iter()
            .map(|service| {
                let state = supplied
                    .remove(&service)
                    .map(|credential| TokenState::new(token_url, credential));
                (service, state)
            })
            .collect();
        Self { states }
    }

    pub fn is_configured(&self, service: ApiService) -> bool {
        matches!(self.states.get(&service), Some(Some(_)))
    }

    pub fn state(&self, service: ApiService) -> Option<&TokenState> {
        self.states.get(&service).and_then(Option::as_ref)
    }

    pub fn state_mut(&mut self, service: ApiService) -> Option<&mut TokenState> {
        self.states.get_mut(&service).and_then(Option::as_mut)
    }

    /// Services with credentials configured, in a stable order.
    pub fn configured_services(&self) -> Vec<ApiService> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_some())
            .map(|(service, _)| *service)
            .collect()
    }

    /// Every known service, configured or not.
    pub fn services(&self) -> impl Iterator<Item = ApiService> + '_ {
        self.states.keys().copied()
    }
}

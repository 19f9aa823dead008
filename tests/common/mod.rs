//! Shared test fixtures for the RTE client integration tests.
//!
//! Provides `FakeTransport`, an in-memory [`Transport`] that replays scripted
//! responses and records every request it receives, plus a one-day realised
//! consumption payload.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, TimeDelta};
use rte_client::{
    config, ApiService, Credential, HttpRequest, HttpResponse, Result, RteClient, Transport,
};
use serde_json::{json, Value};

pub const DATA_URL: &str =
    "https://digital.iservices.rte-france.com/open_api/consumption/v1/short_term";

// ---------------------------------------------------------------------------
// FakeTransport
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Inner {
    token: VecDeque<HttpResponse>,
    data: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

/// Scripted transport. Requests to the token endpoint are answered from the
/// token queue, everything else from the data queue. Clones share state, so a
/// test can keep a handle after moving one into the client.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<Inner>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_token(&self, status: u16, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .token
            .push_back(HttpResponse::new(status, body.to_string()));
    }

    pub fn push_data(&self, status: u16, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .data
            .push_back(HttpResponse::new(status, body.to_string()));
    }

    pub fn push_data_raw(&self, status: u16, body: &str) {
        self.inner
            .lock()
            .unwrap()
            .data
            .push_back(HttpResponse::new(status, body.as_bytes().to_vec()));
    }

    /// Queue a successful token response.
    pub fn push_fake_token(&self, access_token: &str, expires_in: i64) {
        self.push_token(
            200,
            json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "expires_in": expires_in,
            }),
        );
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn token_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url == config::TOKEN_URL)
            .count()
    }

    pub fn data_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url != config::TOKEN_URL)
            .count()
    }

    pub fn last_data_request(&self) -> Option<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url != config::TOKEN_URL)
            .last()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut inner = self.inner.lock().unwrap();
        let queue = if request.url == config::TOKEN_URL {
            &mut inner.token
        } else {
            &mut inner.data
        };
        let response = queue
            .pop_front()
            .unwrap_or_else(|| HttpResponse::new(599, "no scripted response"));
        inner.requests.push(request);
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// Client with short-term consumption credentials `id` / `secret`.
pub fn client_with(transport: &FakeTransport) -> RteClient {
    RteClient::builder()
        .credential(
            ApiService::ShortTermConsumption,
            Credential::new("id", "secret"),
        )
        .transport(Box::new(transport.clone()))
        .build()
        .unwrap()
}

pub fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

pub fn iso(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
}

pub fn query_value(request: &HttpRequest, key: &str) -> Option<String> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// 96 quarter-hour realised values for 2020-01-01 (CET), with the real
/// first and last five points.
pub fn realised_day_values() -> Vec<f64> {
    let head = [65827.0, 65887.0, 64773.0, 63464.0, 63246.0];
    let tail = [64157.0, 63639.0, 63319.0, 62808.0, 63322.0];
    let mut values = head.to_vec();
    values.extend((0..86).map(|i| 62000.0 + (i as f64) * 25.0));
    values.extend(tail);
    values
}

/// `values` entries spaced by `step` from `start`.
pub fn observations(start: &str, step: TimeDelta, values: &[f64]) -> Vec<Value> {
    let start = ts(start);
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let from = start + step * (i as i32);
            json!({
                "start_date": iso(&from),
                "end_date": iso(&(from + step)),
                "value": *v as i64,
                "updated_date": "2020-01-02T00:00:00+01:00",
            })
        })
        .collect()
}

pub fn payload(prevision_type: &str, values: Vec<Value>) -> Value {
    json!({
        "short_term": [{
            "type": prevision_type,
            "start_date": "2020-01-01T00:00:00+01:00",
            "end_date": "2020-01-02T00:00:00+01:00",
            "values": values,
        }]
    })
}

pub fn realised_day_payload() -> Value {
    payload(
        "REALISED",
        observations(
            "2020-01-01T00:00:00+01:00",
            TimeDelta::minutes(15),
            &realised_day_values(),
        ),
    )
}

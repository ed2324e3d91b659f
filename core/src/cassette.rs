//! Recorded HTTP fixtures ("cassettes") for deterministic tests.
//!
//! # Design
//! A `Cassette` is a named list of request/response pairs stored as JSON.
//! Used as a `Transport`, it answers each request with the first recorded
//! interaction whose method, URL and body match; headers are not part of the
//! key, so one cassette works for any token. Bodies are compared as JSON
//! when both sides parse, which makes key order irrelevant.
//!
//! `RecordingTransport` wraps a live transport and captures every exchange
//! so a cassette can be written after a real session.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub request: HttpRequest,
    pub response: HttpResponse,
}

impl Interaction {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.request.method == request.method
            && self.request.url == request.url
            && bodies_match(self.request.body.as_deref(), request.body.as_deref())
    }
}

fn bodies_match(recorded: Option<&str>, actual: Option<&str>) -> bool {
    match (recorded, actual) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            match (
                serde_json::from_str::<serde_json::Value>(a),
                serde_json::from_str::<serde_json::Value>(b),
            ) {
                (Ok(a), Ok(b)) => a == b,
                _ => a == b,
            }
        }
        _ => false,
    }
}

/// A named, replayable set of interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cassette {
    pub name: String,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interactions: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    pub fn push(&mut self, request: HttpRequest, response: HttpResponse) {
        self.interactions.push(Interaction { request, response });
    }

    pub fn find(&self, request: &HttpRequest) -> Option<&Interaction> {
        self.interactions.iter().find(|i| i.matches(request))
    }
}

impl Transport for Cassette {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        match self.find(request) {
            Some(interaction) => {
                debug!(cassette = %self.name, url = %request.url, "replaying interaction");
                Ok(interaction.response.clone())
            }
            None => {
                warn!(cassette = %self.name, url = %request.url, "no recorded interaction");
                Err(TransportError(format!(
                    "cassette {:?} has no interaction for {} {}",
                    self.name,
                    request.method.as_str(),
                    request.url
                )))
            }
        }
    }
}

/// Forwards to an inner transport and records every completed exchange.
#[derive(Debug)]
pub struct RecordingTransport<T> {
    inner: T,
    recorded: Mutex<Vec<Interaction>>,
}

impl<T: Transport> RecordingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn cassette(&self, name: impl Into<String>) -> Cassette {
        let interactions = match self.recorded.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Cassette {
            name: name.into(),
            interactions,
        }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport> Transport for RecordingTransport<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.inner.execute(request)?;
        let interaction = Interaction {
            request: request.clone(),
            response: response.clone(),
        };
        match self.recorded.lock() {
            Ok(mut log) => log.push(interaction),
            Err(poisoned) => poisoned.into_inner().push(interaction),
        }
        Ok(response)
    }
}

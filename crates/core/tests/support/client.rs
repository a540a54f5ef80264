//! Recording mock for the `AuthenticatedClient` port

use std::collections::HashMap;
use std::sync::Arc;

use freeagent_common::wire::WireRecord;
use freeagent_core::AuthenticatedClient;
use freeagent_domain::{FreeAgentError, Result as DomainResult};
use parking_lot::Mutex;

/// One call made through the port
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get { path: String },
    Put { url: String, root_key: String, body: WireRecord },
    Post { path: String, root_key: String, body: WireRecord },
}

#[derive(Default)]
struct State {
    responses: HashMap<String, WireRecord>,
    failures: HashMap<String, FreeAgentError>,
    calls: Vec<Call>,
}

/// In-memory `AuthenticatedClient`.
///
/// GET paths without a canned response fail with a 404 API error. POST
/// echoes the body back under the root key.
#[derive(Default, Clone)]
pub struct RecordingClient {
    state: Arc<Mutex<State>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `GET path`.
    pub fn with_get(self, path: &str, body: WireRecord) -> Self {
        self.state.lock().responses.insert(path.to_string(), body);
        self
    }

    /// Fail every call to `path` (or `url`) with `error`.
    pub fn with_failure(self, path: &str, error: FreeAgentError) -> Self {
        self.state.lock().failures.insert(path.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn get_count(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Get { path: p } if p == path))
            .count()
    }

    fn check_failure(&self, target: &str) -> DomainResult<()> {
        match self.state.lock().failures.get(target) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl AuthenticatedClient for RecordingClient {
    fn get(&self, path: &str) -> DomainResult<WireRecord> {
        self.state.lock().calls.push(Call::Get { path: path.to_string() });
        self.check_failure(path)?;
        self.state.lock().responses.get(path).cloned().ok_or_else(|| FreeAgentError::Api {
            status: 404,
            url: path.to_string(),
            body: String::new(),
        })
    }

    fn put(&self, url: &str, root_key: &str, body: WireRecord) -> DomainResult<()> {
        self.state.lock().calls.push(Call::Put {
            url: url.to_string(),
            root_key: root_key.to_string(),
            body,
        });
        self.check_failure(url)
    }

    fn post(&self, path: &str, root_key: &str, body: WireRecord) -> DomainResult<WireRecord> {
        self.state.lock().calls.push(Call::Post {
            path: path.to_string(),
            root_key: root_key.to_string(),
            body: body.clone(),
        });
        self.check_failure(path)?;
        Ok(freeagent_common::wire::envelope(root_key, body))
    }
}

//! Port interface for authenticated API access
//!
//! Domain helpers only see this trait; the HTTP client, session handling and
//! retry-after-refresh live behind it in the infrastructure layer.

use freeagent_common::wire::{to_wire, WireRecord};
use freeagent_domain::{FreeAgentError, Result};
use serde::Serialize;

/// Authenticated request channel to the FreeAgent API
pub trait AuthenticatedClient: Send + Sync {
    /// `GET <base><path>`; any non-2xx status is an error
    fn get(&self, path: &str) -> Result<WireRecord>;

    /// `PUT <url>` with `{root_key: body}`; only 200 is success
    fn put(&self, url: &str, root_key: &str, body: WireRecord) -> Result<()>;

    /// `POST <base><path>` with `{root_key: body}`; 200 and 201 are success
    fn post(&self, path: &str, root_key: &str, body: WireRecord) -> Result<WireRecord>;
}

/// Convert a record for transmission, mapping wire errors to the domain
pub(crate) fn encode<T: Serialize + ?Sized>(record: &T) -> Result<WireRecord> {
    to_wire(record).map_err(|e| FreeAgentError::Serialization(e.to_string()))
}

/// Decode an API response into a typed record
pub(crate) fn decode<T: serde::de::DeserializeOwned>(record: WireRecord) -> Result<T> {
    freeagent_common::wire::from_wire(record)
        .map_err(|e| FreeAgentError::Serialization(e.to_string()))
}

//! Asynchronous system events delivered to plugins.
//!
//! Events arrive independently of any API request (e.g. from a queue) and
//! carry an optional `data` object. An absent and an empty `data` are the
//! same thing: neither is written to the wire, and both read back as an
//! empty [`Args`].

use serde::{Deserialize, Serialize};

use crate::{AccountId, Args, Timestamp};

/// An account was provisioned.
pub const ACCOUNT_CREATED: &str = "account.created";
/// Account settings or quota changed.
pub const ACCOUNT_UPDATED: &str = "account.updated";
/// An account was removed.
pub const ACCOUNT_DELETED: &str = "account.deleted";

/// A system event delivered to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    /// Dotted event identifier, e.g. [`ACCOUNT_CREATED`].
    pub event_type: String,

    /// RFC 3339 time the event occurred, kept verbatim.
    pub occurred_at: String,

    /// Account the event concerns.
    pub account_id: AccountId,

    /// Event-specific data; omitted from the wire when empty.
    #[serde(default, skip_serializing_if = "Args::is_empty")]
    pub data: Args,
}

impl EventPayload {
    /// Creates an event with no data.
    pub fn new(
        event_type: impl Into<String>,
        occurred_at: Timestamp,
        account_id: impl Into<AccountId>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            occurred_at: occurred_at.to_rfc3339(),
            account_id: account_id.into(),
            data: Args::new(),
        }
    }

    /// Attaches event data.
    #[must_use]
    pub fn with_data(mut self, data: Args) -> Self {
        self.data = data;
        self
    }

    /// Parses [`EventPayload::occurred_at`]; `None` if it is not RFC 3339.
    pub fn occurred_at_timestamp(&self) -> Option<Timestamp> {
        Timestamp::parse_rfc3339(&self.occurred_at)
    }
}

//! Per-object errors reported by `Foo/set` (RFC 8620 §5.3, RFC 8621).
//!
//! A [`SetError`] is placed in `notCreated`, `notUpdated`, or `notDestroyed`
//! for the object it concerns; the other objects in the call are unaffected.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{ErrorScope, JmapError};

error_tags! {
    /// Type tag of a [`SetError`].
    SetErrorType {
        /// The object to update or destroy does not exist.
        NotFound => "notFound",
        /// One or more properties had an invalid value.
        InvalidProperties => "invalidProperties",
        /// The object exceeds the server's size limit.
        TooLarge => "tooLarge",
        /// Creating or updating the object would exceed the account quota.
        OverQuota => "overQuota",
        /// Too many objects of this type are waiting to be processed.
        TooManyPending => "tooManyPending",
        /// A referenced blob does not exist.
        BlobNotFound => "blobNotFound",
        /// A referenced mailbox id is invalid.
        InvalidMailboxId => "invalidMailboxId",
        /// The email content is invalid.
        InvalidEmail => "invalidEmail",
        /// The caller may not perform this change.
        Forbidden => "forbidden",
        /// A patch object could not be applied.
        InvalidPatch => "invalidPatch",
        /// The mailbox still contains email and `onDestroyRemoveEmails` was false.
        MailboxHasEmail => "mailboxHasEmail",
        /// An unexpected internal failure affecting this object only.
        ServerFail => "serverFail",
        /// Only one object of this type may exist.
        Singleton => "singleton",
        /// The object is also scheduled for destruction in the same call.
        WillDestroy => "willDestroy",
    }
}

/// A per-object failure inside a `/set` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {description}")]
pub struct SetError {
    kind: SetErrorType,
    description: String,
    properties: Vec<String>,
}

impl SetError {
    /// Creates a set error of any type, without properties.
    pub fn new(kind: SetErrorType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            properties: Vec::new(),
        }
    }

    /// Names the offending properties.
    ///
    /// An empty list is equivalent to none: `properties` is then omitted
    /// from the wire map.
    #[must_use]
    pub fn with_properties(mut self, properties: Vec<String>) -> Self {
        self.properties = properties;
        self
    }

    /// `notFound`: the object to update or destroy does not exist.
    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::NotFound, description)
    }

    /// Creates an `invalidProperties` error naming the rejected properties.
    pub fn invalid_properties(description: impl Into<String>, properties: Vec<String>) -> Self {
        Self::new(SetErrorType::InvalidProperties, description).with_properties(properties)
    }

    /// `tooLarge`: the object exceeds a size limit.
    pub fn too_large(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::TooLarge, description)
    }

    /// `overQuota`: the change would exceed the account quota.
    pub fn over_quota(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::OverQuota, description)
    }

    /// `tooManyPending`: too many operations are already pending.
    pub fn too_many_pending(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::TooManyPending, description)
    }

    /// `blobNotFound`: a referenced blob does not exist.
    pub fn blob_not_found(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::BlobNotFound, description)
    }

    /// `invalidMailboxId`: a referenced mailbox does not exist.
    pub fn invalid_mailbox_id(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::InvalidMailboxId, description)
    }

    /// `invalidEmail`: the email cannot be stored as given.
    pub fn invalid_email(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::InvalidEmail, description)
    }

    /// `forbidden`: the caller may not modify this object.
    pub fn forbidden(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::Forbidden, description)
    }

    /// `invalidPatch`: the patch object is malformed.
    pub fn invalid_patch(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::InvalidPatch, description)
    }

    /// `mailboxHasEmail`: the mailbox still contains email.
    pub fn mailbox_has_email(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::MailboxHasEmail, description)
    }

    /// Creates a `serverFail` set error. Unlike [`crate::MethodError::server_fail`]
    /// no cause is kept; log it before converting.
    pub fn server_fail(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::ServerFail, description)
    }

    /// `singleton`: the object cannot be created or destroyed.
    pub fn singleton(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::Singleton, description)
    }

    /// `willDestroy`: the object is also being destroyed in this call.
    pub fn will_destroy(description: impl Into<String>) -> Self {
        Self::new(SetErrorType::WillDestroy, description)
    }

    /// Rebuilds a set error from its wire map.
    ///
    /// `properties`, when present, must be an array of strings in full; a
    /// single non-string element rejects the map.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let kind = map.get("type")?.as_str()?.parse().ok()?;
        let description = match map.get("description") {
            None => "",
            Some(value) => value.as_str()?,
        };
        let properties = match map.get("properties") {
            None => Vec::new(),
            Some(value) => value
                .as_array()?
                .iter()
                .map(|p| p.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()?,
        };
        Some(Self::new(kind, description).with_properties(properties))
    }

    /// Returns the typed tag.
    pub fn kind(&self) -> SetErrorType {
        self.kind
    }

    /// Returns the human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the offending property names (empty when none were given).
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

impl JmapError for SetError {
    fn error_type(&self) -> &'static str {
        self.kind.as_str()
    }

    fn scope(&self) -> ErrorScope {
        ErrorScope::Set
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.kind.as_str()));
        map.insert("description".into(), Value::from(self.description.as_str()));
        if !self.properties.is_empty() {
            map.insert("properties".into(), Value::from(self.properties.clone()));
        }
        map
    }
}

serialize_via_map!(SetError);

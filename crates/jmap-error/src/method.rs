//! Method-level errors (RFC 8620 §3.6.2).
//!
//! A [`MethodError`] replaces the normal response of a single method call
//! with `["error", {"type": ..., "description": ...}, clientId]`. The rest of
//! the request continues to be processed.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{ErrorScope, JmapError};

error_tags! {
    /// Type tag of a [`MethodError`].
    MethodErrorType {
        /// The server does not recognise the method name.
        UnknownMethod => "unknownMethod",
        /// An argument is of the wrong type, missing, or otherwise invalid.
        InvalidArguments => "invalidArguments",
        /// An unexpected internal failure.
        ServerFail => "serverFail",
        /// The `accountId` does not correspond to a valid account.
        AccountNotFound => "accountNotFound",
        /// The account does not support this method.
        AccountNotSupportedByMethod => "accountNotSupportedByMethod",
        /// The method would modify state but the account is read-only.
        AccountReadOnly => "accountReadOnly",
        /// A result reference could not be resolved.
        InvalidResultReference => "invalidResultReference",
        /// `ifInState` did not match the current state.
        StateMismatch => "stateMismatch",
        /// The caller is not permitted to perform the call.
        Forbidden => "forbidden",
        /// The server cannot compute changes since the given state.
        CannotCalculateChanges => "cannotCalculateChanges",
        /// The filter is syntactically valid but not supported.
        UnsupportedFilter => "unsupportedFilter",
        /// The sort is syntactically valid but not supported.
        UnsupportedSort => "unsupportedSort",
        /// The query anchor is not in the result set.
        AnchorNotFound => "anchorNotFound",
        /// The call asked for more objects than the server allows.
        RequestTooLarge => "requestTooLarge",
        /// More changes exist than `maxChanges` allows.
        TooManyChanges => "tooManyChanges",
    }
}

/// A method-level failure.
///
/// The optional cause is kept for in-process diagnostics and is reachable
/// through [`std::error::Error::source`]; it is never serialised.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {description}")]
pub struct MethodError {
    kind: MethodErrorType,
    description: String,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl MethodError {
    /// Creates a method error of any type.
    pub fn new(kind: MethodErrorType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause, replacing any previous one.
    #[must_use]
    pub fn with_source(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(cause));
        self
    }

    /// `unknownMethod`: the method name is not recognised.
    pub fn unknown_method(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::UnknownMethod, description)
    }

    /// `invalidArguments`: an argument is missing, of the wrong type, or invalid.
    pub fn invalid_arguments(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::InvalidArguments, description)
    }

    /// Creates a `serverFail` error wrapping the infrastructure failure that caused it.
    pub fn server_fail(
        description: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(MethodErrorType::ServerFail, description).with_source(cause)
    }

    /// `accountNotFound`: the account id does not exist.
    pub fn account_not_found(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::AccountNotFound, description)
    }

    /// `accountNotSupportedByMethod`: the account does not support this method.
    pub fn account_not_supported_by_method(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::AccountNotSupportedByMethod, description)
    }

    /// `accountReadOnly`: the call would modify a read-only account.
    pub fn account_read_only(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::AccountReadOnly, description)
    }

    /// `invalidResultReference`: a back-reference could not be resolved.
    pub fn invalid_result_reference(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::InvalidResultReference, description)
    }

    /// `stateMismatch`: `ifInState` did not match the current state.
    pub fn state_mismatch(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::StateMismatch, description)
    }

    /// `forbidden`: the caller may not perform this call.
    pub fn forbidden(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::Forbidden, description)
    }

    /// `cannotCalculateChanges`: changes since the given state are unavailable.
    pub fn cannot_calculate_changes(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::CannotCalculateChanges, description)
    }

    /// `unsupportedFilter`: the query filter cannot be processed.
    pub fn unsupported_filter(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::UnsupportedFilter, description)
    }

    /// `unsupportedSort`: the query sort cannot be processed.
    pub fn unsupported_sort(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::UnsupportedSort, description)
    }

    /// `anchorNotFound`: the query anchor is not in the results.
    pub fn anchor_not_found(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::AnchorNotFound, description)
    }

    /// `requestTooLarge`: the call asks for too many objects.
    pub fn request_too_large(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::RequestTooLarge, description)
    }

    /// `tooManyChanges`: more changes exist than `maxChanges` allows.
    pub fn too_many_changes(description: impl Into<String>) -> Self {
        Self::new(MethodErrorType::TooManyChanges, description)
    }

    /// Rebuilds a method error from its wire map, as returned by a plugin.
    ///
    /// `type` must be a known tag. A missing `description` reads as empty;
    /// a non-string one rejects the map.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let kind = map.get("type")?.as_str()?.parse().ok()?;
        let description = match map.get("description") {
            None => "",
            Some(value) => value.as_str()?,
        };
        Some(Self::new(kind, description))
    }

    /// Returns the typed tag.
    pub fn kind(&self) -> MethodErrorType {
        self.kind
    }

    /// Returns the human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the wrapped cause, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl JmapError for MethodError {
    fn error_type(&self) -> &'static str {
        self.kind.as_str()
    }

    fn scope(&self) -> ErrorScope {
        ErrorScope::Method
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.kind.as_str()));
        map.insert("description".into(), Value::from(self.description.as_str()));
        map
    }
}

serialize_via_map!(MethodError);

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::unknown_method(MethodError::unknown_method("x"), "unknownMethod")]
    #[case::invalid_arguments(MethodError::invalid_arguments("x"), "invalidArguments")]
    #[case::server_fail(
        MethodError::server_fail("x", std::io::Error::other("io")),
        "serverFail"
    )]
    #[case::account_not_found(MethodError::account_not_found("x"), "accountNotFound")]
    #[case::account_not_supported(
        MethodError::account_not_supported_by_method("x"),
        "accountNotSupportedByMethod"
    )]
    #[case::account_read_only(MethodError::account_read_only("x"), "accountReadOnly")]
    #[case::invalid_result_reference(
        MethodError::invalid_result_reference("x"),
        "invalidResultReference"
    )]
    #[case::state_mismatch(MethodError::state_mismatch("x"), "stateMismatch")]
    #[case::forbidden(MethodError::forbidden("x"), "forbidden")]
    #[case::cannot_calculate_changes(
        MethodError::cannot_calculate_changes("x"),
        "cannotCalculateChanges"
    )]
    #[case::unsupported_filter(MethodError::unsupported_filter("x"), "unsupportedFilter")]
    #[case::unsupported_sort(MethodError::unsupported_sort("x"), "unsupportedSort")]
    #[case::anchor_not_found(MethodError::anchor_not_found("x"), "anchorNotFound")]
    #[case::request_too_large(MethodError::request_too_large("x"), "requestTooLarge")]
    #[case::too_many_changes(MethodError::too_many_changes("x"), "tooManyChanges")]
    fn constructor_fixes_type_tag(#[case] error: MethodError, #[case] expected: &str) {
        assert_eq!(error.error_type(), expected);
        assert_eq!(error.scope(), ErrorScope::Method);
        assert_eq!(error.to_string(), format!("{expected}: x"));
    }

    #[test]
    fn server_fail_message_and_cause() {
        let error = MethodError::server_fail("db down", std::io::Error::other("connection reset"));
        assert_eq!(error.to_string(), "serverFail: db down");
        let source = error.source().expect("cause is kept");
        assert_eq!(source.to_string(), "connection reset");
        assert!(error.cause().is_some());
    }

    #[test]
    fn errors_without_cause_have_no_source() {
        assert!(MethodError::invalid_arguments("bad").source().is_none());
    }

    #[test]
    fn to_map_never_contains_cause() {
        let error = MethodError::server_fail("db down", std::io::Error::other("secret host"));
        let map = error.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(
            Value::Object(map),
            json!({"type": "serverFail", "description": "db down"})
        );
    }

    #[test]
    fn serialises_in_documented_field_order() {
        let error = MethodError::invalid_arguments("mailboxId must be provided");
        assert_eq!(
            serde_json::to_string(&error).expect("serialise"),
            r#"{"type":"invalidArguments","description":"mailboxId must be provided"}"#
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::quotes("\"}{\\")]
    #[case::unicode("☃ café\u{0}")]
    fn description_is_carried_verbatim(#[case] description: &str) {
        let error = MethodError::unknown_method(description);
        assert_eq!(error.description(), description);
        assert_eq!(error.to_map()["description"], json!(description));
    }

    #[test]
    fn from_map_round_trips_wire_shape() {
        let original = MethodError::state_mismatch("state is 42");
        let parsed = MethodError::from_map(&original.to_map()).expect("parse");
        assert_eq!(parsed.kind(), MethodErrorType::StateMismatch);
        assert_eq!(parsed.description(), "state is 42");
    }

    #[rstest]
    #[case::missing_type(json!({"description": "x"}))]
    #[case::unknown_type(json!({"type": "madeUp", "description": "x"}))]
    #[case::numeric_type(json!({"type": 7}))]
    #[case::numeric_description(json!({"type": "forbidden", "description": 7}))]
    fn from_map_rejects_malformed(#[case] value: Value) {
        let Value::Object(map) = value else {
            panic!("fixture must be an object");
        };
        assert!(MethodError::from_map(&map).is_none());
    }

    #[test]
    fn from_map_defaults_missing_description() {
        let Value::Object(map) = json!({"type": "forbidden"}) else {
            panic!("fixture must be an object");
        };
        let parsed = MethodError::from_map(&map).expect("parse");
        assert_eq!(parsed.description(), "");
    }

    #[test]
    fn every_tag_parses_back() {
        for tag in MethodErrorType::ALL {
            assert_eq!(tag.as_str().parse::<MethodErrorType>(), Ok(*tag));
        }
    }
}

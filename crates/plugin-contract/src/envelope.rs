//! Request and response envelopes for a single plugin invocation.
//!
//! The core sends one [`PluginInvocationRequest`] per method call routed to a
//! plugin and receives one [`PluginInvocationResponse`] back. Assembly is pure
//! data: nothing here validates the method name, account, or arguments.

use jmap_error::{JmapError, MethodError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{AccountId, Args, ClientId, MethodName, RequestId};

/// Response name that marks a method response as an error.
pub const ERROR_RESPONSE_NAME: &str = "error";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Payload sent from the core to a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInvocationRequest {
    /// Correlates all calls made for one inbound API request.
    pub request_id: RequestId,

    /// Position of this call within the request's `methodCalls` array.
    pub call_index: u32,

    /// Authenticated account the call runs against.
    pub account_id: AccountId,

    /// Namespaced method name, e.g. `"Email/get"`.
    pub method: MethodName,

    /// Method arguments.
    #[serde(default)]
    pub args: Args,

    /// Client-supplied call id, echoed back in the response.
    pub client_id: ClientId,

    /// Base URL for content delivery (blob downloads).
    #[serde(default)]
    pub cdn_url: String,

    /// Base URL of the JMAP API.
    #[serde(default)]
    pub api_url: String,
}

impl PluginInvocationRequest {
    /// Assembles a request with empty base URLs.
    pub fn new(
        request_id: impl Into<RequestId>,
        call_index: u32,
        account_id: impl Into<AccountId>,
        method: impl Into<MethodName>,
        args: Args,
        client_id: impl Into<ClientId>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            call_index,
            account_id: account_id.into(),
            method: method.into(),
            args,
            client_id: client_id.into(),
            cdn_url: String::new(),
            api_url: String::new(),
        }
    }

    /// Sets the content-delivery and API base URLs.
    #[must_use]
    pub fn with_urls(mut self, cdn_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.cdn_url = cdn_url.into();
        self.api_url = api_url.into();
        self
    }

    /// Builds an absolute content-delivery link for `path`.
    ///
    /// The path is appended segment by segment; `.` and `..` segments are
    /// dropped and any query on the base is kept.
    pub fn cdn_link(&self, path: &str) -> Result<String, LinkError> {
        join_url(&self.cdn_url, path)
    }

    /// Builds an absolute API link for `path`.
    pub fn api_link(&self, path: &str) -> Result<String, LinkError> {
        join_url(&self.api_url, path)
    }

    /// Returns a span describing this call, for plugins to enter while handling it.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "jmap_method",
            request_id = %self.request_id,
            account_id = %self.account_id,
            jmap.method = %self.method,
            jmap.client_id = %self.client_id,
            jmap.call_index = self.call_index,
        )
    }
}

/// Errors raised while building a link from a request's base URLs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// The request carried no base URL.
    #[error("no base URL set on the request")]
    MissingBase,
    /// The base URL could not be parsed.
    #[error(transparent)]
    InvalidBase(#[from] url::ParseError),
    /// The base URL has no hierarchical path, e.g. `mailto:`.
    #[error("base URL '{0}' cannot carry a path")]
    CannotBeABase(String),
}

fn join_url(base: &str, path: &str) -> Result<String, LinkError> {
    if base.trim().is_empty() {
        return Err(LinkError::MissingBase);
    }
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| LinkError::CannotBeABase(base.to_owned()))?
        .pop_if_empty()
        .extend(
            path.split('/')
                .filter(|segment| !matches!(*segment, "" | "." | "..")),
        );
    Ok(url.into())
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Payload returned from a plugin to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInvocationResponse {
    /// The single method response produced by the call.
    pub method_response: MethodResponse,
}

impl PluginInvocationResponse {
    /// Wraps a method response.
    pub fn new(method_response: MethodResponse) -> Self {
        Self { method_response }
    }

    /// Successful response to `request`, echoing its method name and client id.
    pub fn success(request: &PluginInvocationRequest, args: Args) -> Self {
        Self::new(MethodResponse::new(
            request.method.as_str(),
            args,
            request.client_id.clone(),
        ))
    }

    /// Error response to `request`, echoing its client id.
    pub fn failure(request: &PluginInvocationRequest, error: &dyn JmapError) -> Self {
        Self::new(MethodResponse::error(error, request.client_id.clone()))
    }
}

/// A single JMAP method response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResponse {
    /// Method name, or [`ERROR_RESPONSE_NAME`] for a failed call.
    pub name: String,

    /// Result payload, or the error's wire map.
    #[serde(default)]
    pub args: Args,

    /// Client-supplied call id from the originating request.
    pub client_id: ClientId,
}

impl MethodResponse {
    /// Result response named `name` for the call `client_id`.
    pub fn new(name: impl Into<String>, args: Args, client_id: impl Into<ClientId>) -> Self {
        Self {
            name: name.into(),
            args,
            client_id: client_id.into(),
        }
    }

    /// Builds an `"error"` response from any taxonomy variant.
    ///
    /// The error's message and cause chain are logged here; only its wire map
    /// is placed in the response.
    pub fn error(error: &dyn JmapError, client_id: impl Into<ClientId>) -> Self {
        let client_id = client_id.into();
        let cause = std::error::Error::source(error).map(ToString::to_string);
        tracing::warn!(
            error_type = error.error_type(),
            error_message = %error,
            error_cause = cause.as_deref(),
            client_id = %client_id,
            "method call failed"
        );
        Self {
            name: ERROR_RESPONSE_NAME.to_owned(),
            args: Args::from(error.to_map()),
            client_id,
        }
    }

    /// Returns `true` if this is an error response.
    pub fn is_error(&self) -> bool {
        self.name == ERROR_RESPONSE_NAME
    }

    /// Returns the error type tag of an error response.
    pub fn error_type(&self) -> Option<&str> {
        if self.is_error() {
            self.args.string("type")
        } else {
            None
        }
    }

    /// Parses the method error carried by an error response.
    ///
    /// Returns `None` for success responses and for error bodies whose type is
    /// not a known method error.
    pub fn method_error(&self) -> Option<MethodError> {
        if !self.is_error() {
            return None;
        }
        MethodError::from_map(self.args.as_map())
    }
}

#[cfg(test)]
mod tests {
    use jmap_error::SetError;
    use rstest::rstest;
    use serde_json::{json, Value};

    use super::*;

    fn sample_request() -> PluginInvocationRequest {
        PluginInvocationRequest::new(
            "req-123",
            1,
            "acc-456",
            "Mailbox/get",
            Args::new().with("accountId", "acc-456").with("ids", json!(["mb-1"])),
            "c1",
        )
        .with_urls("https://cdn.example.com/", "https://api.example.com")
    }

    #[test]
    fn request_serialises_with_wire_field_names() {
        let value = serde_json::to_value(sample_request()).expect("serialise");
        assert_eq!(
            value,
            json!({
                "requestId": "req-123",
                "callIndex": 1,
                "accountId": "acc-456",
                "method": "Mailbox/get",
                "args": {"accountId": "acc-456", "ids": ["mb-1"]},
                "clientId": "c1",
                "cdnUrl": "https://cdn.example.com/",
                "apiUrl": "https://api.example.com",
            })
        );
    }

    #[test]
    fn request_deserialises_and_args_are_readable() {
        let json = r#"{
            "requestId": "apigw-request-id",
            "callIndex": 0,
            "accountId": "user-123",
            "method": "Email/get",
            "args": {
                "accountId": "user-123",
                "ids": ["email-1", "email-2"],
                "properties": ["id", "subject", "from"]
            },
            "clientId": "c0",
            "cdnUrl": "https://cdn.example.com",
            "apiUrl": "https://api.example.com"
        }"#;
        let request: PluginInvocationRequest = serde_json::from_str(json).expect("deserialise");
        assert_eq!(request.request_id, "apigw-request-id");
        assert_eq!(request.call_index, 0);
        assert_eq!(request.method.data_type(), "Email");
        assert_eq!(request.args.string("accountId"), Some("user-123"));
        assert_eq!(
            request.args.string_slice("ids"),
            Some(vec!["email-1".to_owned(), "email-2".to_owned()])
        );
    }

    #[test]
    fn request_tolerates_missing_optional_fields() {
        let json = r#"{"requestId":"r","callIndex":2,"accountId":"a","method":"Core/echo","clientId":"c"}"#;
        let request: PluginInvocationRequest = serde_json::from_str(json).expect("deserialise");
        assert!(request.args.is_empty());
        assert!(request.cdn_url.is_empty());
        assert!(request.api_url.is_empty());
    }

    #[test]
    fn request_with_null_args_reads_as_empty() {
        let json = r#"{"requestId":"r","callIndex":0,"accountId":"a","method":"m","args":null,"clientId":"c"}"#;
        let request: PluginInvocationRequest = serde_json::from_str(json).expect("deserialise");
        assert_eq!(request.args.string_or("x", "d"), "d");
    }

    #[test]
    fn request_round_trip() {
        let request = sample_request();
        let json = serde_json::to_string(&request).expect("serialise");
        let back: PluginInvocationRequest = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, request);
    }

    #[rstest]
    #[case::both_slashes("https://cdn.example.com/", "/blob/1", "https://cdn.example.com/blob/1")]
    #[case::no_slashes("https://cdn.example.com", "blob/1", "https://cdn.example.com/blob/1")]
    #[case::base_only("https://cdn.example.com/", "", "https://cdn.example.com/")]
    #[case::base_with_path("https://cdn.example.com/v1/", "blob/1", "https://cdn.example.com/v1/blob/1")]
    #[case::query_kept_after_path(
        "https://cdn.example.com/v1?sig=abc",
        "blob/1",
        "https://cdn.example.com/v1/blob/1?sig=abc"
    )]
    #[case::dot_segments_dropped("https://cdn.example.com/", "../../etc", "https://cdn.example.com/etc")]
    #[case::inner_dot_segments("https://cdn.example.com/v1", "a/./b/../c", "https://cdn.example.com/v1/a/b/c")]
    fn cdn_link_appends_path_segments(
        #[case] base: &str,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        let request = sample_request().with_urls(base, "");
        assert_eq!(request.cdn_link(path).as_deref(), Ok(expected));
    }

    #[test]
    fn api_link_uses_api_base() {
        assert_eq!(
            sample_request().api_link("upload/acc-456").as_deref(),
            Ok("https://api.example.com/upload/acc-456")
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("  ")]
    fn link_without_base_is_rejected(#[case] base: &str) {
        let request = sample_request().with_urls(base, base);
        assert_eq!(request.cdn_link("blob/1"), Err(LinkError::MissingBase));
        assert_eq!(request.api_link("blob/1"), Err(LinkError::MissingBase));
    }

    #[test]
    fn link_from_decoded_request_without_urls_is_rejected() {
        let json = r#"{"requestId":"r","callIndex":0,"accountId":"a","method":"m","clientId":"c"}"#;
        let request: PluginInvocationRequest = serde_json::from_str(json).expect("deserialise");
        assert_eq!(request.cdn_link("blob/1"), Err(LinkError::MissingBase));
    }

    #[test]
    fn relative_base_is_rejected() {
        let request = sample_request().with_urls("cdn.example.com/v1", "");
        assert_eq!(
            request.cdn_link("blob/1"),
            Err(LinkError::InvalidBase(url::ParseError::RelativeUrlWithoutBase))
        );
    }

    #[test]
    fn opaque_base_is_rejected() {
        let request = sample_request().with_urls("mailto:ops@example.com", "");
        assert!(matches!(
            request.cdn_link("blob/1"),
            Err(LinkError::CannotBeABase(base)) if base == "mailto:ops@example.com"
        ));
    }

    #[test]
    fn success_echoes_method_and_client_id() {
        let request = sample_request();
        let response =
            PluginInvocationResponse::success(&request, Args::new().with("list", json!([])));
        assert_eq!(response.method_response.name, "Mailbox/get");
        assert_eq!(response.method_response.client_id, "c1");
        assert!(!response.method_response.is_error());
        assert_eq!(response.method_response.error_type(), None);
        assert!(response.method_response.method_error().is_none());
    }

    #[test]
    fn failure_carries_error_map_without_cause() {
        let request = sample_request();
        let error = MethodError::server_fail("db down", std::io::Error::other("10.0.0.7 refused"));
        let response = PluginInvocationResponse::failure(&request, &error);
        let value = serde_json::to_value(&response).expect("serialise");
        assert_eq!(
            value,
            json!({
                "methodResponse": {
                    "name": "error",
                    "args": {"type": "serverFail", "description": "db down"},
                    "clientId": "c1",
                }
            })
        );
        assert!(!value.to_string().contains("10.0.0.7"));
    }

    #[test]
    fn error_response_parses_back_to_method_error() {
        let response = MethodResponse::error(&MethodError::unknown_method("Foo/bar"), "c9");
        assert!(response.is_error());
        assert_eq!(response.error_type(), Some("unknownMethod"));
        let parsed = response.method_error().expect("method error");
        assert_eq!(parsed.description(), "Foo/bar");
    }

    #[test]
    fn set_error_can_fill_error_response() {
        let response = MethodResponse::error(&SetError::over_quota("full"), "c2");
        assert_eq!(response.error_type(), Some("overQuota"));
        assert!(response.method_error().is_none());
    }

    #[test]
    fn response_round_trip() {
        let response = PluginInvocationResponse::new(MethodResponse::new(
            "Email/get",
            Args::new()
                .with("accountId", "user-123")
                .with("list", json!([]))
                .with("notFound", json!([])),
            "c0",
        ));
        let json = serde_json::to_string(&response).expect("serialise");
        let back: PluginInvocationResponse = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, response);
        let raw: Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(raw["methodResponse"]["clientId"], json!("c0"));
    }
}

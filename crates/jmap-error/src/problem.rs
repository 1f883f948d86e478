//! Request-level problems (RFC 8620 §3.6.1, RFC 7807).
//!
//! These reject the whole API request before any method call runs and are
//! returned as the HTTP response body with [`HttpProblem::CONTENT_TYPE`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{ErrorScope, JmapError};

error_tags! {
    /// Problem type URN of an [`HttpProblem`].
    ProblemType {
        /// The request used a capability the server does not support.
        UnknownCapability => "urn:ietf:params:jmap:error:unknownCapability",
        /// The body was not `application/json` or did not parse as I-JSON.
        NotJson => "urn:ietf:params:jmap:error:notJSON",
        /// The body parsed but did not match the Request object schema.
        NotRequest => "urn:ietf:params:jmap:error:notRequest",
        /// The request exceeded a server limit; the limit is named separately.
        Limit => "urn:ietf:params:jmap:error:limit",
    }
}

impl ProblemType {
    /// Short human-readable title for the problem.
    pub const fn title(self) -> &'static str {
        match self {
            Self::UnknownCapability => "Unknown Capability",
            Self::NotJson => "Not JSON",
            Self::NotRequest => "Not Request",
            Self::Limit => "Limit Exceeded",
        }
    }

    /// HTTP status code the problem is returned with.
    pub const fn status(self) -> u16 {
        match self {
            Self::UnknownCapability | Self::NotJson | Self::NotRequest | Self::Limit => 400,
        }
    }

    /// Trailing URN segment, e.g. `notJSON`.
    pub fn short_name(self) -> &'static str {
        short_name(self.as_str())
    }
}

/// Returns the segment after the last `:` of a URN, or the whole string when
/// it has none.
pub fn short_name(urn: &str) -> &str {
    urn.rsplit_once(':').map_or(urn, |(_, name)| name)
}

/// A request-level failure, encoded as an RFC 7807 problem document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {detail}", .kind.short_name())]
pub struct HttpProblem {
    kind: ProblemType,
    detail: String,
    limit: String,
}

impl HttpProblem {
    /// Media type of a serialised problem document.
    pub const CONTENT_TYPE: &'static str = "application/problem+json";

    /// Creates a problem of any type with no limit name.
    pub fn new(kind: ProblemType, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            limit: String::new(),
        }
    }

    /// Problem for a `using` capability the server does not support.
    pub fn unknown_capability(detail: impl Into<String>) -> Self {
        Self::new(ProblemType::UnknownCapability, detail)
    }

    /// Problem for a body that is not valid JSON.
    pub fn not_json(detail: impl Into<String>) -> Self {
        Self::new(ProblemType::NotJson, detail)
    }

    /// Problem for JSON that is not a valid request object.
    pub fn not_request(detail: impl Into<String>) -> Self {
        Self::new(ProblemType::NotRequest, detail)
    }

    /// Creates a `limit` problem naming the exceeded limit (e.g. `maxSizeRequest`).
    pub fn limit(limit_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            limit: limit_name.into(),
            ..Self::new(ProblemType::Limit, detail)
        }
    }

    /// Problem type.
    pub fn kind(&self) -> ProblemType {
        self.kind
    }

    /// Fixed human-readable title for the problem type.
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Detail text supplied by the caller.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.kind.status()
    }

    /// Returns the exceeded limit name, if one was given.
    pub fn limit_name(&self) -> Option<&str> {
        Some(self.limit.as_str()).filter(|name| !name.is_empty())
    }
}

impl JmapError for HttpProblem {
    fn error_type(&self) -> &'static str {
        self.kind.as_str()
    }

    fn scope(&self) -> ErrorScope {
        ErrorScope::Request
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.kind.as_str()));
        map.insert("title".into(), Value::from(self.title()));
        map.insert("detail".into(), Value::from(self.detail.as_str()));
        map.insert("status".into(), Value::from(self.status()));
        if let Some(limit) = self.limit_name() {
            map.insert("limit".into(), Value::from(limit));
        }
        map
    }
}

serialize_via_map!(HttpProblem);

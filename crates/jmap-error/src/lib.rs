//! JMAP error taxonomy shared by the core and its plugins.
//!
//! JMAP reports failures at three levels, each with its own wire shape:
//!
//! | Scope | Type | Wire shape |
//! |-------|------|------------|
//! | Method call | [`MethodError`] | `{"type", "description"}` inside an `"error"` method response |
//! | Object in a `/set` call | [`SetError`] | `{"type", "description", "properties"?}` inside `notCreated` / `notUpdated` / `notDestroyed` |
//! | Whole HTTP request | [`HttpProblem`] | RFC 7807 `application/problem+json` body |
//!
//! All three implement [`JmapError`], which exposes the stable type tag and
//! the flat map that is encoded on the wire. Constructors never fail and
//! perform no validation of the caller's text.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`method`] | [`MethodError`] and [`MethodErrorType`] |
//! | [`set`] | [`SetError`] and [`SetErrorType`] |
//! | [`problem`] | [`HttpProblem`] and [`ProblemType`] |

use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Macro for wire type tags.
// Generates: enum (Copy), ALL, as_str(), Display, FromStr.
// ---------------------------------------------------------------------------
macro_rules! error_tags {
    (
        $(#[$attr:meta])*
        $name:ident {
            $(
                $(#[$vattr:meta])*
                $variant:ident => $tag:literal,
            )+
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vattr])*
                $variant,
            )+
        }

        impl $name {
            /// Every tag, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the canonical wire token for this tag.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::UnknownErrorType;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(Self::$variant),)+
                    other => Err($crate::UnknownErrorType {
                        tag: other.to_owned(),
                    }),
                }
            }
        }
    };
}

// Serialises an error through its `to_map()` rule so the wire shape is
// defined in exactly one place.
macro_rules! serialize_via_map {
    ($($name:ty),+ $(,)?) => {
        $(
            impl serde::Serialize for $name {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serde::Serialize::serialize(&$crate::JmapError::to_map(self), serializer)
                }
            }
        )+
    };
}

pub mod method;
pub mod problem;
pub mod set;

pub use method::{MethodError, MethodErrorType};
pub use problem::{short_name, HttpProblem, ProblemType};
pub use set::{SetError, SetErrorType};

// ---------------------------------------------------------------------------
// Common capability
// ---------------------------------------------------------------------------

/// The protocol level an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorScope {
    /// A single method call failed.
    Method,
    /// A single object within a `/set` call failed.
    Set,
    /// The whole HTTP request was rejected.
    Request,
}

/// Behaviour shared by every JMAP error variant.
///
/// The [`std::fmt::Display`] output is the diagnostic message
/// (`"<type>: <description>"`); [`JmapError::to_map`] is the wire body.
pub trait JmapError: std::error::Error + Send + Sync {
    /// Stable type tag: a camelCase token, or a URN for request-level problems.
    fn error_type(&self) -> &'static str;

    /// Protocol level of this error.
    fn scope(&self) -> ErrorScope;

    /// Flat field map suitable for direct JSON encoding.
    ///
    /// Optional fields are present only when non-empty. Wrapped causes are
    /// never included.
    fn to_map(&self) -> Map<String, Value>;
}

// ---------------------------------------------------------------------------
// Heterogeneous handling
// ---------------------------------------------------------------------------

/// Any one of the three taxonomy variants.
///
/// Lets callers hold and branch on a mixed set of errors without downcasting.
#[derive(Debug, Clone, Error)]
pub enum AnyJmapError {
    /// Method-level failure.
    #[error(transparent)]
    Method(#[from] MethodError),
    /// Per-object `/set` failure.
    #[error(transparent)]
    Set(#[from] SetError),
    /// Request-level problem.
    #[error(transparent)]
    Request(#[from] HttpProblem),
}

impl JmapError for AnyJmapError {
    fn error_type(&self) -> &'static str {
        match self {
            Self::Method(e) => e.error_type(),
            Self::Set(e) => e.error_type(),
            Self::Request(e) => e.error_type(),
        }
    }

    fn scope(&self) -> ErrorScope {
        match self {
            Self::Method(_) => ErrorScope::Method,
            Self::Set(_) => ErrorScope::Set,
            Self::Request(_) => ErrorScope::Request,
        }
    }

    fn to_map(&self) -> Map<String, Value> {
        match self {
            Self::Method(e) => e.to_map(),
            Self::Set(e) => e.to_map(),
            Self::Request(e) => e.to_map(),
        }
    }
}

serialize_via_map!(AnyJmapError);

/// A wire type tag that does not name any known error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown JMAP error type '{tag}'")]
pub struct UnknownErrorType {
    /// The unrecognised tag, verbatim.
    pub tag: String,
}

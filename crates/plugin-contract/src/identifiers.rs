//! Newtype identifiers carried by the envelopes.
//!
//! Each identifier wraps a `String` and serialises as a bare JSON string.
//! Construction never validates: checking that an account exists or a method
//! is known belongs to the request-handling layer, not to the contract.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new(), as_str(), into_inner(), Display, From, PartialEq<str>.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string, including an empty one.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id! {
    /// Correlates every plugin invocation made for one inbound API request.
    ///
    /// Usually the upstream gateway's request id; [`RequestId::new_random`]
    /// covers entry points that have none.
    RequestId
}

impl RequestId {
    /// Generates a fresh random request id.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

string_id! {
    /// Identifies the authenticated JMAP account a call or event concerns.
    AccountId
}

string_id! {
    /// The client-supplied method call id, echoed back in the response.
    ClientId
}

string_id! {
    /// A namespaced JMAP method name such as `"Email/get"`.
    MethodName
}

impl MethodName {
    /// Returns the data type part (`"Email"` in `"Email/get"`).
    ///
    /// A name without `/` is returned whole.
    pub fn data_type(&self) -> &str {
        self.0.split_once('/').map_or(self.as_str(), |(data_type, _)| data_type)
    }

    /// Returns the operation part (`"get"` in `"Email/get"`), if any.
    pub fn operation(&self) -> Option<&str> {
        self.0.split_once('/').map(|(_, operation)| operation)
    }
}

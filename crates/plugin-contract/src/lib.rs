//! Contract types for communication between the JMAP core and its plugins.
//!
//! A plugin is an isolated process implementing one or more JMAP methods.
//! The core invokes it with a [`PluginInvocationRequest`] and receives a
//! [`PluginInvocationResponse`]; system events reach plugins separately as
//! [`EventPayload`] messages. All of these are plain value types: they are
//! built once per exchange, serialised, and dropped.
//!
//! ## Architectural Layer
//!
//! **Contract only.** This crate has no I/O dependencies. How the bytes move
//! between core and plugin is the transport's concern.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`args`] | [`Args`], the dynamic argument container |
//! | [`envelope`] | Request, response, and method response envelopes |
//! | [`events`] | [`EventPayload`] and well-known event types |
//! | [`identifiers`] | Newtype identifiers (`RequestId`, `AccountId`, etc.) |
//! | [`types`] | Shared value types ([`Timestamp`]) |
//!
//! ## Example
//!
//! ```
//! use jmap_error::MethodError;
//! use plugin_contract::{Args, PluginInvocationRequest, PluginInvocationResponse};
//!
//! fn handle(request: &PluginInvocationRequest) -> PluginInvocationResponse {
//!     let Some(account_id) = request.args.string("accountId") else {
//!         let error = MethodError::invalid_arguments("accountId must be provided");
//!         return PluginInvocationResponse::failure(request, &error);
//!     };
//!     let limit = request.args.int_or("limit", 100);
//!     PluginInvocationResponse::success(
//!         request,
//!         Args::new().with("accountId", account_id).with("limit", limit),
//!     )
//! }
//! # let request = PluginInvocationRequest::new("r", 0, "a", "Email/query", Args::new(), "c0");
//! # assert!(handle(&request).method_response.is_error());
//! ```

pub mod args;
pub mod envelope;
pub mod events;
pub mod identifiers;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by plugins.
pub use args::{Args, ArgsError};
pub use envelope::{
    LinkError, MethodResponse, PluginInvocationRequest, PluginInvocationResponse,
    ERROR_RESPONSE_NAME,
};
pub use events::{EventPayload, ACCOUNT_CREATED, ACCOUNT_DELETED, ACCOUNT_UPDATED};
pub use identifiers::{AccountId, ClientId, MethodName, RequestId};
pub use types::Timestamp;

//! Headers module
//!
//! This module provides a constants for HTTP headers.
//!

pub(crate) const CONTENT_TYPE: &str = "Content-Type";
pub(crate) const ACCEPT: &str = "Accept";
pub(crate) const AUTHORIZATION: &str = "Authorization";
pub(crate) const ABLY_VERSION: &str = "X-Ably-Version";
pub(crate) const ABLY_AGENT: &str = "Ably-Agent";
pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const APPLICATION_MSGPACK: &str = "application/x-msgpack";

/// Response header with pagination relations.
///
/// Header names are stored lowercased in [`TransportResponse`].
///
/// [`TransportResponse`]: crate::core::TransportResponse
pub(crate) const LINK: &str = "link";

/// Response header with body MIME type (lowercased).
pub(crate) const RESPONSE_CONTENT_TYPE: &str = "content-type";

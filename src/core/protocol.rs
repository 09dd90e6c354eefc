//! # Wire protocol
//!
//! This module contains the [`Protocol`] type which selects how request and
//! response bodies are encoded on the wire.

use std::fmt::Display;

use crate::core::utils::headers::{APPLICATION_JSON, APPLICATION_MSGPACK};

/// Wire format of the request and response bodies.
///
/// [`Ably REST API`] accepts both a textual (JSON) and a binary (MessagePack)
/// encoding. The format used for requests is selected by the client
/// configuration while responses are decoded according to their
/// `Content-Type` header.
///
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    /// JSON encoded bodies.
    #[default]
    Json,

    /// MessagePack encoded bodies.
    MsgPack,
}

impl Protocol {
    /// MIME type which should be used with `Content-Type` and `Accept` headers.
    pub fn content_type(&self) -> &'static str {
        match self {
            Protocol::Json => APPLICATION_JSON,
            Protocol::MsgPack => APPLICATION_MSGPACK,
        }
    }

    /// Identify protocol from the `Content-Type` header value.
    ///
    /// Media type parameters (like `charset`) are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            APPLICATION_JSON => Some(Protocol::Json),
            APPLICATION_MSGPACK => Some(Protocol::MsgPack),
            _ => None,
        }
    }

    /// Whether binary data can be sent as is.
    pub fn is_binary(&self) -> bool {
        matches!(self, Protocol::MsgPack)
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Protocol::Json => "json",
                Protocol::MsgPack => "msgpack",
            }
        )
    }
}

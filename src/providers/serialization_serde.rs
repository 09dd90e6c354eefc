//! Serde implementation for Ably [`Serialize`] trait.
//!
//! This module provides a `serde` serializer for both wire protocols.
//! MessagePack output uses named fields so it can be consumed the same way
//! as JSON objects.
//!
//! # Examples
//! ```
//! use ably::core::{Protocol, Serialize as _};
//!
//! #[derive(serde::Serialize, Debug, PartialEq)]
//! struct Foo {
//!    bar: String,
//! }
//!
//! let foo = Foo { bar: "baz".to_string() };
//! assert_eq!(foo.serialize(Protocol::Json).unwrap(), b"{\"bar\":\"baz\"}".to_vec());
//! ```
//!
//! [`Serialize`]: ../../core/trait.Serialize.html

use crate::core::{AblyError, Protocol};

impl<S> crate::core::Serialize for S
where
    S: serde::Serialize,
{
    fn serialize(&self, protocol: Protocol) -> Result<Vec<u8>, AblyError> {
        match protocol {
            Protocol::Json => serde_json::to_vec(self).map_err(|e| e.to_string()),
            Protocol::MsgPack => rmp_serde::to_vec_named(self).map_err(|e| e.to_string()),
        }
        .map_err(|details| AblyError::Serialization { details })
    }
}

//! Serde implementation for Ably [`Deserializer`] trait.
//!
//! This module provides a `serde` deserializer for both wire protocols:
//! JSON via [`serde_json`] and MessagePack via [`rmp_serde`].
//!
//! # Examples
//! ```
//! use ably::{core::{Deserializer, Protocol}, providers::deserialization_serde::DeserializerSerde};
//!
//! #[derive(serde::Deserialize, Debug, PartialEq)]
//! struct Foo {
//!    bar: String,
//! }
//!
//! let foo: Foo = DeserializerSerde.deserialize(Protocol::Json, b"{\"bar\":\"baz\"}").unwrap();
//! assert_eq!(foo, Foo { bar: "baz".into() });
//! ```
//!
//! [`Deserializer`]: ../../core/trait.Deserializer.html

use crate::core::{AblyError, Deserializer, Protocol};

/// Serde implementation for Ably [`Deserializer`] trait.
///
/// This struct implements the [`Deserializer`] trait for the [`serde`] crate.
/// It is used by the [`dx`] modules to deserialize the data returned by the
/// Ably REST API.
///
/// [`Deserializer`]: ../../core/trait.Deserializer.html
/// [`serde`]: https://crates.io/crates/serde
/// [`dx`]: ../../dx/index.html
#[derive(Debug, Clone, Default)]
pub struct DeserializerSerde;

impl Deserializer for DeserializerSerde {
    fn deserialize<T>(&self, protocol: Protocol, bytes: &[u8]) -> Result<T, AblyError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        match protocol {
            Protocol::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Protocol::MsgPack => rmp_serde::from_slice(bytes).map_err(|e| e.to_string()),
        }
        .map_err(|details| AblyError::Deserialization { details })
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Foo {
        bar: String,
    }

    #[test]
    fn deserialize_json() {
        let sut = DeserializerSerde;

        let result: Foo = sut
            .deserialize(Protocol::Json, &Vec::from("{\"bar\":\"baz\"}"))
            .unwrap();

        assert_eq!(
            result,
            Foo {
                bar: "baz".to_string()
            }
        );
    }

    #[test]
    fn deserialize_msgpack() {
        let sut = DeserializerSerde;
        let bytes = rmp_serde::to_vec_named(&serde_json::json!({"bar": "baz"})).unwrap();

        let result: Foo = sut.deserialize(Protocol::MsgPack, &bytes).unwrap();

        assert_eq!(result.bar, "baz");
    }

    #[test]
    fn report_malformed_body() {
        let result = DeserializerSerde.deserialize::<Foo>(Protocol::Json, b"{");

        assert!(matches!(result, Err(AblyError::Deserialization { .. })));
    }
}

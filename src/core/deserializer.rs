//! Deserialization of Rust data structures.
//!
//! This module contains the `Deserializer` trait which is used to implement
//! deserialization of [`Ably REST API`] responses.
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

use super::{AblyError, Protocol};

/// Trait for deserializing Rust data structures.
///
/// This trait is used to implement deserialization of Rust data structures.
/// It is used by the [`dx`] modules to deserialize the data returned by the
/// Ably REST API.
///
/// To implement this trait, you must provide a `deserialize` method that
/// takes the wire [`Protocol`] along with a `&[u8]` and returns a
/// `Result<T, AblyError>`.
///
/// # Examples
/// ```
/// use ably::core::{Deserializer, AblyError, Protocol};
///
/// struct MyDeserializer;
///
/// impl Deserializer for MyDeserializer {
///    fn deserialize<T>(&self, protocol: Protocol, bytes: &[u8]) -> Result<T, AblyError>
///    where
///        T: for<'de> serde::Deserialize<'de>,
///    {
///         // ...
///         # unimplemented!()
///    }
/// }
/// ```
///
/// [`dx`]: ../dx/index.html
pub trait Deserializer: Send + Sync {
    /// Deserialize a `&[u8]` encoded with `protocol` into a
    /// `Result<T, AblyError>`.
    ///
    /// # Errors
    /// Should return an [`AblyError::Deserialization`] if the bytes can't be
    /// decoded into `T`.
    fn deserialize<T>(&self, protocol: Protocol, bytes: &[u8]) -> Result<T, AblyError>
    where
        T: for<'de> serde::Deserialize<'de>;
}

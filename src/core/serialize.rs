//! Serialization module
//!
//! This module provides a [`Serialize`] trait for the request bodies sent to
//! the Ably REST API.
//!
//! The crate provides implementation for any [`serde::Serialize`] type.
//!
//! [`Serialize`]: trait.Serialize.html

use super::{AblyError, Protocol};

/// Serialize values
///
/// This trait provides a [`serialize`] method which encodes value using
/// selected wire [`Protocol`].
///
/// [`serialize`]: #tymethod.serialize
///
/// # Examples
/// ```
/// use ably::core::{Protocol, Serialize};
///
/// let bytes = vec![1, 2, 3];
/// assert_eq!(bytes.serialize(Protocol::Json).unwrap(), b"[1,2,3]".to_vec());
/// ```
pub trait Serialize {
    /// Serialize the value
    ///
    /// # Errors
    /// Should return an [`AblyError::Serialization`] if the value cannot be serialized.
    ///
    /// [`AblyError::Serialization`]: ../error/enum.AblyError.html#variant.Serialization
    fn serialize(&self, protocol: Protocol) -> Result<Vec<u8>, AblyError>;
}

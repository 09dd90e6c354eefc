//! # Providers module
//!
//! This module contains the providers that can be used by [`AblyClient`].
//!
//! [`AblyClient`]: crate::dx::AblyClient

pub mod serialization_serde;

pub mod deserialization_serde;

#[cfg(feature = "crypto")]
pub mod crypto_aescbc;

//! # Transport Providers Module
//!
//! This module contains the Transport Providers that can be used by [`AblyClient`].
//! It is intended to be used by the [`ably`] crate.
//!
//! [`AblyClient`]: crate::dx::AblyClient
//! [`ably`]: ../index.html

#[cfg(feature = "reqwest")]
pub use self::reqwest::TransportReqwest;
#[cfg(feature = "reqwest")]
pub mod reqwest;

pub use middleware::AblyMiddleware;
pub mod middleware;

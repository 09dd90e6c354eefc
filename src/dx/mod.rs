//! # Ably Developer Experience
//!
//! This module provides structures and methods for the [Ably] REST API.
//! It is intended to be used by the [`ably`] crate.
//!
//! [`ably`]: ../index.html
//! [Ably]: https://ably.com/

pub mod auth;
pub mod channels;
pub mod history;
pub mod paginated_result;
pub mod presence;
pub mod publish;

#[cfg(all(feature = "reqwest", feature = "blocking"))]
pub use ably_client::AblyBlockingClient;
#[cfg(feature = "reqwest")]
pub use ably_client::AblyClient;
pub use ably_client::{
    AblyClientBuilder, AblyClientConfigBuilder, AblyClientCredentialsBuilder,
    AblyClientInstance, AblyGenericClient, ApiKey,
};
pub mod ably_client;

pub use channels::Channels;
pub use paginated_result::PaginatedResult;

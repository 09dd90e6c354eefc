//! # Transport module
//!
//! This module contains the [`Transport`] trait and the [`TransportRequest`] and [`TransportResponse`] types.
//!
//! You can implement this trait for your own types, or use one of the provided
//! features to use a transport library.
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

use super::{transport_response::TransportResponse, AblyError, TransportRequest};

/// This trait is used to send requests to the [`Ably REST API`].
///
/// You can implement this trait for your own types, or use one of the provided
/// features to use a transport library.
///
/// # Examples
/// ```
/// use ably::core::{Transport, TransportRequest, TransportResponse, AblyError};
///
/// struct MyTransport;
///
/// #[async_trait::async_trait]
/// impl Transport for MyTransport {
///    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, AblyError> {
///         // Send your request here
///
///         Ok(TransportResponse::default())
///    }
/// }
/// ```
///
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send a request to the [`Ably REST API`].
    ///
    /// # Errors
    /// Should return an [`AblyError::Transport`] if the request cannot be sent.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, AblyError>;
}

#[cfg(feature = "blocking")]
pub mod blocking {
    //! # Blocking transport module
    //!
    //! This module contains the blocking flavour of the [`Transport`] trait.
    //!
    //! [`Transport`]: crate::core::Transport

    use crate::core::{AblyError, TransportRequest, TransportResponse};

    /// This trait is used to send requests to the [`Ably REST API`].
    ///
    /// You can implement this trait for your own types, or use one of the provided
    /// features to use a transport library.
    ///
    /// This trait is used for blocking requests.
    ///
    /// # Examples
    /// ```
    /// use ably::core::{blocking::Transport, TransportRequest, TransportResponse, AblyError};
    ///
    /// struct MyTransport;
    ///
    /// impl Transport for MyTransport {
    ///    fn send(&self, req: TransportRequest) -> Result<TransportResponse, AblyError> {
    ///         // Send your request here
    ///
    ///         Ok(TransportResponse::default())
    ///    }
    /// }
    /// ```
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    pub trait Transport {
        /// Send a request to the [`Ably REST API`].
        ///
        /// # Errors
        /// Should return an [`AblyError::Transport`] if the request cannot be sent.
        ///
        /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
        fn send(&self, req: TransportRequest) -> Result<TransportResponse, AblyError>;
    }
}

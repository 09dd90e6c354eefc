//! # Error types
//!
//! This module contains the error types for the [`ably`] crate.
//!
//! [`ably`]: ../index.html

use snafu::Snafu;

use crate::core::TransportResponse;

/// Ably error type
///
/// This type is used to represent errors that can occur while talking to the
/// [`Ably REST API`]. It is used as the error type for the [`Result`] type.
///
/// # Examples
/// ```
/// use ably::core::AblyError;
///
/// fn foo() -> Result<(), AblyError> {
///   Ok(())
/// }
///
/// foo().map_err(|e| match e {
///   AblyError::Transport { .. } => println!("Transport error"),
///   AblyError::API { status, code, .. } => println!("API error {status}/{code}"),
///   _ => println!("Other error"),
/// });
/// ```
///
/// [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Snafu, Debug, Clone, PartialEq)]
pub enum AblyError {
    /// this error is returned when the transport layer fails
    #[snafu(display("Transport error: {details}"))]
    Transport {
        /// error details
        details: String,

        /// Failed request HTTP response.
        response: Option<Box<TransportResponse>>,
    },

    /// this error is returned when the serialization of the request fails
    #[snafu(display("Serialization error: {details}"))]
    Serialization {
        /// error details
        details: String,
    },

    /// this error is returned when the deserialization of the response fails
    #[snafu(display("Deserialization error: {details}"))]
    Deserialization {
        /// error details
        details: String,
    },

    /// this error is returned when the initialization of the cryptor fails
    #[snafu(display("Cryptor initialization error: {details}"))]
    CryptoInitialization {
        /// error details
        details: String,
    },

    /// this error is returned when the cryptor is unable to encrypt data
    #[snafu(display("Data encryption error: {details}"))]
    Encryption {
        /// error details
        details: String,
    },

    /// this error is returned when the cryptor is unable to decrypt data
    #[snafu(display("Data decryption error: {details}"))]
    Decryption {
        /// error details
        details: String,
    },

    /// this error is returned when the initialization of client fails
    #[snafu(display("Client initialization error: {details}"))]
    ClientInitialization {
        /// error details
        details: String,
    },

    /// this error is returned when a request can't be built from the
    /// provided arguments
    #[snafu(display("Invalid arguments: {details}"))]
    InvalidArguments {
        /// error details
        details: String,
    },

    /// this error is returned when the REST API responded with an error
    #[snafu(display("REST API error: {message} (status: {status}, code: {code})"))]
    API {
        /// Operation (HTTP) status code.
        status: u16,

        /// Ably error code.
        ///
        /// Four or five digit code which is usually the HTTP status code
        /// followed by two digits (e.g. `40000` for a generic bad request).
        code: u32,

        /// A message explaining what went wrong.
        message: String,

        /// Link to the error description.
        href: Option<String>,

        /// Failed request HTTP response.
        response: Option<Box<TransportResponse>>,
    },
}

impl AblyError {
    /// Create general API call error.
    ///
    /// This function is used to create a general API error when the service
    /// response couldn't be parsed into an error body. The error code is
    /// derived from the status code.
    pub(crate) fn general_api_error<S>(
        message: S,
        status: Option<u16>,
        response: Option<Box<TransportResponse>>,
    ) -> Self
    where
        S: Into<String>,
    {
        let status = status.unwrap_or(400);
        Self::API {
            status,
            code: u32::from(status) * 100,
            message: message.into(),
            href: None,
            response,
        }
    }

    /// HTTP status code of the failed request, if the service responded.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::API { status, .. } => Some(*status),
            Self::Transport {
                response: Some(response),
                ..
            } => Some(response.status),
            _ => None,
        }
    }

    /// Ably error code reported by the service.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::API { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Retrieve attached service response.
    pub fn transport_response(&self) -> Option<Box<TransportResponse>> {
        match self {
            Self::API { response, .. } | Self::Transport { response, .. } => response.clone(),
            _ => None,
        }
    }
}

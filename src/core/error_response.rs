//! # Error response
//!
//! The module contains a result type that represents parsed service error
//! responses for [`AblyError`] consumption.

use crate::core::{AblyError, TransportResponse};

/// Service error description.
///
/// Describes why the [`Ably REST API`] rejected a request.
///
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    /// A message explaining what went wrong.
    #[serde(default)]
    pub message: String,

    /// Ably error code.
    pub code: Option<u32>,

    /// HTTP status code reported by the service.
    pub status_code: Option<u16>,

    /// Link to the error description.
    pub href: Option<String>,
}

/// Ably service error response.
///
/// `APIErrorBody` enum variants covers all possible [`Ably REST API`] error
/// responses.
///
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum APIErrorBody {
    /// Error response wrapped into the `error` object.
    ///
    /// # Example
    /// ```json
    /// {
    ///     "error": {
    ///         "message": "Unable to parse capability",
    ///         "code": 40000,
    ///         "statusCode": 400,
    ///         "href": "https://help.ably.io/error/40000"
    ///     }
    /// }
    /// ```
    AsObjectWithErrorInfo {
        /// Error description.
        error: ErrorInfo,
    },

    /// Bare error description.
    ///
    /// # Example
    /// ```json
    /// {
    ///     "message": "Token expired",
    ///     "code": 40142,
    ///     "statusCode": 401
    /// }
    /// ```
    AsErrorInfo {
        /// A message explaining what went wrong.
        message: String,

        /// Ably error code.
        code: u32,

        /// HTTP status code reported by the service.
        #[serde(rename = "statusCode")]
        status_code: Option<u16>,

        /// Link to the error description.
        href: Option<String>,
    },
}

impl APIErrorBody {
    /// Retrieve error description.
    pub fn error_info(self) -> ErrorInfo {
        match self {
            APIErrorBody::AsObjectWithErrorInfo { error } => error,
            APIErrorBody::AsErrorInfo {
                message,
                code,
                status_code,
                href,
            } => ErrorInfo {
                message,
                code: Some(code),
                status_code,
                href,
            },
        }
    }

    /// Convert parsed error body into [`AblyError::API`].
    ///
    /// Missing status falls back to the HTTP response status and a missing
    /// error code is derived from the status.
    pub(crate) fn into_error(self, response: TransportResponse) -> AblyError {
        let info = self.error_info();
        let status = info.status_code.unwrap_or(response.status);

        AblyError::API {
            status,
            code: info.code.unwrap_or(u32::from(status) * 100),
            message: info.message,
            href: info.href,
            response: Some(Box::new(response)),
        }
    }
}

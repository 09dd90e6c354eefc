//! This module contains the `TransportResponse` struct.
//!
//! This struct is used to represent the response from a request to the [`Ably REST API`].
//! It is used as the response type for the [`Transport`] trait.
//!
//! [`Transport`]: ../transport/trait.Transport.html
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

use std::collections::HashMap;

use crate::core::{utils::headers::RESPONSE_CONTENT_TYPE, Protocol};

/// This struct is used to represent the response from a request to the [`Ably REST API`].
/// It is used as the response type for the [`Transport`] trait.
///
/// [`Transport`]: ../transport/trait.Transport.html
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct TransportResponse {
    /// status code of the response
    pub status: u16,

    /// headers of the response
    ///
    /// Transport implementations should store header names lowercased.
    pub headers: HashMap<String, String>,

    /// body of the response
    pub body: Option<Vec<u8>>,
}

impl TransportResponse {
    /// Look up response header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_ascii_lowercase()).or_else(|| {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }

    /// Wire format of the response body.
    ///
    /// Identified from the `Content-Type` header.
    pub fn protocol(&self) -> Option<Protocol> {
        self.header(RESPONSE_CONTENT_TYPE)
            .and_then(|content_type| Protocol::from_content_type(content_type))
    }

    /// Whether response status reports success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

//! # Transport Request
//!
//! This module contains the `TransportRequest` struct and related types.
//!
//! This module contains the `TransportRequest` struct and related types. It is
//! intended to be used by the [`ably`] crate.
//!
//! [`ably`]: ../index.html

use std::{collections::HashMap, fmt::Display, time::Duration};

use log::debug;

use crate::core::{
    error_response::APIErrorBody, AblyError, Deserializer, Protocol, Transport, TransportResponse,
};

/// The method to use for a request.
///
/// This enum represents the method to use for a request. It is used by the
/// [`TransportRequest`] struct.
///
/// [`TransportRequest`]: struct.TransportRequest.html
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub enum TransportMethod {
    /// Request without body.
    #[default]
    Get,

    /// Request with body.
    Post,
}

impl Display for TransportMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransportMethod::Get => "GET",
                TransportMethod::Post => "POST",
            }
        )
    }
}

/// This struct represents a request to be sent to the Ably REST API.
///
/// This struct represents a request to be sent to the Ably REST API. It is used by
/// the [`Transport`] trait.
///
/// All fields are representing certain parts of the request that can be used
/// to prepare one.
///
/// [`Transport`]: ../transport/trait.Transport.html
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct TransportRequest {
    /// path to the resource
    pub path: String,

    /// query parameters to be sent with the request
    pub query_parameters: HashMap<String, String>,

    /// method to use for the request
    pub method: TransportMethod,

    /// headers to be sent with the request
    pub headers: HashMap<String, String>,

    /// body to be sent with the request
    pub body: Option<Vec<u8>>,

    /// scheme, host and port of the service (e.g. `https://rest.ably.io`)
    ///
    /// When not set, the transport uses its own configured hostname.
    pub origin: Option<String>,

    /// how long the transport should wait for the response
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Send async request and process [`Ably REST API`] response.
    ///
    /// Returns deserialized body (if the service sent one) along with the
    /// response which has been used to create it.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    pub(crate) async fn send<B, T, D>(
        &self,
        transport: &T,
        deserializer: &D,
    ) -> Result<(Option<B>, TransportResponse), AblyError>
    where
        B: for<'de> serde::Deserialize<'de>,
        T: Transport,
        D: Deserializer,
    {
        let response = transport.send(self.clone()).await?;
        Self::deserialize(response, deserializer)
    }

    /// Send blocking request and process [`Ably REST API`] response.
    ///
    /// Returns deserialized body (if the service sent one) along with the
    /// response which has been used to create it.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    #[cfg(feature = "blocking")]
    pub(crate) fn send_blocking<B, T, D>(
        &self,
        transport: &T,
        deserializer: &D,
    ) -> Result<(Option<B>, TransportResponse), AblyError>
    where
        B: for<'de> serde::Deserialize<'de>,
        T: crate::core::blocking::Transport,
        D: Deserializer,
    {
        let response = transport.send(self.clone())?;
        Self::deserialize(response, deserializer)
    }

    /// Deserialize [`Ably REST API`] response.
    ///
    /// Error statuses are turned into [`AblyError::API`] using the service
    /// error body when it can be parsed.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    fn deserialize<B, D>(
        response: TransportResponse,
        deserializer: &D,
    ) -> Result<(Option<B>, TransportResponse), AblyError>
    where
        B: for<'de> serde::Deserialize<'de>,
        D: Deserializer,
    {
        let protocol = response.protocol().unwrap_or(Protocol::Json);
        debug!(
            "Response status: {}, body size: {} ({protocol})",
            response.status,
            response.body.as_ref().map_or(0, Vec::len)
        );

        if !response.is_success() {
            let error_body = response
                .body
                .as_ref()
                .and_then(|body| deserializer.deserialize::<APIErrorBody>(protocol, body).ok());

            return Err(match error_body {
                Some(error_body) => error_body.into_error(response),
                None => {
                    let message = response
                        .body
                        .as_ref()
                        .map(|body| String::from_utf8_lossy(body).to_string())
                        .filter(|text| !text.is_empty())
                        .unwrap_or_else(|| format!("Request failed with status {}", response.status));

                    AblyError::general_api_error(
                        message,
                        Some(response.status),
                        Some(Box::new(response)),
                    )
                }
            });
        }

        match response.body.as_ref() {
            Some(body) if !body.is_empty() => {
                let parsed = deserializer.deserialize::<B>(protocol, body)?;
                Ok((Some(parsed), response))
            }
            _ => Ok((None, response)),
        }
    }
}

//! # Ably middleware module
//!
//! This module contains the [`AblyMiddleware`] struct.
//! It's used to attach headers and query parameters which are common for
//! every request sent to the [`Ably REST API`]. It's intended to be used by
//! the [`ably`] crate.
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api
//! [`ably`]: ../index.html

use std::{sync::Arc, time::Duration};

use base64::{engine::general_purpose, Engine as _};
use spin::RwLock;
use uuid::Uuid;

use crate::{
    core::{
        utils::headers::{ABLY_AGENT, ABLY_VERSION, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        AblyError, Protocol, Transport, TransportRequest, TransportResponse,
    },
    dx::ably_client::{ApiKey, ABLY_PROTOCOL_VERSION, SDK_ID, VERSION},
};

/// Query parameter with unique request identifier.
const REQUEST_ID: &str = "request_id";

/// Ably middleware.
///
/// This middleware is used to add authorization, versioning and content
/// negotiation headers to each request, point it to the configured origin
/// and optionally tag it with a unique `request_id`.
///
/// It's used internally by [`AblyClient`].
///
/// [`AblyClient`]: crate::dx::AblyClient
#[derive(Debug)]
pub struct AblyMiddleware<T> {
    /// Transport which actually sends the request.
    pub(crate) transport: T,

    /// API key used for `Basic` authorization.
    pub(crate) api_key: Option<Arc<ApiKey>>,

    /// Token used for `Bearer` authorization (shared with the client).
    pub(crate) auth_token: Arc<RwLock<String>>,

    /// Scheme, host and port of the REST endpoint.
    pub(crate) origin: Arc<String>,

    /// Wire format of request bodies.
    pub(crate) protocol: Protocol,

    /// Whether unique `request_id` should be added to each request.
    pub(crate) include_request_id: bool,

    /// Default request timeout.
    pub(crate) request_timeout: Option<Duration>,
}

impl<T> AblyMiddleware<T> {
    fn prepare_request(&self, mut req: TransportRequest) -> TransportRequest {
        if self.include_request_id {
            req.query_parameters
                .entry(REQUEST_ID.into())
                .or_insert_with(|| Uuid::new_v4().to_string());
        }

        req.headers
            .entry(ACCEPT.into())
            .or_insert_with(|| self.protocol.content_type().into());
        if req.body.is_some() {
            req.headers
                .entry(CONTENT_TYPE.into())
                .or_insert_with(|| self.protocol.content_type().into());
        }
        req.headers
            .insert(ABLY_VERSION.into(), ABLY_PROTOCOL_VERSION.into());
        req.headers
            .insert(ABLY_AGENT.into(), format!("{SDK_ID}/{VERSION}"));

        if let Some(authorization) = self.authorization() {
            req.headers
                .entry(AUTHORIZATION.into())
                .or_insert(authorization);
        }

        if req.origin.is_none() {
            req.origin = Some(self.origin.to_string());
        }
        if req.timeout.is_none() {
            req.timeout = self.request_timeout;
        }

        req
    }

    /// `Authorization` header value.
    ///
    /// Token takes precedence over the API key.
    fn authorization(&self) -> Option<String> {
        let token = self.auth_token.read();

        if !token.is_empty() {
            Some(format!(
                "Bearer {}",
                general_purpose::STANDARD.encode(token.as_bytes())
            ))
        } else {
            self.api_key.as_ref().map(|key| {
                format!(
                    "Basic {}",
                    general_purpose::STANDARD.encode(format!("{}:{}", key.name, key.secret))
                )
            })
        }
    }
}

#[async_trait::async_trait]
impl<T> Transport for AblyMiddleware<T>
where
    T: Transport,
{
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, AblyError> {
        self.transport.send(self.prepare_request(req)).await
    }
}

#[cfg(feature = "blocking")]
impl<T> crate::core::blocking::Transport for AblyMiddleware<T>
where
    T: crate::core::blocking::Transport,
{
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, AblyError> {
        self.transport.send(self.prepare_request(req))
    }
}

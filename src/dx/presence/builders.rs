//! Presence builders module.
//!
//! This module contains the builder for the channel presence request.

use std::time::Duration;

use derive_builder::Builder;

use crate::{
    core::{AblyError, Channel},
    dx::history::builders::MAX_LIMIT,
};

/// The [`PresenceRequestBuilder`] is used to build channel members request
/// that is sent to the [`Ably REST API`].
///
/// This struct is used by the [`presence`] method of the [`Channel`].
///
/// [`presence`]: crate::core::Channel::presence
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::presence)", validate = "Self::validate")
)]
pub struct PresenceRequest<T, D> {
    /// Channel which members should be fetched.
    #[builder(field(vis = "pub(in crate::dx::presence)"), setter(custom))]
    pub(in crate::dx::presence) channel: Channel<T, D>,

    /// Maximum number of members in single page (up to 1000).
    #[builder(
        field(vis = "pub(in crate::dx::presence)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::presence) limit: Option<u16>,

    /// Return only members with this client identifier.
    #[builder(
        field(vis = "pub(in crate::dx::presence)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::presence) client_id: Option<String>,

    /// Return only members with this connection identifier.
    #[builder(
        field(vis = "pub(in crate::dx::presence)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::presence) connection_id: Option<String>,

    /// How long the transport should wait for the response.
    #[builder(
        field(vis = "pub(in crate::dx::presence)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::presence) timeout: Option<Duration>,
}

impl<T, D> PresenceRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    fn validate(&self) -> Result<(), String> {
        match self.limit {
            Some(Some(limit)) if limit == 0 || limit > MAX_LIMIT => Err(format!(
                "'limit' should be in range 1..={MAX_LIMIT}, got {limit}"
            )),
            _ => Ok(()),
        }
    }

    /// Build [`PresenceRequest`] from builder.
    pub(in crate::dx::presence) fn request(self) -> Result<PresenceRequest<T, D>, AblyError> {
        self.build().map_err(|err| AblyError::InvalidArguments {
            details: err.to_string(),
        })
    }
}

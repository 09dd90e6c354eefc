//! History builders module.
//!
//! This module contains the builder for the channel history request.

use std::{fmt::Display, time::Duration};

use derive_builder::Builder;

use crate::core::{AblyError, Channel};

/// Maximum number of items which service returns in single page.
pub(in crate::dx) const MAX_LIMIT: u16 = 1000;

/// Order in which items are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Oldest items first.
    Forwards,

    /// Newest items first.
    #[default]
    Backwards,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Forwards => "forwards",
                Direction::Backwards => "backwards",
            }
        )
    }
}

/// The [`HistoryRequestBuilder`] is used to build channel history request
/// that is sent to the [`Ably REST API`].
///
/// This struct is used by the [`history`] method of the [`Channel`].
///
/// [`history`]: crate::core::Channel::history
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::history)", validate = "Self::validate")
)]
pub struct HistoryRequest<T, D> {
    /// Channel which history should be fetched.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(custom))]
    pub(in crate::dx::history) channel: Channel<T, D>,

    /// Earliest time (ms since epoch) of the returned messages.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) start: Option<i64>,

    /// Latest time (ms since epoch) of the returned messages.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) end: Option<i64>,

    /// Order of the returned messages.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) direction: Option<Direction>,

    /// Maximum number of messages in single page (up to 1000).
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) limit: Option<u16>,

    /// How long the transport should wait for the response.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) timeout: Option<Duration>,
}

impl<T, D> HistoryRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    ///
    /// Validator ensure that list of provided data is enough to build valid
    /// request instance.
    fn validate(&self) -> Result<(), String> {
        if let (Some(Some(start)), Some(Some(end))) = (self.start, self.end) {
            if start > end {
                return Err(format!("'start' ({start}) should not be after 'end' ({end})"));
            }
        }

        match self.limit {
            Some(Some(limit)) if limit == 0 || limit > MAX_LIMIT => Err(format!(
                "'limit' should be in range 1..={MAX_LIMIT}, got {limit}"
            )),
            _ => Ok(()),
        }
    }

    /// Build [`HistoryRequest`] from builder.
    pub(in crate::dx::history) fn request(self) -> Result<HistoryRequest<T, D>, AblyError> {
        self.build().map_err(|err| AblyError::InvalidArguments {
            details: err.to_string(),
        })
    }
}

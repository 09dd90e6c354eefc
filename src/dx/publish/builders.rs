//! Publish builders module.
//!
//! This module contains all builders for the publish operation.

use std::time::Duration;

use derive_builder::Builder;

use crate::core::{AblyError, Channel, Message};

/// The [`PublishMessageRequestBuilder`] is used to build publish request that
/// is sent to the [`Ably REST API`].
///
/// This struct is used by the [`publish`] and [`publish_messages`] methods
/// of the [`Channel`].
///
/// # Examples
/// ```rust
/// # use ably::AblyClientBuilder;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = // AblyClient
/// # AblyClientBuilder::with_reqwest_transport()
/// #     .with_key("appId.keyId:secret")
/// #     .build()?;
///
/// let request = client
///     .channel("news")
///     .publish("greeting", "Hello, world!")
///     .client_id("publisher");
/// # Ok(())
/// # }
/// ```
///
/// [`publish`]: crate::core::Channel::publish
/// [`publish_messages`]: crate::core::Channel::publish_messages
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::publish)", validate = "Self::validate")
)]
pub struct PublishMessageRequest<T, D> {
    /// Channel to which messages should be published.
    #[builder(field(vis = "pub(in crate::dx::publish)"), setter(custom))]
    pub(in crate::dx::publish) channel: Channel<T, D>,

    /// Messages which should be published.
    #[builder(field(vis = "pub(in crate::dx::publish)"), setter(custom))]
    pub(in crate::dx::publish) messages: Vec<Message>,

    /// Identifier of the publisher.
    ///
    /// Applied to the messages which don't have own `client_id`.
    #[builder(
        field(vis = "pub(in crate::dx::publish)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::publish) client_id: Option<String>,

    /// Unique message identifier used by the service for deduplication.
    ///
    /// Can be set only when single message is published.
    #[builder(
        field(vis = "pub(in crate::dx::publish)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::publish) id: Option<String>,

    /// Additional metadata.
    ///
    /// Applied to the messages which don't have own `extras`.
    #[builder(
        field(vis = "pub(in crate::dx::publish)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::publish) extras: Option<serde_json::Value>,

    /// How long the transport should wait for the response.
    #[builder(
        field(vis = "pub(in crate::dx::publish)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::publish) timeout: Option<Duration>,
}

impl<T, D> PublishMessageRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    ///
    /// Validator ensure that list of provided data is enough to build valid
    /// request instance.
    fn validate(&self) -> Result<(), String> {
        let messages = self.messages.as_ref().map_or(0, Vec::len);

        if messages == 0 {
            return Err("At least one message should be provided".into());
        }

        if messages > 1 && matches!(self.id, Some(Some(_))) {
            return Err("Message id can be set only for a single message".into());
        }

        Ok(())
    }

    /// Build [`PublishMessageRequest`] from builder.
    pub(in crate::dx::publish) fn request(self) -> Result<PublishMessageRequest<T, D>, AblyError> {
        self.build().map_err(|err| AblyError::InvalidArguments {
            details: err.to_string(),
        })
    }
}

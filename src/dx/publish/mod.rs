//! Publish module.
//!
//! Publish messages to a channel.
//! The publish module contains the [`PublishMessageRequestBuilder`] which is
//! used to configure and send messages to a channel of the [`Ably REST API`].
//!
//! [`PublishMessageRequestBuilder`]: crate::dx::publish::PublishMessageRequestBuilder
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

#[doc(inline)]
pub use result::{PublishResponseBody, PublishResult};
pub mod result;

#[doc(inline)]
pub use builders::{PublishMessageRequest, PublishMessageRequestBuilder};
pub mod builders;

use crate::core::{
    AblyError, Channel, Deserializer, Message, MessageData, Serialize, Transport, TransportMethod,
    TransportRequest,
};

impl<T, D> Channel<T, D> {
    /// Create a new publish message builder.
    ///
    /// Instance of [`PublishMessageRequestBuilder`] is returned.
    ///
    /// # Example
    /// ```no_run
    /// # use ably::AblyClientBuilder;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = // AblyClient
    /// # AblyClientBuilder::with_reqwest_transport()
    /// #     .with_key("appId.keyId:secret")
    /// #     .build()?;
    ///
    /// client
    ///     .channel("news")
    ///     .publish("greeting", "Hello, world!")
    ///     .execute()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn publish<N, M>(&self, name: N, data: M) -> PublishMessageRequestBuilder<T, D>
    where
        N: Into<String>,
        M: Into<MessageData>,
    {
        self.publish_messages(vec![Message::new(name, data)])
    }

    /// Create a new builder which publishes batch of messages with single
    /// request.
    pub fn publish_messages(&self, messages: Vec<Message>) -> PublishMessageRequestBuilder<T, D> {
        PublishMessageRequestBuilder {
            channel: Some(self.clone()),
            messages: Some(messages),
            ..Default::default()
        }
    }
}

impl<T, D> PublishMessageRequest<T, D> {
    /// Create transport request from the request builder.
    ///
    /// Messages are encoded (and encrypted if channel has a cipher) and
    /// serialized with the client protocol.
    pub(in crate::dx::publish) fn transport_request(&self) -> Result<TransportRequest, AblyError> {
        let protocol = self.channel.client.protocol();
        let cipher = self.channel.cipher();

        let messages = self
            .messages
            .iter()
            .cloned()
            .map(|mut message| {
                if message.client_id.is_none() {
                    message.client_id = self.client_id.clone();
                }
                if self.id.is_some() {
                    message.id = self.id.clone();
                }
                if message.extras.is_none() {
                    message.extras = self.extras.clone();
                }

                message.encoded(protocol, cipher.as_deref())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransportRequest {
            path: self.channel.path("publish"),
            method: TransportMethod::Post,
            body: Some(Serialize::serialize(&messages, protocol)?),
            timeout: self.timeout,
            ..Default::default()
        })
    }
}

impl<T, D> PublishMessageRequestBuilder<T, D>
where
    T: Transport,
    D: Deserializer,
{
    /// Execute the request and return the result.
    ///
    /// This method is asynchronous and will return a future.
    /// The future will resolve to a [`PublishResult`] or [`AblyError`].
    ///
    /// # Example
    /// ```no_run
    /// # use ably::AblyClientBuilder;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = // AblyClient
    /// # AblyClientBuilder::with_reqwest_transport()
    /// #     .with_key("appId.keyId:secret")
    /// #     .build()?;
    ///
    /// let result = client
    ///     .channel("news")
    ///     .publish("greeting", "Hello, world!")
    ///     .execute()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(self) -> Result<PublishResult, AblyError> {
        let request = self.request()?;
        let transport_request = request.transport_request()?;
        let client = &request.channel.client;

        transport_request
            .send::<PublishResponseBody, _, _>(&client.transport, client.deserializer.as_ref())
            .await
            .map(|(body, _)| body.into())
    }
}

#[cfg(feature = "blocking")]
impl<T, D> PublishMessageRequestBuilder<T, D>
where
    T: crate::core::blocking::Transport,
    D: Deserializer,
{
    /// Execute the request and return the result.
    ///
    /// This method is blocking and will return the result directly.
    ///
    /// # Example
    /// ```no_run
    /// # use ably::AblyClientBuilder;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = // AblyBlockingClient
    /// # AblyClientBuilder::with_reqwest_blocking_transport()
    /// #     .with_key("appId.keyId:secret")
    /// #     .build()?;
    ///
    /// client
    ///     .channel("news")
    ///     .publish("greeting", "Hello, world!")
    ///     .execute_blocking()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute_blocking(self) -> Result<PublishResult, AblyError> {
        let request = self.request()?;
        let transport_request = request.transport_request()?;
        let client = &request.channel.client;

        transport_request
            .send_blocking::<PublishResponseBody, _, _>(
                &client.transport,
                client.deserializer.as_ref(),
            )
            .map(|(body, _)| body.into())
    }
}

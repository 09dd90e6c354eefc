//! Presence module.
//!
//! Fetch members which are currently present on a channel.
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

#[doc(inline)]
pub use builders::{PresenceRequest, PresenceRequestBuilder};
pub mod builders;

use std::collections::HashMap;

use crate::{
    core::{AblyError, Channel, Deserializer, PresenceMessage, Transport, TransportRequest},
    dx::paginated_result::PaginatedResult,
};

impl<T, D> Channel<T, D> {
    /// Create a new channel presence builder.
    ///
    /// Instance of [`PresenceRequestBuilder`] is returned.
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
    /// let members = client
    ///     .channel("lobby")
    ///     .presence()
    ///     .client_id("alice")
    ///     .execute()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn presence(&self) -> PresenceRequestBuilder<T, D> {
        PresenceRequestBuilder {
            channel: Some(self.clone()),
            ..Default::default()
        }
    }
}

impl<T, D> PresenceRequest<T, D> {
    /// Create transport request from the request builder.
    pub(in crate::dx::presence) fn transport_request(&self) -> TransportRequest {
        let mut query: HashMap<String, String> = HashMap::new();

        self.limit
            .and_then(|limit| query.insert("limit".into(), limit.to_string()));

        if let Some(client_id) = &self.client_id {
            query.insert("clientId".into(), client_id.clone());
        }

        if let Some(connection_id) = &self.connection_id {
            query.insert("connectionId".into(), connection_id.clone());
        }

        TransportRequest {
            path: self.channel.path("presence"),
            query_parameters: query,
            timeout: self.timeout,
            ..Default::default()
        }
    }
}

impl<T, D> PresenceRequestBuilder<T, D>
where
    T: Transport,
    D: Deserializer,
{
    /// Execute the request and return the first page of channel members.
    pub async fn execute(self) -> Result<PaginatedResult<PresenceMessage, T, D>, AblyError> {
        let request = self.request()?;
        let channel = &request.channel;

        PaginatedResult::fetch(&channel.client, request.transport_request(), channel.cipher())
            .await
    }
}

#[cfg(feature = "blocking")]
impl<T, D> PresenceRequestBuilder<T, D>
where
    T: crate::core::blocking::Transport,
    D: Deserializer,
{
    /// Execute the request and return the first page of channel members.
    pub fn execute_blocking(self) -> Result<PaginatedResult<PresenceMessage, T, D>, AblyError> {
        let request = self.request()?;
        let channel = &request.channel;

        PaginatedResult::fetch_blocking(
            &channel.client,
            request.transport_request(),
            channel.cipher(),
        )
    }
}

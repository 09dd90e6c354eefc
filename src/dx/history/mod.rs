//! History module.
//!
//! Fetch messages previously published to a channel.
//! The history module contains the [`HistoryRequestBuilder`] which is used to
//! page through channel messages stored by the [`Ably REST API`].
//!
//! [`HistoryRequestBuilder`]: crate::dx::history::HistoryRequestBuilder
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

#[doc(inline)]
pub use builders::{Direction, HistoryRequest, HistoryRequestBuilder};
pub mod builders;

use std::collections::HashMap;

use crate::{
    core::{AblyError, Channel, Deserializer, Message, Transport, TransportRequest},
    dx::paginated_result::PaginatedResult,
};

impl<T, D> Channel<T, D> {
    /// Create a new channel history builder.
    ///
    /// Instance of [`HistoryRequestBuilder`] is returned.
    ///
    /// # Example
    /// ```no_run
    /// # use ably::{AblyClientBuilder, dx::history::Direction};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = // AblyClient
    /// # AblyClientBuilder::with_reqwest_transport()
    /// #     .with_key("appId.keyId:secret")
    /// #     .build()?;
    ///
    /// let page = client
    ///     .channel("news")
    ///     .history()
    ///     .direction(Direction::Forwards)
    ///     .limit(50)
    ///     .execute()
    ///     .await?;
    ///
    /// println!("received {} messages", page.items().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn history(&self) -> HistoryRequestBuilder<T, D> {
        HistoryRequestBuilder {
            channel: Some(self.clone()),
            ..Default::default()
        }
    }
}

impl<T, D> HistoryRequest<T, D> {
    /// Create transport request from the request builder.
    pub(in crate::dx::history) fn transport_request(&self) -> TransportRequest {
        let mut query: HashMap<String, String> = HashMap::new();

        self.start
            .and_then(|start| query.insert("start".into(), start.to_string()));
        self.end
            .and_then(|end| query.insert("end".into(), end.to_string()));
        self.direction
            .and_then(|direction| query.insert("direction".into(), direction.to_string()));
        self.limit
            .and_then(|limit| query.insert("limit".into(), limit.to_string()));

        TransportRequest {
            path: self.channel.path("history"),
            query_parameters: query,
            timeout: self.timeout,
            ..Default::default()
        }
    }
}

impl<T, D> HistoryRequestBuilder<T, D>
where
    T: Transport,
    D: Deserializer,
{
    /// Execute the request and return the first page of messages.
    ///
    /// Messages are decoded (and decrypted with the channel cipher) before
    /// being returned.
    pub async fn execute(self) -> Result<PaginatedResult<Message, T, D>, AblyError> {
        let request = self.request()?;
        let channel = &request.channel;

        PaginatedResult::fetch(&channel.client, request.transport_request(), channel.cipher())
            .await
    }
}

#[cfg(feature = "blocking")]
impl<T, D> HistoryRequestBuilder<T, D>
where
    T: crate::core::blocking::Transport,
    D: Deserializer,
{
    /// Execute the request and return the first page of messages.
    ///
    /// Messages are decoded (and decrypted with the channel cipher) before
    /// being returned.
    pub fn execute_blocking(self) -> Result<PaginatedResult<Message, T, D>, AblyError> {
        let request = self.request()?;
        let channel = &request.channel;

        PaginatedResult::fetch_blocking(
            &channel.client,
            request.transport_request(),
            channel.cipher(),
        )
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        core::{MessageData, TransportResponse},
        dx::ably_client::{AblyClientBuilder, AblyClientInstance},
        providers::deserialization_serde::DeserializerSerde,
        transport::middleware::AblyMiddleware,
    };
    use test_case::test_case;

    #[derive(Default, Debug)]
    struct MockTransport;

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse, AblyError> {
            assert_eq!(request.path, "/channels/news/history");

            Ok(TransportResponse {
                status: 200,
                headers: [("content-type".into(), "application/json".into())].into(),
                body: Some(
                    br#"[{"id":"a:0","name":"update","data":"{\"v\":1}","encoding":"json","timestamp":1}]"#
                        .to_vec(),
                ),
            })
        }
    }

    fn client() -> AblyClientInstance<AblyMiddleware<MockTransport>, DeserializerSerde> {
        AblyClientBuilder::with_transport(MockTransport)
            .with_key("app.key:secret")
            .build()
            .unwrap()
    }

    #[test]
    fn verify_all_query_parameters() {
        let client = client();

        let request = client
            .channel("news")
            .history()
            .start(1)
            .end(2)
            .direction(Direction::Forwards)
            .limit(10)
            .request()
            .unwrap()
            .transport_request();

        assert_eq!(
            HashMap::<String, String>::from([
                ("start".into(), "1".into()),
                ("end".into(), "2".into()),
                ("direction".into(), "forwards".into()),
                ("limit".into(), "10".into()),
            ]),
            request.query_parameters
        );
    }

    #[test]
    fn omit_unset_parameters() {
        let client = client();

        let request = client
            .channel("news")
            .history()
            .request()
            .unwrap()
            .transport_request();

        assert!(request.query_parameters.is_empty());
    }

    #[test_case(0; "zero")]
    #[test_case(1001; "above maximum")]
    fn reject_limit(limit: u16) {
        let result = client().channel("news").history().limit(limit).request();

        assert!(matches!(result, Err(AblyError::InvalidArguments { .. })));
    }

    #[test]
    fn reject_reversed_interval() {
        let result = client()
            .channel("news")
            .history()
            .start(10)
            .end(5)
            .request();

        assert!(matches!(result, Err(AblyError::InvalidArguments { .. })));
    }

    #[tokio::test]
    async fn return_decoded_messages() {
        let client = client();

        let page = client.channel("news").history().execute().await.unwrap();

        assert!(page.is_last());
        assert_eq!(
            page.items()[0].data,
            Some(MessageData::Json(serde_json::json!({"v": 1})))
        );
        assert_eq!(page.items()[0].encoding, None);
    }
}

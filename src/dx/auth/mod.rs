//! Auth module.
//!
//! Issue tokens with limited capability.
//! The auth module contains the [`CreateTokenRequestBuilder`] which signs
//! token requests locally and the [`RequestTokenBuilder`] which exchanges
//! them for a token with the [`Ably REST API`].
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

pub use capability::{Capability, Operation, WILDCARD};
pub mod capability;

pub use types::{TokenDetails, TokenParams, TokenRequest};
pub mod types;

#[doc(inline)]
pub use builders::{
    CreateTokenRequest, CreateTokenRequestBuilder, RequestToken, RequestTokenBuilder,
};
pub mod builders;

use log::debug;

use crate::{
    core::{
        utils::encoding::url_encode, AblyError, Deserializer, Serialize, Transport,
        TransportMethod, TransportRequest,
    },
    dx::ably_client::AblyClientInstance,
};

impl<T, D> AblyClientInstance<T, D> {
    /// Create a new token request builder.
    ///
    /// Signed request doesn't require network access and can be handed to
    /// another client which will exchange it for a token.
    ///
    /// Instance of [`CreateTokenRequestBuilder`] is returned.
    pub fn create_token_request(&self) -> CreateTokenRequestBuilder<T, D> {
        CreateTokenRequestBuilder {
            client: Some(self.clone()),
            ..Default::default()
        }
    }

    /// Create a new token builder.
    ///
    /// Instance of [`RequestTokenBuilder`] is returned.
    ///
    /// # Example
    /// ```no_run
    /// # use ably::{AblyClientBuilder, dx::auth::Capability};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = // AblyClient
    /// # AblyClientBuilder::with_reqwest_transport()
    /// #     .with_key("appId.keyId:secret")
    /// #     .build()?;
    ///
    /// let details = client
    ///     .request_token()
    ///     .capability(Capability::new().with("chat:*", ["publish", "subscribe"]))
    ///     .ttl(3_600_000)
    ///     .execute()
    ///     .await?;
    ///
    /// client.set_token(details.token);
    /// # Ok(())
    /// # }
    /// ```
    pub fn request_token(&self) -> RequestTokenBuilder<T, D> {
        RequestTokenBuilder {
            client: Some(self.clone()),
            ..Default::default()
        }
    }
}

impl<T, D> RequestToken<T, D> {
    /// Create transport request from the request builder.
    pub(in crate::dx::auth) fn transport_request(&self) -> Result<TransportRequest, AblyError> {
        let token_request = self.token_request()?;
        debug!(
            "Requesting token for '{}' key (client id: {:?})",
            token_request.key_name, token_request.client_id
        );

        Ok(TransportRequest {
            path: format!(
                "/keys/{}/requestToken",
                url_encode(token_request.key_name.as_bytes())
            ),
            method: TransportMethod::Post,
            body: Some(Serialize::serialize(&token_request, self.client.protocol())?),
            timeout: self.timeout,
            ..Default::default()
        })
    }
}

fn token_details(details: Option<TokenDetails>) -> Result<TokenDetails, AblyError> {
    details.ok_or_else(|| AblyError::Deserialization {
        details: "Token details missing in response".into(),
    })
}

impl<T, D> RequestTokenBuilder<T, D>
where
    T: Transport,
    D: Deserializer,
{
    /// Execute the request and return issued token.
    pub async fn execute(self) -> Result<TokenDetails, AblyError> {
        let request = self.request()?;
        let transport_request = request.transport_request()?;
        let client = &request.client;

        transport_request
            .send::<TokenDetails, _, _>(&client.transport, client.deserializer.as_ref())
            .await
            .and_then(|(details, _)| token_details(details))
    }
}

#[cfg(feature = "blocking")]
impl<T, D> RequestTokenBuilder<T, D>
where
    T: crate::core::blocking::Transport,
    D: Deserializer,
{
    /// Execute the request and return issued token.
    pub fn execute_blocking(self) -> Result<TokenDetails, AblyError> {
        let request = self.request()?;
        let transport_request = request.transport_request()?;
        let client = &request.client;

        transport_request
            .send_blocking::<TokenDetails, _, _>(&client.transport, client.deserializer.as_ref())
            .and_then(|(details, _)| token_details(details))
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        core::TransportResponse, dx::ably_client::AblyClientBuilder,
        providers::deserialization_serde::DeserializerSerde,
        transport::middleware::AblyMiddleware,
    };
    use std::time::Duration;

    struct MockTransport {
        body: Option<Vec<u8>>,
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse, AblyError> {
            assert_eq!(request.path, "/keys/app.key/requestToken");
            assert_eq!(request.method, TransportMethod::Post);

            Ok(TransportResponse {
                status: 200,
                body: self.body.clone(),
                ..Default::default()
            })
        }
    }

    type TestClient = AblyClientInstance<AblyMiddleware<MockTransport>, DeserializerSerde>;

    fn client(body: Option<&[u8]>) -> TestClient {
        AblyClientBuilder::with_transport(MockTransport {
            body: body.map(<[u8]>::to_vec),
        })
        .with_key("app.key:secret")
        .with_client_id("configured")
        .build()
        .unwrap()
    }

    #[test]
    fn sign_with_client_key() {
        let request = client(None)
            .create_token_request()
            .capability(Capability::all())
            .client_id("client")
            .ttl(3_600_000)
            .timestamp(1000)
            .nonce("nonce")
            .sign()
            .unwrap();

        assert_eq!(request.key_name, "app.key");
        assert_eq!(request.capability, Some(r#"{"*":["*"]}"#.into()));
        assert_eq!(request.mac, "afilzqKu+Wj4oYVqOAZkO9eZB/aUC3zK9N9tZFfCO7s=");
    }

    #[test]
    fn use_configured_client_id() {
        let request = client(None).create_token_request().sign().unwrap();

        assert_eq!(request.client_id, Some("configured".into()));
    }

    #[test]
    fn use_token_params() {
        let request = client(None)
            .create_token_request()
            .ttl(10)
            .token_params(TokenParams {
                ttl: Some(20),
                nonce: Some("from-params".into()),
                ..Default::default()
            })
            .sign()
            .unwrap();

        assert_eq!(request.ttl, Some(10));
        assert_eq!(request.nonce, "from-params");
    }

    #[test]
    fn require_key_to_sign() {
        let client = AblyClientBuilder::with_transport(MockTransport { body: None })
            .with_token("token")
            .build()
            .unwrap();

        assert!(matches!(
            client.create_token_request().sign(),
            Err(AblyError::InvalidArguments { .. })
        ));
        assert!(client
            .create_token_request()
            .key_name("app.key")
            .key_secret("secret")
            .sign()
            .is_ok());
    }

    #[test]
    fn reject_zero_ttl() {
        assert!(matches!(
            client(None).create_token_request().ttl(0).sign(),
            Err(AblyError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn create_transport_request() {
        let request = client(None)
            .request_token()
            .capability(Capability::new().with("chat", ["publish"]))
            .timeout(Duration::from_secs(2))
            .request()
            .unwrap()
            .transport_request()
            .unwrap();

        let body: serde_json::Value =
            serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(request.timeout, Some(Duration::from_secs(2)));
        assert_eq!(body["keyName"], "app.key");
        assert_eq!(body["capability"], r#"{"chat":["publish"]}"#);
        assert_eq!(body["clientId"], "configured");
    }

    #[tokio::test]
    async fn request_token() {
        let client = client(Some(
            br#"{"token":"issued","issued":1,"expires":2,"capability":"{\"*\":[\"*\"]}"}"#,
        ));

        let details = client.request_token().execute().await.unwrap();

        assert_eq!(details.token, "issued");
        assert_eq!(details.capability, Capability::all());
    }

    #[tokio::test]
    async fn fail_without_token_details() {
        let result = client(None).request_token().execute().await;

        assert!(matches!(result, Err(AblyError::Deserialization { .. })));
    }
}

//! Ably client module
//!
//! This module contains the [`AblyClient`] struct.
//! It's used to send requests to [`Ably REST API`].
//! It's intended to be used by the [`ably`] crate.
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api
//! [`ably`]: ../index.html

use std::{
    fmt::{Debug, Formatter},
    ops::Deref,
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use derive_builder::Builder;
use hashbrown::HashMap;
use log::info;
use spin::RwLock;

use crate::{
    core::{AblyError, ChannelRef, CryptoProvider, Protocol},
    providers::deserialization_serde::DeserializerSerde,
    transport::middleware::AblyMiddleware,
};

#[cfg(feature = "reqwest")]
use crate::transport::TransportReqwest;

/// Library identifier used in `Ably-Agent` header.
pub(crate) const SDK_ID: &str = "ably-rust";

/// Library version.
pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the REST protocol spoken by the client.
pub(crate) const ABLY_PROTOCOL_VERSION: &str = "2";

/// Default REST endpoint host.
pub(crate) const DEFAULT_REST_HOST: &str = "rest.ably.io";

/// Ably client
///
/// Client for Ably REST API with support for all [`selected features`].
/// The client uses the transport to send requests to [`Ably REST API`] and
/// the deserializer to parse its (JSON or MessagePack) responses.
///
/// Client is cheap to clone: all clones share configuration, current token
/// and the channels registry.
///
/// # Examples
/// Using the default [`TransportReqwest`] transport:
/// ```rust
/// use ably::AblyClientBuilder;
///
/// # fn main() -> Result<(), ably::core::AblyError> {
/// let client = AblyClientBuilder::with_reqwest_transport()
///     .with_key("appId.keyId:keySecret")
///     .with_client_id("my-client")
///     .build()?;
///
/// let channel = client.channel("news");
/// # Ok(())
/// # }
/// ```
///
/// Using your own [`Transport`] implementation:
/// ```rust
/// use ably::{AblyClientBuilder, core::{Transport, TransportRequest, TransportResponse, AblyError}};
///
/// # struct MyTransport;
/// # #[async_trait::async_trait]
/// # impl Transport for MyTransport {
/// #     async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, AblyError> {
/// #         unimplemented!()
/// #     }
/// # }
/// # fn main() -> Result<(), AblyError> {
/// // note that MyTransport must implement the `Transport` trait
/// let client = AblyClientBuilder::with_transport(MyTransport)
///     .with_token("token issued by your auth server")
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// [`selected features`]: ../index.html#features
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
/// [`TransportReqwest`]: crate::transport::TransportReqwest
/// [`Transport`]: crate::core::Transport
pub type AblyGenericClient<T, D> = AblyClientInstance<AblyMiddleware<T>, D>;

/// Ably client
///
/// Client for Ably REST API which uses [`reqwest`] as transport and [`serde`]
/// for responses deserialization.
///
/// See [`AblyGenericClient`] for more information.
///
/// [`reqwest`]: https://docs.rs/reqwest
/// [`serde`]: https://docs.rs/serde
#[cfg(feature = "reqwest")]
pub type AblyClient = AblyGenericClient<TransportReqwest, DeserializerSerde>;

/// Ably client with blocking transport.
///
/// See [`AblyGenericClient`] for more information.
#[cfg(all(feature = "reqwest", feature = "blocking"))]
pub type AblyBlockingClient =
    AblyGenericClient<crate::transport::reqwest::blocking::TransportReqwest, DeserializerSerde>;

/// Ably client raw instance.
///
/// This struct contains the actual client state.
/// It shouldn't be used directly. Use [`AblyGenericClient`] or
/// [`AblyClient`] instead.
#[derive(Debug)]
pub struct AblyClientInstance<T, D> {
    pub(crate) inner: Arc<AblyClientRef<T, D>>,
}

impl<T, D> Deref for AblyClientInstance<T, D> {
    type Target = AblyClientRef<T, D>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T, D> Clone for AblyClientInstance<T, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Client reference
///
/// This struct contains the actual client state.
/// It's wrapped in `Arc` by [`AblyClient`] and uses interior mutability for
/// its internal state.
///
/// Not intended to be used directly. Use [`AblyClient`] instead.
#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    name = "AblyClientConfigBuilder",
    build_fn(private, name = "build_internal"),
    setter(prefix = "with")
)]
pub struct AblyClientRef<T, D> {
    /// Transport layer
    #[builder(setter(custom))]
    pub(crate) transport: T,

    /// [`Ably REST API`] responses deserializer
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    #[builder(setter(custom))]
    pub(crate) deserializer: Arc<D>,

    /// Data cryptor / decryptor provider
    #[builder(
        setter(custom, strip_option),
        field(vis = "pub(crate)"),
        default = "None"
    )]
    pub(crate) cryptor: Option<Arc<dyn CryptoProvider>>,

    /// Configuration
    #[builder(setter(custom))]
    pub(crate) config: AblyConfig,

    /// Access token
    #[builder(
        setter(custom),
        field(vis = "pub(crate)"),
        default = "Arc::new(spin::RwLock::new(String::new()))"
    )]
    pub(crate) auth_token: Arc<RwLock<String>>,

    /// Parsed API key.
    #[builder(setter(skip))]
    pub(crate) api_key: Option<Arc<ApiKey>>,

    /// Created channels.
    ///
    /// Map of channels which has been requested through the [`Channels`]
    /// registry. Entries are never removed.
    ///
    /// [`Channels`]: crate::dx::channels::Channels
    #[builder(setter(skip))]
    pub(crate) channels: RwLock<HashMap<String, Arc<ChannelRef>>>,
}

impl<T, D> AblyClientInstance<T, D> {
    /// Update currently used authentication token.
    ///
    /// Once set, token is used instead of the API key to authorize requests.
    /// Empty token switches client back to API key authorization.
    ///
    /// # Examples
    /// ```rust
    /// use ably::AblyClientBuilder;
    ///
    /// # fn main() -> Result<(), ably::core::AblyError> {
    /// let token = "<token from request_token>";
    /// let client = // AblyClient
    /// #     AblyClientBuilder::with_reqwest_transport()
    /// #         .with_key("appId.keyId:secret")
    /// #         .build()?;
    /// client.set_token(token);
    /// // Now client is limited by `token` capability.
    /// #     Ok(())
    /// # }
    /// ```
    pub fn set_token<S>(&self, access_token: S)
    where
        S: Into<String>,
    {
        let mut token = self.auth_token.write();
        *token = access_token.into();
    }

    /// Retrieve currently used authentication token.
    ///
    /// # Examples
    /// ```rust
    /// use ably::AblyClientBuilder;
    ///
    /// # fn main() -> Result<(), ably::core::AblyError> {
    /// let client = // AblyClient
    /// #     AblyClientBuilder::with_reqwest_transport()
    /// #         .with_token("token")
    /// #         .build()?;
    /// println!("Current authentication token: {:?}", client.get_token());
    /// #     Ok(())
    /// # }
    /// ```
    pub fn get_token(&self) -> Option<String> {
        let token = self.auth_token.read().deref().clone();
        (!token.is_empty()).then_some(token)
    }

    /// Identifier of the client configured during initialization.
    pub fn client_id(&self) -> Option<&str> {
        self.config.client_id.as_deref()
    }

    /// Wire format used for request bodies.
    pub fn protocol(&self) -> Protocol {
        self.config.protocol
    }
}

impl<T, D> AblyClientConfigBuilder<T, D> {
    /// Set identifier of the client.
    ///
    /// It returns [`AblyClientConfigBuilder`] that you can use to set the
    /// configuration for the client. This is a part of the
    /// [`AblyClientConfigBuilder`].
    pub fn with_client_id<S>(mut self, client_id: S) -> Self
    where
        S: Into<String>,
    {
        if let Some(configuration) = self.config.as_mut() {
            configuration.client_id = Some(client_id.into());
        }

        self
    }

    /// Use binary (MessagePack) encoding for request bodies instead of JSON.
    pub fn with_use_binary_protocol(mut self, use_binary_protocol: bool) -> Self {
        if let Some(configuration) = self.config.as_mut() {
            configuration.protocol = if use_binary_protocol {
                Protocol::MsgPack
            } else {
                Protocol::Json
            };
        }

        self
    }

    /// Set wire format for request bodies.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        if let Some(configuration) = self.config.as_mut() {
            configuration.protocol = protocol;
        }

        self
    }

    /// Set REST endpoint host.
    ///
    /// **Default:** `rest.ably.io`
    pub fn with_rest_host<S>(mut self, host: S) -> Self
    where
        S: Into<String>,
    {
        if let Some(configuration) = self.config.as_mut() {
            configuration.endpoint.rest_host = host.into();
        }

        self
    }

    /// Set port used for non-TLS requests.
    ///
    /// **Default:** `80`
    pub fn with_port(mut self, port: u16) -> Self {
        if let Some(configuration) = self.config.as_mut() {
            configuration.endpoint.port = port;
        }

        self
    }

    /// Set port used for TLS requests.
    ///
    /// **Default:** `443`
    pub fn with_tls_port(mut self, port: u16) -> Self {
        if let Some(configuration) = self.config.as_mut() {
            configuration.endpoint.tls_port = port;
        }

        self
    }

    /// Whether requests should be sent over TLS.
    ///
    /// **Default:** `true`
    pub fn with_tls(mut self, tls: bool) -> Self {
        if let Some(configuration) = self.config.as_mut() {
            configuration.endpoint.tls = tls;
        }

        self
    }

    /// Set full origin (scheme, host and port), overriding host, port and
    /// TLS settings.
    ///
    /// ```rust
    /// use ably::AblyClientBuilder;
    ///
    /// # fn main() -> Result<(), ably::core::AblyError> {
    /// let client = AblyClientBuilder::with_reqwest_transport()
    ///     .with_key("appId.keyId:secret")
    ///     .with_origin("http://localhost:8080")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_origin<S>(mut self, origin: S) -> Self
    where
        S: Into<String>,
    {
        if let Some(configuration) = self.config.as_mut() {
            configuration.endpoint.origin = Some(origin.into());
        }

        self
    }

    /// Set default time after which any request will be cancelled by timeout.
    ///
    /// The value is passed to the transport. Per-request `timeout` takes
    /// precedence.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        if let Some(configuration) = self.config.as_mut() {
            configuration.transport.request_timeout = Some(timeout);
        }

        self
    }

    /// Whether unique `request_id` should be added to each request.
    ///
    /// **Default:** `false`
    pub fn with_add_request_ids(mut self, add_request_ids: bool) -> Self {
        if let Some(configuration) = self.config.as_mut() {
            configuration.transport.include_request_id = add_request_ids;
        }

        self
    }

    /// Authenticate requests with token.
    ///
    /// Token takes precedence over the API key.
    pub fn with_token<S>(mut self, token: S) -> Self
    where
        S: Into<String>,
    {
        self.auth_token = Some(Arc::new(RwLock::new(token.into())));

        self
    }

    /// Data encryption / decryption
    ///
    /// Crypto module used by every channel which doesn't have own cipher.
    ///
    /// It returns [`AblyClientConfigBuilder`] that you can use to set the
    /// configuration for the client. This is a part of the
    /// [`AblyClientConfigBuilder`].
    pub fn with_cryptor<C>(mut self, cryptor: C) -> Self
    where
        C: CryptoProvider + 'static,
    {
        self.cryptor = Some(Some(Arc::new(cryptor)));

        self
    }

    /// Build a [`AblyClient`] from the builder
    pub fn build(self) -> Result<AblyClientInstance<AblyMiddleware<T>, D>, AblyError> {
        self.build_internal()
            .map_err(|err| AblyError::ClientInitialization {
                details: err.to_string(),
            })
            .and_then(|pre_build| {
                let api_key = pre_build.config.api_key()?.map(Arc::new);

                if api_key.is_none() && pre_build.auth_token.read().is_empty() {
                    return Err(AblyError::ClientInitialization {
                        details: "Either API key or token should be provided".into(),
                    });
                }

                let origin = pre_build.config.endpoint.origin();

                info!(
                    "Client Configuration: \n key name: {:?}\n client_id: {:?}\n origin: {}\n protocol: {}",
                    api_key.as_ref().map(|key| key.name.clone()),
                    pre_build.config.client_id,
                    origin,
                    pre_build.config.protocol
                );

                Ok(AblyClientRef {
                    transport: AblyMiddleware {
                        transport: pre_build.transport,
                        api_key: api_key.clone(),
                        auth_token: pre_build.auth_token.clone(),
                        origin: Arc::new(origin),
                        protocol: pre_build.config.protocol,
                        include_request_id: pre_build.config.transport.include_request_id,
                        request_timeout: pre_build.config.transport.request_timeout,
                    },
                    deserializer: pre_build.deserializer,
                    cryptor: pre_build.cryptor,
                    config: pre_build.config,
                    auth_token: pre_build.auth_token,
                    api_key,
                    channels: RwLock::new(HashMap::new()),
                })
            })
            .map(|client| AblyClientInstance {
                inner: Arc::new(client),
            })
    }
}

/// API key
///
/// Key in form of `<keyName>:<keySecret>` where `keyName` is
/// `<appId>.<keyId>`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Public part of the key (`appId.keyId`).
    pub name: String,

    /// Secret which is used to sign token requests.
    pub secret: String,
}

impl FromStr for ApiKey {
    type Err = AblyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key.split_once(':') {
            Some((name, secret)) if !name.is_empty() && !secret.is_empty() => Ok(Self {
                name: name.into(),
                secret: secret.into(),
            }),
            _ => Err(AblyError::ClientInitialization {
                details: "API key should be in form of 'keyName:keySecret'".into(),
            }),
        }
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey {{ name: {}, secret: *** }}", self.name)
    }
}

/// Endpoint configuration
///
/// Where [`Ably REST API`] requests should be sent.
///
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfiguration {
    /// REST endpoint host.
    pub rest_host: String,

    /// Port for non-TLS requests.
    pub port: u16,

    /// Port for TLS requests.
    pub tls_port: u16,

    /// Whether TLS should be used.
    pub tls: bool,

    /// Full origin override.
    pub origin: Option<String>,
}

impl Default for EndpointConfiguration {
    fn default() -> Self {
        Self {
            rest_host: DEFAULT_REST_HOST.into(),
            port: 80,
            tls_port: 443,
            tls: true,
            origin: None,
        }
    }
}

impl EndpointConfiguration {
    /// Scheme, host and port which should be used for requests.
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.origin {
            return origin.trim_end_matches('/').to_string();
        }

        match (self.tls, self.tls_port, self.port) {
            (true, 443, _) => format!("https://{}", self.rest_host),
            (true, port, _) => format!("https://{}:{port}", self.rest_host),
            (false, _, 80) => format!("http://{}", self.rest_host),
            (false, _, port) => format!("http://{}:{port}", self.rest_host),
        }
    }
}

/// Transport specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportConfiguration {
    /// Timeout after which request will be cancelled by timeout.
    pub request_timeout: Option<Duration>,

    /// Whether unique `request_id` query parameter should be added.
    pub include_request_id: bool,
}

/// Ably configuration
///
/// Configuration for [`AblyClient`].
/// This struct separates the configuration from the actual client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AblyConfig {
    /// API key in form of `keyName:keySecret`.
    pub(crate) key: Option<String>,

    /// Client identifier.
    pub(crate) client_id: Option<String>,

    /// Wire format for request bodies.
    pub(crate) protocol: Protocol,

    /// Endpoint configuration.
    pub endpoint: EndpointConfiguration,

    /// Transport configuration.
    pub transport: TransportConfiguration,
}

impl AblyConfig {
    fn api_key(&self) -> Result<Option<ApiKey>, AblyError> {
        self.key.as_deref().map(ApiKey::from_str).transpose()
    }
}

/// Ably builder for [`AblyClient`]
///
/// Used to construct [`AblyClient`] with the transport which should be used
/// to access [`Ably REST API`].
///
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
pub struct AblyClientBuilder;

impl AblyClientBuilder {
    /// Set the transport to use for the client.
    ///
    /// Returns [`AblyClientCredentialsBuilder`] which allows to set the
    /// credentials and a custom deserializer.
    ///
    /// # Examples
    /// ```
    /// use ably::{AblyClientBuilder, core::{Transport, TransportRequest, TransportResponse, AblyError}};
    ///
    /// # struct MyTransport;
    /// # #[async_trait::async_trait]
    /// # impl Transport for MyTransport {
    /// #     async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, AblyError> {
    /// #         unimplemented!()
    /// #     }
    /// # }
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// // note that MyTransport must implement the `Transport` trait
    /// let client = AblyClientBuilder::with_transport(MyTransport)
    ///     .with_key("appId.keyId:secret")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_transport<T>(transport: T) -> AblyClientCredentialsBuilder<T, DeserializerSerde>
    where
        T: crate::core::Transport,
    {
        AblyClientCredentialsBuilder {
            transport,
            deserializer: DeserializerSerde,
        }
    }

    /// Set the blocking transport to use for the client.
    ///
    /// Returns [`AblyClientCredentialsBuilder`] which allows to set the
    /// credentials and a custom deserializer.
    #[cfg(feature = "blocking")]
    pub fn with_blocking_transport<T>(
        transport: T,
    ) -> AblyClientCredentialsBuilder<T, DeserializerSerde>
    where
        T: crate::core::blocking::Transport + Send + Sync,
    {
        AblyClientCredentialsBuilder {
            transport,
            deserializer: DeserializerSerde,
        }
    }
}

/// Ably builder for [`AblyClient`] to set credentials.
///
/// The builder provides methods to set the API key or token and returns the
/// next step of the builder with the remaining parameters.
#[derive(Debug, Clone)]
pub struct AblyClientCredentialsBuilder<T, D> {
    /// Transport layer.
    pub(crate) transport: T,

    /// [`Ably REST API`] responses deserializer
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    pub(crate) deserializer: D,
}

impl<T, D> AblyClientCredentialsBuilder<T, D> {
    /// Set [`Ably REST API`] responses deserializer.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    pub fn with_deserializer<D2>(self, deserializer: D2) -> AblyClientCredentialsBuilder<T, D2>
    where
        D2: crate::core::Deserializer,
    {
        AblyClientCredentialsBuilder {
            transport: self.transport,
            deserializer,
        }
    }

    /// Authenticate with API key (`keyName:keySecret`).
    ///
    /// Key is validated when client is built.
    pub fn with_key<S>(self, key: S) -> AblyClientConfigBuilder<T, D>
    where
        S: Into<String>,
    {
        self.config_builder(AblyConfig {
            key: Some(key.into()),
            ..Default::default()
        })
    }

    /// Authenticate with previously issued token.
    ///
    /// Client without API key can't sign token requests.
    pub fn with_token<S>(self, token: S) -> AblyClientConfigBuilder<T, D>
    where
        S: Into<String>,
    {
        self.config_builder(AblyConfig::default()).with_token(token)
    }

    fn config_builder(self, config: AblyConfig) -> AblyClientConfigBuilder<T, D> {
        AblyClientConfigBuilder {
            transport: Some(self.transport),
            deserializer: Some(Arc::new(self.deserializer)),
            config: Some(config),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::core::{TransportRequest, TransportResponse};
    use std::any::type_name;
    use test_case::test_case;

    #[derive(Default)]
    struct MockTransport;

    #[async_trait::async_trait]
    impl crate::core::Transport for MockTransport {
        async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, AblyError> {
            Ok(TransportResponse::default())
        }
    }

    #[test]
    fn include_ably_middleware() {
        fn type_of<T>(_: &T) -> &'static str {
            type_name::<T>()
        }

        let client = AblyClientBuilder::with_transport(MockTransport)
            .with_key("app.key:secret")
            .build()
            .unwrap();

        assert_eq!(
            type_of(&client.transport),
            type_name::<AblyMiddleware<MockTransport>>()
        );
    }

    #[test_case("app.key:secret" => true; "valid key")]
    #[test_case("app.key" => false; "missing secret")]
    #[test_case(":secret" => false; "missing name")]
    #[test_case("app.key:" => false; "empty secret")]
    fn validate_api_key(key: &str) -> bool {
        AblyClientBuilder::with_transport(MockTransport)
            .with_key(key)
            .build()
            .is_ok()
    }

    #[test]
    fn require_credentials() {
        let result = AblyClientBuilder::with_transport(MockTransport)
            .with_token("")
            .build();

        assert!(matches!(result, Err(AblyError::ClientInitialization { .. })));
    }

    #[test]
    fn split_api_key() {
        let client = AblyClientBuilder::with_transport(MockTransport)
            .with_key("app.key:secret")
            .build()
            .unwrap();

        let key = client.api_key.clone().unwrap();
        assert_eq!(key.name, "app.key");
        assert_eq!(key.secret, "secret");
        assert!(!format!("{key:?}").contains("secret:"));
    }

    #[test]
    fn replace_token() {
        let client = AblyClientBuilder::with_transport(MockTransport)
            .with_token("first")
            .build()
            .unwrap();

        assert_eq!(client.get_token(), Some("first".into()));
        client.clone().set_token("second");
        assert_eq!(client.get_token(), Some("second".into()));
        client.set_token("");
        assert_eq!(client.get_token(), None);
    }

    #[test]
    fn select_binary_protocol() {
        let client = AblyClientBuilder::with_transport(MockTransport)
            .with_key("app.key:secret")
            .with_use_binary_protocol(true)
            .with_client_id("client")
            .build()
            .unwrap();

        assert_eq!(client.protocol(), Protocol::MsgPack);
        assert_eq!(client.client_id(), Some("client"));
    }

    #[test_case(EndpointConfiguration::default() => "https://rest.ably.io"; "default")]
    #[test_case(EndpointConfiguration { tls: false, ..Default::default() } => "http://rest.ably.io"; "plain http")]
    #[test_case(EndpointConfiguration { tls_port: 8443, ..Default::default() } => "https://rest.ably.io:8443"; "custom tls port")]
    #[test_case(EndpointConfiguration { tls: false, port: 8080, rest_host: "localhost".into(), ..Default::default() } => "http://localhost:8080"; "custom host and port")]
    #[test_case(EndpointConfiguration { origin: Some("http://127.0.0.1:1234/".into()), ..Default::default() } => "http://127.0.0.1:1234"; "origin override")]
    fn compose_origin(endpoint: EndpointConfiguration) -> String {
        endpoint.origin()
    }

    #[derive(Default)]
    struct RecordingTransport {
        requests: spin::Mutex<Vec<TransportRequest>>,
    }

    #[async_trait::async_trait]
    impl crate::core::Transport for RecordingTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse, AblyError> {
            self.requests.lock().push(request);
            Ok(TransportResponse::default())
        }
    }

    #[tokio::test]
    async fn pass_transport_configuration_to_requests() {
        use crate::core::Transport;

        let client = AblyClientBuilder::with_transport(RecordingTransport::default())
            .with_key("app.key:secret")
            .with_request_timeout(Duration::from_millis(50))
            .with_add_request_ids(true)
            .build()
            .unwrap();

        client
            .transport
            .send(TransportRequest::default())
            .await
            .unwrap();
        client
            .transport
            .send(TransportRequest {
                timeout: Some(Duration::from_secs(1)),
                ..Default::default()
            })
            .await
            .unwrap();

        let requests = client.transport.transport.requests.lock();
        assert_eq!(requests[0].timeout, Some(Duration::from_millis(50)));
        assert_eq!(requests[1].timeout, Some(Duration::from_secs(1)));
        assert!(requests[0].query_parameters.contains_key("request_id"));
        assert_ne!(
            requests[0].query_parameters.get("request_id"),
            requests[1].query_parameters.get("request_id")
        );
    }

    #[tokio::test]
    async fn skip_request_ids_by_default() {
        use crate::core::Transport;

        let client = AblyClientBuilder::with_transport(RecordingTransport::default())
            .with_key("app.key:secret")
            .build()
            .unwrap();

        client
            .transport
            .send(TransportRequest::default())
            .await
            .unwrap();

        let requests = client.transport.transport.requests.lock();
        assert!(requests[0].query_parameters.is_empty());
        assert_eq!(requests[0].timeout, None);
    }
}

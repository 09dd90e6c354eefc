//! # Reqwest Transport Implementation
//!
//! This module contains the [`TransportReqwest`] struct.
//! It is used to send requests to the [`Ably REST API`] using the [`reqwest`] crate.
//! It is intended to be used by the [`ably`] crate.
//!
//! It requires the [`reqwest` feature] to be enabled.
//!
//! [`TransportReqwest`]: ./struct.TransportReqwest.html
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api
//! [`reqwest`]: https://docs.rs/reqwest
//! [`ably`]: ../index.html
//! [`reqwest` feature]: ../index.html#features

use std::collections::HashMap;

use bytes::Bytes;
use log::info;
use reqwest::{header::HeaderMap, StatusCode};

use crate::{
    core::{
        utils::encoding::url_encode, AblyError, Transport, TransportMethod, TransportRequest,
        TransportResponse,
    },
    dx::ably_client::{AblyClientBuilder, AblyClientCredentialsBuilder},
    providers::deserialization_serde::DeserializerSerde,
};

/// Origin which is used when request doesn't specify one.
const DEFAULT_HOSTNAME: &str = "https://rest.ably.io";

/// This struct is used to send requests to the [`Ably REST API`] using the [`reqwest`] crate.
/// It is used as the transport type for the [`AblyClient`].
/// It is intended to be used by the [`ably`] crate.
///
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
/// [`reqwest`]: https://docs.rs/reqwest
/// [`ably`]: ../index.html
/// [`AblyClient`]: crate::dx::AblyClient
#[derive(Clone, Debug)]
pub struct TransportReqwest {
    reqwest_client: reqwest::Client,

    /// The hostname to use for requests without own origin.
    ///
    /// It defaults to `https://rest.ably.io`. Client configured through
    /// [`AblyClientBuilder`] always provides origin for each request.
    ///
    /// # Examples
    /// ```
    /// use ably::transport::TransportReqwest;
    ///
    /// let transport = {
    ///    let mut transport = TransportReqwest::default();
    ///    transport.hostname = "https://wherever.you.want.com".into();
    ///    transport
    /// };
    /// ```
    pub hostname: String,
}

#[async_trait::async_trait]
impl Transport for TransportReqwest {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, AblyError> {
        let request_url = prepare_url(
            request.origin.as_deref().unwrap_or(&self.hostname),
            &request.path,
            &request.query_parameters,
        );
        info!("{} {}", request.method, request_url);
        let headers = prepare_headers(&request.headers)?;
        let timeout = request.timeout;
        let builder = match request.method {
            TransportMethod::Get => self.prepare_get_method(request, request_url),
            TransportMethod::Post => self.prepare_post_method(request, request_url),
        }?;
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };

        let result = builder
            .headers(headers)
            .send()
            .await
            .map_err(transport_error)?;

        let status = result.status();
        let headers = result.headers().clone();
        result
            .bytes()
            .await
            .map_err(transport_error)
            .and_then(|bytes| create_result(status, &headers, bytes))
    }
}

impl Default for TransportReqwest {
    fn default() -> Self {
        Self {
            reqwest_client: reqwest::Client::default(),
            hostname: DEFAULT_HOSTNAME.into(),
        }
    }
}

impl TransportReqwest {
    /// Create a new [`TransportReqwest`] instance.
    ///
    /// It provides a default [`reqwest`] client using [`reqwest::Client::default()`]
    /// and a default hostname of `https://rest.ably.io`.
    ///
    /// # Example
    /// ```
    /// use ably::transport::TransportReqwest;
    ///
    /// let transport = TransportReqwest::new();
    /// ```
    ///
    /// [`reqwest`]: https://docs.rs/reqwest
    pub fn new() -> Self {
        Self::default()
    }

    /// Create transport which uses provided [`reqwest`] client (with own
    /// proxy, TLS or pool settings).
    ///
    /// [`reqwest`]: https://docs.rs/reqwest
    pub fn with_client(reqwest_client: reqwest::Client) -> Self {
        Self {
            reqwest_client,
            ..Default::default()
        }
    }

    /// set the custom hostname for request
    pub fn set_hostname<S>(&mut self, hostname: S)
    where
        S: Into<String>,
    {
        self.hostname = hostname.into();
    }

    fn prepare_get_method(
        &self,
        _request: TransportRequest,
        url: String,
    ) -> Result<reqwest::RequestBuilder, AblyError> {
        Ok(self.reqwest_client.get(url))
    }

    fn prepare_post_method(
        &self,
        request: TransportRequest,
        url: String,
    ) -> Result<reqwest::RequestBuilder, AblyError> {
        request
            .body
            .ok_or(AblyError::Transport {
                details: "Body should not be empty for POST".into(),
                response: None,
            })
            .map(|vec_bytes| self.reqwest_client.post(url).body(vec_bytes))
    }
}

fn transport_error(err: reqwest::Error) -> AblyError {
    AblyError::Transport {
        details: err.to_string(),
        response: None,
    }
}

fn prepare_headers(request_headers: &HashMap<String, String>) -> Result<HeaderMap, AblyError> {
    HeaderMap::try_from(request_headers).map_err(|err| AblyError::Transport {
        details: err.to_string(),
        response: None,
    })
}

fn prepare_url(hostname: &str, path: &str, query_params: &HashMap<String, String>) -> String {
    let hostname = hostname.trim_end_matches('/');
    if query_params.is_empty() {
        return format!("{hostname}{path}");
    }

    let mut query: Vec<_> = query_params.iter().collect();
    query.sort();

    let query = query
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                url_encode(key.as_bytes()),
                url_encode(value.as_bytes())
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{hostname}{path}?{query}")
}

fn prepare_response_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .fold(HashMap::new(), |mut acc, (name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).to_string();
            acc.entry(name.as_str().to_ascii_lowercase())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
            acc
        })
}

fn create_result(
    status: StatusCode,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<TransportResponse, AblyError> {
    Ok(TransportResponse {
        status: status.as_u16(),
        headers: prepare_response_headers(headers),
        body: (!body.is_empty()).then(|| body.to_vec()),
    })
}

impl AblyClientBuilder {
    /// Creates a new [`AblyClientCredentialsBuilder`] with the default
    /// [`TransportReqwest`] transport.
    ///
    /// The default transport uses the [`reqwest`] crate to send requests to
    /// the [`Ably REST API`].
    ///
    /// # Examples
    /// ```
    /// use ably::AblyClientBuilder;
    ///
    /// # fn main() -> Result<(), ably::core::AblyError> {
    /// let client = AblyClientBuilder::with_reqwest_transport()
    ///     .with_key("appId.keyId:secret")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// [`reqwest`]: https://docs.rs/reqwest
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    pub fn with_reqwest_transport() -> AblyClientCredentialsBuilder<TransportReqwest, DeserializerSerde>
    {
        AblyClientBuilder::with_transport(TransportReqwest::new())
    }
}

#[cfg(feature = "blocking")]
pub mod blocking {
    //! # Reqwest Transport Blocking Implementation
    //!
    //! This module contains the [`TransportReqwest`] struct.
    //! It is used to send requests to the [`Ably REST API`] using the [`reqwest`] crate.
    //! It is intended to be used by the [`ably`] crate.
    //!
    //! It requires the [`reqwest` and `blocking` feature] to be enabled.
    //!
    //! [`TransportReqwest`]: ./struct.TransportReqwest.html
    //! [`Ably REST API`]: https://ably.com/docs/api/rest-api
    //! [`reqwest`]: https://docs.rs/reqwest
    //! [`ably`]: ../index.html
    //! [`reqwest` and `blocking` feature]: ../index.html#features

    use log::info;

    use crate::{
        core::{AblyError, TransportMethod, TransportRequest, TransportResponse},
        dx::ably_client::{AblyClientBuilder, AblyClientCredentialsBuilder},
        providers::deserialization_serde::DeserializerSerde,
        transport::reqwest::{
            create_result, prepare_headers, prepare_url, transport_error, DEFAULT_HOSTNAME,
        },
    };

    /// This struct is used to send requests to the [`Ably REST API`] using the [`reqwest`] crate.
    /// It is used as the transport type for the [`AblyBlockingClient`].
    ///
    /// It requires the [`reqwest` and `blocking` feature] to be enabled.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    /// [`reqwest`]: https://docs.rs/reqwest
    /// [`AblyBlockingClient`]: crate::dx::AblyBlockingClient
    /// [`reqwest` and `blocking` feature]: ../../index.html#features
    #[derive(Debug)]
    pub struct TransportReqwest {
        reqwest_client: reqwest::blocking::Client,

        /// The hostname to use for requests without own origin.
        ///
        /// It defaults to `https://rest.ably.io`.
        pub hostname: String,
    }

    impl crate::core::blocking::Transport for TransportReqwest {
        fn send(&self, request: TransportRequest) -> Result<TransportResponse, AblyError> {
            let request_url = prepare_url(
                request.origin.as_deref().unwrap_or(&self.hostname),
                &request.path,
                &request.query_parameters,
            );
            info!("{} {}", request.method, request_url);
            let headers = prepare_headers(&request.headers)?;
            let timeout = request.timeout;
            let builder = match request.method {
                TransportMethod::Get => self.prepare_get_method(request, request_url),
                TransportMethod::Post => self.prepare_post_method(request, request_url),
            }?;
            let builder = match timeout {
                Some(timeout) => builder.timeout(timeout),
                None => builder,
            };

            let result = builder.headers(headers).send().map_err(transport_error)?;

            let status = result.status();
            let headers = result.headers().clone();
            result
                .bytes()
                .map_err(transport_error)
                .and_then(|bytes| create_result(status, &headers, bytes))
        }
    }

    impl Default for TransportReqwest {
        fn default() -> Self {
            Self {
                reqwest_client: reqwest::blocking::Client::default(),
                hostname: DEFAULT_HOSTNAME.into(),
            }
        }
    }

    impl TransportReqwest {
        /// Create a new [`TransportReqwest`] instance.
        ///
        /// It provides a default [`reqwest`] client using
        /// [`reqwest::blocking::Client::default()`] and a default hostname of
        /// `https://rest.ably.io`.
        ///
        /// [`reqwest`]: https://docs.rs/reqwest
        pub fn new() -> Self {
            Self::default()
        }

        fn prepare_get_method(
            &self,
            _request: TransportRequest,
            request_url: String,
        ) -> Result<reqwest::blocking::RequestBuilder, AblyError> {
            Ok(self.reqwest_client.get(request_url))
        }

        fn prepare_post_method(
            &self,
            request: TransportRequest,
            request_url: String,
        ) -> Result<reqwest::blocking::RequestBuilder, AblyError> {
            request
                .body
                .ok_or(AblyError::Transport {
                    details: "Body should not be empty for POST".into(),
                    response: None,
                })
                .map(|body| self.reqwest_client.post(request_url).body(body))
        }
    }

    impl AblyClientBuilder {
        /// Creates a new [`AblyClientCredentialsBuilder`] with the default
        /// blocking [`TransportReqwest`] transport.
        ///
        /// # Examples
        /// ```no_run
        /// use ably::AblyClientBuilder;
        ///
        /// # fn main() -> Result<(), ably::core::AblyError> {
        /// let client = AblyClientBuilder::with_reqwest_blocking_transport()
        ///     .with_key("appId.keyId:secret")
        ///     .build()?;
        /// # Ok(())
        /// # }
        /// ```
        pub fn with_reqwest_blocking_transport(
        ) -> AblyClientCredentialsBuilder<TransportReqwest, DeserializerSerde> {
            AblyClientBuilder::with_blocking_transport(TransportReqwest::new())
        }
    }

}

//! Token builders module.
//!
//! This module contains builders for signing token requests and for
//! exchanging them for a token.

use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use derive_builder::Builder;
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use sha2::Sha256;
use time::OffsetDateTime;

use crate::{
    core::AblyError,
    dx::{
        ably_client::{AblyClientInstance, ApiKey},
        auth::{Capability, TokenParams, TokenRequest},
    },
};

/// Length of the generated nonce.
const NONCE_LENGTH: usize = 16;

/// The [`CreateTokenRequestBuilder`] is used to sign token request locally
/// with the API key secret.
///
/// This struct is used by the [`create_token_request`] method of the
/// [`AblyClient`].
///
/// [`create_token_request`]: crate::dx::AblyClient::create_token_request
/// [`AblyClient`]: crate::dx::AblyClient
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::auth)", validate = "Self::validate")
)]
pub struct CreateTokenRequest<T, D> {
    /// Client which provides default key and client identifier.
    #[builder(field(vis = "pub(in crate::dx::auth)"), setter(custom))]
    pub(in crate::dx::auth) client: AblyClientInstance<T, D>,

    /// Name of the key which should be used instead of the client key.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) key_name: Option<String>,

    /// Secret of the key which should be used instead of the client key.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) key_secret: Option<String>,

    /// Requested capability.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) capability: Option<Capability>,

    /// Identifier of the client which will use the token.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) client_id: Option<String>,

    /// Token time to live (ms).
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) ttl: Option<u64>,

    /// Time of the request (ms since epoch). Current time by default.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) timestamp: Option<i64>,

    /// Unique random string. Generated by default.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) nonce: Option<String>,

    /// Token parameters which are used for values not set explicitly.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) token_params: Option<TokenParams>,
}

/// The [`RequestTokenBuilder`] is used to sign token request and exchange it
/// for a token with the [`Ably REST API`].
///
/// This struct is used by the [`request_token`] method of the [`AblyClient`].
///
/// [`request_token`]: crate::dx::AblyClient::request_token
/// [`AblyClient`]: crate::dx::AblyClient
/// [`Ably REST API`]: https://ably.com/docs/api/rest-api
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::auth)", validate = "Self::validate")
)]
pub struct RequestToken<T, D> {
    /// Client which is used to send the request.
    #[builder(field(vis = "pub(in crate::dx::auth)"), setter(custom))]
    pub(in crate::dx::auth) client: AblyClientInstance<T, D>,

    /// Name of the key which should be used instead of the client key.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) key_name: Option<String>,

    /// Secret of the key which should be used instead of the client key.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) key_secret: Option<String>,

    /// Requested capability.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) capability: Option<Capability>,

    /// Identifier of the client which will use the token.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(into, strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) client_id: Option<String>,

    /// Token time to live (ms).
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) ttl: Option<u64>,

    /// Token parameters which are used for values not set explicitly.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) token_params: Option<TokenParams>,

    /// How long the transport should wait for the response.
    #[builder(
        field(vis = "pub(in crate::dx::auth)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::auth) timeout: Option<Duration>,
}

impl<T, D> CreateTokenRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    fn validate(&self) -> Result<(), String> {
        validate_ttl(self.ttl.flatten())?;

        match &self.nonce {
            Some(Some(nonce)) if nonce.is_empty() => Err("'nonce' should not be empty".into()),
            _ => Ok(()),
        }
    }

    /// Build [`CreateTokenRequest`] from builder.
    pub(in crate::dx::auth) fn request(self) -> Result<CreateTokenRequest<T, D>, AblyError> {
        self.build().map_err(|err| AblyError::InvalidArguments {
            details: err.to_string(),
        })
    }

    /// Sign token request.
    ///
    /// # Errors
    /// Should return an [`AblyError::InvalidArguments`] if neither client
    /// nor builder provides key name and secret.
    ///
    /// # Example
    /// ```rust
    /// # use ably::{AblyClientBuilder, dx::auth::Capability};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = // AblyClient
    /// # AblyClientBuilder::with_reqwest_transport()
    /// #     .with_key("appId.keyId:secret")
    /// #     .build()?;
    ///
    /// let token_request = client
    ///     .create_token_request()
    ///     .capability(Capability::new().with("chat", ["subscribe"]))
    ///     .client_id("subscriber")
    ///     .sign()?;
    ///
    /// assert_eq!(token_request.key_name, "appId.keyId");
    /// # Ok(())
    /// # }
    /// ```
    pub fn sign(self) -> Result<TokenRequest, AblyError> {
        let request = self.request()?;
        let key = signing_key(&request.client, request.key_name, request.key_secret)?;
        let params = merge_params(
            TokenParams {
                capability: request.capability,
                client_id: request.client_id,
                ttl: request.ttl,
                timestamp: request.timestamp,
                nonce: request.nonce,
            },
            request.token_params,
            request.client.client_id(),
        );

        sign_token_request(&key, params)
    }
}

impl<T, D> RequestTokenBuilder<T, D> {
    /// Validate user-provided data for request builder.
    fn validate(&self) -> Result<(), String> {
        validate_ttl(self.ttl.flatten())
    }

    /// Build [`RequestToken`] from builder.
    pub(in crate::dx::auth) fn request(self) -> Result<RequestToken<T, D>, AblyError> {
        self.build().map_err(|err| AblyError::InvalidArguments {
            details: err.to_string(),
        })
    }
}

impl<T, D> RequestToken<T, D> {
    /// Sign token request which should be exchanged for a token.
    pub(in crate::dx::auth) fn token_request(&self) -> Result<TokenRequest, AblyError> {
        let key = signing_key(&self.client, self.key_name.clone(), self.key_secret.clone())?;
        let params = merge_params(
            TokenParams {
                capability: self.capability.clone(),
                client_id: self.client_id.clone(),
                ttl: self.ttl,
                ..Default::default()
            },
            self.token_params.clone(),
            self.client.client_id(),
        );

        sign_token_request(&key, params)
    }
}

fn validate_ttl(ttl: Option<u64>) -> Result<(), String> {
    match ttl {
        Some(0) => Err("'ttl' should be greater than zero".into()),
        _ => Ok(()),
    }
}

/// Resolve key which should be used to sign the request.
///
/// Explicitly provided name and secret take precedence over the client key.
fn signing_key<T, D>(
    client: &AblyClientInstance<T, D>,
    key_name: Option<String>,
    key_secret: Option<String>,
) -> Result<ApiKey, AblyError> {
    let client_key = client.api_key.as_deref();
    let name = key_name.or_else(|| client_key.map(|key| key.name.clone()));
    let secret = key_secret.or_else(|| client_key.map(|key| key.secret.clone()));

    match (name, secret) {
        (Some(name), Some(secret)) => Ok(ApiKey { name, secret }),
        _ => Err(AblyError::InvalidArguments {
            details: "API key is required to sign token request".into(),
        }),
    }
}

/// Fill values missing in `explicit` parameters from `fallback` parameters
/// and client configuration.
fn merge_params(
    explicit: TokenParams,
    fallback: Option<TokenParams>,
    client_id: Option<&str>,
) -> TokenParams {
    let fallback = fallback.unwrap_or_default();

    TokenParams {
        capability: explicit.capability.or(fallback.capability),
        client_id: explicit
            .client_id
            .or(fallback.client_id)
            .or_else(|| client_id.map(String::from)),
        ttl: explicit.ttl.or(fallback.ttl),
        timestamp: explicit.timestamp.or(fallback.timestamp),
        nonce: explicit.nonce.or(fallback.nonce),
    }
}

/// Sign token request with HMAC-SHA256.
///
/// Signed text is composed of `keyName`, `ttl`, `capability`, `clientId`,
/// `timestamp` and `nonce` each followed by a newline. Missing values are
/// represented by empty lines.
pub(crate) fn sign_token_request(
    key: &ApiKey,
    params: TokenParams,
) -> Result<TokenRequest, AblyError> {
    let capability = params.capability.map(|capability| capability.to_json());
    let timestamp = params.timestamp.unwrap_or_else(now_millis);
    let nonce = params.nonce.unwrap_or_else(generate_nonce);

    let text = format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n",
        key.name,
        params.ttl.map(|ttl| ttl.to_string()).unwrap_or_default(),
        capability.as_deref().unwrap_or_default(),
        params.client_id.as_deref().unwrap_or_default(),
        timestamp,
        nonce
    );

    let mut mac = Hmac::<Sha256>::new_from_slice(key.secret.as_bytes()).map_err(|err| {
        AblyError::InvalidArguments {
            details: err.to_string(),
        }
    })?;
    mac.update(text.as_bytes());

    Ok(TokenRequest {
        key_name: key.name.clone(),
        ttl: params.ttl,
        capability,
        client_id: params.client_id,
        timestamp,
        nonce,
        mac: general_purpose::STANDARD.encode(mac.finalize().into_bytes()),
    })
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

//! # Token types
//!
//! This module contains types which are exchanged with the service while
//! issuing a token.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dx::auth::Capability;

/// Parameters of the requested token.
///
/// Values which are not set are either filled in by the client (timestamp,
/// nonce, client identifier) or left for the service to decide (ttl,
/// capability).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenParams {
    /// Requested capability. Service intersects it with the key capability.
    pub capability: Option<Capability>,

    /// Identifier of the client which will use the token.
    pub client_id: Option<String>,

    /// Token time to live (ms).
    pub ttl: Option<u64>,

    /// Time of the request (ms since epoch).
    pub timestamp: Option<i64>,

    /// Unique random string which protects against replay.
    pub nonce: Option<String>,
}

/// Token request signed with the API key secret.
///
/// Signed request can be handed to a client which doesn't have access to the
/// key secret and exchanged for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Name of the key which has been used to sign the request.
    pub key_name: String,

    /// Token time to live (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,

    /// Canonical JSON of the requested capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,

    /// Identifier of the client which will use the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Time of the request (ms since epoch).
    pub timestamp: i64,

    /// Unique random string.
    pub nonce: String,

    /// Base64 encoded HMAC-SHA256 signature of the request.
    pub mac: String,
}

/// Issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    /// Token which should be used to authorize requests.
    pub token: String,

    /// Name of the key which has been used to issue the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,

    /// Time when token has been issued (ms since epoch).
    #[serde(default)]
    pub issued: i64,

    /// Time when token expires (ms since epoch).
    #[serde(default)]
    pub expires: i64,

    /// Effective token capability.
    #[serde(
        default,
        deserialize_with = "capability_from_wire",
        serialize_with = "capability_to_wire"
    )]
    pub capability: Capability,

    /// Identifier of the client bound to the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Capability is sent by the service as a JSON string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireCapability {
    Text(String),
    Map(Capability),
}

fn capability_from_wire<'de, D>(deserializer: D) -> Result<Capability, D::Error>
where
    D: Deserializer<'de>,
{
    match WireCapability::deserialize(deserializer)? {
        WireCapability::Text(text) => text.parse().map_err(serde::de::Error::custom),
        WireCapability::Map(capability) => Ok(capability),
    }
}

fn capability_to_wire<S>(capability: &Capability, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&capability.to_json())
}

//! # Message module
//!
//! This module contains the [`Message`] type along with its payload
//! representation [`MessageData`] and the payload encoding pipeline.
//!
//! Payload which can't be sent natively by selected wire [`Protocol`] is
//! transformed before publishing and the applied transformations are recorded
//! in the message `encoding` field (e.g. `json/utf-8/cipher+aes-128-cbc/base64`).
//! Received messages are decoded by walking `encoding` backward.

use std::fmt::Formatter;

use base64::{engine::general_purpose, Engine as _};
use log::warn;
use serde::{
    de::{value::MapAccessDeserializer, value::SeqAccessDeserializer, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::core::{AblyError, CryptoProvider, Protocol};

/// `encoding` step for JSON payload serialized into string.
pub(crate) const ENCODING_JSON: &str = "json";

/// `encoding` step for string payload converted into UTF-8 bytes.
pub(crate) const ENCODING_UTF8: &str = "utf-8";

/// `encoding` step for binary payload converted to base64 string.
pub(crate) const ENCODING_BASE64: &str = "base64";

/// `encoding` step prefix for encrypted payload.
pub(crate) const ENCODING_CIPHER_PREFIX: &str = "cipher+";

/// Message payload.
///
/// The service accepts strings, binary data and JSON-encodable values.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageData {
    /// Text payload.
    Text(String),

    /// Binary payload.
    Binary(Vec<u8>),

    /// JSON object, array, number or boolean.
    Json(serde_json::Value),
}

impl From<&str> for MessageData {
    fn from(value: &str) -> Self {
        MessageData::Text(value.into())
    }
}

impl From<String> for MessageData {
    fn from(value: String) -> Self {
        MessageData::Text(value)
    }
}

impl From<Vec<u8>> for MessageData {
    fn from(value: Vec<u8>) -> Self {
        MessageData::Binary(value)
    }
}

impl From<&[u8]> for MessageData {
    fn from(value: &[u8]) -> Self {
        MessageData::Binary(value.to_vec())
    }
}

impl From<serde_json::Value> for MessageData {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => MessageData::Text(text),
            value => MessageData::Json(value),
        }
    }
}

impl Serialize for MessageData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MessageData::Text(text) => serializer.serialize_str(text),
            MessageData::Binary(bytes) => serializer.serialize_bytes(bytes),
            MessageData::Json(value) => value.serialize(serializer),
        }
    }
}

struct MessageDataVisitor;

impl<'de> Visitor<'de> for MessageDataVisitor {
    type Value = MessageData;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("string, binary or JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(MessageData::Json(v.into()))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(MessageData::Json(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(MessageData::Json(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(MessageData::Json(v.into()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(MessageData::Text(v.into()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(MessageData::Text(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(MessageData::Binary(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(MessageData::Binary(v))
    }

    fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        serde_json::Value::deserialize(SeqAccessDeserializer::new(seq)).map(MessageData::Json)
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        serde_json::Value::deserialize(MapAccessDeserializer::new(map)).map(MessageData::Json)
    }
}

impl<'de> Deserialize<'de> for MessageData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MessageDataVisitor)
    }
}

/// Channel message.
///
/// # Examples
/// ```
/// use ably::core::{Message, MessageData};
///
/// let message = Message::new("greeting", "Hello!");
/// assert_eq!(message.data, Some(MessageData::Text("Hello!".into())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Message payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,

    /// Identifier of the client which published message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Identifier of the connection which has been used to publish message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    /// Time when message has been received by the service (ms since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Transformations applied to the `data` which should be reverted to get
    /// original payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Additional message metadata (e.g. push payload).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl Message {
    /// Create message with event name and payload.
    pub fn new<N, D>(name: N, data: D) -> Self
    where
        N: Into<String>,
        D: Into<MessageData>,
    {
        Self {
            name: Some(name.into()),
            data: Some(data.into()),
            ..Default::default()
        }
    }

    /// Prepare message payload for transmission.
    ///
    /// JSON values are stringified, payload encrypted with `cipher` (if
    /// provided) and binary data encoded with base64 when textual `protocol`
    /// is used.
    pub(crate) fn encoded(
        mut self,
        protocol: Protocol,
        cipher: Option<&dyn CryptoProvider>,
    ) -> Result<Self, AblyError> {
        let (data, encoding) = encode_data(self.data.take(), self.encoding.take(), protocol, cipher)?;
        self.data = data;
        self.encoding = encoding;
        Ok(self)
    }
}

impl Decodable for Message {
    fn decode(mut self, cipher: Option<&dyn CryptoProvider>) -> Self {
        let (data, encoding) = decode_data(self.data.take(), self.encoding.take(), cipher);
        self.data = data;
        self.encoding = encoding;
        self
    }
}

/// Received payload decoding.
///
/// Implemented by the types which carry payload along with its `encoding`.
pub trait Decodable {
    /// Revert payload transformations listed in `encoding`.
    ///
    /// Decoding never fails: a step which can't be applied stops the process
    /// and remaining steps are left in `encoding`.
    fn decode(self, cipher: Option<&dyn CryptoProvider>) -> Self;
}

fn split_encoding(encoding: Option<String>) -> Vec<String> {
    encoding
        .map(|encoding| {
            encoding
                .split('/')
                .filter(|step| !step.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn join_encoding(steps: Vec<String>) -> Option<String> {
    (!steps.is_empty()).then(|| steps.join("/"))
}

/// Apply transformations required to send `data` over `protocol`.
pub(crate) fn encode_data(
    data: Option<MessageData>,
    encoding: Option<String>,
    protocol: Protocol,
    cipher: Option<&dyn CryptoProvider>,
) -> Result<(Option<MessageData>, Option<String>), AblyError> {
    let mut steps = split_encoding(encoding);
    let Some(data) = data else {
        return Ok((None, join_encoding(steps)));
    };

    let data = match (cipher, data) {
        (Some(cipher), data) => {
            let bytes = payload_bytes(data, &mut steps)?;
            let encrypted = cipher.encrypt(bytes)?;
            steps.push(format!("{ENCODING_CIPHER_PREFIX}{}", cipher.cipher_name()));
            MessageData::Binary(encrypted)
        }
        (None, MessageData::Json(value)) => {
            steps.push(ENCODING_JSON.into());
            MessageData::Text(json_string(&value)?)
        }
        (None, data) => data,
    };

    let data = match data {
        MessageData::Binary(bytes) if !protocol.is_binary() => {
            steps.push(ENCODING_BASE64.into());
            MessageData::Text(general_purpose::STANDARD.encode(bytes))
        }
        data => data,
    };

    Ok((Some(data), join_encoding(steps)))
}

/// Bytes which should be encrypted, with the steps required to restore
/// payload type.
fn payload_bytes(data: MessageData, steps: &mut Vec<String>) -> Result<Vec<u8>, AblyError> {
    Ok(match data {
        MessageData::Binary(bytes) => bytes,
        MessageData::Text(text) => {
            steps.push(ENCODING_UTF8.into());
            text.into_bytes()
        }
        MessageData::Json(value) => {
            steps.push(ENCODING_JSON.into());
            steps.push(ENCODING_UTF8.into());
            json_string(&value)?.into_bytes()
        }
    })
}

fn json_string(value: &serde_json::Value) -> Result<String, AblyError> {
    serde_json::to_string(value).map_err(|err| AblyError::Serialization {
        details: err.to_string(),
    })
}

/// Revert transformations listed in `encoding`.
pub(crate) fn decode_data(
    data: Option<MessageData>,
    encoding: Option<String>,
    cipher: Option<&dyn CryptoProvider>,
) -> (Option<MessageData>, Option<String>) {
    let mut steps = split_encoding(encoding);
    let Some(mut data) = data else {
        return (None, join_encoding(steps));
    };

    while let Some(step) = steps.pop() {
        match decode_step(&step, data.clone(), cipher) {
            Ok(decoded) => data = decoded,
            Err(err) => {
                warn!("Unable to decode message payload with '{step}': {err}");
                steps.push(step);
                break;
            }
        }
    }

    (Some(data), join_encoding(steps))
}

fn decode_step(
    step: &str,
    data: MessageData,
    cipher: Option<&dyn CryptoProvider>,
) -> Result<MessageData, AblyError> {
    let unexpected = |data: &MessageData| AblyError::Deserialization {
        details: format!("Unexpected payload type for '{step}': {data:?}"),
    };

    match (step, data) {
        (ENCODING_BASE64, MessageData::Text(text)) => general_purpose::STANDARD
            .decode(text)
            .map(MessageData::Binary)
            .map_err(|err| AblyError::Deserialization {
                details: err.to_string(),
            }),
        (ENCODING_BASE64, data @ MessageData::Binary(_)) => Ok(data),
        (ENCODING_UTF8, MessageData::Binary(bytes)) => String::from_utf8(bytes)
            .map(MessageData::Text)
            .map_err(|err| AblyError::Deserialization {
                details: err.to_string(),
            }),
        (ENCODING_UTF8, data @ MessageData::Text(_)) => Ok(data),
        (ENCODING_JSON, MessageData::Text(text)) => serde_json::from_str::<serde_json::Value>(&text)
            .map(MessageData::from)
            .map_err(|err| AblyError::Deserialization {
                details: err.to_string(),
            }),
        (ENCODING_JSON, MessageData::Binary(bytes)) => serde_json::from_slice::<serde_json::Value>(&bytes)
            .map(MessageData::from)
            .map_err(|err| AblyError::Deserialization {
                details: err.to_string(),
            }),
        (step, MessageData::Binary(bytes)) if step.starts_with(ENCODING_CIPHER_PREFIX) => {
            let algorithm = &step[ENCODING_CIPHER_PREFIX.len()..];
            match cipher {
                Some(cipher) if cipher.cipher_name() == algorithm => {
                    cipher.decrypt(bytes).map(MessageData::Binary)
                }
                Some(cipher) => Err(AblyError::Decryption {
                    details: format!(
                        "Cipher mismatch: payload uses {algorithm}, channel uses {}",
                        cipher.cipher_name()
                    ),
                }),
                None => Err(AblyError::Decryption {
                    details: "Encrypted payload received without cipher".into(),
                }),
            }
        }
        (ENCODING_BASE64 | ENCODING_UTF8 | ENCODING_JSON, data) => Err(unexpected(&data)),
        (step, _) if step.starts_with(ENCODING_CIPHER_PREFIX) => Err(AblyError::Decryption {
            details: "Encrypted payload should be binary".into(),
        }),
        (step, _) => Err(AblyError::Deserialization {
            details: format!("Unknown encoding '{step}'"),
        }),
    }
}

#[cfg(test)]
pub(crate) mod should {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    /// Reversible "cipher" which XORs every byte.
    #[derive(Debug)]
    pub(crate) struct XorCipher;

    impl CryptoProvider for XorCipher {
        fn cipher_name(&self) -> String {
            "xor-8".into()
        }

        fn encrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError> {
            Ok(data.into_iter().map(|byte| byte ^ 0x5a).collect())
        }

        fn decrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError> {
            self.encrypt(data)
        }
    }

    #[test_case(MessageData::Text("hello".into()), Protocol::Json => (Some(MessageData::Text("hello".into())), None); "text over json")]
    #[test_case(MessageData::Binary(vec![1, 2, 3]), Protocol::Json => (Some(MessageData::Text("AQID".into())), Some("base64".into())); "binary over json")]
    #[test_case(MessageData::Binary(vec![1, 2, 3]), Protocol::MsgPack => (Some(MessageData::Binary(vec![1, 2, 3])), None); "binary over msgpack")]
    #[test_case(MessageData::Json(json!({"a": 1})), Protocol::MsgPack => (Some(MessageData::Text(r#"{"a":1}"#.into())), Some("json".into())); "json over msgpack")]
    fn encode_plain_payload(
        data: MessageData,
        protocol: Protocol,
    ) -> (Option<MessageData>, Option<String>) {
        encode_data(Some(data), None, protocol, None).unwrap()
    }

    #[test]
    fn record_every_step_for_encrypted_json() {
        let (data, encoding) = encode_data(
            Some(MessageData::Json(json!(["x"]))),
            None,
            Protocol::Json,
            Some(&XorCipher),
        )
        .unwrap();

        assert!(matches!(data, Some(MessageData::Text(_))));
        assert_eq!(encoding.as_deref(), Some("json/utf-8/cipher+xor-8/base64"));
    }

    #[test_case(MessageData::Text("hello".into()); "text")]
    #[test_case(MessageData::Binary(vec![0, 159, 146, 150]); "binary")]
    #[test_case(MessageData::Json(json!({"nested": {"list": [1, 2]}})); "json")]
    fn decode_encrypted_payload(data: MessageData) {
        for protocol in [Protocol::Json, Protocol::MsgPack] {
            let (encoded, encoding) =
                encode_data(Some(data.clone()), None, protocol, Some(&XorCipher)).unwrap();

            let (decoded, remaining) = decode_data(encoded, encoding, Some(&XorCipher));

            assert_eq!(decoded, Some(data.clone()));
            assert_eq!(remaining, None);
        }
    }

    #[test]
    fn stop_decoding_without_cipher() {
        let (encoded, encoding) = encode_data(
            Some(MessageData::Text("secret".into())),
            None,
            Protocol::Json,
            Some(&XorCipher),
        )
        .unwrap();

        let (decoded, remaining) = decode_data(encoded, encoding, None);

        assert!(matches!(decoded, Some(MessageData::Binary(_))));
        assert_eq!(remaining.as_deref(), Some("utf-8/cipher+xor-8"));
    }

    #[test]
    fn keep_unknown_encoding() {
        let (decoded, remaining) = decode_data(
            Some(MessageData::Text("eyJhIjoxfQ==".into())),
            Some("custom/base64".into()),
            None,
        );

        assert_eq!(decoded, Some(MessageData::Binary(br#"{"a":1}"#.to_vec())));
        assert_eq!(remaining.as_deref(), Some("custom"));
    }

    #[test]
    fn decode_json_string_as_text() {
        let (decoded, remaining) = decode_data(
            Some(MessageData::Text(r#""quoted""#.into())),
            Some("json".into()),
            None,
        );

        assert_eq!(decoded, Some(MessageData::from(json!("quoted"))));
        assert_eq!(decoded, Some(MessageData::Text("quoted".into())));
        assert_eq!(remaining, None);
    }

    #[test]
    fn deserialize_payload_types_from_json() {
        let messages: Vec<Message> = serde_json::from_str(
            r#"[
                {"name":"text","data":"plain"},
                {"name":"object","data":{"a":[1,2]}},
                {"name":"number","data":42},
                {"name":"empty"}
            ]"#,
        )
        .unwrap();

        assert_eq!(messages[0].data, Some(MessageData::Text("plain".into())));
        assert_eq!(messages[1].data, Some(MessageData::Json(json!({"a": [1, 2]}))));
        assert_eq!(messages[2].data, Some(MessageData::Json(json!(42))));
        assert_eq!(messages[3].data, None);
    }

    #[test]
    fn keep_binary_payload_in_msgpack() {
        let message = Message {
            client_id: Some("client".into()),
            ..Message::new("bin", vec![0u8, 255])
        };

        let bytes = rmp_serde::to_vec_named(&message).unwrap();
        let received: Message = rmp_serde::from_slice(&bytes).unwrap();

        assert_eq!(received, message);
    }

    #[test]
    fn serialize_camel_case_fields_without_empty_values() {
        let message = Message {
            client_id: Some("client".into()),
            ..Message::new("event", "data")
        };

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"name": "event", "data": "data", "clientId": "client"})
        );
    }
}

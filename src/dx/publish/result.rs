//! Publish result module.
//!
//! This module contains the `PublishResult` type.
//! The `PublishResult` type is used to represent the result of a publish operation.

/// The result of a publish operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PublishResult {
    /// Name of the channel to which messages has been published.
    pub channel: Option<String>,

    /// Identifier assigned to the published messages.
    pub message_id: Option<String>,
}

/// The response body of a publish operation.
///
/// It's used for deserialization of the publish response. This type is an
/// intermediate type between the raw response body and the [`PublishResult`]
/// type.
///
/// # Example
/// ```json
/// {"channel": "news", "messageId": "J6HHS7VTwp:0"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponseBody {
    /// Channel name.
    #[serde(default)]
    pub channel: Option<String>,

    /// Published message identifier.
    #[serde(default)]
    pub message_id: Option<String>,
}

impl From<Option<PublishResponseBody>> for PublishResult {
    fn from(body: Option<PublishResponseBody>) -> Self {
        body.map(|body| PublishResult {
            channel: body.channel,
            message_id: body.message_id,
        })
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn parse_publish_response() {
        let body: PublishResponseBody =
            serde_json::from_str(r#"{"channel":"news","messageId":"abc:0"}"#).unwrap();
        let result = PublishResult::from(Some(body));

        assert_eq!(result.channel, Some("news".into()));
        assert_eq!(result.message_id, Some("abc:0".into()));
    }

    #[test]
    fn accept_empty_response() {
        assert_eq!(PublishResult::from(None), PublishResult::default());
    }
}

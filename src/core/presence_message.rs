//! # Presence message module
//!
//! This module contains the [`PresenceMessage`] type which describes a
//! channel member returned by the presence endpoint.

use serde::{Deserialize, Serialize};

use crate::core::{
    message::{decode_data, Decodable},
    AblyError, CryptoProvider, MessageData,
};

/// Presence event type.
///
/// Encoded as a number on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PresenceAction {
    /// Member is not present.
    Absent,

    /// Member is present on the channel.
    #[default]
    Present,

    /// Member entered the channel.
    Enter,

    /// Member left the channel.
    Leave,

    /// Member updated its data.
    Update,
}

impl TryFrom<u8> for PresenceAction {
    type Error = AblyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Absent),
            1 => Ok(Self::Present),
            2 => Ok(Self::Enter),
            3 => Ok(Self::Leave),
            4 => Ok(Self::Update),
            _ => Err(AblyError::Deserialization {
                details: format!("Unknown presence action: {value}"),
            }),
        }
    }
}

impl From<PresenceAction> for u8 {
    fn from(value: PresenceAction) -> Self {
        match value {
            PresenceAction::Absent => 0,
            PresenceAction::Present => 1,
            PresenceAction::Enter => 2,
            PresenceAction::Leave => 3,
            PresenceAction::Update => 4,
        }
    }
}

/// Channel member presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceMessage {
    /// Unique presence message identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Presence event type.
    #[serde(default)]
    pub action: PresenceAction,

    /// Identifier of the member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Identifier of the member connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    /// Data associated with the member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,

    /// Transformations applied to the `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Time when presence event has been received by the service (ms since
    /// epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Decodable for PresenceMessage {
    fn decode(mut self, cipher: Option<&dyn CryptoProvider>) -> Self {
        let (data, encoding) = decode_data(self.data.take(), self.encoding.take(), cipher);
        self.data = data;
        self.encoding = encoding;
        self
    }
}

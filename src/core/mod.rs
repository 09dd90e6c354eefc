//! # Ably Core
//!
//! Core functionality of the Ably client.
//!
//! The `core` module contains the types shared by every REST operation:
//! errors, transport abstraction, wire protocol, message model and
//! (de)serialization traits.
//!
//! [`ably`]: ../index.html

pub use error::AblyError;
pub mod error;

pub use error_response::{APIErrorBody, ErrorInfo};
pub mod error_response;

#[cfg(feature = "blocking")]
pub use transport::blocking;
pub use transport::Transport;
pub mod transport;

pub use transport_request::{TransportMethod, TransportRequest};
pub mod transport_request;

pub use transport_response::TransportResponse;
pub mod transport_response;

pub use protocol::Protocol;
pub mod protocol;

pub use serialize::Serialize;
pub mod serialize;

pub use deserializer::Deserializer;
pub mod deserializer;

pub use crypto_provider::CryptoProvider;
pub mod crypto_provider;

pub use message::{Decodable, Message, MessageData};
pub mod message;

pub use presence_message::{PresenceAction, PresenceMessage};
pub mod presence_message;

pub use channel::{Channel, ChannelRef};
pub mod channel;

pub(crate) mod utils;

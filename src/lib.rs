//! # Ably REST client for Rust
//!
//! A client for the [Ably](https://ably.com/) REST API. It publishes messages
//! to channels, pages through channel history and presence and issues tokens
//! with limited capability.
//!
//! # Example
//!
//! ```no_run
//! use ably::{AblyClientBuilder, dx::auth::Capability};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AblyClientBuilder::with_reqwest_transport()
//!     .with_key("appId.keyId:secret")
//!     .with_client_id("publisher")
//!     .build()?;
//!
//! let channel = client.channel("news");
//! channel.publish("greeting", "Hello, world!").execute().await?;
//!
//! let page = channel.history().limit(10).execute().await?;
//! for message in page.items() {
//!     println!("{:?}: {:?}", message.name, message.data);
//! }
//!
//! let token = client
//!     .request_token()
//!     .capability(Capability::new().with("news", ["subscribe"]))
//!     .execute()
//!     .await?;
//! println!("token expires at {}", token.expires);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! * `reqwest` - enables [`reqwest`](https://crates.io/crates/reqwest) based
//!   transport and the [`AblyClient`] type alias.
//! * `blocking` - enables blocking API (`execute_blocking`) and
//!   [`AblyBlockingClient`] with blocking `reqwest` transport.
//! * `crypto` - enables AES-CBC [`CryptoProvider`] implementation.
//! * `full` - enables all of the above.
//!
//! Default features are `reqwest`, `blocking` and `crypto`.
//!
//! [`CryptoProvider`]: crate::core::CryptoProvider

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;
pub mod dx;
pub mod providers;
pub mod transport;

#[doc(inline)]
pub use dx::{AblyClientBuilder, AblyClientInstance, AblyGenericClient};

#[cfg(feature = "reqwest")]
#[doc(inline)]
pub use dx::AblyClient;

#[cfg(all(feature = "reqwest", feature = "blocking"))]
#[doc(inline)]
pub use dx::AblyBlockingClient;

#[doc(inline)]
pub use crate::core::{AblyError, Channel, Message, MessageData, Protocol};

#[cfg(feature = "crypto")]
#[doc(inline)]
pub use providers::crypto_aescbc::AesCbcCrypto;

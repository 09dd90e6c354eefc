//! # Channels registry module
//!
//! This module contains the [`Channels`] type which lazily creates and
//! caches [`Channel`] entities by name.

use std::sync::Arc;

use crate::{
    core::{AblyError, Channel, ChannelRef},
    dx::ably_client::AblyClientInstance,
};

/// Channels registry.
///
/// Registry creates channel on first access and returns the same channel
/// (sharing cipher settings) for any following access with the same name.
/// Entries are never removed for the lifetime of the client.
///
/// # Examples
/// ```rust
/// use ably::AblyClientBuilder;
///
/// # fn main() -> Result<(), ably::core::AblyError> {
/// let client = // AblyClient
/// #     AblyClientBuilder::with_reqwest_transport()
/// #         .with_key("appId.keyId:secret")
/// #         .build()?;
/// let channels = client.channels();
/// let news = channels.get("news");
///
/// assert!(channels.contains("news"));
/// assert_eq!(news, channels.get_from_bytes(b"news")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Channels<T, D> {
    client: AblyClientInstance<T, D>,
}

impl<T, D> Channels<T, D> {
    /// Retrieve channel with `name`.
    ///
    /// Channel is created if it hasn't been requested before.
    pub fn get<S>(&self, name: S) -> Channel<T, D>
    where
        S: Into<String>,
    {
        let name = name.into();

        if let Some(entry) = self.client.channels.read().get(&name) {
            return Channel::new(&self.client, Arc::clone(entry));
        }

        let entry = {
            let mut channels = self.client.channels.write();
            Arc::clone(
                channels
                    .entry(name.clone())
                    .or_insert_with(|| Arc::new(ChannelRef::new(name))),
            )
        };

        Channel::new(&self.client, entry)
    }

    /// Retrieve channel with name provided as ASCII bytes.
    ///
    /// # Errors
    /// Should return an [`AblyError::InvalidArguments`] if `name` contains
    /// non-ASCII bytes.
    pub fn get_from_bytes<B>(&self, name: B) -> Result<Channel<T, D>, AblyError>
    where
        B: AsRef<[u8]>,
    {
        let name = name.as_ref();

        if !name.is_ascii() {
            return Err(AblyError::InvalidArguments {
                details: "Channel name should contain only ASCII characters".into(),
            });
        }

        Ok(self.get(String::from_utf8_lossy(name)))
    }

    /// Whether channel with `name` has been created.
    pub fn contains(&self, name: &str) -> bool {
        self.client.channels.read().contains_key(name)
    }

    /// Number of created channels.
    pub fn len(&self) -> usize {
        self.client.channels.read().len()
    }

    /// Whether no channels have been created yet.
    pub fn is_empty(&self) -> bool {
        self.client.channels.read().is_empty()
    }

    /// Sorted names of created channels.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.client.channels.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<T, D> Clone for Channels<T, D> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<T, D> AblyClientInstance<T, D> {
    /// Channels registry of the client.
    pub fn channels(&self) -> Channels<T, D> {
        Channels {
            client: self.clone(),
        }
    }

    /// Retrieve channel with `name`.
    ///
    /// Shortcut for `client.channels().get(name)`.
    pub fn channel<S>(&self, name: S) -> Channel<T, D>
    where
        S: Into<String>,
    {
        self.channels().get(name)
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        core::{message::should::XorCipher, TransportRequest, TransportResponse},
        dx::ably_client::AblyClientBuilder,
        providers::deserialization_serde::DeserializerSerde,
        transport::middleware::AblyMiddleware,
    };
    use std::thread;

    struct MockTransport;

    #[async_trait::async_trait]
    impl crate::core::Transport for MockTransport {
        async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, AblyError> {
            Ok(TransportResponse::default())
        }
    }

    fn client() -> AblyClientInstance<AblyMiddleware<MockTransport>, DeserializerSerde> {
        AblyClientBuilder::with_transport(MockTransport)
            .with_key("app.key:secret")
            .build()
            .unwrap()
    }

    #[test]
    fn return_same_entry_for_same_name() {
        let client = client();

        let first = client.channel("news");
        let second = client.channels().get(String::from("news"));

        assert!(first.same_entry(&second));
        assert_eq!(client.channels().len(), 1);
    }

    #[test]
    fn share_channel_settings() {
        let client = client();

        client.channel("secret").set_cipher(XorCipher);

        assert_eq!(
            client.channel("secret").cipher().map(|c| c.cipher_name()),
            Some("xor-8".into())
        );
        assert!(client.channel("public").cipher().is_none());
    }

    #[test]
    fn decode_ascii_bytes_name() {
        let client = client();

        let channel = client.channels().get_from_bytes(b"persisted:news").unwrap();

        assert_eq!(channel.name(), "persisted:news");
        assert!(client.channels().contains("persisted:news"));
    }

    #[test]
    fn reject_non_ascii_bytes_name() {
        let client = client();

        let result = client.channels().get_from_bytes("nëws".as_bytes());

        assert!(matches!(result, Err(AblyError::InvalidArguments { .. })));
        assert!(client.channels().is_empty());
    }

    #[test]
    fn list_created_channels() {
        let client = client();

        client.channel("b");
        client.channel("a");
        client.channel("b");

        assert_eq!(client.channels().names(), vec!["a", "b"]);
    }

    #[test]
    fn create_single_entry_on_concurrent_access() {
        let client = client();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                thread::spawn(move || client.channel("contended"))
            })
            .collect();
        let channels: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(client.channels().len(), 1);
        assert!(channels.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[derive(Debug)]
    struct Rot13Cipher;

    impl crate::core::CryptoProvider for Rot13Cipher {
        fn cipher_name(&self) -> String {
            "rot-13".into()
        }

        fn encrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError> {
            Ok(data.into_iter().map(|byte| byte.wrapping_add(13)).collect())
        }

        fn decrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError> {
            Ok(data.into_iter().map(|byte| byte.wrapping_sub(13)).collect())
        }
    }

    #[test]
    fn fall_back_to_client_cipher() {
        let client = AblyClientBuilder::with_transport(MockTransport)
            .with_key("app.key:secret")
            .with_cryptor(XorCipher)
            .build()
            .unwrap();
        let channel = client.channel("secret");
        let cipher_name = || channel.cipher().map(|c| c.cipher_name());

        assert_eq!(cipher_name(), Some("xor-8".into()));

        channel.set_cipher(Rot13Cipher);
        assert_eq!(cipher_name(), Some("rot-13".into()));

        channel.clear_cipher();
        assert_eq!(cipher_name(), Some("xor-8".into()));
    }

    #[test]
    fn clear_channel_cipher() {
        let client = client();
        let channel = client.channel("secret");

        channel.set_cipher(XorCipher);
        client.channel("secret").clear_cipher();

        assert!(channel.cipher().is_none());
    }
}

//! # Channel entity module
//!
//! This module contains the [`Channel`] type, which can be used as a
//! first-class citizen to access the [`Ably REST API`] channel endpoints.
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

use std::{
    fmt::{Debug, Formatter, Result},
    ops::Deref,
    sync::Arc,
};

use spin::RwLock;

use crate::{
    core::{utils::encoding::url_encode, CryptoProvider},
    dx::ably_client::AblyClientInstance,
};

/// Channel entity.
///
/// Entity as a first-class citizen provides access to the entity-specific API:
/// * publish messages
/// * fetch message history
/// * fetch channel members presence.
///
/// Channels are created by [`Channels`] registry and share state with any
/// other [`Channel`] retrieved for the same name from the same client.
///
/// [`Channels`]: crate::dx::channels::Channels
pub struct Channel<T, D> {
    /// Client which is used to perform channel requests.
    pub(crate) client: AblyClientInstance<T, D>,

    inner: Arc<ChannelRef>,
}

/// Channel entity reference.
///
/// This struct contains the actual channel state. It is stored by the
/// [`Channels`] registry and wrapped by [`Channel`]. Uses internal mutability
/// for its internal state.
///
/// Not intended to be used directly. Use [`Channel`] instead.
///
/// [`Channels`]: crate::dx::channels::Channels
pub struct ChannelRef {
    /// Unique channel name.
    ///
    /// Channel names are used by the [`Ably REST API`] as a unique identifier
    /// for resources on which a certain operation should be performed.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    pub name: String,

    /// Channel-specific data cryptor / decryptor provider.
    cipher: RwLock<Option<Arc<dyn CryptoProvider>>>,
}

impl ChannelRef {
    pub(crate) fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            cipher: RwLock::new(None),
        }
    }
}

impl<T, D> Channel<T, D> {
    /// Creates a new instance of a channel.
    ///
    /// # Arguments
    ///
    /// * `client` - The client instance used to access [`Ably REST API`].
    /// * `inner` - Registry entry with channel state.
    ///
    /// [`Ably REST API`]: https://ably.com/docs/api/rest-api
    pub(crate) fn new(client: &AblyClientInstance<T, D>, inner: Arc<ChannelRef>) -> Self {
        Self {
            client: client.clone(),
            inner,
        }
    }

    /// Channel name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Set channel-specific cryptor.
    ///
    /// Takes precedence over the cryptor configured for the client. The
    /// setting is shared with every handle to the same channel.
    ///
    /// # Examples
    /// ```rust
    /// use ably::{AblyClientBuilder, providers::crypto_aescbc::AesCbcCrypto};
    ///
    /// # fn main() -> Result<(), ably::core::AblyError> {
    /// let client = // AblyClient
    /// #     AblyClientBuilder::with_reqwest_transport()
    /// #         .with_key("appId.keyId:secret")
    /// #         .build()?;
    /// let channel = client.channel("secret-talks");
    /// channel.set_cipher(AesCbcCrypto::new(AesCbcCrypto::generate_key(128)?)?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_cipher<C>(&self, cipher: C)
    where
        C: CryptoProvider + 'static,
    {
        *self.inner.cipher.write() = Some(Arc::new(cipher));
    }

    /// Remove channel-specific cryptor.
    pub fn clear_cipher(&self) {
        *self.inner.cipher.write() = None;
    }

    /// Cryptor which is used for channel messages.
    ///
    /// Returns channel-specific cryptor or one configured for the client.
    pub fn cipher(&self) -> Option<Arc<dyn CryptoProvider>> {
        self.inner
            .cipher
            .read()
            .clone()
            .or_else(|| self.client.cryptor.clone())
    }

    /// Path to the channel endpoint.
    pub(crate) fn path(&self, endpoint: &str) -> String {
        format!(
            "/channels/{}/{endpoint}",
            url_encode(self.inner.name.as_bytes())
        )
    }

    /// Whether both handles share the same registry entry.
    pub(crate) fn same_entry(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, D> Deref for Channel<T, D> {
    type Target = ChannelRef;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T, D> Clone for Channel<T, D> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, D> PartialEq for Channel<T, D> {
    fn eq(&self, other: &Self) -> bool {
        self.same_entry(other)
    }
}

impl Debug for ChannelRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "ChannelRef {{ name: {}, cipher: {:?} }}",
            self.name,
            self.cipher.read().as_ref().map(|cipher| cipher.cipher_name())
        )
    }
}

impl<T, D> Debug for Channel<T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "Channel {{ name: {} }}", self.name)
    }
}

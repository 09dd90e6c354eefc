//! # Crypto provider module
//!
//! This module contains the [`CryptoProvider`] trait, which is used to
//! implement a module that can be used to configure [`AblyClientInstance`] or
//! [`Channel`] for message payload encryption and decryption.
//!
//! [`AblyClientInstance`]: crate::dx::AblyClientInstance
//! [`Channel`]: crate::core::Channel

use std::fmt::Debug;

use crate::core::AblyError;

/// Crypto provider trait.
pub trait CryptoProvider: Debug + Send + Sync {
    /// Name of the cipher which is used in message `encoding` (for example
    /// `aes-128-cbc`).
    fn cipher_name(&self) -> String;

    /// Encrypt provided data.
    ///
    /// # Errors
    /// Should return an [`AblyError::Encryption`] if provided data can't be
    /// _encrypted_ or underlying cryptor misconfigured.
    fn encrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError>;

    /// Decrypt provided data.
    ///
    /// # Errors
    /// Should return an [`AblyError::Decryption`] if provided data can't be
    /// _decrypted_ or underlying cryptor misconfigured.
    fn decrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError>;
}

//! # AES-CBC Crypto Implementation
//!
//! This module contains [`AesCbcCrypto`] type.
//! It is used to encrypt and decrypt message payloads sent and received from
//! [`Ably REST API`] using the [`aes`] and [`cbc`] crates.
//!
//! It requires the [`crypto` feature] to be enabled.
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api
//! [`aes`]: https://crates.io/crates/aes
//! [`cbc`]: https://crates.io/crates/cbc
//! [`crypto` feature]: ../index.html#features

use std::fmt::{Debug, Display, Formatter};

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose, Engine as _};

use crate::core::{AblyError, CryptoProvider};

type Aes128CbcEncryptor = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDecryptor = cbc::Decryptor<aes::Aes128>;
type Aes256CbcEncryptor = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDecryptor = cbc::Decryptor<aes::Aes256>;

/// AES cipher block size.
pub(crate) const AES_BLOCK_SIZE: usize = 16;

/// Supported key lengths (bits).
const KEY_LENGTHS: [usize; 2] = [128, 256];

/// A crypto that uses the AES encryption algorithm with CBC mode.
///
/// Each [`encrypt`] call generates random initialization vector which is
/// prepended to the cipher text. The key length (16 or 32 bytes) decides
/// whether AES-128 or AES-256 is used.
///
/// # Examples
/// ```rust
/// # use ably::{core::{AblyError, CryptoProvider}, providers::crypto_aescbc::AesCbcCrypto};
/// #
/// # fn main() -> Result<(), AblyError> {
/// let cryptor = AesCbcCrypto::new(AesCbcCrypto::generate_key(256)?)?;
/// assert_eq!(cryptor.cipher_name(), "aes-256-cbc");
/// # Ok(())
/// # }
/// ```
///
/// [`encrypt`]: #method.encrypt
pub struct AesCbcCrypto {
    key: Vec<u8>,
}

impl AesCbcCrypto {
    /// Create an AES-CBC crypto for data encryption and decryption.
    ///
    /// # Errors
    /// Should return an [`AblyError::CryptoInitialization`] if key length is
    /// neither 128 nor 256 bits.
    pub fn new<K>(key: K) -> Result<Self, AblyError>
    where
        K: Into<Vec<u8>>,
    {
        let key: Vec<u8> = key.into();

        if !KEY_LENGTHS.contains(&(key.len() * 8)) {
            return Err(AblyError::CryptoInitialization {
                details: format!(
                    "Unsupported key length {} bits (expected 128 or 256)",
                    key.len() * 8
                ),
            });
        }

        Ok(Self { key })
    }

    /// Create an AES-CBC crypto from base64 encoded key.
    ///
    /// # Errors
    /// Should return an [`AblyError::CryptoInitialization`] if key is not a
    /// valid base64 string or has unsupported length.
    pub fn from_base64_key<S>(key: S) -> Result<Self, AblyError>
    where
        S: AsRef<str>,
    {
        general_purpose::STANDARD
            .decode(key.as_ref())
            .map_err(|err| AblyError::CryptoInitialization {
                details: err.to_string(),
            })
            .and_then(Self::new)
    }

    /// Generate random key of requested length.
    ///
    /// # Errors
    /// Should return an [`AblyError::CryptoInitialization`] if `bits` is
    /// neither 128 nor 256 or system random source is unavailable.
    pub fn generate_key(bits: usize) -> Result<Vec<u8>, AblyError> {
        if !KEY_LENGTHS.contains(&bits) {
            return Err(AblyError::CryptoInitialization {
                details: format!("Unsupported key length {bits} bits (expected 128 or 256)"),
            });
        }

        random_bytes(bits / 8).map_err(|err| AblyError::CryptoInitialization {
            details: err.to_string(),
        })
    }

    /// Key length in bits.
    pub fn key_length(&self) -> usize {
        self.key.len() * 8
    }
}

impl CryptoProvider for AesCbcCrypto {
    fn cipher_name(&self) -> String {
        format!("aes-{}-cbc", self.key_length())
    }

    /// Encrypt provided data.
    ///
    /// # Errors
    /// Should return an [`AblyError::Encryption`] if provided data can't
    /// be encrypted or random initialization vector can't be generated.
    fn encrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError> {
        let iv = random_bytes(AES_BLOCK_SIZE).map_err(encryption_error)?;
        let padded_len = (data.len() / AES_BLOCK_SIZE + 1) * AES_BLOCK_SIZE;
        let mut buffer = vec![0u8; AES_BLOCK_SIZE + padded_len];
        buffer[..AES_BLOCK_SIZE].copy_from_slice(&iv);
        let data_slice = &mut buffer[AES_BLOCK_SIZE..];

        let encrypted_len = if self.key.len() == 16 {
            Aes128CbcEncryptor::new_from_slices(&self.key, &iv)
                .map_err(encryption_error)?
                .encrypt_padded_b2b_mut::<Pkcs7>(&data, data_slice)
                .map_err(encryption_error)?
                .len()
        } else {
            Aes256CbcEncryptor::new_from_slices(&self.key, &iv)
                .map_err(encryption_error)?
                .encrypt_padded_b2b_mut::<Pkcs7>(&data, data_slice)
                .map_err(encryption_error)?
                .len()
        };

        // Adjust size of buffer to actual processed data length.
        buffer.truncate(AES_BLOCK_SIZE + encrypted_len);

        Ok(buffer)
    }

    /// Decrypt provided data.
    ///
    /// # Errors
    /// Should return an [`AblyError::Decryption`] if provided data can't
    /// be decrypted (too short, not block aligned or invalid padding).
    fn decrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, AblyError> {
        if data.len() < AES_BLOCK_SIZE * 2 || data.len() % AES_BLOCK_SIZE != 0 {
            return Err(AblyError::Decryption {
                details: format!("Unexpected encrypted data length: {}", data.len()),
            });
        }

        let (iv, data_slice) = data.split_at(AES_BLOCK_SIZE);
        let mut buffer = vec![0u8; data_slice.len()];

        let decrypted_len = if self.key.len() == 16 {
            Aes128CbcDecryptor::new_from_slices(&self.key, iv)
                .map_err(decryption_error)?
                .decrypt_padded_b2b_mut::<Pkcs7>(data_slice, &mut buffer)
                .map_err(decryption_error)?
                .len()
        } else {
            Aes256CbcDecryptor::new_from_slices(&self.key, iv)
                .map_err(decryption_error)?
                .decrypt_padded_b2b_mut::<Pkcs7>(data_slice, &mut buffer)
                .map_err(decryption_error)?
                .len()
        };

        buffer.truncate(decrypted_len);

        Ok(buffer)
    }
}

impl Debug for AesCbcCrypto {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AesCbcCrypto {{ cipher: {} }}", self.cipher_name())
    }
}

fn random_bytes(len: usize) -> Result<Vec<u8>, getrandom::Error> {
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes)?;
    Ok(bytes)
}

fn encryption_error<E: Display>(err: E) -> AblyError {
    AblyError::Encryption {
        details: err.to_string(),
    }
}

fn decryption_error<E: Display>(err: E) -> AblyError {
    AblyError::Decryption {
        details: err.to_string(),
    }
}

#[cfg(test)]
mod it_should {
    use super::*;
    use test_case::test_case;

    #[test_case(128 => "aes-128-cbc")]
    #[test_case(256 => "aes-256-cbc")]
    fn name_cipher_after_key_length(bits: usize) -> String {
        AesCbcCrypto::new(AesCbcCrypto::generate_key(bits).unwrap())
            .unwrap()
            .cipher_name()
    }

    #[test_case(0; "empty key")]
    #[test_case(15; "short key")]
    #[test_case(24; "192 bit key")]
    fn reject_unsupported_key(len: usize) {
        assert!(matches!(
            AesCbcCrypto::new(vec![7u8; len]),
            Err(AblyError::CryptoInitialization { .. })
        ));
    }

    #[test_case(128, b"" ; "empty payload")]
    #[test_case(128, b"The quick brown fox jumped over the lazy dog" ; "text with aes-128")]
    #[test_case(256, &[0u8; 32] ; "aligned binary with aes-256")]
    fn decrypt_encrypted_data(bits: usize, data: &[u8]) {
        let cryptor = AesCbcCrypto::new(AesCbcCrypto::generate_key(bits).unwrap()).unwrap();

        let encrypted = cryptor.encrypt(data.to_vec()).unwrap();

        assert_eq!(encrypted.len() % AES_BLOCK_SIZE, 0);
        assert!(encrypted.len() > data.len() + AES_BLOCK_SIZE - 1);
        assert_eq!(cryptor.decrypt(encrypted).unwrap(), data.to_vec());
    }

    #[test]
    fn use_random_initialization_vector() {
        let cryptor = AesCbcCrypto::from_base64_key("WUP6u0K7MXI5Zeo0VppPwg==").unwrap();

        let first = cryptor.encrypt(b"payload".to_vec()).unwrap();
        let second = cryptor.encrypt(b"payload".to_vec()).unwrap();

        assert_ne!(first[..AES_BLOCK_SIZE], second[..AES_BLOCK_SIZE]);
    }

    #[test]
    fn reject_truncated_data() {
        let cryptor = AesCbcCrypto::new(vec![1u8; 16]).unwrap();

        assert!(matches!(
            cryptor.decrypt(vec![0u8; 20]),
            Err(AblyError::Decryption { .. })
        ));
    }

    #[test]
    fn fail_decryption_with_other_key() {
        let cryptor = AesCbcCrypto::new(vec![1u8; 16]).unwrap();
        let other = AesCbcCrypto::new(vec![2u8; 16]).unwrap();
        let encrypted = cryptor.encrypt(b"top secret message".to_vec()).unwrap();

        // Wrong key produces garbage which almost never has valid padding.
        assert_ne!(other.decrypt(encrypted).ok(), Some(b"top secret message".to_vec()));
    }
}

//! AES-128-CBC decryption with the container's fixed key material.

use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};

use crate::error::DecodeError;

type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// The 16-byte key every pixel-bean container is encrypted under.
pub(crate) const AES_KEY: &[u8; 16] = b"78hrey23y28ogs89";

/// The fixed CBC initialization vector.
pub(crate) const AES_IV: &[u8; 16] = b"1234567890123456";

/// Decrypt a ciphertext under the container constants.
///
/// No padding is stripped: the plaintext has the exact ciphertext length,
/// and whatever follows it (compressed-stream length fields, frame sizes)
/// delimits the real content. Inputs that are not a multiple of the 16-byte
/// block size fail with [`DecodeError::CryptoAlignment`].
pub(crate) fn decrypt(ciphertext: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if !ciphertext.len().is_multiple_of(16) {
        return Err(DecodeError::CryptoAlignment(ciphertext.len()));
    }
    Aes128CbcDec::new(AES_KEY.into(), AES_IV.into())
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| DecodeError::CryptoAlignment(ciphertext.len()))
}

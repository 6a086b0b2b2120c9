// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Callers never choose a nonce for encryption.

use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce as AeadNonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use strongbox_core::{NONCE_LEN, Nonce, VaultError};
use zeroize::Zeroizing;

use crate::key::MasterKey;

/// Length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

fn aead_key(key: &MasterKey) -> Result<LessSafeKey, VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| VaultError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Generate a fresh random nonce.
pub fn generate_nonce() -> Result<Nonce, VaultError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; NONCE_LEN];
    rng.fill(&mut bytes)
        .map_err(|_| VaultError::Internal("failed to generate random nonce".to_string()))?;
    Ok(Nonce::from_bytes(bytes))
}

/// Encrypt `plaintext` under `key`, authenticating `aad` alongside it.
///
/// Returns `(ciphertext || tag, nonce)`. Both must be stored to decrypt.
pub fn seal(key: &MasterKey, plaintext: &[u8], aad: &[u8]) -> Result<(Vec<u8>, Nonce), VaultError> {
    let less_safe = aead_key(key)?;
    let nonce = generate_nonce()?;

    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(
            AeadNonce::assume_unique_for_key(*nonce.as_bytes()),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| VaultError::Internal("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce))
}

/// Decrypt `ciphertext || tag` produced by [`seal`].
///
/// Any tag mismatch (wrong key, altered ciphertext, nonce or associated
/// data) is [`VaultError::Decryption`].
pub fn open(
    key: &MasterKey,
    nonce: &Nonce,
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, VaultError> {
    if ciphertext.len() < TAG_LEN {
        return Err(VaultError::Decryption);
    }

    let less_safe = aead_key(key)?;
    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = less_safe
        .open_in_place(
            AeadNonce::assume_unique_for_key(*nonce.as_bytes()),
            Aad::from(aad),
            in_out.as_mut_slice(),
        )
        .map_err(|_| VaultError::Decryption)?
        .len();

    in_out.truncate(plaintext_len);
    Ok(in_out)
}

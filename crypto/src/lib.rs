/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the software cryptography provider backed by the
    RustCrypto stack.

--*/
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bootgate_error::{BootgateError, BootgateResult};
use bootgate_verify::{CryptoProvider, DigestVerifyOp, VerificationKey};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::hazmat::PrehashVerifier;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha2::{Digest, Sha256};

/// Software cryptography provider: SHA-256 digests and RSA PKCS#1 v1.5
/// signature verification, all in software.
#[derive(Default)]
pub struct RustCrypto;

/// RSA public key decoded by [`RustCrypto`].
pub struct RustCryptoKey(RsaPublicKey);

impl VerificationKey for RustCryptoKey {
    fn signature_size(&self) -> usize {
        self.0.size()
    }
}

/// In-flight SHA-256 digest chained into RSA verification.
pub struct RustCryptoVerifyOp {
    digest: Sha256,
    key: VerifyingKey<Sha256>,
}

impl CryptoProvider for RustCrypto {
    type Key = RustCryptoKey;
    type VerifyOp<'a> = RustCryptoVerifyOp
    where
        Self: 'a;

    fn decode_base64(&self, text: &[u8]) -> BootgateResult<Vec<u8>> {
        // Whitespace embedded in the text is not significant.
        let stripped: Vec<u8> = text
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        BASE64
            .decode(&stripped)
            .map_err(|_| BootgateError::CRYPTO_BASE64_DECODE_FAILURE)
    }

    fn parse_rsa_public_key(&self, der: &[u8]) -> BootgateResult<RustCryptoKey> {
        RsaPublicKey::from_public_key_der(der)
            .map(RustCryptoKey)
            .map_err(|_| BootgateError::CRYPTO_DER_PARSE_FAILURE)
    }

    fn verify_init<'a>(&'a self, key: &RustCryptoKey) -> BootgateResult<RustCryptoVerifyOp> {
        Ok(RustCryptoVerifyOp {
            digest: Sha256::new(),
            key: VerifyingKey::new(key.0.clone()),
        })
    }
}

impl DigestVerifyOp for RustCryptoVerifyOp {
    fn update(&mut self, data: &[u8]) -> BootgateResult<()> {
        self.digest.update(data);
        Ok(())
    }

    fn finalize(self, signature: &[u8]) -> BootgateResult<bool> {
        let signature = Signature::try_from(signature)
            .map_err(|_| BootgateError::CRYPTO_MALFORMED_SIGNATURE)?;

        let digest = self.digest.finalize();
        Ok(self.key.verify_prehash(&digest, &signature).is_ok())
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Bootgate boot-integrity verification library.

--*/
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod key;
mod manifest;
mod verifier;

#[cfg(test)]
mod test_env;

use alloc::vec::Vec;
use bootgate_error::BootgateResult;

pub use key::{load_embedded_key, TRUST_ROOT_B64};
pub use manifest::{
    digest_file_name, verify_boot_manifest, verify_manifest_with_key, Manifest, ManifestFailure,
    BOOT_MANIFEST_PATH, BOOT_MANIFEST_SIG_PATH, DIGEST_SUFFIX, MANIFEST_ENTRY_NAME_MAX,
    MANIFEST_MAX_BYTES, MANIFEST_MAX_ENTRIES,
};
pub use verifier::{verify_file, VERIFY_CHUNK_SIZE};

/// Cryptography provider contract.
///
/// The verification core invokes exactly one hash and one signature
/// scheme: SHA-256 digests checked against detached RSA PKCS#1 v1.5
/// signatures. Providers implement that fixed pair; there is no algorithm
/// negotiation.
pub trait CryptoProvider {
    /// Public key decoded by this provider.
    type Key: VerificationKey;

    /// In-flight digest-and-verify operation.
    type VerifyOp<'a>: DigestVerifyOp
    where
        Self: 'a;

    /// Decode base64 text into raw bytes. ASCII whitespace embedded in the
    /// text is not significant.
    fn decode_base64(&self, text: &[u8]) -> BootgateResult<Vec<u8>>;

    /// Parse a DER-encoded `SubjectPublicKeyInfo` holding an RSA key.
    fn parse_rsa_public_key(&self, der: &[u8]) -> BootgateResult<Self::Key>;

    /// Start a digest computation chained into a signature-verification
    /// context seeded with `key`.
    fn verify_init<'a>(&'a self, key: &Self::Key) -> BootgateResult<Self::VerifyOp<'a>>;
}

/// Public key usable for signature verification.
pub trait VerificationKey {
    /// Expected byte length of a detached signature made with this key.
    fn signature_size(&self) -> usize;
}

/// Streaming digest chained into signature verification.
pub trait DigestVerifyOp {
    /// Feed the next chunk of the data being verified.
    fn update(&mut self, data: &[u8]) -> BootgateResult<()>;

    /// Finalize against the detached signature bytes.
    ///
    /// `Ok(true)` is a cryptographically valid signature, `Ok(false)` is a
    /// mismatch (the expected negative result for a tampered file, not an
    /// error), and `Err` is a fault in the verification machinery itself.
    fn finalize(self, signature: &[u8]) -> BootgateResult<bool>;
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    verifier.rs

Abstract:

    File contains the single-file digest and signature verification
    protocol.

--*/

use alloc::vec;
use alloc::vec::Vec;

use bootgate_drivers::{BootFs, FileStream, ReadResult};
use bootgate_error::{BootgateError, BootgateResult};

use crate::{CryptoProvider, DigestVerifyOp, VerificationKey};

/// Chunk size for streaming a data file through the digest computation.
pub const VERIFY_CHUNK_SIZE: usize = 1024 * 8;

/// Verify that the file at `data_path` matches the detached signature at
/// `signature_path` under `key`.
///
/// `Ok(true)` means the signature is cryptographically valid. `Ok(false)`
/// means the digest does not match the signature under the key — the
/// expected negative result for a tampered or mis-signed file. `Err` is
/// an I/O or machinery fault. Callers make trust decisions on `Ok(true)`
/// alone; `Ok(false)` and `Err` are identical for trust and differ only
/// for diagnostics.
pub fn verify_file<Fs: BootFs, C: CryptoProvider>(
    fs: &Fs,
    crypto: &C,
    key: &C::Key,
    data_path: &str,
    signature_path: &str,
) -> BootgateResult<bool> {
    let signature = read_signature(fs, key, signature_path)?;

    let mut data = FileStream::open(fs, data_path)
        .map_err(|_| BootgateError::FILE_VERIFIER_DATA_READ_FAILURE)?;

    let mut op = crypto
        .verify_init(key)
        .map_err(|_| BootgateError::FILE_VERIFIER_CRYPTO_FAILURE)?;

    let mut buf = vec![0u8; VERIFY_CHUNK_SIZE];
    loop {
        match data
            .read(&mut buf)
            .map_err(|_| BootgateError::FILE_VERIFIER_DATA_READ_FAILURE)?
        {
            ReadResult::Data(n) => op
                .update(&buf[..n])
                .map_err(|_| BootgateError::FILE_VERIFIER_CRYPTO_FAILURE)?,
            ReadResult::Eof => break,
        }
    }

    op.finalize(&signature)
        .map_err(|_| BootgateError::FILE_VERIFIER_CRYPTO_FAILURE)
}

/// Read up to the key's expected signature length from `path`.
///
/// A shorter signature file yields however many bytes were available;
/// the mismatch surfaces at finalization, not here.
fn read_signature<Fs: BootFs, K: VerificationKey>(
    fs: &Fs,
    key: &K,
    path: &str,
) -> BootgateResult<Vec<u8>> {
    let mut stream = FileStream::open(fs, path)
        .map_err(|_| BootgateError::FILE_VERIFIER_SIGNATURE_READ_FAILURE)?;

    let mut buf = vec![0u8; key.signature_size()];
    let len = stream
        .read_up_to(&mut buf)
        .map_err(|_| BootgateError::FILE_VERIFIER_SIGNATURE_READ_FAILURE)?;
    buf.truncate(len);

    // The signature stream is never chained into hashing; it is released
    // here, before the data file is opened.
    Ok(buf)
}

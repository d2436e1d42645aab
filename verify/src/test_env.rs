/*++

Licensed under the Apache-2.0 license.

File Name:

    test_env.rs

Abstract:

    File contains fake file and cryptography environments used by the
    verification unit tests.

--*/

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use bootgate_drivers::BootFs;
use bootgate_error::{BootgateError, BootgateResult};

use crate::{CryptoProvider, DigestVerifyOp, VerificationKey};

/// A mock signature is the signed content prefixed with `SIG:`; the mock
/// verify op recomputes it from the streamed data and compares.
pub fn mock_signature(data: &[u8]) -> Vec<u8> {
    let mut sig = b"SIG:".to_vec();
    sig.extend_from_slice(data);
    sig
}

/// In-memory BootFs with handle accounting and an open log.
pub struct MapFs {
    files: BTreeMap<String, Vec<u8>>,
    open_handles: Cell<usize>,
    open_log: RefCell<Vec<String>>,
}

pub struct MapHandle {
    data: Vec<u8>,
    pos: usize,
}

impl MapFs {
    pub fn new(files: &[(&str, &[u8])]) -> Self {
        Self::from_owned(
            files
                .iter()
                .map(|(name, data)| (name.to_string(), data.to_vec()))
                .collect(),
        )
    }

    pub fn from_owned(files: Vec<(String, Vec<u8>)>) -> Self {
        Self {
            files: files.into_iter().collect(),
            open_handles: Cell::new(0),
            open_log: RefCell::new(Vec::new()),
        }
    }

    pub fn insert(&mut self, name: &str, data: &[u8]) {
        self.files.insert(name.to_string(), data.to_vec());
    }

    pub fn insert_owned(&mut self, name: String, data: Vec<u8>) {
        self.files.insert(name, data);
    }

    pub fn remove(&mut self, name: &str) {
        self.files.remove(name);
    }

    /// Number of handles currently open; zero after a leak-free run.
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }

    /// Whether `name` was ever opened.
    pub fn was_opened(&self, name: &str) -> bool {
        self.open_log.borrow().iter().any(|n| n == name)
    }
}

impl BootFs for MapFs {
    type Handle = MapHandle;

    fn open(&self, path: &str) -> BootgateResult<MapHandle> {
        self.open_log.borrow_mut().push(path.to_string());
        let data = self
            .files
            .get(path)
            .ok_or(BootgateError::DRIVER_FILE_OPEN_FAILURE)?
            .clone();
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(MapHandle { data, pos: 0 })
    }

    fn read(&self, handle: &mut MapHandle, buf: &mut [u8]) -> BootgateResult<usize> {
        let remaining = &handle.data[handle.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        handle.pos += n;
        Ok(n)
    }

    fn close(&self, _handle: &mut MapHandle) -> BootgateResult<()> {
        self.open_handles.set(self.open_handles.get() - 1);
        Ok(())
    }
}

/// Mock verification key with a configurable signature size.
#[derive(Clone, Copy)]
pub struct MockKey {
    sig_size: usize,
}

impl Default for MockKey {
    fn default() -> Self {
        Self { sig_size: 2048 }
    }
}

impl VerificationKey for MockKey {
    fn signature_size(&self) -> usize {
        self.sig_size
    }
}

/// Scripted cryptography provider.
pub struct MockCrypto {
    reject_base64: bool,
    reject_der: bool,
}

impl MockCrypto {
    pub fn accept_all() -> Self {
        Self {
            reject_base64: false,
            reject_der: false,
        }
    }

    pub fn reject_base64() -> Self {
        Self {
            reject_base64: true,
            reject_der: false,
        }
    }

    pub fn reject_der() -> Self {
        Self {
            reject_base64: false,
            reject_der: true,
        }
    }
}

pub struct MockVerifyOp {
    data: Vec<u8>,
}

impl CryptoProvider for MockCrypto {
    type Key = MockKey;
    type VerifyOp<'a> = MockVerifyOp
    where
        Self: 'a;

    fn decode_base64(&self, text: &[u8]) -> BootgateResult<Vec<u8>> {
        if self.reject_base64 {
            return Err(BootgateError::CRYPTO_BASE64_DECODE_FAILURE);
        }
        Ok(text.to_vec())
    }

    fn parse_rsa_public_key(&self, der: &[u8]) -> BootgateResult<MockKey> {
        if self.reject_der {
            return Err(BootgateError::CRYPTO_DER_PARSE_FAILURE);
        }
        let _ = der;
        Ok(MockKey::default())
    }

    fn verify_init<'a>(&'a self, _key: &MockKey) -> BootgateResult<MockVerifyOp> {
        Ok(MockVerifyOp { data: Vec::new() })
    }
}

impl DigestVerifyOp for MockVerifyOp {
    fn update(&mut self, data: &[u8]) -> BootgateResult<()> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn finalize(self, signature: &[u8]) -> BootgateResult<bool> {
        Ok(signature == mock_signature(&self.data).as_slice())
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    manifest.rs

Abstract:

    File contains the boot manifest verification protocol.

--*/

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use bootgate_drivers::{cprintln, BootFs, FileStream};
use bootgate_error::BootgateError;

use crate::key::load_embedded_key;
use crate::verifier::verify_file;
use crate::CryptoProvider;

/// Well-known name of the boot manifest.
pub const BOOT_MANIFEST_PATH: &str = "efi_boot.lst";

/// Well-known name of the boot manifest's own detached signature.
pub const BOOT_MANIFEST_SIG_PATH: &str = "efi_boot.lst.dgst";

/// Upper bound on the manifest body. Larger manifests are rejected.
pub const MANIFEST_MAX_BYTES: usize = 1024;

/// Upper bound on the number of manifest entries.
pub const MANIFEST_MAX_ENTRIES: usize = 16;

/// Upper bound on one entry name, excluding the digest suffix.
pub const MANIFEST_ENTRY_NAME_MAX: usize = 63;

/// Suffix appended to an entry name to form its signature file name.
pub const DIGEST_SUFFIX: &str = ".dgst";

/// The parsed boot manifest: the ordered list of file names that must
/// each be individually verified before the boot continues.
#[derive(Debug)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    /// Parse a manifest body into its entry list.
    ///
    /// The body must be UTF-8 text, one file name per `\n`-terminated
    /// line. Empty lines are skipped. A final name not terminated by
    /// `\n` is still captured. At most [`MANIFEST_MAX_ENTRIES`] entries
    /// are accepted; entry-name length is checked later, at digest-name
    /// derivation.
    pub fn parse(body: &[u8]) -> Result<Self, ManifestFailure> {
        let text = core::str::from_utf8(body).map_err(|_| {
            ManifestFailure::new(BootgateError::MANIFEST_VERIFIER_MANIFEST_NOT_UTF8)
        })?;

        let mut entries = Vec::new();
        for line in text.split('\n') {
            if line.is_empty() {
                continue;
            }
            if entries.len() == MANIFEST_MAX_ENTRIES {
                return Err(ManifestFailure::new(
                    BootgateError::MANIFEST_VERIFIER_TOO_MANY_ENTRIES,
                ));
            }
            entries.push(String::from(line));
        }

        Ok(Self { entries })
    }

    /// Entry names in manifest order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The single user-facing failure of a manifest verification run: the
/// stage that failed and, where applicable, the offending file name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ManifestFailure {
    code: BootgateError,
    entry: Option<String>,
}

impl ManifestFailure {
    fn new(code: BootgateError) -> Self {
        Self { code, entry: None }
    }

    fn for_entry(code: BootgateError, entry: String) -> Self {
        Self {
            code,
            entry: Some(entry),
        }
    }

    /// Error code of the failing stage.
    pub fn code(&self) -> BootgateError {
        self.code
    }

    /// Name of the offending file, when the failure is entry-specific.
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }
}

impl fmt::Display for ManifestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.entry.as_deref().unwrap_or("?");
        if self.code == BootgateError::MANIFEST_VERIFIER_MANIFEST_NOT_SIGNED {
            write!(f, "files list is not signed properly")
        } else if self.code == BootgateError::MANIFEST_VERIFIER_MANIFEST_READ_FAILURE {
            write!(f, "unable to read boot files list")
        } else if self.code == BootgateError::MANIFEST_VERIFIER_MANIFEST_TOO_LARGE {
            write!(f, "boot files list is too large")
        } else if self.code == BootgateError::MANIFEST_VERIFIER_MANIFEST_NOT_UTF8 {
            write!(f, "boot files list is not valid text")
        } else if self.code == BootgateError::MANIFEST_VERIFIER_TOO_MANY_ENTRIES {
            write!(f, "boot files list has too many entries")
        } else if self.code == BootgateError::MANIFEST_VERIFIER_NAME_TOO_LONG {
            write!(f, "unable to construct digest file name for {entry}")
        } else if self.code == BootgateError::MANIFEST_VERIFIER_ENTRY_NOT_SIGNED {
            write!(f, "{entry} is not signed properly")
        } else if self.code == BootgateError::KEY_LOADER_BASE64_DECODE_FAILURE
            || self.code == BootgateError::KEY_LOADER_DER_PARSE_FAILURE
        {
            write!(f, "unable to load verification key")
        } else {
            write!(f, "verification error 0x{:08x}", u32::from(self.code))
        }
    }
}

/// Derive the signature file name for `name` by appending
/// [`DIGEST_SUFFIX`].
///
/// Fails when `name` exceeds [`MANIFEST_ENTRY_NAME_MAX`]; the name is
/// never truncated.
pub fn digest_file_name(name: &str) -> Result<String, ManifestFailure> {
    if name.len() > MANIFEST_ENTRY_NAME_MAX {
        return Err(ManifestFailure::for_entry(
            BootgateError::MANIFEST_VERIFIER_NAME_TOO_LONG,
            String::from(name),
        ));
    }

    let mut derived = String::with_capacity(name.len() + DIGEST_SUFFIX.len());
    derived.push_str(name);
    derived.push_str(DIGEST_SUFFIX);
    Ok(derived)
}

/// Verify the boot manifest and every file it lists against the embedded
/// trust root.
///
/// On success the parsed manifest is returned so the loader continues
/// with exactly the files that were verified. On failure the boot must
/// halt; the failure's `Display` text names the stage and file.
pub fn verify_boot_manifest<Fs: BootFs, C: CryptoProvider>(
    fs: &Fs,
    crypto: &C,
) -> Result<Manifest, ManifestFailure> {
    let key = load_embedded_key(crypto).map_err(ManifestFailure::new)?;
    verify_manifest_with_key(fs, crypto, &key)
}

/// Verify the boot manifest and every file it lists under `key`.
///
/// The manifest is self-verifying: its own signature is checked before
/// its contents are parsed as data. Verification stops at the first
/// failing entry; there is no continue-past or repair.
pub fn verify_manifest_with_key<Fs: BootFs, C: CryptoProvider>(
    fs: &Fs,
    crypto: &C,
    key: &C::Key,
) -> Result<Manifest, ManifestFailure> {
    cprintln!("[bootgate] Verifying integrity...");

    match verify_file(fs, crypto, key, BOOT_MANIFEST_PATH, BOOT_MANIFEST_SIG_PATH) {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            return Err(ManifestFailure::new(
                BootgateError::MANIFEST_VERIFIER_MANIFEST_NOT_SIGNED,
            ));
        }
    }

    let body = read_manifest_body(fs)?;
    let manifest = Manifest::parse(&body)?;

    for entry in manifest.entries() {
        let signature_path = digest_file_name(entry)?;
        cprintln!("[bootgate] {}", entry.as_str());

        match verify_file(fs, crypto, key, entry, &signature_path) {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                return Err(ManifestFailure::for_entry(
                    BootgateError::MANIFEST_VERIFIER_ENTRY_NOT_SIGNED,
                    entry.clone(),
                ));
            }
        }
    }

    cprintln!("[bootgate] Verified OK");
    Ok(manifest)
}

/// Read the manifest body, bounded by [`MANIFEST_MAX_BYTES`].
///
/// A body that exceeds the bound is rejected rather than truncated;
/// verifying a prefix of the signed list would silently drop entries.
fn read_manifest_body<Fs: BootFs>(fs: &Fs) -> Result<Vec<u8>, ManifestFailure> {
    let mut stream = FileStream::open(fs, BOOT_MANIFEST_PATH).map_err(|_| {
        ManifestFailure::new(BootgateError::MANIFEST_VERIFIER_MANIFEST_READ_FAILURE)
    })?;

    let mut buf = vec![0u8; MANIFEST_MAX_BYTES + 1];
    let len = stream.read_up_to(&mut buf).map_err(|_| {
        ManifestFailure::new(BootgateError::MANIFEST_VERIFIER_MANIFEST_READ_FAILURE)
    })?;

    if len > MANIFEST_MAX_BYTES {
        return Err(ManifestFailure::new(
            BootgateError::MANIFEST_VERIFIER_MANIFEST_TOO_LARGE,
        ));
    }

    buf.truncate(len);
    Ok(buf)
}

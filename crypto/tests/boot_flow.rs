// Licensed under the Apache-2.0 license

//! End-to-end verification tests against real RSA-2048 signatures on a
//! host filesystem tree.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use bootgate_crypto::{RustCrypto, RustCryptoKey};
use bootgate_drivers::HostFs;
use bootgate_error::BootgateError;
use bootgate_verify::{
    verify_file, verify_manifest_with_key, CryptoProvider, Manifest, ManifestFailure,
    BOOT_MANIFEST_PATH, MANIFEST_ENTRY_NAME_MAX,
};
use rand::RngCore;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use tempfile::TempDir;

/// One RSA-2048 key pair shared by the whole test binary; generating it
/// is the slow part.
fn signing_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap())
}

fn verification_key() -> RustCryptoKey {
    let der = signing_key().to_public_key().to_public_key_der().unwrap();
    RustCrypto::default()
        .parse_rsa_public_key(der.as_bytes())
        .unwrap()
}

fn sign(data: &[u8]) -> Vec<u8> {
    let signer = SigningKey::<Sha256>::new(signing_key().clone());
    signer.sign(data).to_vec()
}

/// Write `name` and its valid detached signature under `root`.
fn write_signed(root: &Path, name: &str, data: &[u8]) {
    fs::write(root.join(name), data).unwrap();
    fs::write(root.join(format!("{name}.dgst")), sign(data)).unwrap();
}

/// Build a tree holding a signed manifest listing `entries` and a signed
/// data file for each entry.
fn signed_tree(entries: &[(&str, &[u8])]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut body = String::new();
    for (name, data) in entries {
        body.push_str(name);
        body.push('\n');
        write_signed(dir.path(), name, data);
    }
    write_signed(dir.path(), BOOT_MANIFEST_PATH, body.as_bytes());
    dir
}

fn run(dir: &TempDir) -> Result<Manifest, ManifestFailure> {
    let fs = HostFs::new(dir.path());
    verify_manifest_with_key(&fs, &RustCrypto::default(), &verification_key())
}

#[test]
fn test_verify_file_valid_signature() {
    let dir = signed_tree(&[]);
    write_signed(dir.path(), "app.efi", b"firmware image contents");

    let fs = HostFs::new(dir.path());
    let result = verify_file(
        &fs,
        &RustCrypto::default(),
        &verification_key(),
        "app.efi",
        "app.efi.dgst",
    );
    assert_eq!(result, Ok(true));
}

#[test]
fn test_verify_file_detects_one_byte_mutation() {
    let dir = signed_tree(&[]);
    write_signed(dir.path(), "app.efi", b"firmware image contents");
    // Flip one byte after signing.
    fs::write(dir.path().join("app.efi"), b"firmware image Contents").unwrap();

    let fs = HostFs::new(dir.path());
    let result = verify_file(
        &fs,
        &RustCrypto::default(),
        &verification_key(),
        "app.efi",
        "app.efi.dgst",
    );
    assert_eq!(result, Ok(false));
}

#[test]
fn test_zero_length_signature_never_verifies() {
    let dir = signed_tree(&[]);
    write_signed(dir.path(), "app.efi", b"data");
    fs::write(dir.path().join("app.efi.dgst"), b"").unwrap();

    let fs = HostFs::new(dir.path());
    let result = verify_file(
        &fs,
        &RustCrypto::default(),
        &verification_key(),
        "app.efi",
        "app.efi.dgst",
    );
    assert!(!matches!(result, Ok(true)));
}

#[test]
fn test_random_signature_never_verifies() {
    let dir = signed_tree(&[]);
    write_signed(dir.path(), "app.efi", b"data");

    let mut junk = [0u8; 256];
    rand::thread_rng().fill_bytes(&mut junk);
    fs::write(dir.path().join("app.efi.dgst"), junk).unwrap();

    let fs = HostFs::new(dir.path());
    let result = verify_file(
        &fs,
        &RustCrypto::default(),
        &verification_key(),
        "app.efi",
        "app.efi.dgst",
    );
    assert!(!matches!(result, Ok(true)));
}

#[test]
fn test_manifest_round_trip() {
    let dir = signed_tree(&[
        ("app.efi", b"the application image".as_slice()),
        ("config.cfg", b"key=value\n".as_slice()),
    ]);

    let manifest = run(&dir).unwrap();
    assert_eq!(manifest.entries(), ["app.efi", "config.cfg"]);
}

#[test]
fn test_empty_manifest_round_trip() {
    let dir = signed_tree(&[]);
    let manifest = run(&dir).unwrap();
    assert!(manifest.is_empty());
}

#[test]
fn test_missing_entry_signature_names_the_file() {
    let dir = signed_tree(&[
        ("app.efi", b"the application image".as_slice()),
        ("config.cfg", b"key=value\n".as_slice()),
    ]);
    fs::remove_file(dir.path().join("config.cfg.dgst")).unwrap();

    let failure = run(&dir).unwrap_err();
    assert_eq!(failure.to_string(), "config.cfg is not signed properly");
}

#[test]
fn test_tampered_entry_names_the_file() {
    let dir = signed_tree(&[
        ("app.efi", b"the application image".as_slice()),
        ("config.cfg", b"key=value\n".as_slice()),
    ]);
    fs::write(dir.path().join("config.cfg"), b"key=evil\n").unwrap();

    let failure = run(&dir).unwrap_err();
    assert_eq!(
        failure.code(),
        BootgateError::MANIFEST_VERIFIER_ENTRY_NOT_SIGNED
    );
    assert_eq!(failure.entry(), Some("config.cfg"));
}

#[test]
fn test_tampered_manifest_fails_self_check() {
    let dir = signed_tree(&[("app.efi", b"the application image".as_slice())]);
    fs::write(dir.path().join(BOOT_MANIFEST_PATH), b"evil.efi\n").unwrap();

    let failure = run(&dir).unwrap_err();
    assert_eq!(failure.to_string(), "files list is not signed properly");
}

#[test]
fn test_entry_name_boundary() {
    let max_name = "m".repeat(MANIFEST_ENTRY_NAME_MAX);
    let dir = signed_tree(&[(max_name.as_str(), b"data".as_slice())]);
    assert_eq!(run(&dir).unwrap().entries(), [max_name]);

    let over_name = "m".repeat(MANIFEST_ENTRY_NAME_MAX + 1);
    let dir = signed_tree(&[(over_name.as_str(), b"data".as_slice())]);
    let failure = run(&dir).unwrap_err();
    assert_eq!(
        failure.code(),
        BootgateError::MANIFEST_VERIFIER_NAME_TOO_LONG
    );
    assert_eq!(failure.entry(), Some(over_name.as_str()));
}

#[test]
fn test_verification_is_idempotent() {
    let dir = signed_tree(&[("app.efi", b"the application image".as_slice())]);

    let first = run(&dir).unwrap();
    let second = run(&dir).unwrap();
    assert_eq!(first.entries(), second.entries());
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    key.rs

Abstract:

    File contains the embedded trust root and the verification key loader.

--*/

use bootgate_error::{BootgateError, BootgateResult};

use crate::CryptoProvider;

/// The embedded trust root.
///
/// Base64 text of the DER `SubjectPublicKeyInfo` for the RSA-2048 public
/// key whose holder signs the boot manifest and every file it lists. The
/// constant is compiled into the loader binary; there is no mechanism to
/// substitute a different key at runtime.
pub const TRUST_ROOT_B64: &[u8] =
    b"MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAqHz2evD4F4BDcdE0W6Zq\n\
      1A9vO+7zPvSgE44Ld8cBzLRlCYZo4MgTxUiwwbhVm571iEgu1Z07k4seLFNzInTu\n\
      zrzYSZ8X4mcUGAVp6U9utXQszrCtfSb+yiRoB5oiAmNfjgd+6fHhlXtoFboLpV1f\n\
      QifL0Hh9uCB1cyH8J6ev9KCGVF5f1oKlGNSz2juNdrYjXHmlxQ+apxRhmUE8+2+2\n\
      BHvMTIiT6XUOgMkFjY6uhKiL3gAWFIItuSUJ0dSrnTVkmx16V2ruF81ZYspVKORE\n\
      nK8rmO6Ckaxwm9D6gjnc9FpZoWSFdZoNAx7A0s9H5p9Zv9YKrv72PY8wiuR6Kgzp\n\
      NwIDAQAB\n";

/// Decode and parse the embedded trust root into a verification key.
///
/// Both failure modes indicate a corrupt build, not a runtime condition;
/// they are distinguished so diagnostics can tell base64 corruption from
/// structural corruption. Callers load the key once per verification
/// session; the key is immutable afterwards.
pub fn load_embedded_key<C: CryptoProvider>(crypto: &C) -> BootgateResult<C::Key> {
    let der = crypto
        .decode_base64(TRUST_ROOT_B64)
        .map_err(|_| BootgateError::KEY_LOADER_BASE64_DECODE_FAILURE)?;

    crypto
        .parse_rsa_public_key(&der)
        .map_err(|_| BootgateError::KEY_LOADER_DER_PARSE_FAILURE)
}

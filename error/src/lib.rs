/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the library for error handling

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// Bootgate Error Type
/// Derives debug, copy, clone, eq, and partial eq
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BootgateError(pub NonZeroU32);

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: BootgateError = BootgateError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(& 'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl BootgateError {
    /// Create a bootgate error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. The preferred way to get a BootgateError from a u32 is to
    /// use `BootgateError::try_from()` from the `TryFrom` trait impl.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("BootgateError cannot be 0"),
        }
    }

    // Use the macro to define all error constants
    define_error_constants![
        (
            DRIVER_FILE_OPEN_FAILURE,
            0x00010001,
            "Driver Error: file open failed"
        ),
        (
            DRIVER_FILE_READ_FAILURE,
            0x00010002,
            "Driver Error: file read failed"
        ),
        (
            DRIVER_FILE_CLOSE_FAILURE,
            0x00010003,
            "Driver Error: file close failed"
        ),
        (
            DRIVER_FILE_STREAM_CLOSED,
            0x00010004,
            "Driver Error: operation on a released file stream"
        ),
        (
            CRYPTO_BASE64_DECODE_FAILURE,
            0x00020001,
            "Crypto provider Error: base64 decode failed"
        ),
        (
            CRYPTO_DER_PARSE_FAILURE,
            0x00020002,
            "Crypto provider Error: DER public key parse failed"
        ),
        (
            CRYPTO_MALFORMED_SIGNATURE,
            0x00020003,
            "Crypto provider Error: signature bytes are malformed"
        ),
        (
            KEY_LOADER_BASE64_DECODE_FAILURE,
            0x00030001,
            "Key Loader Error: embedded key base64 text is corrupt"
        ),
        (
            KEY_LOADER_DER_PARSE_FAILURE,
            0x00030002,
            "Key Loader Error: embedded key DER structure is corrupt"
        ),
        (
            FILE_VERIFIER_SIGNATURE_READ_FAILURE,
            0x00040001,
            "File Verifier Error: unable to read signature file"
        ),
        (
            FILE_VERIFIER_DATA_READ_FAILURE,
            0x00040002,
            "File Verifier Error: unable to read data file"
        ),
        (
            FILE_VERIFIER_CRYPTO_FAILURE,
            0x00040003,
            "File Verifier Error: verification machinery fault"
        ),
        (
            MANIFEST_VERIFIER_MANIFEST_NOT_SIGNED,
            0x00050001,
            "Manifest Verifier Error: boot files list is not signed properly"
        ),
        (
            MANIFEST_VERIFIER_MANIFEST_READ_FAILURE,
            0x00050002,
            "Manifest Verifier Error: unable to read boot files list"
        ),
        (
            MANIFEST_VERIFIER_MANIFEST_TOO_LARGE,
            0x00050003,
            "Manifest Verifier Error: boot files list exceeds the read bound"
        ),
        (
            MANIFEST_VERIFIER_MANIFEST_NOT_UTF8,
            0x00050004,
            "Manifest Verifier Error: boot files list is not valid UTF-8"
        ),
        (
            MANIFEST_VERIFIER_TOO_MANY_ENTRIES,
            0x00050005,
            "Manifest Verifier Error: boot files list has too many entries"
        ),
        (
            MANIFEST_VERIFIER_NAME_TOO_LONG,
            0x00050006,
            "Manifest Verifier Error: digest file name does not fit the name bound"
        ),
        (
            MANIFEST_VERIFIER_ENTRY_NOT_SIGNED,
            0x00050007,
            "Manifest Verifier Error: listed file is not signed properly"
        ),
    ];
}

impl From<BootgateError> for core::num::NonZeroU32 {
    fn from(val: BootgateError) -> Self {
        val.0
    }
}

impl From<BootgateError> for u32 {
    fn from(val: BootgateError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for BootgateError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(BootgateError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type BootgateResult<T> = Result<T, BootgateError>;

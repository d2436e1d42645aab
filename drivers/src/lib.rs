/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Bootgate platform driver library.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod file;
pub mod printer;

#[cfg(feature = "std")]
mod host;

pub use bootgate_error::{BootgateError, BootgateResult};
pub use file::{BootFs, FileStream, ReadResult};

#[cfg(feature = "std")]
pub use host::HostFs;

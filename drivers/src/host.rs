/*++

Licensed under the Apache-2.0 license.

File Name:

    host.rs

Abstract:

    File contains a host filesystem implementation of the boot file
    primitives, used by tools and tests.

--*/

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use bootgate_error::{BootgateError, BootgateResult};

use crate::file::BootFs;

/// Boot file primitives over a directory on the host filesystem.
///
/// Manifest entries are volume-relative names; paths that try to escape
/// the root directory are refused.
pub struct HostFs {
    root: PathBuf,
}

impl HostFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BootFs for HostFs {
    type Handle = File;

    fn open(&self, path: &str) -> BootgateResult<File> {
        let path = Path::new(path);
        if path.is_absolute() || path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(BootgateError::DRIVER_FILE_OPEN_FAILURE);
        }
        File::open(self.root.join(path)).map_err(|_| BootgateError::DRIVER_FILE_OPEN_FAILURE)
    }

    fn read(&self, handle: &mut File, buf: &mut [u8]) -> BootgateResult<usize> {
        handle.read(buf).map_err(|_| BootgateError::DRIVER_FILE_READ_FAILURE)
    }

    fn close(&self, _handle: &mut File) -> BootgateResult<()> {
        // Dropping the handle closes the descriptor.
        Ok(())
    }
}

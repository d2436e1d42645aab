/*++

Licensed under the Apache-2.0 license.

File Name:

    file.rs

Abstract:

    File contains the boot file primitives trait and the sequential
    read-only stream adapter built on top of it.

--*/

use bootgate_error::{BootgateError, BootgateResult};

/// Boot environment file primitives.
///
/// This is the only seam through which the verification core touches the
/// platform's raw file facilities. A firmware port implements it over its
/// native volume protocol; hosts implement it over the local filesystem.
pub trait BootFs {
    /// Platform file handle type.
    type Handle;

    /// Open the file at `path` for reading.
    fn open(&self, path: &str) -> BootgateResult<Self::Handle>;

    /// Read up to `buf.len()` bytes into `buf`, returning the number of
    /// bytes read. Zero means end of file.
    fn read(&self, handle: &mut Self::Handle, buf: &mut [u8]) -> BootgateResult<usize>;

    /// Close the handle. Handles are closed at most once.
    fn close(&self, handle: &mut Self::Handle) -> BootgateResult<()>;
}

/// Outcome of one sequential read.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ReadResult {
    /// `n > 0` bytes were placed at the front of the buffer.
    Data(usize),
    /// End of stream.
    Eof,
}

/// Sequential, read-only stream over one open boot file.
///
/// The stream owns its handle exclusively unless it was adopted with
/// `close_on_release = false`, in which case the supplying caller keeps
/// responsibility for closing the underlying file. Release is idempotent
/// and also runs on drop, so every exit path of a verification gives the
/// handle back exactly once. Writing, seeking, and line reads are not
/// part of this interface.
pub struct FileStream<'fs, Fs: BootFs> {
    fs: &'fs Fs,
    handle: Option<Fs::Handle>,
    close_on_release: bool,
}

impl<'fs, Fs: BootFs> FileStream<'fs, Fs> {
    /// Open the file at `path` and take ownership of the new handle.
    pub fn open(fs: &'fs Fs, path: &str) -> BootgateResult<Self> {
        let handle = fs.open(path)?;
        Ok(Self {
            fs,
            handle: Some(handle),
            close_on_release: true,
        })
    }

    /// Wrap a handle supplied by the caller.
    ///
    /// With `close_on_release = false` the stream only borrows the handle;
    /// releasing the stream will not close the underlying file.
    pub fn adopt(fs: &'fs Fs, handle: Fs::Handle, close_on_release: bool) -> Self {
        Self {
            fs,
            handle: Some(handle),
            close_on_release,
        }
    }

    /// Read the next chunk of the stream into `buf`.
    pub fn read(&mut self, buf: &mut [u8]) -> BootgateResult<ReadResult> {
        let handle = self
            .handle
            .as_mut()
            .ok_or(BootgateError::DRIVER_FILE_STREAM_CLOSED)?;

        match self.fs.read(handle, buf)? {
            0 => Ok(ReadResult::Eof),
            n => Ok(ReadResult::Data(n)),
        }
    }

    /// Read until `buf` is full or the stream ends, returning the number
    /// of bytes placed in `buf`.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> BootgateResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                ReadResult::Data(n) => filled += n,
                ReadResult::Eof => break,
            }
        }
        Ok(filled)
    }

    /// Release the stream, closing the handle if this stream owns it.
    /// Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if self.close_on_release {
                let _ = self.fs.close(&mut handle);
            }
        }
    }

    /// Returns `true` until the stream has been released.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }
}

impl<Fs: BootFs> Drop for FileStream<'_, Fs> {
    fn drop(&mut self) {
        self.release();
    }
}

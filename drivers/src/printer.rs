/*++

Licensed under the Apache-2.0 license.

File Name:

    printer.rs

Abstract:

    File contains support routines and macros to print to the boot console

--*/
use core::convert::Infallible;
use ufmt::uWrite;

#[derive(Default)]
pub struct Printer;

impl uWrite for Printer {
    type Error = Infallible;

    /// Writes a string slice into this writer, returning whether the write succeeded.
    ///
    /// Freestanding builds discard console output; a firmware port routes
    /// these bytes through its own console sink.
    #[cfg(not(feature = "std"))]
    #[inline(never)]
    fn write_str(&mut self, _str: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Writes a string slice into this writer, returning whether the write succeeded.
    #[cfg(feature = "std")]
    fn write_str(&mut self, str: &str) -> Result<(), Self::Error> {
        print!("{str}");
        Ok(())
    }
}

#[macro_export]
macro_rules! cprint {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwrite!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

#[macro_export]
macro_rules! cprintln {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwriteln!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

//! Memory-mapped register window
//!
//! FPGA and CPLD register files behind a PCI BAR or an LPC/eSPI window are
//! plain byte arrays in the address space. Every register is accessed with a
//! single volatile byte load or store, in ascending address order.

use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::access::{RegisterAccess, assemble};
use crate::MAX_REGISTERS;

/// Access errors of an [`MmioInterface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MmioError {
    /// The register run leaves the mapped window
    OutOfBounds {
        /// First register of the rejected run
        register: u32,
        /// Number of registers requested
        count: usize,
    },
}

/// Byte registers in a mapped window
pub struct MmioInterface<'a> {
    base: NonNull<u8>,
    len: usize,
    _window: PhantomData<&'a mut [u8]>,
}

// SAFETY: the interface has exclusive use of its window (see constructors),
// so moving it to another thread moves that exclusivity with it.
unsafe impl Send for MmioInterface<'_> {}

impl<'a> MmioInterface<'a> {
    /// Use a borrowed byte array as the register window
    ///
    /// Handy for simulated devices and register snapshots.
    pub fn new(window: &'a mut [u8]) -> Self {
        Self {
            base: NonNull::from(&mut *window).cast(),
            len: window.len(),
            _window: PhantomData,
        }
    }

    /// Use `len` bytes of mapped I/O memory starting at `base`
    ///
    /// # Safety
    /// `base..base + len` must be valid for volatile byte reads and writes
    /// for `'a`, and nothing else may access it through a reference while
    /// the interface exists.
    pub const unsafe fn from_raw_parts(base: NonNull<u8>, len: usize) -> Self {
        Self {
            base,
            len,
            _window: PhantomData,
        }
    }

    /// Size of the window in bytes
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for an empty window
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn offset(&self, register: u32, count: usize) -> Result<usize, MmioError> {
        let out_of_bounds = MmioError::OutOfBounds { register, count };
        let start = usize::try_from(register).map_err(|_| out_of_bounds)?;
        match start.checked_add(count) {
            Some(end) if count <= MAX_REGISTERS && end <= self.len => Ok(start),
            _ => Err(out_of_bounds),
        }
    }
}

impl RegisterAccess for MmioInterface<'_> {
    type Error = MmioError;

    fn read(&mut self, register: u32, count: usize) -> Result<u32, Self::Error> {
        let start = self.offset(register, count)?;
        let mut bytes = [0u8; MAX_REGISTERS];
        for (i, byte) in bytes[..count].iter_mut().enumerate() {
            // SAFETY: `offset` checked that start + count is inside the window
            *byte = unsafe { self.base.as_ptr().add(start + i).read_volatile() };
        }
        Ok(assemble(&bytes[..count]))
    }

    fn write(&mut self, register: u32, count: usize, value: u32) -> Result<(), Self::Error> {
        let start = self.offset(register, count)?;
        for (i, byte) in value.to_le_bytes()[..count].iter().enumerate() {
            // SAFETY: `offset` checked that start + count is inside the window
            unsafe { self.base.as_ptr().add(start + i).write_volatile(*byte) };
        }
        Ok(())
    }
}

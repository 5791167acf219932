//! Register access capability
//!
//! A device exposes a flat space of byte registers. Fields are read and
//! written through runs of 1 to [`MAX_REGISTERS`](crate::MAX_REGISTERS)
//! consecutive registers, assembled little-endian: the register at the base
//! address is the least significant byte.
//!
//! Implementations are responsible for serializing concurrent access to the
//! same physical device. See [`RegisterLock`](crate::RegisterLock).

/// Byte-addressed register transport
///
/// Callers pass spans of 1 to [`MAX_REGISTERS`](crate::MAX_REGISTERS)
/// registers that end at or below [`MAX_REGISTER`](Self::MAX_REGISTER).
/// The attribute runtime checks this before every transfer. What a backend
/// does with a span outside those bounds is its own choice: the MMIO
/// backend returns an error, the bus backends assert in debug builds.
pub trait RegisterAccess {
    /// Transport error (bus NACK, device absent, ...)
    type Error;

    /// Highest register address the device can decode
    ///
    /// Fields reaching past it are rejected before any transfer.
    const MAX_REGISTER: u32 = u32::MAX;

    /// Read `count` consecutive registers starting at `register`
    ///
    /// The register at `register` lands in bits 0..8 of the result.
    fn read(&mut self, register: u32, count: usize) -> Result<u32, Self::Error>;

    /// Write the low `count * 8` bits of `value` to `count` consecutive
    /// registers starting at `register`, least significant byte first
    fn write(&mut self, register: u32, count: usize, value: u32) -> Result<(), Self::Error>;
}

impl<A: RegisterAccess + ?Sized> RegisterAccess for &mut A {
    type Error = A::Error;
    const MAX_REGISTER: u32 = A::MAX_REGISTER;

    fn read(&mut self, register: u32, count: usize) -> Result<u32, Self::Error> {
        (**self).read(register, count)
    }

    fn write(&mut self, register: u32, count: usize, value: u32) -> Result<(), Self::Error> {
        (**self).write(register, count, value)
    }
}

/// Assemble up to four register bytes into a little-endian value
pub(crate) fn assemble(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &b)| acc | (u32::from(b) << (8 * i)))
}

/// Returns `true` if `count` registers starting at `register` are all
/// addressable on a device whose highest register is `max`
pub(crate) const fn span_fits(register: u32, count: usize, max: u32) -> bool {
    if count == 0 || count > crate::MAX_REGISTERS {
        return false;
    }
    match register.checked_add(count as u32 - 1) {
        Some(last) => last <= max,
        None => false,
    }
}

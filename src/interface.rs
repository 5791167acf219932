//! Bus interface implementations
//!
//! This module provides [`RegisterAccess`] implementations for CPLDs and
//! similar devices hanging off an I2C bus, either directly through
//! `embedded-hal` or through any `device-driver` register interface.

use device_driver::RegisterInterface;

use crate::access::{RegisterAccess, assemble, span_fits};
use crate::MAX_REGISTERS;

/// Highest SMBus command code
const SMBUS_MAX_REGISTER: u32 = 0xFF;

/// SMBus command code of the `offset`-th register of a run
///
/// Only the low 8 bits of the register address reach the bus; spans are
/// debug-asserted with [`smbus_span`] before any transfer.
fn command(register: u32, offset: usize) -> u8 {
    let offset = u32::try_from(offset).unwrap_or(u32::MAX);
    register.wrapping_add(offset).to_le_bytes()[0]
}

/// Catch spans that would wrap past the last command code
fn smbus_span(register: u32, count: usize) -> usize {
    debug_assert!(
        span_fits(register, count, SMBUS_MAX_REGISTER),
        "register span outside the SMBus command range"
    );
    count.min(MAX_REGISTERS)
}

/// I2C interface for byte-register devices (CPLDs, FPGAs, muxes)
///
/// Each register is one SMBus "read/write byte data" transfer, so devices
/// without register auto-increment work too. A 4-register field costs four
/// transfers; the device lock, not the bus, keeps them together.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface for the device at 7-bit `address`
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus (or mux channel) the device sits on
    /// * `address` - The I2C device address
    ///
    /// # Example
    /// ```ignore
    /// let cpld = I2cInterface::new(i2c, 0x60);
    /// let mut group: AttributeGroup<_, 32> = AttributeGroup::new("cpld", RefCell::new(cpld));
    /// ```
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterAccess for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    const MAX_REGISTER: u32 = SMBUS_MAX_REGISTER;

    fn read(&mut self, register: u32, count: usize) -> Result<u32, Self::Error> {
        let mut bytes = [0u8; MAX_REGISTERS];
        let count = smbus_span(register, count);
        for (i, byte) in bytes[..count].iter_mut().enumerate() {
            let mut data = [0u8];
            if let Err(e) = self
                .i2c
                .write_read(self.address, &[command(register, i)], &mut data)
            {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "i2c 0x{:02x}: read error - reg: 0x{:02x}",
                    self.address,
                    command(register, i)
                );
                return Err(e);
            }
            *byte = data[0];
        }
        Ok(assemble(&bytes[..count]))
    }

    fn write(&mut self, register: u32, count: usize, value: u32) -> Result<(), Self::Error> {
        let count = smbus_span(register, count);
        for (i, byte) in value.to_le_bytes()[..count].iter().enumerate() {
            if let Err(e) = self
                .i2c
                .write(self.address, &[command(register, i), *byte])
            {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "i2c 0x{:02x}: write error - reg: 0x{:02x}",
                    self.address,
                    command(register, i)
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Adapter for any `device-driver` register interface with 8-bit addresses
///
/// A field spanning several registers is transferred as one multi-byte
/// register access starting at its base address, so the device must
/// auto-increment its register pointer.
pub struct DeviceInterface<T> {
    interface: T,
}

impl<T> DeviceInterface<T> {
    /// Wrap a register interface
    pub const fn new(interface: T) -> Self {
        Self { interface }
    }

    /// Consume the adapter and return the register interface
    pub fn release(self) -> T {
        self.interface
    }
}

impl<T> RegisterAccess for DeviceInterface<T>
where
    T: RegisterInterface<AddressType = u8>,
{
    type Error = T::Error;
    const MAX_REGISTER: u32 = SMBUS_MAX_REGISTER;

    fn read(&mut self, register: u32, count: usize) -> Result<u32, Self::Error> {
        let mut bytes = [0u8; MAX_REGISTERS];
        let count = smbus_span(register, count);
        let size_bits = u32::try_from(8 * count).unwrap_or(u32::MAX);
        self.interface
            .read_register(command(register, 0), size_bits, &mut bytes[..count])?;
        Ok(assemble(&bytes[..count]))
    }

    fn write(&mut self, register: u32, count: usize, value: u32) -> Result<(), Self::Error> {
        let count = smbus_span(register, count);
        let size_bits = u32::try_from(8 * count).unwrap_or(u32::MAX);
        self.interface
            .write_register(command(register, 0), size_bits, &value.to_le_bytes()[..count])
    }
}

#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

use core::convert::Infallible;

pub mod access;
pub mod bits;
pub mod codec;
pub mod field;
pub mod group;
pub mod interface;
pub mod lock;
pub mod mmio;
pub mod runtime;
pub mod scale;

// Re-export main types
pub use access::RegisterAccess;
pub use codec::{Value, decode, encode};
pub use field::{Access, FieldDescriptor, FieldKind, Radix};
pub use group::{AttributeGroup, Transaction};
pub use interface::{DeviceInterface, I2cInterface};
pub use lock::RegisterLock;
pub use mmio::MmioInterface;
pub use runtime::{read_raw, show, store, write_raw};
pub use scale::LinearScale;

/// Maximum number of consecutive byte registers a single field may span
pub const MAX_REGISTERS: usize = 4;

/// Maximum length in bytes of an enumerated value name
///
/// Board tables historically sized their name buffers at 20 bytes
/// including the terminator.
pub const VALUE_NAME_MAX: usize = 19;

/// Capacity of the text buffer returned when a field is decoded
///
/// Large enough for `-0x80000000`, `4294967295` and any value name.
pub const VALUE_CAPACITY: usize = 24;

/// Attribute errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device (the register transport failed)
    Bus(E),
    /// Supplied text is not a well-formed integer
    Parse,
    /// Value does not fit the field width/signedness, or a raw value has no
    /// enumerated name
    OutOfRange,
    /// Supplied text matches none of the field's value names
    InvalidValue,
    /// Field descriptor violates its own invariants or the register span of
    /// the bound device
    InvalidConfig,
    /// Attempt to store into a read-only attribute
    ReadOnly,
    /// No attribute of that name is registered
    UnknownAttribute,
    /// The attribute group has no room for another descriptor
    Full,
    /// The output sink rejected the formatted value
    Format,
}

impl<E> Error<E> {
    /// Convert the transport error, keeping every other variant
    pub fn map_bus<F>(self, f: impl FnOnce(E) -> F) -> Error<F> {
        match self {
            Self::Bus(e) => Error::Bus(f(e)),
            Self::Parse => Error::Parse,
            Self::OutOfRange => Error::OutOfRange,
            Self::InvalidValue => Error::InvalidValue,
            Self::InvalidConfig => Error::InvalidConfig,
            Self::ReadOnly => Error::ReadOnly,
            Self::UnknownAttribute => Error::UnknownAttribute,
            Self::Full => Error::Full,
            Self::Format => Error::Format,
        }
    }

    /// Returns `true` if the error came from the register transport
    pub const fn is_bus(&self) -> bool {
        matches!(self, Self::Bus(_))
    }
}

impl Error<Infallible> {
    /// Re-type an error raised without touching hardware
    pub fn widen<E>(self) -> Error<E> {
        self.map_bus(|never| match never {})
    }
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "register access failed: {e:?}"),
            Self::Parse => f.write_str("not an integer"),
            Self::OutOfRange => f.write_str("value out of range"),
            Self::InvalidValue => f.write_str("unknown value name"),
            Self::InvalidConfig => f.write_str("invalid field descriptor"),
            Self::ReadOnly => f.write_str("attribute is read-only"),
            Self::UnknownAttribute => f.write_str("no such attribute"),
            Self::Full => f.write_str("attribute group is full"),
            Self::Format => f.write_str("output buffer rejected value"),
        }
    }
}

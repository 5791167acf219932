//! Bitfield descriptors
//!
//! A [`FieldDescriptor`] names a group of bits inside one to four consecutive
//! byte registers and says how those bits are presented as text. Descriptors
//! are plain `const` data so a board can declare its whole register map as a
//! `static` table:
//!
//! ```
//! use platform_bitfield::{FieldDescriptor, FieldKind};
//!
//! static LED_COLORS: [&str; 4] = ["amber", "red", "green", "off"];
//!
//! static CPLD: [FieldDescriptor; 4] = [
//!     FieldDescriptor::new("cpld_major_version", 0x00, 4, 4, FieldKind::DECIMAL).read_only(),
//!     FieldDescriptor::new("cpld_minor_version", 0x00, 0, 4, FieldKind::DECIMAL).read_only(),
//!     FieldDescriptor::new("led_diag", 0x07, 2, 2, FieldKind::Enumerated(&LED_COLORS)),
//!     FieldDescriptor::new("qsfp_reset", 0x10, 0, 32, FieldKind::HEX).complemented(),
//! ];
//! # assert!(CPLD.iter().all(|d| d.validate().is_ok()));
//! ```

use core::convert::Infallible;

use crate::{Error, MAX_REGISTERS, VALUE_NAME_MAX, bits};

/// Base used to render numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Radix {
    /// `0x`-prefixed, zero-padded to the field width
    Hex,
    /// Plain base 10
    Decimal,
}

/// How the raw bits of a field are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// A number, optionally two's complement of the field width
    Numeric {
        /// Interpret the field as two's complement
        signed: bool,
        /// Base used when showing the value
        radix: Radix,
    },
    /// Raw values index into a table of names
    Enumerated(&'static [&'static str]),
}

impl FieldKind {
    /// Unsigned, shown in hex
    pub const HEX: Self = Self::Numeric {
        signed: false,
        radix: Radix::Hex,
    };

    /// Unsigned, shown in decimal
    pub const DECIMAL: Self = Self::Numeric {
        signed: false,
        radix: Radix::Decimal,
    };

    /// Signed, shown in decimal
    pub const SIGNED: Self = Self::Numeric {
        signed: true,
        radix: Radix::Decimal,
    };

    /// Signed, shown as sign and hex magnitude
    pub const SIGNED_HEX: Self = Self::Numeric {
        signed: true,
        radix: Radix::Hex,
    };

    /// Value names, if this is an enumerated field
    pub const fn values(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Enumerated(values) => Some(values),
            Self::Numeric { .. } => None,
        }
    }

    /// Returns `true` for signed numeric fields
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Numeric { signed: true, .. })
    }
}

/// Attribute permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Show only
    ReadOnly,
    /// Show and store
    ReadWrite,
}

/// Description of one named bitfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldDescriptor {
    /// Attribute name
    pub name: &'static str,
    /// Address of the first (least significant) register
    pub register: u32,
    /// Bit offset into the little-endian register run; may exceed 7
    pub shift: u8,
    /// Field width in bits (1 to 32)
    pub width: u8,
    /// Presentation of the raw bits
    pub kind: FieldKind,
    /// Hardware polarity is inverted relative to the presented value
    pub complement: bool,
    /// Attribute permissions
    pub access: Access,
}

impl FieldDescriptor {
    /// Describe a read-write field of `width` bits at bit `shift` of the
    /// registers starting at `register`
    pub const fn new(
        name: &'static str,
        register: u32,
        shift: u8,
        width: u8,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            register,
            shift,
            width,
            kind,
            complement: false,
            access: Access::ReadWrite,
        }
    }

    /// Describe a single bit
    pub const fn bit(name: &'static str, register: u32, bit: u8, kind: FieldKind) -> Self {
        Self::new(name, register, bit, 1, kind)
    }

    /// Describe a whole 8-bit register
    pub const fn register(name: &'static str, register: u32, kind: FieldKind) -> Self {
        Self::new(name, register, 0, 8, kind)
    }

    /// Invert the field bits (present a high-active interface to a
    /// low-active signal)
    #[must_use]
    pub const fn complemented(mut self) -> Self {
        self.complement = true;
        self
    }

    /// Forbid stores
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    /// Mask of `width` bits
    pub const fn mask(&self) -> u32 {
        bits::mask(self.width as u32)
    }

    /// Number of consecutive registers covering `shift + width` bits
    pub const fn register_count(&self) -> usize {
        (self.shift as usize + self.width as usize).div_ceil(8)
    }

    /// Returns `true` when a store can skip reading the old value
    ///
    /// That is the case only when the field covers whole registers.
    pub const fn is_byte_aligned(&self) -> bool {
        self.shift == 0 && self.width % 8 == 0
    }

    /// Returns `true` if stores are allowed
    pub const fn is_writable(&self) -> bool {
        matches!(self.access, Access::ReadWrite)
    }

    /// Isolate this field from a value read from its registers
    pub const fn extract(&self, registers: u32) -> u32 {
        (registers >> self.shift) & self.mask()
    }

    /// Replace this field inside a value read from its registers
    pub const fn insert(&self, registers: u32, raw: u32) -> u32 {
        bits::put_field(
            registers,
            self.shift as u32 + self.width as u32 - 1,
            self.shift as u32,
            raw,
        )
    }

    /// Check the descriptor invariants
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the name is empty, the width is not in
    /// 1..=32, the field reaches past four registers, or the value names
    /// do not fit the field.
    pub fn validate(&self) -> Result<(), Error<Infallible>> {
        if self.name.is_empty() || self.width == 0 || self.width > 32 {
            return Err(Error::InvalidConfig);
        }
        if self.shift as usize + self.width as usize > 8 * MAX_REGISTERS {
            return Err(Error::InvalidConfig);
        }
        if let FieldKind::Enumerated(values) = self.kind {
            let capacity = 1u64 << self.width;
            if values.is_empty() || values.len() as u64 > capacity {
                return Err(Error::InvalidConfig);
            }
            if !values.iter().all(|v| is_valid_name(v)) {
                return Err(Error::InvalidConfig);
            }
        }
        Ok(())
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= VALUE_NAME_MAX
        && !name.chars().any(char::is_whitespace)
}

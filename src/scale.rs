//! Linear scaling between register units and presentation units
//!
//! Some registers count in units the consumer does not use. Fan controllers
//! are the usual case: a CPLD holds the PWM duty cycle as 0..=20 in 5% steps
//! while hwmon expects 0..=255. This sits on top of the raw field access,
//! not inside the text codec.

use core::convert::Infallible;

use crate::access::RegisterAccess;
use crate::field::FieldDescriptor;
use crate::{Error, runtime};

/// Integer linear map between `0..=raw_max` and `0..=scaled_max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearScale {
    raw_max: u32,
    scaled_max: u32,
}

impl LinearScale {
    /// Create a scale
    ///
    /// # Errors
    /// Returns `InvalidConfig` if either end of the range is zero.
    pub const fn new(raw_max: u32, scaled_max: u32) -> Result<Self, Error<Infallible>> {
        if raw_max == 0 || scaled_max == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(Self {
            raw_max,
            scaled_max,
        })
    }

    /// Register value to presentation value, rounding down
    ///
    /// Register values above `raw_max` saturate at `scaled_max`, so a
    /// 5-bit field holding 31 still reads as full scale.
    pub fn to_scaled(&self, raw: u32) -> u32 {
        Self::map(raw.min(self.raw_max), self.scaled_max, self.raw_max)
    }

    /// Presentation value to register value, rounding down
    ///
    /// Values above `scaled_max` are clamped first.
    pub fn to_raw(&self, scaled: u32) -> u32 {
        Self::map(scaled.min(self.scaled_max), self.raw_max, self.scaled_max)
    }

    fn map(value: u32, numerator: u32, denominator: u32) -> u32 {
        let mapped = u64::from(value) * u64::from(numerator) / u64::from(denominator);
        // value <= denominator, so mapped <= numerator
        u32::try_from(mapped).unwrap_or(numerator)
    }

    /// Read a field and convert it to presentation units
    ///
    /// A complemented field is inverted first, so the result agrees with
    /// the field's text value.
    ///
    /// # Errors
    /// As [`runtime::read_raw`].
    pub fn read<A: RegisterAccess>(
        &self,
        field: &FieldDescriptor,
        access: &mut A,
    ) -> Result<u32, Error<A::Error>> {
        let raw = runtime::read_raw(field, access)?;
        Ok(self.to_scaled(polarity(field, raw)))
    }

    /// Convert a presentation value and store it into a field
    ///
    /// # Errors
    /// `ReadOnly` for read-only fields, `OutOfRange` if the register value
    /// does not fit the field, otherwise as [`runtime::write_raw`].
    pub fn write<A: RegisterAccess>(
        &self,
        field: &FieldDescriptor,
        access: &mut A,
        scaled: u32,
    ) -> Result<(), Error<A::Error>> {
        if !field.is_writable() {
            return Err(Error::ReadOnly);
        }
        let raw = self.to_raw(scaled);
        if raw > field.mask() {
            return Err(Error::OutOfRange);
        }
        runtime::write_raw(field, access, polarity(field, raw))
    }
}

/// Convert between presented and hardware polarity (its own inverse)
fn polarity(field: &FieldDescriptor, raw: u32) -> u32 {
    if field.complement {
        raw ^ field.mask()
    } else {
        raw
    }
}

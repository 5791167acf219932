//! Attribute show/store
//!
//! These functions run one attribute access against a register transport.
//! They hold no state and take no lock: exclusivity comes from the
//! `&mut` borrow of the access. Use an [`AttributeGroup`](crate::AttributeGroup)
//! when several users share one device.
//!
//! Every error that does not come from the transport is raised before the
//! first transfer, so a failed store leaves the hardware untouched.

use crate::access::{RegisterAccess, span_fits};
use crate::codec::{self, Value};
use crate::field::FieldDescriptor;
use crate::Error;

/// Check a descriptor against itself and against the device register span
fn check<A: RegisterAccess>(field: &FieldDescriptor) -> Result<(), Error<A::Error>> {
    field.validate().map_err(Error::widen)?;
    if !span_fits(field.register, field.register_count(), A::MAX_REGISTER) {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "{}: register 0x{:x} x{} outside device span",
            field.name,
            field.register,
            field.register_count()
        );
        return Err(Error::InvalidConfig);
    }
    Ok(())
}

/// Read the raw (right-aligned, not yet complemented) bits of a field
///
/// Issues exactly one read of the registers covering the field.
///
/// # Errors
/// `InvalidConfig` for a malformed descriptor, `Bus` if the read fails.
pub fn read_raw<A: RegisterAccess>(
    field: &FieldDescriptor,
    access: &mut A,
) -> Result<u32, Error<A::Error>> {
    check::<A>(field)?;
    let registers = access.read(field.register, field.register_count())?;
    Ok(field.extract(registers))
}

/// Write the raw bits of a field, preserving the neighbouring bits
///
/// Unless the field covers whole registers, the current register contents
/// are read first and only the field's bits are replaced. Bits of `raw`
/// above the field width are dropped.
///
/// # Errors
/// `InvalidConfig` for a malformed descriptor, `Bus` if either transfer
/// fails. Nothing is written if the read fails.
pub fn write_raw<A: RegisterAccess>(
    field: &FieldDescriptor,
    access: &mut A,
    raw: u32,
) -> Result<(), Error<A::Error>> {
    check::<A>(field)?;
    let count = field.register_count();

    let current = if field.is_byte_aligned() {
        0
    } else {
        access.read(field.register, count)?
    };
    let updated = field.insert(current, raw);

    #[cfg(feature = "defmt")]
    defmt::trace!(
        "{}: reg 0x{:x} x{} 0x{:x} -> 0x{:x}",
        field.name,
        field.register,
        count,
        current,
        updated
    );

    access.write(field.register, count, updated)?;
    Ok(())
}

/// Read a field and render it as text
///
/// # Errors
/// `Bus` if the read fails, `OutOfRange` if an enumerated field holds a
/// value without a name, `InvalidConfig` for a malformed descriptor.
pub fn show<A: RegisterAccess>(
    field: &FieldDescriptor,
    access: &mut A,
) -> Result<Value, Error<A::Error>> {
    let raw = read_raw(field, access)?;
    codec::decode(raw, field).map_err(Error::widen)
}

/// Parse `text` and store it into a field
///
/// # Errors
/// `ReadOnly`, `Parse`, `OutOfRange` or `InvalidValue` before any transfer;
/// `Bus` if the hardware access fails.
pub fn store<A: RegisterAccess>(
    field: &FieldDescriptor,
    access: &mut A,
    text: &str,
) -> Result<(), Error<A::Error>> {
    if !field.is_writable() {
        return Err(Error::ReadOnly);
    }
    let raw = codec::encode(text, field).map_err(Error::widen)?;
    write_raw(field, access, raw)
}

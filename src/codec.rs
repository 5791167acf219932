//! Conversion between raw field bits and attribute text
//!
//! Decoding applies, in order: the field mask, the complement, the sign,
//! and finally the name table or numeric formatting. Encoding is the exact
//! reverse. Neither direction touches hardware.
//!
//! Numeric input follows the C `strtol` base rules: `0x`/`0X` selects hex,
//! a leading `0` selects octal, anything else is decimal. A single trailing
//! newline is accepted, as written by `echo`.

use core::convert::Infallible;
use core::fmt::Write;

use crate::field::{FieldDescriptor, FieldKind, Radix};
use crate::{Error, VALUE_CAPACITY};

/// Text form of a decoded field
pub type Value = heapless::String<VALUE_CAPACITY>;

/// Render the raw field bits `raw` as text
///
/// Bits of `raw` above the field width are ignored.
///
/// # Errors
/// Returns `OutOfRange` if the field is enumerated and `raw` has no name,
/// or `InvalidConfig` if the descriptor itself is malformed.
pub fn decode(raw: u32, field: &FieldDescriptor) -> Result<Value, Error<Infallible>> {
    field.validate()?;
    let mask = field.mask();
    let mut raw = raw & mask;
    if field.complement {
        raw ^= mask;
    }

    let mut text = Value::new();
    match field.kind {
        FieldKind::Enumerated(values) => {
            let name = usize::try_from(raw)
                .ok()
                .and_then(|index| values.get(index))
                .ok_or(Error::OutOfRange)?;
            text.push_str(name).map_err(|_| Error::Format)?;
        }
        FieldKind::Numeric { signed, radix } => {
            let sign_bit = mask ^ (mask >> 1);
            let (sign, magnitude) = if signed && raw & sign_bit != 0 {
                ("-", (raw ^ mask) + 1)
            } else {
                ("", raw)
            };

            // Single bits read better as 0/1 than 0x0/0x1
            let written = if radix == Radix::Decimal || field.width < 2 {
                write!(text, "{sign}{magnitude}")
            } else {
                let digits = usize::from(field.width).div_ceil(4);
                write!(text, "{sign}0x{magnitude:0digits$x}")
            };
            written.map_err(|_| Error::Format)?;
        }
    }
    Ok(text)
}

/// Convert attribute text to raw field bits
///
/// The result is right-aligned (not yet shifted into register position) and
/// already complemented if the field asks for it.
///
/// # Errors
/// - `InvalidValue` if an enumerated field gets an unknown name
/// - `Parse` if a numeric field gets something other than an integer
/// - `OutOfRange` if the integer does not fit the field width and sign
/// - `InvalidConfig` if the descriptor itself is malformed
pub fn encode(text: &str, field: &FieldDescriptor) -> Result<u32, Error<Infallible>> {
    field.validate()?;
    let mask = field.mask();
    let raw = match field.kind {
        FieldKind::Enumerated(values) => {
            let mut tokens = text.split_whitespace();
            let token = tokens.next().ok_or(Error::InvalidValue)?;
            if tokens.next().is_some() {
                return Err(Error::InvalidValue);
            }
            let index = values
                .iter()
                .position(|name| *name == token)
                .ok_or(Error::InvalidValue)?;
            let index = u32::try_from(index).map_err(|_| Error::OutOfRange)?;
            if index > mask {
                return Err(Error::OutOfRange);
            }
            index
        }
        FieldKind::Numeric { signed, .. } => {
            let text = text.strip_suffix('\n').unwrap_or(text);
            let value = parse_integer(text, signed)?;
            let (min, max) = if signed {
                let half = 1i64 << (field.width - 1);
                (-half, half - 1)
            } else {
                (0, i64::from(mask))
            };
            if value < min || value > max {
                return Err(Error::OutOfRange);
            }
            // Two's complement truncation to the field width
            u32::try_from(value & i64::from(mask)).map_err(|_| Error::OutOfRange)?
        }
    };

    Ok(if field.complement { raw ^ mask } else { raw })
}

/// Parse an integer with C base auto-detection
///
/// A leading `-` is only accepted when `signed` is set.
fn parse_integer(text: &str, signed: bool) -> Result<i64, Error<Infallible>> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') if signed => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    if digits.is_empty() {
        return Err(Error::Parse);
    }

    let mut magnitude: i64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix).ok_or(Error::Parse)?;
        magnitude = magnitude
            .checked_mul(i64::from(radix))
            .and_then(|m| m.checked_add(i64::from(digit)))
            .ok_or(Error::OutOfRange)?;
    }

    Ok(if negative { -magnitude } else { magnitude })
}

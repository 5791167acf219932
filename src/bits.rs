//! Bit manipulation helpers
//!
//! These operate on register values only; none of them touch hardware.

/// Create a mask of `n` bits in the least significant bits
///
/// `n` may be anything from 0 to 32.
pub const fn mask(n: u32) -> u32 {
    ((1u64 << n) - 1) as u32
}

/// Generate a mask where all bits >= `l` and <= `h` are set
pub const fn genmask(h: u32, l: u32) -> u32 {
    mask(h + 1) & !mask(l)
}

/// Isolate and shift down the field occupying bits `lsb..=msb` of `reg`
pub const fn get_field(reg: u32, msb: u32, lsb: u32) -> u32 {
    (reg & genmask(msb, lsb)) >> lsb
}

/// Place `val` into bits `lsb..=msb` of `reg`, leaving the other bits alone
///
/// Bits of `val` that do not fit the field are dropped.
pub const fn put_field(reg: u32, msb: u32, lsb: u32, val: u32) -> u32 {
    let field = genmask(msb, lsb);
    (reg & !field) | ((val << lsb) & field)
}

/// Get the value of bit `bit` of `reg`
pub const fn get_bit(reg: u32, bit: u32) -> bool {
    (reg >> bit) & 1 != 0
}

/// Set or clear bit `bit` of `reg`
pub const fn put_bit(reg: u32, bit: u32, val: bool) -> u32 {
    (reg & !(1 << bit)) | ((val as u32) << bit)
}

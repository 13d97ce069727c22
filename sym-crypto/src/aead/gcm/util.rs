//! GF(2^128) arithmetic in the GCM bit order.
//!
//! A field element is held as a `u128` read big-endian from its 16 byte encoding, so the
//! coefficient of `x^0` is the most significant bit and multiplying by `x` is a right shift.

/// The multiplicative identity.
pub const ONE: u128 = 1 << 127;

/// The reduction constant for `x^128 + x^7 + x^2 + x + 1`.
const R: u128 = 0xe1 << 120;

/// Multiplies by `x`.
#[inline]
pub const fn mul_x(v: u128) -> u128 {
    let mask = (v & 1).wrapping_neg();
    (v >> 1) ^ (R & mask)
}

/// Divides by `x`, the inverse of [`mul_x`].
#[inline]
pub const fn div_x(v: u128) -> u128 {
    let mask = (v >> 127).wrapping_neg();
    ((v ^ (R & mask)) << 1) | (mask & 1)
}

/// Full field multiplication, one bit of `x` at a time.
pub const fn multiply(x: u128, y: u128) -> u128 {
    let mut z = 0u128;
    let mut v = y;
    let mut i = 0;

    while i < 128 {
        let mask = ((x >> (127 - i)) & 1).wrapping_neg();
        z ^= v & mask;
        v = mul_x(v);
        i += 1;
    }

    z
}

/// XORs `b` into the front of `block`.
#[inline]
pub fn xor(block: &mut [u8; 16], b: &[u8]) {
    for (l, r) in block.iter_mut().zip(b) {
        *l ^= *r;
    }
}

//! Byte-packing utilities.
//!
//! Conversions between byte slices and integral/floating point values in explicit byte order.
//! These sit on the innermost loops of every primitive in the crate, so bounds are the caller's
//! responsibility: every function panics if the slice is too short for the value being read or
//! written, and the slice forms panic unless the lengths correspond exactly.
use byteorder::{BigEndian, ByteOrder, LittleEndian};

macro_rules! pack_fns {
    (
        $order:ty,
        $(($read:ident, $write:ident, $ty:ty, $read_impl:ident, $write_impl:ident)),* $(,)?
    ) => {
        $(
            #[doc = concat!("Reads a `", stringify!($ty), "` from the front of `bs`.")]
            #[inline(always)]
            #[must_use]
            pub fn $read(bs: &[u8]) -> $ty {
                <$order>::$read_impl(bs)
            }

            #[doc = concat!("Writes `n` to the front of `bs`.")]
            #[inline(always)]
            pub fn $write(n: $ty, bs: &mut [u8]) {
                <$order>::$write_impl(bs, n);
            }
        )*
    };
}

pack_fns! {
    BigEndian,
    (be_to_u16, u16_to_be, u16, read_u16, write_u16),
    (be_to_u32, u32_to_be, u32, read_u32, write_u32),
    (be_to_u64, u64_to_be, u64, read_u64, write_u64),
    (be_to_f32, f32_to_be, f32, read_f32, write_f32),
    (be_to_f64, f64_to_be, f64, read_f64, write_f64),
}

pack_fns! {
    LittleEndian,
    (le_to_u16, u16_to_le, u16, read_u16, write_u16),
    (le_to_u32, u32_to_le, u32, read_u32, write_u32),
    (le_to_u64, u64_to_le, u64, read_u64, write_u64),
    (le_to_f32, f32_to_le, f32, read_f32, write_f32),
    (le_to_f64, f64_to_le, f64, read_f64, write_f64),
}

/// Reads `ns.len()` big-endian words from `bs`, which must be exactly `4 * ns.len()` bytes.
#[inline]
pub fn be_to_u32_slice(bs: &[u8], ns: &mut [u32]) {
    BigEndian::read_u32_into(bs, ns);
}

/// Writes `ns` as big-endian words into `bs`, which must be exactly `4 * ns.len()` bytes.
#[inline]
pub fn u32_slice_to_be(ns: &[u32], bs: &mut [u8]) {
    BigEndian::write_u32_into(ns, bs);
}

/// Reads `ns.len()` little-endian words from `bs`, which must be exactly `4 * ns.len()` bytes.
#[inline]
pub fn le_to_u32_slice(bs: &[u8], ns: &mut [u32]) {
    LittleEndian::read_u32_into(bs, ns);
}

/// Writes `ns` as little-endian words into `bs`, which must be exactly `4 * ns.len()` bytes.
#[inline]
pub fn u32_slice_to_le(ns: &[u32], bs: &mut [u8]) {
    LittleEndian::write_u32_into(ns, bs);
}

/// Writes `ns` as big-endian double words into `bs`, which must be exactly `8 * ns.len()` bytes.
#[inline]
pub fn u64_slice_to_be(ns: &[u64], bs: &mut [u8]) {
    BigEndian::write_u64_into(ns, bs);
}

/// Reads a 16 byte block as a big-endian `u128`.
#[inline]
#[must_use]
pub fn be_to_u128(bs: &[u8]) -> u128 {
    (u128::from(be_to_u64(bs)) << 64) | u128::from(be_to_u64(&bs[8..]))
}

/// Writes `n` as 16 big-endian bytes.
#[inline]
pub fn u128_to_be(n: u128, bs: &mut [u8]) {
    u64_to_be((n >> 64) as u64, bs);
    u64_to_be(n as u64, &mut bs[8..]);
}

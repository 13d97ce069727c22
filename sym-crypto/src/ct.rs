//! Constant-Time Programming Utilities
//!
//! Best-effort branch-free helpers used for tag comparison and padding validation. Lengths are
//! treated as public, contents are not.
use core::hint::black_box;
use crate::opaque_res::Res;

macro_rules! smear {
    ($b:ident) => {{
        $b |= $b >> 1;
        $b |= $b >> 2;
        $b |= $b >> 4;
        $b |= $b >> 8;
        $b |= $b >> 16;
    }};
}

/// Performs a constant-time greater-than comparison.
///
/// # Returns
///
/// Returns `1` if `left > right`, otherwise `0`.
pub const fn gt(left: u32, right: u32) -> u32 {
    let gtb = left & !right;
    let mut ltb = !left & right;

    smear!(ltb);

    let mut bit = gtb & !ltb;
    // smear the highest set bit
    smear!(bit);

    bit & 1
}

/// Returns `1` if `left <= right`, otherwise `0`.
#[inline]
pub const fn lte(left: u32, right: u32) -> u32 {
    gt(left, right) ^ 1
}

#[inline(always)]
fn volatile(byte: u8) -> u8 {
    unsafe { core::ptr::read_volatile(&byte) }
}

#[inline(always)]
fn eq_hsb(xor: u8) -> u8 {
    volatile(xor | volatile(xor.wrapping_neg())) >> 7
}

/// Constant-time byte equality.
///
/// The volatile read keeps the optimizer from lowering the comparison back into a `cmp` and
/// `sete` pair, which is what it does with the plain bit trick.
///
/// # Returns
///
/// `1` if `a == b`, `0` otherwise.
#[inline(always)]
pub fn byte_eq(a: u8, b: u8) -> u8 {
    eq_hsb(b ^ a) ^ volatile(1)
}

/// Selects `a` when `mask` is `1` and `b` when `mask` is `0`, without branching.
#[inline]
pub const fn select_u32(mask: u32, a: u32, b: u32) -> u32 {
    let m = mask.wrapping_neg();
    (a & m) | (b & !m)
}

/// Compare two slices in constant-time.
///
/// # Note
///
/// If the length of slice `a` and slice `b` are not equivalent, this will exit early. In short,
/// there is variable timing on length comparisons.
///
/// # Returns
///
/// * `0`: `a != b`
/// * `1`: `a == b`
#[must_use]
pub fn cmp_slice(a: &[u8], b: &[u8]) -> u8 {
    if a.len() != b.len() { return 0 }

    let mut res = volatile(1u8);

    for (l, r) in a.iter().zip(b.iter()) {
        res &= byte_eq(black_box(*l), *r);
    }

    res
}

/// Compare two slices in constant-time.
///
/// # Note
///
/// If the length of slice `a` and slice `b` are not equivalent, this will exit early.
///
/// # Returns
///
/// `true` if `a == b`, `false` otherwise.
#[must_use]
pub fn ct_eq<A: AsRef<[u8]>, B: AsRef<[u8]>>(a: A, b: B) -> bool {
    cmp_slice(a.as_ref(), b.as_ref()) != 0
}

/// Compare two slices in constant-time, folding the outcome into a [`Res`].
#[inline]
pub fn ct_eq_res(a: &[u8], b: &[u8]) -> Res {
    Res::from_mask(cmp_slice(a, b))
}

#[cfg(kani)]
mod verify {
    use super::*;
    use kani::proof;

    #[proof]
    fn check_ct_gt() {
        let a: u32 = kani::any();
        let b: u32 = kani::any();

        kani::assert((gt(a, b) == 1) == (a > b), "gt must agree with >");
        kani::assert((lte(a, b) == 1) == (a <= b), "lte must agree with <=");
    }

    #[proof]
    fn check_select() {
        let a: u32 = kani::any();
        let b: u32 = kani::any();

        kani::assert(select_u32(1, a, b) == a, "mask 1 selects a");
        kani::assert(select_u32(0, a, b) == b, "mask 0 selects b");
    }
}

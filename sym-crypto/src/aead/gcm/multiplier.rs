use alloc::boxed::Box;
use alloc::vec::Vec;
use zeroize::Zeroize;

use crate::pack;
use super::util;

/// Multiplication by the fixed hash subkey `H`.
pub trait GcmMultiplier {
    /// Precomputes whatever is needed for a new subkey.
    fn init(&mut self, h: &[u8; 16]);

    /// Replaces `x` with `x * H`.
    fn multiply_h(&self, x: &mut [u8; 16]);
}

/// Multiplication through a 256 entry table of `H` times every byte value, 4 KiB in all.
///
/// Each step consumes a whole byte of the operand, so a multiplication costs 16 lookups. The
/// lookups are indexed by secret data.
pub struct Tables4kGcmMultiplier {
    table: Box<[u128; 256]>,
}

impl Default for Tables4kGcmMultiplier {
    fn default() -> Self {
        Self { table: Box::new([0u128; 256]) }
    }
}

impl Drop for Tables4kGcmMultiplier {
    fn drop(&mut self) {
        self.table.zeroize();
    }
}

impl GcmMultiplier for Tables4kGcmMultiplier {
    fn init(&mut self, h: &[u8; 16]) {
        let mut t = pack::be_to_u128(h);
        for _ in 0..7 {
            t = util::mul_x(t);
        }

        // entry n holds H multiplied by the byte n, whose low bit is x^7
        self.table[0] = 0;
        self.table[1] = t;
        for n in (2..256).step_by(2) {
            self.table[n] = util::div_x(self.table[n >> 1]);
            self.table[n + 1] = self.table[n] ^ self.table[1];
        }
    }

    fn multiply_h(&self, x: &mut [u8; 16]) {
        let mut z = self.table[usize::from(x[15])];

        for i in (0..15).rev() {
            // fold the byte shifted past x^127 back in with x^128 = x^7 + x^2 + x + 1
            let c = z << 120;
            z = (z >> 8) ^ c ^ (c >> 1) ^ (c >> 2) ^ (c >> 7) ^ self.table[usize::from(x[i])];
        }

        pack::u128_to_be(z, x);
    }
}

/// Bit at a time multiplication with no precomputation.
#[derive(Default)]
pub struct BasicGcmMultiplier {
    h: u128,
}

impl Drop for BasicGcmMultiplier {
    fn drop(&mut self) {
        self.h.zeroize();
    }
}

impl GcmMultiplier for BasicGcmMultiplier {
    fn init(&mut self, h: &[u8; 16]) {
        self.h = pack::be_to_u128(h);
    }

    fn multiply_h(&self, x: &mut [u8; 16]) {
        let z = util::multiply(pack::be_to_u128(x), self.h);
        pack::u128_to_be(z, x);
    }
}

/// Raises a field element to integer powers by square and multiply, caching `x^(2^i)`.
pub struct GcmExponentiator {
    lookup: Vec<u128>,
}

impl GcmExponentiator {
    pub fn new(x: &[u8; 16]) -> Self {
        let mut lookup = Vec::with_capacity(8);
        lookup.push(pack::be_to_u128(x));
        Self { lookup }
    }

    fn ensure_available(&mut self, bit: usize) {
        while self.lookup.len() <= bit {
            let last = self.lookup[self.lookup.len() - 1];
            self.lookup.push(util::multiply(last, last));
        }
    }

    /// `x^pow`
    pub fn exponentiate_x(&mut self, mut pow: u64) -> u128 {
        let mut y = util::ONE;
        let mut bit = 0;

        while pow > 0 {
            if pow & 1 == 1 {
                self.ensure_available(bit);
                y = util::multiply(y, self.lookup[bit]);
            }
            bit += 1;
            pow >>= 1;
        }

        y
    }
}

impl Drop for GcmExponentiator {
    fn drop(&mut self) {
        self.lookup.zeroize();
    }
}

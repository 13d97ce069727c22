//! SHA-1 (FIPS 180-4).
//!
//! # Security
//!
//! SHA-1 collisions are practical. Only use it where a protocol requires it, HMAC-SHA-1 remains
//! acceptable.
use crate::pack;
use super::DigestCore;

const IV: [u32; 5] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

const Y1: u32 = 0x5a82_7999;
const Y2: u32 = 0x6ed9_eba1;
const Y3: u32 = 0x8f1b_bcdc;
const Y4: u32 = 0xca62_c1d6;

#[inline(always)]
const fn f(u: u32, v: u32, w: u32) -> u32 {
    (u & v) | (!u & w)
}

#[inline(always)]
const fn h(u: u32, v: u32, w: u32) -> u32 {
    u ^ v ^ w
}

#[inline(always)]
const fn g(u: u32, v: u32, w: u32) -> u32 {
    (u & v) | (u & w) | (v & w)
}

/// The SHA-1 core, big-endian words.
#[derive(Clone)]
pub struct Sha1State {
    h: [u32; 5],
    x: [u32; 80],
    x_off: usize,
}

impl Default for Sha1State {
    fn default() -> Self {
        Self { h: IV, x: [0; 80], x_off: 0 }
    }
}

impl DigestCore for Sha1State {
    type Output = [u8; 20];

    const NAME: &'static str = "SHA-1";
    const DIGEST_SIZE: usize = 20;

    #[inline]
    fn process_word(&mut self, word: &[u8]) {
        self.x[self.x_off] = pack::be_to_u32(word);
        self.x_off += 1;

        if self.x_off == 16 {
            self.process_block();
        }
    }

    fn process_length(&mut self, bit_length: u64) {
        if self.x_off > 14 {
            self.process_block();
        }

        self.x[14] = (bit_length >> 32) as u32;
        self.x[15] = bit_length as u32;
    }

    fn process_block(&mut self) {
        for t in 16..80 {
            self.x[t] = (self.x[t - 3] ^ self.x[t - 8] ^ self.x[t - 14] ^ self.x[t - 16])
                .rotate_left(1);
        }

        let [mut a, mut b, mut c, mut d, mut e] = self.h;

        for (t, &w) in self.x.iter().enumerate() {
            let (mixed, y) = match t / 20 {
                0 => (f(b, c, d), Y1),
                1 => (h(b, c, d), Y2),
                2 => (g(b, c, d), Y3),
                _ => (h(b, c, d), Y4),
            };

            let temp = a
                .rotate_left(5)
                .wrapping_add(mixed)
                .wrapping_add(e)
                .wrapping_add(w)
                .wrapping_add(y);

            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        for (s, v) in self.h.iter_mut().zip([a, b, c, d, e]) {
            *s = s.wrapping_add(v);
        }

        self.x_off = 0;
        self.x = [0; 80];
    }

    fn write_state(&self, out: &mut [u8]) {
        pack::u32_slice_to_be(&self.h, &mut out[..20]);
    }
}


digest_tests!(Sha1State, ::sha1::Sha1, 20);

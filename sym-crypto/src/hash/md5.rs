//! MD5 (RFC 1321).
//!
//! # Security
//!
//! MD5 is broken for collision resistance. It is provided for legacy protocols only.
use crate::pack;
use super::DigestCore;

const IV: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

/// Per step additive constants, `floor(abs(sin(i + 1)) * 2^32)`.
const T: [u32; 64] = [
    0xd76a_a478, 0xe8c7_b756, 0x2420_70db, 0xc1bd_ceee, 0xf57c_0faf, 0x4787_c62a, 0xa830_4613, 0xfd46_9501,
    0x6980_98d8, 0x8b44_f7af, 0xffff_5bb1, 0x895c_d7be, 0x6b90_1122, 0xfd98_7193, 0xa679_438e, 0x49b4_0821,
    0xf61e_2562, 0xc040_b340, 0x265e_5a51, 0xe9b6_c7aa, 0xd62f_105d, 0x0244_1453, 0xd8a1_e681, 0xe7d3_fbc8,
    0x21e1_cde6, 0xc337_07d6, 0xf4d5_0d87, 0x455a_14ed, 0xa9e3_e905, 0xfcef_a3f8, 0x676f_02d9, 0x8d2a_4c8a,
    0xfffa_3942, 0x8771_f681, 0x6d9d_6122, 0xfde5_380c, 0xa4be_ea44, 0x4bde_cfa9, 0xf6bb_4b60, 0xbebf_bc70,
    0x289b_7ec6, 0xeaa1_27fa, 0xd4ef_3085, 0x0488_1d05, 0xd9d4_d039, 0xe6db_99e5, 0x1fa2_7cf8, 0xc4ac_5665,
    0xf429_2244, 0x432a_ff97, 0xab94_23a7, 0xfc93_a039, 0x655b_59c3, 0x8f0c_cc92, 0xffef_f47d, 0x8584_5dd1,
    0x6fa8_7e4f, 0xfe2c_e6e0, 0xa301_4314, 0x4e08_11a1, 0xf753_7e82, 0xbd3a_f235, 0x2ad7_d2bb, 0xeb86_d391,
];

/// Left rotations, four per round.
const S: [[u32; 4]; 4] = [
    [7, 12, 17, 22],
    [5, 9, 14, 20],
    [4, 11, 16, 23],
    [6, 10, 15, 21],
];

#[inline(always)]
const fn f(u: u32, v: u32, w: u32) -> u32 {
    (u & v) | (!u & w)
}

#[inline(always)]
const fn g(u: u32, v: u32, w: u32) -> u32 {
    (u & w) | (v & !w)
}

#[inline(always)]
const fn h(u: u32, v: u32, w: u32) -> u32 {
    u ^ v ^ w
}

#[inline(always)]
const fn k(u: u32, v: u32, w: u32) -> u32 {
    v ^ (u | !w)
}

/// The MD5 core, little-endian words.
#[derive(Clone)]
pub struct Md5State {
    h: [u32; 4],
    x: [u32; 16],
    x_off: usize,
}

impl Default for Md5State {
    fn default() -> Self {
        Self { h: IV, x: [0; 16], x_off: 0 }
    }
}

impl DigestCore for Md5State {
    type Output = [u8; 16];

    const NAME: &'static str = "MD5";
    const DIGEST_SIZE: usize = 16;

    #[inline]
    fn process_word(&mut self, word: &[u8]) {
        self.x[self.x_off] = pack::le_to_u32(word);
        self.x_off += 1;

        if self.x_off == 16 {
            self.process_block();
        }
    }

    fn process_length(&mut self, bit_length: u64) {
        if self.x_off > 14 {
            self.process_block();
        }

        self.x[14] = bit_length as u32;
        self.x[15] = (bit_length >> 32) as u32;
    }

    fn process_block(&mut self) {
        let [mut a, mut b, mut c, mut d] = self.h;

        for i in 0..64 {
            let round = i / 16;
            let (mixed, word) = match round {
                0 => (f(b, c, d), i),
                1 => (g(b, c, d), (5 * i + 1) % 16),
                2 => (h(b, c, d), (3 * i + 5) % 16),
                _ => (k(b, c, d), (7 * i) % 16),
            };

            let step = a
                .wrapping_add(mixed)
                .wrapping_add(self.x[word])
                .wrapping_add(T[i])
                .rotate_left(S[round][i % 4]);

            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(step);
        }

        for (s, v) in self.h.iter_mut().zip([a, b, c, d]) {
            *s = s.wrapping_add(v);
        }

        self.x_off = 0;
        self.x = [0; 16];
    }

    fn write_state(&self, out: &mut [u8]) {
        pack::u32_slice_to_le(&self.h, &mut out[..16]);
    }
}


digest_tests!(Md5State, ::md5::Md5, 16);

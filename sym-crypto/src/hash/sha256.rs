//! SHA-256 and SHA-224 (FIPS 180-4).
use crate::pack;
use super::DigestCore;

const K: [u32; 64] = [
    0x428a_2f98, 0x7137_4491, 0xb5c0_fbcf, 0xe9b5_dba5, 0x3956_c25b, 0x59f1_11f1, 0x923f_82a4, 0xab1c_5ed5,
    0xd807_aa98, 0x1283_5b01, 0x2431_85be, 0x550c_7dc3, 0x72be_5d74, 0x80de_b1fe, 0x9bdc_06a7, 0xc19b_f174,
    0xe49b_69c1, 0xefbe_4786, 0x0fc1_9dc6, 0x240c_a1cc, 0x2de9_2c6f, 0x4a74_84aa, 0x5cb0_a9dc, 0x76f9_88da,
    0x983e_5152, 0xa831_c66d, 0xb003_27c8, 0xbf59_7fc7, 0xc6e0_0bf3, 0xd5a7_9147, 0x06ca_6351, 0x1429_2967,
    0x27b7_0a85, 0x2e1b_2138, 0x4d2c_6dfc, 0x5338_0d13, 0x650a_7354, 0x766a_0abb, 0x81c2_c92e, 0x9272_2c85,
    0xa2bf_e8a1, 0xa81a_664b, 0xc24b_8b70, 0xc76c_51a3, 0xd192_e819, 0xd699_0624, 0xf40e_3585, 0x106a_a070,
    0x19a4_c116, 0x1e37_6c08, 0x2748_774c, 0x34b0_bcb5, 0x391c_0cb3, 0x4ed8_aa4a, 0x5b9c_ca4f, 0x682e_6ff3,
    0x748f_82ee, 0x78a5_636f, 0x84c8_7814, 0x8cc7_0208, 0x90be_fffa, 0xa450_6ceb, 0xbef9_a3f7, 0xc671_78f2,
];

const SHA256_IV: [u32; 8] = [
    0x6a09_e667, 0xbb67_ae85, 0x3c6e_f372, 0xa54f_f53a,
    0x510e_527f, 0x9b05_688c, 0x1f83_d9ab, 0x5be0_cd19,
];

const SHA224_IV: [u32; 8] = [
    0xc105_9ed8, 0x367c_d507, 0x3070_dd17, 0xf70e_5939,
    0xffc0_0b31, 0x6858_1511, 0x64f9_8fa7, 0xbefa_4fa4,
];

/// The chaining state and message schedule shared by both output sizes.
#[derive(Clone)]
struct State {
    h: [u32; 8],
    x: [u32; 64],
    x_off: usize,
}

impl State {
    const fn new(iv: [u32; 8]) -> Self {
        Self { h: iv, x: [0; 64], x_off: 0 }
    }

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
        for t in 16..64 {
            self.x[t] = theta1(self.x[t - 2])
                .wrapping_add(self.x[t - 7])
                .wrapping_add(theta0(self.x[t - 15]))
                .wrapping_add(self.x[t - 16]);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.h;

        for t in 0..64 {
            let t1 = h
                .wrapping_add(sum1(e))
                .wrapping_add(ch(e, f, g))
                .wrapping_add(K[t])
                .wrapping_add(self.x[t]);
            let t2 = sum0(a).wrapping_add(maj(a, b, c));

            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        for (s, v) in self.h.iter_mut().zip([a, b, c, d, e, f, g, h]) {
            *s = s.wrapping_add(v);
        }

        self.x_off = 0;
        self.x = [0; 64];
    }

    fn write(&self, out: &mut [u8], words: usize) {
        pack::u32_slice_to_be(&self.h[..words], &mut out[..words * 4]);
    }
}

#[inline(always)]
const fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
const fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
const fn sum0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
const fn sum1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
const fn theta0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
const fn theta1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

macro_rules! sha2_core {
    ($(#[$meta:meta])* $name:ident, $iv:ident, $label:literal, $size:literal) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            state: State,
        }

        impl Default for $name {
            fn default() -> Self {
                Self { state: State::new($iv) }
            }
        }

        impl DigestCore for $name {
            type Output = [u8; $size];

            const NAME: &'static str = $label;
            const DIGEST_SIZE: usize = $size;

            #[inline]
            fn process_word(&mut self, word: &[u8]) {
                self.state.process_word(word);
            }

            #[inline]
            fn process_length(&mut self, bit_length: u64) {
                self.state.process_length(bit_length);
            }

            #[inline]
            fn process_block(&mut self) {
                self.state.process_block();
            }

            #[inline]
            fn write_state(&self, out: &mut [u8]) {
                self.state.write(out, $size / 4);
            }
        }
    };
}

sha2_core! {
    /// The SHA-256 core.
    Sha256State, SHA256_IV, "SHA-256", 32
}

sha2_core! {
    /// The SHA-224 core, SHA-256 compression under a distinct initial state keeping seven words.
    Sha224State, SHA224_IV, "SHA-224", 28
}



#[cfg(test)]
mod sha224_tests {
    use super::*;
    digest_tests!(Sha224State, ::sha2::Sha224, 28);
}

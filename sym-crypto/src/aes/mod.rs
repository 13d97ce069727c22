//! Advanced Encryption Standard (AES)
//!
//! A table driven implementation of the FIPS-197 block cipher for 128, 192 and 256 bit keys.
//! The state is held as four little-endian column words, each round is four table lookups per
//! column using the fused `T0`/`TINV0` tables, and the final round goes through the raw S-boxes.
//!
//! # Example
//!
//! ```
//! use sym_crypto::aes::{AesEngine, Key};
//! use sym_crypto::cipher::BlockCipher;
//! use sym_crypto::params::CipherParameters;
//!
//! let key = Key::Aes128([7u8; 16]);
//! let mut aes = AesEngine::new();
//! aes.init(true, &CipherParameters::from(&key)).unwrap();
//!
//! let mut out = [0u8; 16];
//! assert_eq!(aes.process_block(b"sixteen byte msg", &mut out), Ok(16));
//! ```
mod tables;

use alloc::string::String;
use core::fmt;
use zeroize::Zeroize;

use crate::cipher::BlockCipher;
use crate::error::Error;
use crate::pack;
use crate::params::{CipherParameters, KeyParameter};
use tables::{RCON, S, SI, T0, TINV0};

/// The AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

const MAX_ROUNDS: usize = 14;

/// An AES key of one of the three standard sizes.
#[derive(Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub enum Key {
    Aes256([u8; 32]),
    Aes192([u8; 24]),
    Aes128([u8; 16])
}

impl Key {
    /// The key size in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        match self {
            Self::Aes256(_) => 32,
            Self::Aes192(_) => 24,
            Self::Aes128(_) => 16
        }
    }

    #[inline]
    pub const fn as_slice(&self) -> &[u8] {
        match self {
            Self::Aes256(buf) => buf.as_slice(),
            Self::Aes192(buf) => buf.as_slice(),
            Self::Aes128(buf) => buf.as_slice()
        }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Self::Aes256(buf) => buf.as_mut_slice(),
            Self::Aes192(buf) => buf.as_mut_slice(),
            Self::Aes128(buf) => buf.as_mut_slice()
        }
    }

    /// Overwrites the key with zeros.
    #[inline]
    pub fn zero(&mut self) {
        self.as_mut_slice().zeroize();
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Key::Aes{}(..)", self.capacity() * 8)
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.zero();
    }
}

impl From<[u8; 32]> for Key {
    #[inline]
    fn from(value: [u8; 32]) -> Self {
        Self::Aes256(value)
    }
}

impl From<[u8; 24]> for Key {
    #[inline]
    fn from(value: [u8; 24]) -> Self {
        Self::Aes192(value)
    }
}

impl From<[u8; 16]> for Key {
    #[inline]
    fn from(value: [u8; 16]) -> Self {
        Self::Aes128(value)
    }
}

impl From<&Key> for KeyParameter {
    #[inline]
    fn from(value: &Key) -> Self {
        Self::new(value.as_slice())
    }
}

impl From<&Key> for CipherParameters {
    #[inline]
    fn from(value: &Key) -> Self {
        Self::Key(value.into())
    }
}

/// The expanded key, `rounds + 1` round keys of four words each.
struct Schedule {
    kw: [[u32; 4]; MAX_ROUNDS + 1],
    rounds: usize,
}

impl Drop for Schedule {
    fn drop(&mut self) {
        self.kw.zeroize();
    }
}

#[inline(always)]
const fn sub_word(x: u32) -> u32 {
    (S[(x & 255) as usize] as u32)
        | ((S[((x >> 8) & 255) as usize] as u32) << 8)
        | ((S[((x >> 16) & 255) as usize] as u32) << 16)
        | ((S[((x >> 24) & 255) as usize] as u32) << 24)
}

const M1: u32 = 0x8080_8080;
const M2: u32 = 0x7f7f_7f7f;
const M3: u32 = 0x0000_001b;
const M4: u32 = 0xc0c0_c0c0;
const M5: u32 = 0x3f3f_3f3f;

#[inline(always)]
const fn ff_mul_x(x: u32) -> u32 {
    ((x & M2) << 1) ^ (((x & M1) >> 7) * M3)
}

#[inline(always)]
const fn ff_mul_x2(x: u32) -> u32 {
    let t0 = (x & M5) << 2;
    let mut t1 = x & M4;
    t1 ^= t1 >> 1;
    t0 ^ (t1 >> 2) ^ (t1 >> 5)
}

/// InvMixColumns over a single packed column.
#[inline]
const fn inv_mcol(x: u32) -> u32 {
    let mut t0 = x;
    let mut t1 = t0 ^ t0.rotate_right(8);
    t0 ^= ff_mul_x(t1);
    t1 ^= ff_mul_x2(t0);
    t0 ^ t1 ^ t1.rotate_right(16)
}

fn expand_key(key: &[u8], for_encryption: bool) -> Result<Schedule, Error> {
    let kc = match key.len() {
        16 | 24 | 32 => key.len() / 4,
        _ => return Err(Error::InvalidParameter("key length must be 16, 24 or 32 bytes")),
    };
    let rounds = kc + 6;
    let words = 4 * (rounds + 1);

    let mut w = [0u32; 4 * (MAX_ROUNDS + 1)];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        w[i] = pack::le_to_u32(chunk);
    }

    for i in kc..words {
        let mut t = w[i - 1];
        if i % kc == 0 {
            t = sub_word(t.rotate_right(8)) ^ RCON[i / kc - 1];
        } else if kc > 6 && i % kc == 4 {
            t = sub_word(t);
        }
        w[i] = w[i - kc] ^ t;
    }

    let mut schedule = Schedule { kw: [[0u32; 4]; MAX_ROUNDS + 1], rounds };
    for (round, chunk) in schedule.kw.iter_mut().zip(w[..words].chunks_exact(4)) {
        round.copy_from_slice(chunk);
    }
    w.zeroize();

    // decryption runs the same round structure backwards, so the inner round keys need
    // InvMixColumns applied
    if !for_encryption {
        for round in &mut schedule.kw[1..rounds] {
            for word in round.iter_mut() {
                *word = inv_mcol(*word);
            }
        }
    }

    Ok(schedule)
}

#[inline(always)]
fn t0(a: u32, b: u32, c: u32, d: u32) -> u32 {
    T0[(a & 255) as usize]
        ^ T0[((b >> 8) & 255) as usize].rotate_right(24)
        ^ T0[((c >> 16) & 255) as usize].rotate_right(16)
        ^ T0[((d >> 24) & 255) as usize].rotate_right(8)
}

#[inline(always)]
fn tinv0(a: u32, b: u32, c: u32, d: u32) -> u32 {
    TINV0[(a & 255) as usize]
        ^ TINV0[((b >> 8) & 255) as usize].rotate_right(24)
        ^ TINV0[((c >> 16) & 255) as usize].rotate_right(16)
        ^ TINV0[((d >> 24) & 255) as usize].rotate_right(8)
}

#[inline(always)]
fn sbox_column(table: &[u8; 256], a: u32, b: u32, c: u32, d: u32) -> u32 {
    u32::from(table[(a & 255) as usize])
        | (u32::from(table[((b >> 8) & 255) as usize]) << 8)
        | (u32::from(table[((c >> 16) & 255) as usize]) << 16)
        | (u32::from(table[((d >> 24) & 255) as usize]) << 24)
}

fn encrypt_block(schedule: &Schedule, state: [u32; 4]) -> [u32; 4] {
    let kw = &schedule.kw;
    let [mut c0, mut c1, mut c2, mut c3] = [
        state[0] ^ kw[0][0],
        state[1] ^ kw[0][1],
        state[2] ^ kw[0][2],
        state[3] ^ kw[0][3],
    ];

    for k in &kw[1..schedule.rounds] {
        let r0 = t0(c0, c1, c2, c3) ^ k[0];
        let r1 = t0(c1, c2, c3, c0) ^ k[1];
        let r2 = t0(c2, c3, c0, c1) ^ k[2];
        let r3 = t0(c3, c0, c1, c2) ^ k[3];
        (c0, c1, c2, c3) = (r0, r1, r2, r3);
    }

    let k = &kw[schedule.rounds];
    [
        sbox_column(&S, c0, c1, c2, c3) ^ k[0],
        sbox_column(&S, c1, c2, c3, c0) ^ k[1],
        sbox_column(&S, c2, c3, c0, c1) ^ k[2],
        sbox_column(&S, c3, c0, c1, c2) ^ k[3],
    ]
}

fn decrypt_block(schedule: &Schedule, state: [u32; 4]) -> [u32; 4] {
    let kw = &schedule.kw;
    let last = &kw[schedule.rounds];
    let [mut c0, mut c1, mut c2, mut c3] = [
        state[0] ^ last[0],
        state[1] ^ last[1],
        state[2] ^ last[2],
        state[3] ^ last[3],
    ];

    for k in kw[1..schedule.rounds].iter().rev() {
        let r0 = tinv0(c0, c3, c2, c1) ^ k[0];
        let r1 = tinv0(c1, c0, c3, c2) ^ k[1];
        let r2 = tinv0(c2, c1, c0, c3) ^ k[2];
        let r3 = tinv0(c3, c2, c1, c0) ^ k[3];
        (c0, c1, c2, c3) = (r0, r1, r2, r3);
    }

    let k = &kw[0];
    [
        sbox_column(&SI, c0, c3, c2, c1) ^ k[0],
        sbox_column(&SI, c1, c0, c3, c2) ^ k[1],
        sbox_column(&SI, c2, c1, c0, c3) ^ k[2],
        sbox_column(&SI, c3, c2, c1, c0) ^ k[3],
    ]
}

/// The AES block cipher.
///
/// Keyed with a [`KeyParameter`] of 16, 24 or 32 bytes. The expanded key is retained across
/// [`reset`](BlockCipher::reset) and wiped when the engine is re-keyed or dropped.
#[derive(Default)]
pub struct AesEngine {
    schedule: Option<Schedule>,
    for_encryption: bool,
}

impl fmt::Debug for AesEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AesEngine")
            .field("initialised", &self.schedule.is_some())
            .field("for_encryption", &self.for_encryption)
            .finish()
    }
}

impl AesEngine {
    /// Creates an engine which must be keyed with [`init`](BlockCipher::init) before use.
    pub const fn new() -> Self {
        Self { schedule: None, for_encryption: false }
    }

    /// The number of rounds of the current key, `None` before `init`.
    pub fn rounds(&self) -> Option<usize> {
        self.schedule.as_ref().map(|s| s.rounds)
    }
}

impl BlockCipher for AesEngine {
    fn algorithm_name(&self) -> String {
        String::from("AES")
    }

    fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error> {
        let key = params.as_key("invalid parameter passed to AES init")?;

        self.schedule = Some(expand_key(key.key(), for_encryption)?);
        self.for_encryption = for_encryption;

        log::debug!(
            "AES engine initialised: {} bit key, {}",
            key.len() * 8,
            if for_encryption { "encrypt" } else { "decrypt" }
        );
        Ok(())
    }

    #[inline]
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        let schedule = self.schedule.as_ref()
            .ok_or(Error::NotInitialized("AES engine not initialised"))?;

        if input.len() < BLOCK_SIZE {
            return Err(Error::DataTooShort("input buffer too short"));
        }
        if output.len() < BLOCK_SIZE {
            return Err(Error::OutputTooShort);
        }

        let mut state = [0u32; 4];
        pack::le_to_u32_slice(&input[..BLOCK_SIZE], &mut state);

        let state = if self.for_encryption {
            encrypt_block(schedule, state)
        } else {
            decrypt_block(schedule, state)
        };

        pack::u32_slice_to_le(&state, &mut output[..BLOCK_SIZE]);
        Ok(BLOCK_SIZE)
    }

    #[inline]
    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use crate::params::ParametersWithIv;

    fn engine(for_encryption: bool, key: &[u8]) -> AesEngine {
        let mut aes = AesEngine::new();
        aes.init(for_encryption, &KeyParameter::new(key).into()).unwrap();
        aes
    }

    const PLAIN: [u8; 16] = hex!("00112233445566778899aabbccddeeff");

    // FIPS-197 appendix C
    #[test]
    fn fips_197_vectors() {
        let cases: [(&[u8], [u8; 16]); 3] = [
            (&hex!("000102030405060708090a0b0c0d0e0f"), hex!("69c4e0d86a7b0430d8cdb78070b4c55a")),
            (
                &hex!("000102030405060708090a0b0c0d0e0f1011121314151617"),
                hex!("dda97ca4864cdfe06eaf70a0ec0d7191")
            ),
            (
                &hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"),
                hex!("8ea2b7ca516745bfeafc49904b496089")
            ),
        ];

        for (key, expected) in cases {
            let mut out = [0u8; 16];
            assert_eq!(engine(true, key).process_block(&PLAIN, &mut out), Ok(16));
            assert_eq!(out, expected);

            let mut plain = [0u8; 16];
            assert_eq!(engine(false, key).process_block(&out, &mut plain), Ok(16));
            assert_eq!(plain, PLAIN);
        }
    }

    #[test]
    fn rounds_follow_key_size() {
        assert_eq!(AesEngine::new().rounds(), None);
        assert_eq!(engine(true, &[0; 16]).rounds(), Some(10));
        assert_eq!(engine(true, &[0; 24]).rounds(), Some(12));
        assert_eq!(engine(false, &[0; 32]).rounds(), Some(14));
    }

    #[test]
    fn rejects_bad_key_length() {
        let mut aes = AesEngine::new();
        for len in [0, 8, 15, 17, 31, 33] {
            assert!(matches!(
                aes.init(true, &KeyParameter::new(&vec![0u8; len]).into()),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn rejects_iv_parameters() {
        let mut aes = AesEngine::new();
        let params = ParametersWithIv::new(KeyParameter::new(&[0; 16]), &[0; 16]);
        assert!(matches!(aes.init(true, &params.into()), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn process_before_init() {
        let mut out = [0u8; 16];
        assert!(matches!(
            AesEngine::new().process_block(&PLAIN, &mut out),
            Err(Error::NotInitialized(_))
        ));
    }

    #[test]
    fn buffer_predicates() {
        let mut aes = engine(true, &[1; 16]);
        let mut out = [0u8; 16];
        let mut small = [0u8; 15];

        assert!(matches!(aes.process_block(&PLAIN[..15], &mut out), Err(Error::DataTooShort(_))));
        assert_eq!(aes.process_block(&PLAIN, &mut small), Err(Error::OutputTooShort));
    }

    #[test]
    fn process_blocks_matches_single() {
        let mut aes = engine(true, &[9; 32]);
        let input = [0x5au8; 64];
        let mut bulk = [0u8; 64];
        assert_eq!(aes.process_blocks(&input, 4, &mut bulk), Ok(64));

        let mut single = [0u8; 16];
        aes.process_block(&input[48..], &mut single).unwrap();
        assert_eq!(&bulk[48..], &single);
    }

    #[test]
    fn inv_mcol_undoes_mix_column() {
        // a column which MixColumns maps to itself
        assert_eq!(inv_mcol(0x0101_0101), 0x0101_0101);
        // FIPS-197 MixColumns example column db 13 53 45 -> 8e 4d a1 bc
        assert_eq!(inv_mcol(0xbca1_4d8e), 0x4553_13db);
    }

    #[test]
    fn key_debug_is_redacted() {
        let key = Key::from([0x41u8; 24]);
        assert_eq!(alloc::format!("{key:?}"), "Key::Aes192(..)");
    }

    #[test]
    fn rust_crypto_equivalence() {
        use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};

        let key = [0x2bu8; 16];
        let rc = aes::Aes128::new_from_slice(&key).unwrap();
        let mut block = GenericArray::clone_from_slice(&PLAIN);
        rc.encrypt_block(&mut block);

        let mut out = [0u8; 16];
        engine(true, &key).process_block(&PLAIN, &mut out).unwrap();
        assert_eq!(block.as_slice(), &out);
    }
}

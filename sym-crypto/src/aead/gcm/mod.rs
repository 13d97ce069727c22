//! Galois/Counter Mode.
//!
//! # Example
//!
//! ```
//! use sym_crypto::aead::{AeadCipher, AesGcm};
//! use sym_crypto::params::{AeadParameters, KeyParameter};
//!
//! let params = AeadParameters::new(KeyParameter::new(&[1; 16]), 128, &[2; 12])
//!     .with_associated_text(b"header")
//!     .into();
//!
//! let mut enc = AesGcm::default();
//! enc.init(true, &params)?;
//!
//! let mut sealed = vec![0u8; enc.output_size(5)];
//! let n = enc.process_bytes(b"hello", &mut sealed)?;
//! enc.do_final(&mut sealed[n..])?;
//!
//! let mut dec = AesGcm::default();
//! dec.init(false, &params)?;
//!
//! let mut opened = vec![0u8; dec.output_size(sealed.len())];
//! let n = dec.process_bytes(&sealed, &mut opened)?;
//! dec.do_final(&mut opened[n..])?;
//! assert_eq!(opened, b"hello");
//! # Ok::<(), sym_crypto::Error>(())
//! ```
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp;
use zeroize::Zeroize;

use crate::aes::AesEngine;
use crate::cipher::BlockCipher;
use crate::ct;
use crate::error::Error;
use crate::pack;
use crate::params::{CipherParameters, KeyParameter};
use super::{AeadCipher, Tag};

mod multiplier;
mod util;

pub use multiplier::{BasicGcmMultiplier, GcmExponentiator, GcmMultiplier, Tables4kGcmMultiplier};

const BLOCK_SIZE: usize = 16;

/// Counter blocks available to one message. `J0` itself is reserved for the tag.
const MAX_BLOCKS: u32 = u32::MAX - 1;

const REUSED_NONCE: Error = Error::MisuseDetected("cannot reuse nonce for GCM encryption");

/// `S = (S ^ b) * H`, with `b` zero padded to a block.
#[inline]
fn ghash_partial<M: GcmMultiplier>(multiplier: &M, y: &mut [u8; 16], b: &[u8]) {
    util::xor(y, b);
    multiplier.multiply_h(y);
}

/// GCM over any 128 bit block cipher.
///
/// Associated data may be supplied at any point before [`do_final`], including after message
/// bytes. Late associated data is hashed separately and folded in at the end, multiplied by
/// `H^c` where `c` is the number of message blocks.
///
/// An instance that completed an encryption refuses further encryption until it is
/// re-initialised with a fresh nonce. Re-initialising for encryption with the nonce and key of
/// the previous `init` fails with [`Error::MisuseDetected`].
///
/// [`do_final`]: AeadCipher::do_final
pub struct GcmBlockCipher<C: BlockCipher = AesEngine, M: GcmMultiplier = Tables4kGcmMultiplier> {
    cipher: C,
    multiplier: M,
    exp: Option<GcmExponentiator>,

    for_encryption: bool,
    initialised: bool,
    mac_size: usize,
    last_key: Option<KeyParameter>,
    nonce: Vec<u8>,
    initial_associated_text: Option<Vec<u8>>,
    h: [u8; 16],
    j0: [u8; 16],

    buf_block: Vec<u8>,
    buf_off: usize,
    mac_block: Tag,

    s: [u8; 16],
    s_at: [u8; 16],
    s_at_pre: [u8; 16],
    counter: [u8; 16],
    blocks_remaining: u32,
    total_length: u64,

    at_block: [u8; 16],
    at_block_pos: usize,
    at_length: u64,
    at_length_pre: u64,
}

impl Default for GcmBlockCipher<AesEngine, Tables4kGcmMultiplier> {
    fn default() -> Self {
        Self::with_multiplier(AesEngine::new(), Tables4kGcmMultiplier::default())
    }
}

impl<C: BlockCipher, M: GcmMultiplier + Default> GcmBlockCipher<C, M> {
    /// Wraps `cipher` with the default multiplier.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the cipher's block size is not 16.
    pub fn new(cipher: C) -> Result<Self, Error> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(Error::InvalidParameter("cipher required with a block size of 16"));
        }
        Ok(Self::with_multiplier(cipher, M::default()))
    }
}

impl<C: BlockCipher, M: GcmMultiplier> GcmBlockCipher<C, M> {
    fn with_multiplier(cipher: C, multiplier: M) -> Self {
        Self {
            cipher,
            multiplier,
            exp: None,
            for_encryption: false,
            initialised: false,
            mac_size: 16,
            last_key: None,
            nonce: Vec::new(),
            initial_associated_text: None,
            h: [0u8; 16],
            j0: [0u8; 16],
            buf_block: vec![0u8; BLOCK_SIZE],
            buf_off: 0,
            mac_block: Tag::zeroed(16),
            s: [0u8; 16],
            s_at: [0u8; 16],
            s_at_pre: [0u8; 16],
            counter: [0u8; 16],
            blocks_remaining: MAX_BLOCKS,
            total_length: 0,
            at_block: [0u8; 16],
            at_block_pos: 0,
            at_length: 0,
            at_length_pre: 0,
        }
    }

    /// The wrapped block cipher.
    pub const fn underlying_cipher(&self) -> &C {
        &self.cipher
    }

    fn check_status(&self) -> Result<(), Error> {
        if self.initialised {
            Ok(())
        } else if self.for_encryption {
            Err(Error::MisuseDetected("GCM cipher cannot be reused for encryption"))
        } else {
            Err(Error::NotInitialized("GCM cipher needs to be initialised"))
        }
    }

    fn absorb_aad(&mut self, input: &[u8]) {
        let mut input = input;

        while !input.is_empty() {
            let n = cmp::min(BLOCK_SIZE - self.at_block_pos, input.len());
            self.at_block[self.at_block_pos..self.at_block_pos + n].copy_from_slice(&input[..n]);
            self.at_block_pos += n;
            input = &input[n..];

            if self.at_block_pos == BLOCK_SIZE {
                ghash_partial(&self.multiplier, &mut self.s_at, &self.at_block);
                self.at_block_pos = 0;
                self.at_length += BLOCK_SIZE as u64;
            }
        }
    }

    /// Seeds `S` with the associated data seen before the first message byte.
    fn init_cipher(&mut self) {
        if self.at_length > 0 {
            self.s_at_pre = self.s_at;
            self.at_length_pre = self.at_length;
        }

        if self.at_block_pos > 0 {
            ghash_partial(&self.multiplier, &mut self.s_at_pre, &self.at_block[..self.at_block_pos]);
            self.at_length_pre += self.at_block_pos as u64;
        }

        if self.at_length_pre > 0 {
            self.s = self.s_at_pre;
        }
    }

    fn next_ctr_block(&mut self, block: &mut [u8; 16]) -> Result<(), Error> {
        if self.blocks_remaining == 0 {
            log::warn!("GCM block budget for this nonce exhausted");
            return Err(Error::MisuseDetected("attempt to process too many blocks in GCM"));
        }
        self.blocks_remaining -= 1;

        let c = pack::be_to_u32(&self.counter[12..]).wrapping_add(1);
        pack::u32_to_be(c, &mut self.counter[12..]);

        self.cipher.process_block(&self.counter, block).map(|_| ())
    }

    fn encrypt_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if self.total_length == 0 {
            self.init_cipher();
        }

        let mut ctr_block = [0u8; 16];
        self.next_ctr_block(&mut ctr_block)?;
        util::xor(&mut ctr_block, &input[..BLOCK_SIZE]);
        ghash_partial(&self.multiplier, &mut self.s, &ctr_block);
        output[..BLOCK_SIZE].copy_from_slice(&ctr_block);

        self.total_length += BLOCK_SIZE as u64;
        Ok(())
    }

    fn decrypt_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if self.total_length == 0 {
            self.init_cipher();
        }

        let mut ctr_block = [0u8; 16];
        self.next_ctr_block(&mut ctr_block)?;
        ghash_partial(&self.multiplier, &mut self.s, &input[..BLOCK_SIZE]);
        util::xor(&mut ctr_block, &input[..BLOCK_SIZE]);
        output[..BLOCK_SIZE].copy_from_slice(&ctr_block);

        self.total_length += BLOCK_SIZE as u64;
        Ok(())
    }

    /// Processes the complete block at the front of `buf_block`.
    fn process_buffered(&mut self, output: &mut [u8]) -> Result<(), Error> {
        let mut block = [0u8; 16];
        block.copy_from_slice(&self.buf_block[..BLOCK_SIZE]);

        let res = if self.for_encryption {
            self.encrypt_block(&block, output)
        } else {
            self.decrypt_block(&block, output)
        };

        block.zeroize();
        res
    }

    /// Processes a final block of fewer than 16 bytes.
    fn process_partial(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        let len = input.len();
        let mut ctr_block = [0u8; 16];
        self.next_ctr_block(&mut ctr_block)?;

        if self.for_encryption {
            util::xor(&mut ctr_block, input);
            ghash_partial(&self.multiplier, &mut self.s, &ctr_block[..len]);
        } else {
            ghash_partial(&self.multiplier, &mut self.s, input);
            util::xor(&mut ctr_block, input);
        }

        output[..len].copy_from_slice(&ctr_block[..len]);
        self.total_length += len as u64;
        Ok(())
    }

    /// Folds associated data supplied after the first message byte into `S`.
    fn fold_late_aad(&mut self) {
        if self.at_block_pos > 0 {
            ghash_partial(&self.multiplier, &mut self.s_at, &self.at_block[..self.at_block_pos]);
        }
        if self.at_length_pre > 0 {
            util::xor(&mut self.s_at, &self.s_at_pre);
        }

        // H^c, c the number of message blocks
        let c = (self.total_length * 8 + 127) >> 7;
        let h = self.h;
        let h_c = self.exp.get_or_insert_with(|| GcmExponentiator::new(&h)).exponentiate_x(c);

        let s_at = util::multiply(pack::be_to_u128(&self.s_at), h_c);
        pack::u128_to_be(s_at, &mut self.s_at);
        util::xor(&mut self.s, &self.s_at);
    }

    /// Clears the running message state, keeping key, nonce and direction.
    fn clear_message(&mut self) {
        self.s.zeroize();
        self.s_at.zeroize();
        self.s_at_pre.zeroize();
        self.at_block.zeroize();
        self.at_block_pos = 0;
        self.at_length = 0;
        self.at_length_pre = 0;
        self.counter = self.j0;
        self.blocks_remaining = MAX_BLOCKS;
        self.buf_block.as_mut_slice().zeroize();
        self.buf_off = 0;
        self.total_length = 0;
    }

    fn reset_with(&mut self, clear_mac: bool) {
        self.cipher.reset();
        self.clear_message();

        if clear_mac {
            self.mac_block = Tag::zeroed(self.mac_size);
        }

        if self.for_encryption {
            self.initialised = false;
        } else if let Some(text) = self.initial_associated_text.take() {
            self.absorb_aad(&text);
            self.initial_associated_text = Some(text);
        }
    }
}

impl<C: BlockCipher, M: GcmMultiplier> AeadCipher for GcmBlockCipher<C, M> {
    fn algorithm_name(&self) -> String {
        format!("{}/GCM", self.cipher.algorithm_name())
    }

    fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error> {
        let (params, _) = params.split_random();
        let (key, mac_size, nonce, associated_text) = match params {
            CipherParameters::Aead(p) => {
                let bits = p.mac_size_bits();
                if !(32..=128).contains(&bits) || bits % 32 != 0 {
                    return Err(Error::InvalidParameter("invalid value for MAC size"));
                }
                (p.key(), bits / 8, p.nonce(), p.associated_text())
            }
            CipherParameters::WithIv(p) => {
                let key = match p.parameters() {
                    Some(inner) => Some(inner.as_key("invalid parameters passed to GCM")?),
                    None => None,
                };
                (key, 16, p.iv(), None)
            }
            _ => return Err(Error::InvalidParameter("invalid parameters passed to GCM")),
        };

        if nonce.is_empty() {
            return Err(Error::InvalidParameter("IV must be at least 1 byte"));
        }

        if for_encryption && self.nonce == nonce {
            let same_key = match (key, &self.last_key) {
                (None, _) => true,
                (Some(new), Some(last)) => ct::ct_eq(new.key(), last.key()),
                (Some(_), None) => false,
            };
            if same_key {
                log::warn!("GCM nonce reuse for encryption rejected");
                return Err(REUSED_NONCE);
            }
        }

        if key.is_none() && self.last_key.is_none() {
            return Err(Error::InvalidParameter("key must be specified in initial init"));
        }

        self.initialised = false;

        if let Some(key) = key {
            self.cipher.init(true, &CipherParameters::Key(key.clone()))?;
            self.h.zeroize();
            self.cipher.process_block(&[0u8; 16], &mut self.h)?;
            self.multiplier.init(&self.h);
            self.exp = None;
            self.last_key = Some(key.clone());
        }

        self.for_encryption = for_encryption;
        self.mac_size = mac_size;
        self.nonce.zeroize();
        self.nonce.extend_from_slice(nonce);
        self.initial_associated_text = associated_text.map(<[u8]>::to_vec);

        let buf_len = if for_encryption { BLOCK_SIZE } else { BLOCK_SIZE + mac_size };
        self.buf_block.zeroize();
        self.buf_block.resize(buf_len, 0);

        self.j0 = [0u8; 16];
        if nonce.len() == 12 {
            self.j0[..12].copy_from_slice(nonce);
            self.j0[15] = 1;
        } else {
            for chunk in nonce.chunks(BLOCK_SIZE) {
                ghash_partial(&self.multiplier, &mut self.j0, chunk);
            }
            let mut x = [0u8; 16];
            pack::u64_to_be(nonce.len() as u64 * 8, &mut x[8..]);
            ghash_partial(&self.multiplier, &mut self.j0, &x);
        }

        self.cipher.reset();
        self.clear_message();
        self.mac_block = Tag::zeroed(mac_size);
        self.initialised = true;

        if let Some(text) = self.initial_associated_text.take() {
            self.absorb_aad(&text);
            self.initial_associated_text = Some(text);
        }

        log::debug!(
            "GCM initialised: encrypt={}, nonce_len={}, tag_len={}",
            for_encryption, nonce.len(), mac_size
        );
        Ok(())
    }

    fn mac_size(&self) -> usize {
        self.mac_size
    }

    fn process_aad_byte(&mut self, input: u8) -> Result<(), Error> {
        self.check_status()?;
        self.absorb_aad(&[input]);
        Ok(())
    }

    fn process_aad_bytes(&mut self, input: &[u8]) -> Result<(), Error> {
        self.check_status()?;
        self.absorb_aad(input);
        Ok(())
    }

    fn process_byte(&mut self, input: u8, output: &mut [u8]) -> Result<usize, Error> {
        self.process_bytes(&[input], output)
    }

    fn process_bytes(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        self.check_status()?;
        if output.len() < self.update_output_size(input.len()) {
            return Err(Error::OutputTooShort);
        }

        let mut input = input;
        let mut written = 0;

        if self.for_encryption {
            if self.buf_off != 0 {
                let n = cmp::min(BLOCK_SIZE - self.buf_off, input.len());
                self.buf_block[self.buf_off..self.buf_off + n].copy_from_slice(&input[..n]);
                self.buf_off += n;
                input = &input[n..];

                if self.buf_off == BLOCK_SIZE {
                    self.process_buffered(output)?;
                    self.buf_off = 0;
                    written += BLOCK_SIZE;
                }
            }

            while input.len() >= BLOCK_SIZE {
                self.encrypt_block(&input[..BLOCK_SIZE], &mut output[written..])?;
                written += BLOCK_SIZE;
                input = &input[BLOCK_SIZE..];
            }

            self.buf_block[self.buf_off..self.buf_off + input.len()].copy_from_slice(input);
            self.buf_off += input.len();
        } else {
            // the trailing mac_size bytes may be the tag, so they stay buffered
            let buf_len = self.buf_block.len();

            while !input.is_empty() {
                let n = cmp::min(buf_len - self.buf_off, input.len());
                self.buf_block[self.buf_off..self.buf_off + n].copy_from_slice(&input[..n]);
                self.buf_off += n;
                input = &input[n..];

                if self.buf_off == buf_len {
                    self.process_buffered(&mut output[written..])?;
                    self.buf_block.copy_within(BLOCK_SIZE.., 0);
                    self.buf_off = self.mac_size;
                    written += BLOCK_SIZE;
                }
            }
        }

        Ok(written)
    }

    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        self.check_status()?;

        let mut extra = self.buf_off;
        if self.for_encryption {
            if output.len() < extra + self.mac_size {
                return Err(Error::OutputTooShort);
            }
        } else {
            if extra < self.mac_size {
                return Err(Error::DataTooShort("data too short"));
            }
            extra -= self.mac_size;
            if output.len() < extra {
                return Err(Error::OutputTooShort);
            }
        }

        if self.total_length == 0 {
            self.init_cipher();
        }

        if extra > 0 {
            let mut block = [0u8; 16];
            block[..extra].copy_from_slice(&self.buf_block[..extra]);
            let res = self.process_partial(&block[..extra], output);
            block.zeroize();
            res?;
        }

        self.at_length += self.at_block_pos as u64;
        if self.at_length > self.at_length_pre {
            self.fold_late_aad();
        }

        let mut x = [0u8; 16];
        pack::u64_to_be(self.at_length * 8, &mut x[..8]);
        pack::u64_to_be(self.total_length * 8, &mut x[8..]);
        ghash_partial(&self.multiplier, &mut self.s, &x);

        let mut tag = [0u8; 16];
        self.cipher.process_block(&self.j0, &mut tag)?;
        util::xor(&mut tag, &self.s);
        self.mac_block = Tag::new(&tag[..self.mac_size]);

        let mut written = extra;
        if self.for_encryption {
            output[extra..extra + self.mac_size].copy_from_slice(self.mac_block.as_slice());
            written += self.mac_size;
        } else {
            let received = &self.buf_block[extra..extra + self.mac_size];
            if ct::ct_eq_res(self.mac_block.as_slice(), received).is_err() {
                output[..extra].zeroize();
                self.reset_with(false);
                log::warn!("GCM authentication failed");
                return Err(Error::AuthenticationFailed("mac check in GCM failed"));
            }
        }

        self.reset_with(false);
        Ok(written)
    }

    fn mac(&self) -> Tag {
        self.mac_block
    }

    fn update_output_size(&self, len: usize) -> usize {
        let mut total = len + self.buf_off;
        if !self.for_encryption {
            if total < self.mac_size {
                return 0;
            }
            total -= self.mac_size;
        }
        total - total % BLOCK_SIZE
    }

    fn output_size(&self, len: usize) -> usize {
        let total = len + self.buf_off;
        if self.for_encryption {
            total + self.mac_size
        } else {
            total.saturating_sub(self.mac_size)
        }
    }

    fn reset(&mut self) {
        self.reset_with(true);
    }
}

impl<C: BlockCipher, M: GcmMultiplier> Drop for GcmBlockCipher<C, M> {
    fn drop(&mut self) {
        self.h.zeroize();
        self.j0.zeroize();
        self.clear_message();
    }
}

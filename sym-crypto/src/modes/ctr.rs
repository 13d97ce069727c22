use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroize;

use crate::cipher::{BlockCipher, SkippingCipher, StreamCipher};
use crate::error::Error;
use crate::params::CipherParameters;

const EXHAUSTED: Error = Error::MisuseDetected("counter in CTR/SIC mode out of range");

/// Segmented integer counter mode.
///
/// The counter block is the IV followed by zero bytes and is incremented as one big-endian
/// integer after every keystream block. Once the increment carries into the IV prefix the
/// keystream is exhausted and further output is refused. An IV which fills the whole block is
/// allowed to wrap.
///
/// The underlying cipher is always keyed for encryption, the mode is its own inverse.
pub struct SicBlockCipher<C: BlockCipher> {
    cipher: C,
    block_size: usize,
    iv: Vec<u8>,
    counter: Vec<u8>,
    counter_out: Vec<u8>,
    byte_count: usize,
}

impl<C: BlockCipher> SicBlockCipher<C> {
    pub fn new(cipher: C) -> Self {
        let block_size = cipher.block_size();
        Self {
            cipher,
            block_size,
            iv: Vec::new(),
            counter: vec![0; block_size],
            counter_out: vec![0; block_size],
            byte_count: 0,
        }
    }

    /// The wrapped block cipher.
    pub const fn underlying_cipher(&self) -> &C {
        &self.cipher
    }

    #[inline]
    fn counter_in_range(iv: &[u8], counter: &[u8]) -> bool {
        iv.len() == counter.len() || counter[..iv.len()] == *iv
    }

    fn next_keystream(&mut self) -> Result<(), Error> {
        if !Self::counter_in_range(&self.iv, &self.counter) {
            log::warn!("CTR/SIC keystream exhausted");
            return Err(EXHAUSTED);
        }
        self.cipher.process_block(&self.counter, &mut self.counter_out).map(|_| ())
    }

    fn calculate_byte(&mut self, input: u8) -> Result<u8, Error> {
        if self.byte_count == 0 {
            self.next_keystream()?;
        }

        let out = self.counter_out[self.byte_count] ^ input;
        self.byte_count += 1;

        if self.byte_count == self.block_size {
            self.byte_count = 0;
            add_to_counter(&mut self.counter, 1);
        }

        Ok(out)
    }
}

/// Adds `n` to a big-endian counter, wrapping at its width.
fn add_to_counter(counter: &mut [u8], n: u64) {
    let mut carry = n;
    for b in counter.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = u64::from(*b) + (carry & 0xff);
        *b = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
}

/// Subtracts `n` from a big-endian counter, wrapping at its width.
fn sub_from_counter(counter: &mut [u8], n: u64) {
    let mut borrow = n;
    for b in counter.iter_mut().rev() {
        if borrow == 0 {
            break;
        }
        let (v, under) = b.overflowing_sub((borrow & 0xff) as u8);
        *b = v;
        borrow = (borrow >> 8) + u64::from(under);
    }
}

impl<C: BlockCipher> BlockCipher for SicBlockCipher<C> {
    fn algorithm_name(&self) -> String {
        format!("{}/SIC", self.cipher.algorithm_name())
    }

    fn init(&mut self, _for_encryption: bool, params: &CipherParameters) -> Result<(), Error> {
        let (params, _) = params.split_random();
        let CipherParameters::WithIv(p) = params else {
            return Err(Error::InvalidParameter("CTR/SIC mode requires ParametersWithIv"));
        };

        let iv = p.iv();
        if iv.len() > self.block_size {
            return Err(Error::InvalidParameter("CTR/SIC mode requires IV no greater than block size"));
        }

        let max_counter_size = core::cmp::min(8, self.block_size / 2);
        if self.block_size - iv.len() > max_counter_size {
            return Err(Error::InvalidParameter("CTR/SIC mode IV leaves too large a counter"));
        }

        if let Some(inner) = p.parameters() {
            self.cipher.init(true, inner)?;
        }

        self.iv.zeroize();
        self.iv.extend_from_slice(iv);
        self.reset();
        Ok(())
    }

    #[inline]
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        let bs = self.block_size;
        if input.len() < bs {
            return Err(Error::DataTooShort("input buffer too short"));
        }
        if output.len() < bs {
            return Err(Error::OutputTooShort);
        }

        if self.byte_count != 0 {
            return self.process_bytes(&input[..bs], &mut output[..bs]);
        }

        self.next_keystream()?;
        for ((o, i), k) in output.iter_mut().zip(&input[..bs]).zip(&self.counter_out) {
            *o = *i ^ *k;
        }
        add_to_counter(&mut self.counter, 1);

        Ok(bs)
    }

    fn reset(&mut self) {
        self.counter.fill(0);
        self.counter[..self.iv.len()].copy_from_slice(&self.iv);
        self.counter_out.as_mut_slice().zeroize();
        self.byte_count = 0;
        self.cipher.reset();
    }

    fn allows_partial_block(&self) -> bool {
        true
    }
}

impl<C: BlockCipher> StreamCipher for SicBlockCipher<C> {
    #[inline]
    fn return_byte(&mut self, input: u8) -> Result<u8, Error> {
        self.calculate_byte(input)
    }

    fn process_bytes(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        if output.len() < input.len() {
            return Err(Error::OutputTooShort);
        }

        let bs = self.block_size;
        let mut pos = 0;

        while pos < input.len() {
            if self.byte_count == 0 && input.len() - pos >= bs {
                pos += self.process_block(&input[pos..], &mut output[pos..])?;
            } else {
                output[pos] = self.calculate_byte(input[pos])?;
                pos += 1;
            }
        }

        Ok(input.len())
    }
}

impl<C: BlockCipher> SkippingCipher for SicBlockCipher<C> {
    fn skip(&mut self, n: i64) -> Result<i64, Error> {
        let bs = self.block_size as i64;
        let target = (self.byte_count as i64).checked_add(n).ok_or(EXHAUSTED)?;
        let blocks = target.div_euclid(bs);

        let mut counter = self.counter.clone();
        if blocks >= 0 {
            add_to_counter(&mut counter, blocks.unsigned_abs());
        } else {
            sub_from_counter(&mut counter, blocks.unsigned_abs());
        }

        if !Self::counter_in_range(&self.iv, &counter) {
            log::warn!("CTR/SIC skip outside of the counter space");
            return Err(EXHAUSTED);
        }

        self.counter.copy_from_slice(&counter);
        self.byte_count = target.rem_euclid(bs) as usize;

        if self.byte_count != 0 {
            self.cipher.process_block(&self.counter, &mut self.counter_out)?;
        }

        Ok(n)
    }

    fn seek_to(&mut self, position: i64) -> Result<i64, Error> {
        self.reset();
        self.skip(position)
    }

    fn position(&self) -> i64 {
        let mut offset = self.counter.clone();
        let mut borrow = 0u8;

        for i in (0..offset.len()).rev() {
            let iv_byte = self.iv.get(i).copied().unwrap_or(0);
            let (v, b1) = offset[i].overflowing_sub(iv_byte);
            let (v, b2) = v.overflowing_sub(borrow);
            offset[i] = v;
            borrow = u8::from(b1 | b2);
        }

        let blocks = offset[offset.len().saturating_sub(8)..]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

        (blocks as i64)
            .wrapping_mul(self.block_size as i64)
            .wrapping_add(self.byte_count as i64)
    }
}

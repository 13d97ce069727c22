use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroize;

use crate::error::Error;
use crate::params::CipherParameters;
use super::BlockCipher;

/// A byte-stream front end for a [`BlockCipher`].
///
/// Input accumulates in a block sized buffer and every block is processed as soon as it is
/// complete. A trailing partial block is only accepted by [`do_final`] when the wrapped cipher
/// can process one, as counter mode can; with any other cipher the total input must be block
/// aligned.
///
/// [`do_final`]: Self::do_final
pub struct BufferedBlockCipher<C: BlockCipher> {
    pub(super) cipher: C,
    pub(super) buf: Vec<u8>,
    pub(super) buf_off: usize,
    pub(super) scratch: Vec<u8>,
    pub(super) for_encryption: bool,
}

impl<C: BlockCipher> BufferedBlockCipher<C> {
    pub fn new(cipher: C) -> Self {
        let bs = cipher.block_size();
        Self {
            cipher,
            buf: vec![0; bs],
            buf_off: 0,
            scratch: vec![0; bs],
            for_encryption: true,
        }
    }

    /// The wrapped cipher.
    pub const fn underlying_cipher(&self) -> &C {
        &self.cipher
    }

    pub fn algorithm_name(&self) -> String {
        self.cipher.algorithm_name()
    }

    /// Resets the buffer and keys the wrapped cipher.
    ///
    /// # Errors
    ///
    /// Whatever the wrapped cipher's `init` rejects.
    pub fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error> {
        self.for_encryption = for_encryption;
        self.reset();
        self.cipher.init(for_encryption, params)
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.buf.len()
    }

    /// The number of bytes the next [`process_bytes`](Self::process_bytes) call of `len` bytes
    /// writes.
    pub fn update_output_size(&self, len: usize) -> usize {
        let total = len + self.buf_off;
        total - total % self.buf.len()
    }

    /// The number of bytes a [`process_bytes`](Self::process_bytes) of `len` bytes followed by
    /// [`do_final`](Self::do_final) writes in total.
    pub fn output_size(&self, len: usize) -> usize {
        len + self.buf_off
    }

    /// Buffers a single byte, processing the buffer once it fills.
    ///
    /// # Errors
    ///
    /// [`Error::OutputTooShort`] if this byte completes a block and `output` cannot hold it.
    /// Nothing is buffered in that case.
    pub fn process_byte(&mut self, input: u8, output: &mut [u8]) -> Result<usize, Error> {
        let bs = self.buf.len();
        if self.buf_off + 1 == bs && output.len() < bs {
            return Err(Error::OutputTooShort);
        }

        self.buf[self.buf_off] = input;
        self.buf_off += 1;

        if self.buf_off == bs {
            self.buf_off = 0;
            return self.cipher.process_block(&self.buf, output);
        }

        Ok(0)
    }

    /// Processes `input`, writing every completed block to `output`.
    ///
    /// # Errors
    ///
    /// [`Error::OutputTooShort`] if `output` is shorter than
    /// [`update_output_size`](Self::update_output_size), checked before anything is consumed.
    pub fn process_bytes(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        if input.is_empty() {
            return Ok(0);
        }
        if output.len() < self.update_output_size(input.len()) {
            return Err(Error::OutputTooShort);
        }

        let bs = self.buf.len();
        let gap = bs - self.buf_off;
        let mut input = input;
        let mut written = 0;

        if input.len() > gap {
            self.buf[self.buf_off..].copy_from_slice(&input[..gap]);
            written += self.cipher.process_block(&self.buf, output)?;
            self.buf_off = 0;
            input = &input[gap..];

            if input.len() > bs {
                let blocks = (input.len() - 1) / bs;
                written += self.cipher.process_blocks(input, blocks, &mut output[written..])?;
                input = &input[blocks * bs..];
            }
        }

        self.buf[self.buf_off..self.buf_off + input.len()].copy_from_slice(input);
        self.buf_off += input.len();

        if self.buf_off == bs {
            written += self.cipher.process_block(&self.buf, &mut output[written..])?;
            self.buf_off = 0;
        }

        Ok(written)
    }

    /// Flushes a trailing partial block and resets.
    ///
    /// # Errors
    ///
    /// - [`Error::OutputTooShort`] if `output` cannot hold the buffered bytes, the state is left
    ///   untouched.
    /// - [`Error::DataTooShort`] if bytes remain and the cipher cannot process a partial block.
    pub fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        let len = self.buf_off;
        if output.len() < len {
            return Err(Error::OutputTooShort);
        }

        let res = if len == 0 {
            Ok(0)
        } else if self.cipher.allows_partial_block() {
            self.cipher.process_block(&self.buf, &mut self.scratch).map(|_| {
                output[..len].copy_from_slice(&self.scratch[..len]);
                len
            })
        } else {
            Err(Error::DataTooShort("data not block size aligned"))
        };

        self.reset();
        res
    }

    /// Clears the buffer and resets the wrapped cipher.
    pub fn reset(&mut self) {
        self.buf.as_mut_slice().zeroize();
        self.scratch.as_mut_slice().zeroize();
        self.buf_off = 0;
        self.cipher.reset();
    }
}

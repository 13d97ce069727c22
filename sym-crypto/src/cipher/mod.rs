//! Cipher abstractions and byte-stream wrappers.
//!
//! [`BlockCipher`] is the seam every engine and mode implements. The wrappers in this module turn
//! block-at-a-time processing into byte-stream processing:
//!
//! * [`BufferedBlockCipher`] processes each block as soon as it fills.
//! * [`PaddedBufferedBlockCipher`] holds back the last block and pads it on `do_final`.
use alloc::boxed::Box;
use alloc::string::String;

use crate::error::Error;
use crate::params::CipherParameters;

mod buffered;
mod padded;

pub use buffered::BufferedBlockCipher;
pub use padded::PaddedBufferedBlockCipher;

/// A keyed, fixed-width, stateful transform.
pub trait BlockCipher {
    /// The algorithm name, for example `AES` or `AES/CBC`.
    fn algorithm_name(&self) -> String;

    /// Keys the cipher and fixes its direction.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the parameters are of the wrong kind or size.
    fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error>;

    /// The block size in bytes.
    fn block_size(&self) -> usize;

    /// Transforms one block from the front of `input` into the front of `output`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before `init`.
    /// - [`Error::DataTooShort`] if `input` is shorter than a block.
    /// - [`Error::OutputTooShort`] if `output` is shorter than a block.
    ///
    /// # Returns
    ///
    /// The number of bytes written, always the block size.
    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error>;

    /// Returns the cipher to its freshly initialised state, keeping the key.
    fn reset(&mut self);

    /// The preferred number of bytes to hand to [`process_blocks`](Self::process_blocks).
    fn multi_block_size(&self) -> usize {
        self.block_size()
    }

    /// Transforms `block_count` consecutive blocks.
    ///
    /// # Errors
    ///
    /// See [`process_block`](Self::process_block).
    fn process_blocks(
        &mut self,
        input: &[u8],
        block_count: usize,
        output: &mut [u8]
    ) -> Result<usize, Error> {
        let bs = self.block_size();
        let total = bs * block_count;

        if input.len() < total {
            return Err(Error::DataTooShort("input buffer too short"));
        }
        if output.len() < total {
            return Err(Error::OutputTooShort);
        }

        let mut written = 0;
        for (inp, out) in input[..total].chunks_exact(bs).zip(output.chunks_exact_mut(bs)) {
            written += self.process_block(inp, out)?;
        }
        Ok(written)
    }

    /// Whether a trailing partial block can be processed on its own, which holds for
    /// keystream modes.
    fn allows_partial_block(&self) -> bool {
        false
    }
}

forward_block_cipher!(&mut C, Box<C>);

/// Byte oriented processing for keystream ciphers.
pub trait StreamCipher {
    /// Transforms a single byte.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before `init`, or [`Error::MisuseDetected`] once the keystream
    /// is exhausted.
    fn return_byte(&mut self, input: u8) -> Result<u8, Error>;

    /// Transforms all of `input` into the front of `output`.
    ///
    /// # Errors
    ///
    /// [`Error::OutputTooShort`] if `output` is shorter than `input`, otherwise as
    /// [`return_byte`](Self::return_byte).
    fn process_bytes(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error>;
}

/// Random access over a keystream.
pub trait SkippingCipher {
    /// Moves the keystream position by `n` bytes, which may be negative.
    ///
    /// # Errors
    ///
    /// [`Error::MisuseDetected`] if the new position is outside the counter space.
    fn skip(&mut self, n: i64) -> Result<i64, Error>;

    /// Moves to an absolute keystream position.
    ///
    /// # Errors
    ///
    /// As [`skip`](Self::skip).
    fn seek_to(&mut self, position: i64) -> Result<i64, Error>;

    /// The current keystream position in bytes.
    fn position(&self) -> i64;
}

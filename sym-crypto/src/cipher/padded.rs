use alloc::format;
use alloc::string::String;
use zeroize::Zeroize;

use crate::error::Error;
use crate::paddings::{BlockCipherPadding, Pkcs7Padding};
use crate::params::CipherParameters;
use super::{BlockCipher, BufferedBlockCipher};

/// A buffered block cipher which pads the final block.
///
/// Unlike [`BufferedBlockCipher`] a completed block is held back until more input arrives, so on
/// decryption the last block, the one carrying the padding, is still buffered when
/// [`do_final`](Self::do_final) runs.
///
/// # Example
///
/// ```
/// use sym_crypto::aes::AesEngine;
/// use sym_crypto::cipher::PaddedBufferedBlockCipher;
/// use sym_crypto::modes::CbcBlockCipher;
/// use sym_crypto::params::{KeyParameter, ParametersWithIv};
///
/// let params = ParametersWithIv::new(KeyParameter::new(&[7; 16]), &[3; 16]).into();
///
/// let mut enc = PaddedBufferedBlockCipher::new(CbcBlockCipher::new(AesEngine::new()));
/// enc.init(true, &params)?;
///
/// let mut ciphertext = vec![0u8; enc.output_size(11)];
/// let n = enc.process_bytes(b"hello world", &mut ciphertext)?;
/// let n = n + enc.do_final(&mut ciphertext[n..])?;
/// assert_eq!(n, 16);
///
/// let mut dec = PaddedBufferedBlockCipher::new(CbcBlockCipher::new(AesEngine::new()));
/// dec.init(false, &params)?;
///
/// let mut plaintext = vec![0u8; dec.output_size(n)];
/// let m = dec.process_bytes(&ciphertext, &mut plaintext)?;
/// let m = m + dec.do_final(&mut plaintext[m..])?;
/// assert_eq!(&plaintext[..m], b"hello world");
/// # Ok::<(), sym_crypto::Error>(())
/// ```
pub struct PaddedBufferedBlockCipher<C: BlockCipher, P: BlockCipherPadding = Pkcs7Padding> {
    inner: BufferedBlockCipher<C>,
    padding: P,
}

impl<C: BlockCipher> PaddedBufferedBlockCipher<C> {
    /// Wraps `cipher` with PKCS#7 padding.
    pub fn new(cipher: C) -> Self {
        Self::with_padding(cipher, Pkcs7Padding)
    }
}

impl<C: BlockCipher, P: BlockCipherPadding> PaddedBufferedBlockCipher<C, P> {
    pub fn with_padding(cipher: C, padding: P) -> Self {
        Self { inner: BufferedBlockCipher::new(cipher), padding }
    }

    /// The wrapped cipher.
    pub const fn underlying_cipher(&self) -> &C {
        self.inner.underlying_cipher()
    }

    pub fn algorithm_name(&self) -> String {
        format!("{}/{}", self.inner.algorithm_name(), self.padding.padding_name())
    }

    /// Resets the buffer and keys the wrapped cipher. A `WithRandom` layer is handed to the
    /// padding and stripped before the cipher sees the parameters.
    ///
    /// # Errors
    ///
    /// Whatever the wrapped cipher's `init` rejects.
    pub fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error> {
        let (params, random) = params.split_random();
        self.padding.init(random);
        self.inner.init(for_encryption, params)
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.inner.block_size()
    }

    /// The number of bytes the next [`process_bytes`](Self::process_bytes) call of `len` bytes
    /// writes. A completed final block is held back.
    pub fn update_output_size(&self, len: usize) -> usize {
        let bs = self.inner.buf.len();
        let total = len + self.inner.buf_off;
        let left = total % bs;

        if left == 0 {
            total.saturating_sub(bs)
        } else {
            total - left
        }
    }

    /// An upper bound of the bytes written by [`process_bytes`](Self::process_bytes) of `len`
    /// bytes followed by [`do_final`](Self::do_final).
    pub fn output_size(&self, len: usize) -> usize {
        let bs = self.inner.buf.len();
        let total = len + self.inner.buf_off;
        let left = total % bs;

        if left != 0 {
            total - left + bs
        } else if self.inner.for_encryption {
            total + bs
        } else {
            total
        }
    }

    /// Buffers a single byte, first processing a held back full block.
    ///
    /// # Errors
    ///
    /// [`Error::OutputTooShort`] if a block must be flushed and `output` cannot hold it.
    pub fn process_byte(&mut self, input: u8, output: &mut [u8]) -> Result<usize, Error> {
        let inner = &mut self.inner;
        let bs = inner.buf.len();
        let mut written = 0;

        if inner.buf_off == bs {
            if output.len() < bs {
                return Err(Error::OutputTooShort);
            }
            written = inner.cipher.process_block(&inner.buf, output)?;
            inner.buf_off = 0;
        }

        inner.buf[inner.buf_off] = input;
        inner.buf_off += 1;
        Ok(written)
    }

    /// Processes `input`, writing every block except a possibly complete final one.
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

        let inner = &mut self.inner;
        let bs = inner.buf.len();
        let gap = bs - inner.buf_off;
        let mut input = input;
        let mut written = 0;

        if input.len() > gap {
            inner.buf[inner.buf_off..].copy_from_slice(&input[..gap]);
            written += inner.cipher.process_block(&inner.buf, output)?;
            inner.buf_off = 0;
            input = &input[gap..];

            if input.len() > bs {
                let blocks = (input.len() - 1) / bs;
                written += inner.cipher.process_blocks(input, blocks, &mut output[written..])?;
                input = &input[blocks * bs..];
            }
        }

        inner.buf[inner.buf_off..inner.buf_off + input.len()].copy_from_slice(input);
        inner.buf_off += input.len();

        Ok(written)
    }

    /// Pads and flushes on encryption, strips and validates the padding on decryption. Resets
    /// on every outcome other than a short output on encryption.
    ///
    /// # Errors
    ///
    /// - [`Error::OutputTooShort`] if `output` cannot hold the result.
    /// - [`Error::DataTooShort`] if decrypting and the input was not block aligned.
    /// - [`Error::AuthenticationFailed`] if the padding is corrupt.
    pub fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        let res = if self.inner.for_encryption {
            let bs = self.inner.buf.len();
            let needed = if self.inner.buf_off == bs { 2 * bs } else { bs };
            if output.len() < needed {
                return Err(Error::OutputTooShort);
            }
            self.pad_and_flush(output)
        } else {
            self.unpad(output)
        };

        self.inner.reset();
        res
    }

    fn pad_and_flush(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        let inner = &mut self.inner;
        let bs = inner.buf.len();
        let mut written = 0;

        if inner.buf_off == bs {
            written = inner.cipher.process_block(&inner.buf, output)?;
            inner.buf_off = 0;
        }

        self.padding.add_padding(&mut inner.buf, inner.buf_off);
        written += inner.cipher.process_block(&inner.buf, &mut output[written..])?;
        Ok(written)
    }

    fn unpad(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        let inner = &mut self.inner;
        if inner.buf_off != inner.buf.len() {
            return Err(Error::DataTooShort("last block incomplete in decryption"));
        }

        let bs = inner.cipher.process_block(&inner.buf, &mut inner.scratch)?;
        let len = bs - self.padding.pad_count(&inner.scratch)?;

        if output.len() < len {
            inner.scratch.as_mut_slice().zeroize();
            return Err(Error::OutputTooShort);
        }

        output[..len].copy_from_slice(&inner.scratch[..len]);
        Ok(len)
    }

    /// Clears the buffer and resets the wrapped cipher.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

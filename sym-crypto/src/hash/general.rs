use crate::error::Error;
use super::{Digest, DigestCore};

/// The shared streaming front end of the word oriented digests.
///
/// Input is gathered into a four byte word buffer. Each complete word is handed to the core, and
/// `do_final` appends the `0x80` terminator, zero pads to a word boundary and lets the core inject
/// the bit length before the last compression.
///
/// # Example
///
/// ```
/// use sym_crypto::hash::{Digest, Sha256};
///
/// let mut hasher = Sha256::new();
/// hasher.update_bytes(b"hello ");
/// hasher.update_bytes(b"world");
///
/// assert_eq!(hasher.finalize(), Sha256::digest(b"hello world"));
/// ```
#[derive(Clone)]
pub struct GeneralDigest<C: DigestCore> {
    core: C,
    x_buf: [u8; 4],
    x_buf_off: usize,
    byte_count: u64,
}

impl<C: DigestCore> Default for GeneralDigest<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DigestCore> GeneralDigest<C> {
    pub fn new() -> Self {
        Self { core: C::default(), x_buf: [0; 4], x_buf_off: 0, byte_count: 0 }
    }

    /// Hashes `data` in one call.
    pub fn digest(data: &[u8]) -> C::Output {
        let mut hasher = Self::new();
        hasher.update_bytes(data);
        hasher.finalize()
    }

    /// Finishes the message, returning the digest and resetting.
    pub fn finalize(&mut self) -> C::Output {
        let mut out = C::Output::default();
        self.finish();
        self.core.write_state(out.as_mut());
        self.clear();
        out
    }

    fn finish(&mut self) {
        let bit_length = self.byte_count << 3;

        self.update(0x80);
        while self.x_buf_off != 0 {
            self.update(0);
        }

        self.core.process_length(bit_length);
        self.core.process_block();
    }

    fn clear(&mut self) {
        self.core = C::default();
        self.x_buf = [0; 4];
        self.x_buf_off = 0;
        self.byte_count = 0;
    }
}

impl<C: DigestCore> Digest for GeneralDigest<C> {
    #[inline]
    fn algorithm_name(&self) -> &'static str {
        C::NAME
    }

    #[inline]
    fn digest_size(&self) -> usize {
        C::DIGEST_SIZE
    }

    #[inline]
    fn byte_length(&self) -> usize {
        64
    }

    fn update(&mut self, input: u8) {
        self.x_buf[self.x_buf_off] = input;
        self.x_buf_off += 1;

        if self.x_buf_off == self.x_buf.len() {
            self.core.process_word(&self.x_buf);
            self.x_buf_off = 0;
        }

        self.byte_count = self.byte_count.wrapping_add(1);
    }

    fn update_bytes(&mut self, input: &[u8]) {
        let mut rest = input;

        while self.x_buf_off != 0 {
            match rest.split_first() {
                Some((&b, tail)) => {
                    self.update(b);
                    rest = tail;
                }
                None => return,
            }
        }

        let words = rest.chunks_exact(4);
        let tail = words.remainder();
        for word in words {
            self.core.process_word(word);
        }
        self.byte_count = self.byte_count.wrapping_add((rest.len() - tail.len()) as u64);

        for &b in tail {
            self.update(b);
        }
    }

    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        if output.len() < C::DIGEST_SIZE {
            return Err(Error::OutputTooShort);
        }

        self.finish();
        self.core.write_state(output);
        self.clear();
        Ok(C::DIGEST_SIZE)
    }

    fn reset(&mut self) {
        self.clear();
        log::debug!("{} reset", C::NAME);
    }
}

impl<C: DigestCore> Drop for GeneralDigest<C> {
    fn drop(&mut self) {
        self.clear();
    }
}

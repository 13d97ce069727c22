//! Cryptographic Hash Algorithms
//!
//! Every digest shares [`GeneralDigest`], which gathers input into 32 bit words, applies the
//! Merkle-Damgård padding and hands words, length and block boundaries to an algorithm specific
//! [`DigestCore`].

use crate::error::Error;

#[macro_use]
mod test_gen;
mod general;
#[doc(hidden)]
pub mod sha256;

pub use general::GeneralDigest;
pub use sha256::{Sha224State, Sha256State};

/// SHA-224, SHA-256 truncated to 28 bytes under its own initial state.
pub type Sha224 = GeneralDigest<Sha224State>;
/// SHA-256
pub type Sha256 = GeneralDigest<Sha256State>;

non_fips! {
    #[doc(hidden)]
    pub mod md5;
    #[doc(hidden)]
    pub mod sha1;

    pub use md5::Md5State;
    pub use sha1::Sha1State;

    /// MD5, for interoperability only.
    pub type Md5 = GeneralDigest<Md5State>;
    /// SHA-1, for interoperability only.
    pub type Sha1 = GeneralDigest<Sha1State>;
}

/// A streaming message digest.
///
/// Implementations are `Clone`, a clone is a snapshot of the running state which can be resumed
/// independently of the original.
pub trait Digest {
    /// The algorithm name, for example `SHA-256`.
    fn algorithm_name(&self) -> &'static str;

    /// The size of the digest in bytes.
    fn digest_size(&self) -> usize;

    /// The size of the internal block in bytes.
    fn byte_length(&self) -> usize;

    /// Absorbs a single byte.
    fn update(&mut self, input: u8);

    /// Absorbs `input`.
    fn update_bytes(&mut self, input: &[u8]);

    /// Writes the digest to the front of `output` and resets.
    ///
    /// # Errors
    ///
    /// [`Error::OutputTooShort`] if `output` is shorter than the digest, the state is left as is.
    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error>;

    /// Restores the initial state.
    fn reset(&mut self);
}

/// The algorithm specific half of a [`GeneralDigest`].
///
/// The core collects whole words into its block and compresses once the block is full.
pub trait DigestCore: Clone + Default {
    /// The finished digest.
    type Output: Copy + Default + AsRef<[u8]> + AsMut<[u8]>;

    const NAME: &'static str;
    const DIGEST_SIZE: usize;

    /// Appends a word, `word` holds exactly four bytes in input order.
    fn process_word(&mut self, word: &[u8]);

    /// Injects the message length in bits into the final block, compressing first if there is no
    /// room left for it.
    fn process_length(&mut self, bit_length: u64);

    /// Compresses the current block.
    fn process_block(&mut self);

    /// Serialises the chaining state, `out` holds at least [`Self::DIGEST_SIZE`] bytes.
    fn write_state(&self, out: &mut [u8]);
}

//! Authenticated encryption with associated data.
//!
//! Both modes follow the same lifecycle: `init` with a key and nonce, feed associated data and
//! message bytes, then `do_final`. On encryption `do_final` appends the tag, on decryption it
//! checks the trailing tag and fails with [`Error::AuthenticationFailed`] on a mismatch. Any
//! plaintext written before such a failure must be discarded.
//!
//! [`Error::AuthenticationFailed`]: crate::Error::AuthenticationFailed
use alloc::string::String;

use crate::aes::AesEngine;
use crate::error::Error;
use crate::params::CipherParameters;

mod tag;
mod gcm;
mod ccm;

pub use tag::Tag;
pub use gcm::{
    BasicGcmMultiplier,
    GcmBlockCipher,
    GcmExponentiator,
    GcmMultiplier,
    Tables4kGcmMultiplier
};
pub use ccm::CcmBlockCipher;

/// AES-GCM with the 4 KiB table multiplier.
pub type AesGcm = GcmBlockCipher<AesEngine, Tables4kGcmMultiplier>;

/// AES-CCM.
pub type AesCcm = CcmBlockCipher<AesEngine>;

/// A block cipher mode providing authenticated encryption.
pub trait AeadCipher {
    /// The algorithm name, for example `AES/GCM`.
    fn algorithm_name(&self) -> String;

    /// Keys the mode and sets the nonce, tag size and any associated text carried by the
    /// parameters.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for unsupported parameters, nonce or tag sizes.
    /// - [`Error::MisuseDetected`] when encrypting again under the previous key and nonce.
    fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error>;

    /// The tag size in bytes.
    fn mac_size(&self) -> usize;

    /// Adds a byte of associated data.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before `init`.
    fn process_aad_byte(&mut self, input: u8) -> Result<(), Error>;

    /// Adds associated data.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before `init`.
    fn process_aad_bytes(&mut self, input: &[u8]) -> Result<(), Error>;

    /// Processes a single message byte.
    ///
    /// # Errors
    ///
    /// See [`process_bytes`](Self::process_bytes).
    fn process_byte(&mut self, input: u8, output: &mut [u8]) -> Result<usize, Error>;

    /// Processes message bytes, writing whatever output is ready.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before `init`.
    /// - [`Error::OutputTooShort`] if `output` is shorter than
    ///   [`update_output_size`](Self::update_output_size).
    fn process_bytes(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error>;

    /// Finishes the message and resets for the next one.
    ///
    /// # Errors
    ///
    /// - [`Error::OutputTooShort`] if `output` cannot hold the remaining output.
    /// - [`Error::DataTooShort`] if decrypting and the input is shorter than the tag.
    /// - [`Error::AuthenticationFailed`] if the tag does not verify.
    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error>;

    /// The tag of the last completed message.
    fn mac(&self) -> Tag;

    /// The number of bytes the next `process_bytes` of `len` bytes writes.
    fn update_output_size(&self, len: usize) -> usize;

    /// The number of bytes `process_bytes` of `len` bytes followed by `do_final` writes.
    fn output_size(&self, len: usize) -> usize;

    /// Discards the current message, keeping key and nonce.
    fn reset(&mut self);
}

//! Message Authentication Codes

use alloc::string::String;

use crate::error::Error;
use crate::params::CipherParameters;

mod cbc_mac;
pub mod hmac;

pub use cbc_mac::CbcBlockCipherMac;
#[doc(inline)]
pub use hmac::Hmac;

/// A keyed checksum over a byte stream.
pub trait Mac {
    /// The algorithm name, for example `SHA-256/HMAC`.
    fn algorithm_name(&self) -> String;

    /// Keys the MAC and starts a new message.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the parameters carry no usable key.
    fn init(&mut self, params: &CipherParameters) -> Result<(), Error>;

    /// The size of the produced MAC in bytes.
    fn mac_size(&self) -> usize;

    /// Absorbs a single byte.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before `init`.
    fn update(&mut self, input: u8) -> Result<(), Error>;

    /// Absorbs `input`.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before `init`.
    fn update_bytes(&mut self, input: &[u8]) -> Result<(), Error>;

    /// Writes the MAC to the front of `output` and starts a new message under the same key.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before `init`.
    /// - [`Error::OutputTooShort`] if `output` is shorter than [`mac_size`](Self::mac_size).
    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error>;

    /// Discards the current message, keeping the key.
    fn reset(&mut self);
}

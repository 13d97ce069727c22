//! Block padding schemes.
//!
//! A padding fills the tail of the final block on encryption and recovers the original length on
//! decryption. Validation looks at the whole block before deciding, a corrupt pad is reported as
//! [`Error::AuthenticationFailed`](crate::Error::AuthenticationFailed) without revealing which
//! byte was wrong.
use crate::error::Error;
use crate::random::NonCryptoRandom;

mod pkcs7;
mod iso7816d4;
mod zero_byte;
mod iso10126d2;

pub use pkcs7::Pkcs7Padding;
pub use iso7816d4::Iso7816d4Padding;
pub use zero_byte::ZeroBytePadding;
pub use iso10126d2::Iso10126d2Padding;

pub(crate) const CORRUPTED: Error = Error::AuthenticationFailed("pad block corrupted");

/// A padding scheme for the final block of a message.
pub trait BlockCipherPadding {
    /// Supplies the generator for schemes which fill with random bytes. Deterministic schemes
    /// ignore it.
    fn init(&mut self, random: Option<&NonCryptoRandom>) {
        let _ = random;
    }

    /// The name of the scheme, for example `PKCS7`.
    fn padding_name(&self) -> &'static str;

    /// Pads `block` from `offset` to its end.
    ///
    /// # Returns
    ///
    /// The number of padding bytes added.
    fn add_padding(&mut self, block: &mut [u8], offset: usize) -> usize;

    /// The number of padding bytes at the end of `block`.
    ///
    /// # Errors
    ///
    /// [`Error::AuthenticationFailed`] if the padding is corrupt.
    fn pad_count(&self, block: &[u8]) -> Result<usize, Error>;
}

//! Hashed-Based Message Authentication Codes `HMAC`.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::hash::{Digest, Sha224, Sha256};
use crate::params::{CipherParameters, KeyParameter};
use super::Mac;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;
const NOT_INITIALISED: Error = Error::NotInitialized("HMAC uninitialised");

/// `HMAC` with SHA-224.
pub type HmacSha224 = Hmac<Sha224>;
/// `HMAC` with SHA-256.
pub type HmacSha256 = Hmac<Sha256>;

non_fips! {
    /// `HMAC` with MD5.
    pub type HmacMd5 = Hmac<crate::hash::Md5>;
    /// `HMAC` with SHA-1.
    pub type HmacSha1 = Hmac<crate::hash::Sha1>;
}

/// Snapshots of the digest after absorbing each padded key.
struct Pads<D> {
    ipad: D,
    opad: D,
}

/// Hashed-Based Message Authentication Codes `HMAC` (RFC 2104).
///
/// `init` hashes the key block XORed with `ipad` and with `opad` once and keeps both digest
/// states, so finishing a message and starting the next one under the same key never revisits
/// the key.
///
/// # Example
///
/// ```
/// use sym_crypto::mac::{Mac, hmac::HmacSha256};
///
/// # fn main() -> Result<(), sym_crypto::Error> {
/// let mut hmac = HmacSha256::with_key(&[42u8; 32])?;
///
/// hmac.update_bytes(b"hello world, ")?;
/// hmac.update_bytes(b"beautiful weather.")?;
///
/// let mut parts = [0u8; 32];
/// hmac.do_final(&mut parts)?;
///
/// hmac.update_bytes(b"hello world, beautiful weather.")?;
///
/// let mut all = [0u8; 32];
/// hmac.do_final(&mut all)?;
///
/// assert_eq!(parts, all);
/// # Ok(()) }
/// ```
pub struct Hmac<D: Digest + Clone> {
    digest: D,
    pads: Option<Pads<D>>,
}

impl<D: Digest + Clone + Default> Default for Hmac<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: Digest + Clone> Hmac<D> {
    /// An unkeyed `HMAC` over `digest`, [`Mac::init`] must be called before use.
    pub const fn new(digest: D) -> Self {
        Self { digest, pads: None }
    }

    /// A `HMAC` keyed with `key`.
    ///
    /// # Errors
    ///
    /// Never for the digests of this crate, the error is forwarded from the underlying digest.
    pub fn with_key(key: &[u8]) -> Result<Self, Error>
        where D: Default
    {
        let mut hmac = Self::default();
        hmac.init(&KeyParameter::new(key).into())?;
        Ok(hmac)
    }

    /// The digest this `HMAC` is built on.
    pub const fn underlying_digest(&self) -> &D {
        &self.digest
    }
}

impl<D: Digest + Clone> Mac for Hmac<D> {
    fn algorithm_name(&self) -> String {
        format!("{}/HMAC", self.digest.algorithm_name())
    }

    fn init(&mut self, params: &CipherParameters) -> Result<(), Error> {
        let key = params.as_key("HMAC requires a key parameter")?.key();
        let block_length = self.digest.byte_length();

        self.pads = None;
        self.digest.reset();

        let mut input_pad = Zeroizing::new(vec![0u8; block_length]);
        if key.len() > block_length {
            self.digest.update_bytes(key);
            self.digest.do_final(&mut input_pad)?;
        } else {
            input_pad[..key.len()].copy_from_slice(key);
        }

        let mut output_pad = input_pad.clone();
        for (i, o) in input_pad.iter_mut().zip(output_pad.iter_mut()) {
            *i ^= IPAD;
            *o ^= OPAD;
        }

        let mut opad = self.digest.clone();
        opad.update_bytes(&output_pad);
        self.digest.update_bytes(&input_pad);

        self.pads = Some(Pads { ipad: self.digest.clone(), opad });
        Ok(())
    }

    #[inline]
    fn mac_size(&self) -> usize {
        self.digest.digest_size()
    }

    fn update(&mut self, input: u8) -> Result<(), Error> {
        if self.pads.is_none() {
            return Err(NOT_INITIALISED);
        }
        self.digest.update(input);
        Ok(())
    }

    fn update_bytes(&mut self, input: &[u8]) -> Result<(), Error> {
        if self.pads.is_none() {
            return Err(NOT_INITIALISED);
        }
        self.digest.update_bytes(input);
        Ok(())
    }

    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        let pads = self.pads.as_ref().ok_or(NOT_INITIALISED)?;
        let size = self.digest.digest_size();
        if output.len() < size {
            return Err(Error::OutputTooShort);
        }

        let mut inner = Zeroizing::new(vec![0u8; size]);
        self.digest.do_final(&mut inner)?;

        let mut outer = pads.opad.clone();
        outer.update_bytes(&inner);
        outer.do_final(output)?;

        self.digest = pads.ipad.clone();
        Ok(size)
    }

    fn reset(&mut self) {
        if let Some(pads) = &self.pads {
            self.digest = pads.ipad.clone();
        }
        log::debug!("{} reset", self.algorithm_name());
    }
}


#[cfg(all(test, not(miri)))]
mod property_tests {
    use super::*;
    use ::hmac::Mac as _;
    use proptest::prelude::*;
    use crate::test_utils::{AnyList, BoundList};

    proptest! {
        #[test]
        fn rust_crypto_equivalence(
            key in any::<BoundList<160>>(),
            inputs in any::<AnyList<16, BoundList<128>>>()
        ) {
            let mut ours = HmacSha256::with_key(key.as_slice()).unwrap();
            let mut rc = ::hmac::Hmac::<::sha2::Sha256>::new_from_slice(key.as_slice()).unwrap();

            for input in inputs.as_slice() {
                ours.update_bytes(input.as_slice()).unwrap();
                rc.update(input.as_slice());
            }

            let mut out = [0u8; 32];
            ours.do_final(&mut out).unwrap();
            let expected = rc.finalize().into_bytes();
            prop_assert_eq!(out.as_slice(), expected.as_slice());
        }

        #[test]
        fn deterministic_with_digest_length(key in any::<BoundList<80>>(), input in any::<BoundList<256>>()) {
            let mut hmac = HmacSha224::with_key(key.as_slice()).unwrap();
            let mut a = [0u8; 28];
            let mut b = [0u8; 28];

            hmac.update_bytes(input.as_slice()).unwrap();
            prop_assert_eq!(hmac.do_final(&mut a), Ok(28));
            hmac.update_bytes(input.as_slice()).unwrap();
            hmac.do_final(&mut b).unwrap();

            prop_assert_eq!(a, b);
        }
    }
}

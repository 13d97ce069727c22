//! The parameter model consumed by every `init`.
//!
//! Parameters compose: a [`KeyParameter`] can be wrapped with an IV, AEAD settings can carry a
//! key, and any of them can be wrapped with a source of randomness. Each primitive unwraps the
//! layers it understands and rejects the rest with [`Error::InvalidParameter`].
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::random::NonCryptoRandom;

/// Raw key bytes, wiped from memory when dropped.
#[derive(Clone)]
pub struct KeyParameter {
    key: Zeroizing<Vec<u8>>,
}

impl KeyParameter {
    /// Copies `key` into a new parameter.
    pub fn new(key: &[u8]) -> Self {
        Self { key: Zeroizing::new(key.to_vec()) }
    }

    #[inline]
    pub fn key(&self) -> &[u8] {
        self.key.as_slice()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.key.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Debug for KeyParameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeyParameter {{ len: {} }}", self.len())
    }
}

/// An IV (or nonce) wrapped around optional inner parameters.
///
/// When `parameters` is `None` the primitive keeps its current key and only the IV changes.
#[derive(Clone, Debug)]
pub struct ParametersWithIv {
    parameters: Option<Box<CipherParameters>>,
    iv: Vec<u8>,
}

impl ParametersWithIv {
    pub fn new<P: Into<CipherParameters>>(parameters: P, iv: &[u8]) -> Self {
        Self { parameters: Some(Box::new(parameters.into())), iv: iv.to_vec() }
    }

    /// An IV for a primitive which was already keyed by an earlier `init`.
    pub fn iv_only(iv: &[u8]) -> Self {
        Self { parameters: None, iv: iv.to_vec() }
    }

    #[inline]
    pub fn iv(&self) -> &[u8] {
        self.iv.as_slice()
    }

    #[inline]
    pub fn parameters(&self) -> Option<&CipherParameters> {
        self.parameters.as_deref()
    }
}

/// Settings for authenticated encryption.
#[derive(Clone, Debug)]
pub struct AeadParameters {
    key: Option<KeyParameter>,
    mac_size_bits: usize,
    nonce: Vec<u8>,
    associated_text: Option<Vec<u8>>,
}

impl AeadParameters {
    /// # Arguments
    ///
    /// * `key` - The cipher key.
    /// * `mac_size_bits` - Size of the authentication tag in bits.
    /// * `nonce` - The per-message nonce.
    pub fn new(key: KeyParameter, mac_size_bits: usize, nonce: &[u8]) -> Self {
        Self { key: Some(key), mac_size_bits, nonce: nonce.to_vec(), associated_text: None }
    }

    /// Settings which keep the key of a previous `init` and only change nonce and tag size.
    pub fn without_key(mac_size_bits: usize, nonce: &[u8]) -> Self {
        Self { key: None, mac_size_bits, nonce: nonce.to_vec(), associated_text: None }
    }

    /// Associated text which is authenticated at the start of every message.
    #[must_use]
    pub fn with_associated_text(mut self, associated_text: &[u8]) -> Self {
        self.associated_text = Some(associated_text.to_vec());
        self
    }

    #[inline]
    pub const fn key(&self) -> Option<&KeyParameter> {
        self.key.as_ref()
    }

    #[inline]
    pub const fn mac_size_bits(&self) -> usize {
        self.mac_size_bits
    }

    #[inline]
    pub fn nonce(&self) -> &[u8] {
        self.nonce.as_slice()
    }

    #[inline]
    pub fn associated_text(&self) -> Option<&[u8]> {
        self.associated_text.as_deref()
    }
}

/// Parameters paired with a source of randomness.
#[derive(Clone, Debug)]
pub struct ParametersWithRandom {
    parameters: Box<CipherParameters>,
    random: NonCryptoRandom,
}

impl ParametersWithRandom {
    pub fn new<P: Into<CipherParameters>>(parameters: P, random: NonCryptoRandom) -> Self {
        Self { parameters: Box::new(parameters.into()), random }
    }

    #[inline]
    pub fn parameters(&self) -> &CipherParameters {
        &self.parameters
    }

    #[inline]
    pub const fn random(&self) -> &NonCryptoRandom {
        &self.random
    }
}

/// The closed set of parameter variants.
#[derive(Clone, Debug)]
pub enum CipherParameters {
    Key(KeyParameter),
    WithIv(ParametersWithIv),
    Aead(AeadParameters),
    WithRandom(ParametersWithRandom),
}

impl CipherParameters {
    /// Splits off a `WithRandom` layer, returning the inner parameters and the generator.
    pub fn split_random(&self) -> (&Self, Option<&NonCryptoRandom>) {
        match self {
            Self::WithRandom(p) => (p.parameters(), Some(p.random())),
            other => (other, None),
        }
    }

    /// The key, if these parameters are a bare key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] carrying `reason` for any other variant.
    pub fn as_key(&self, reason: &'static str) -> Result<&KeyParameter, Error> {
        match self {
            Self::Key(key) => Ok(key),
            Self::WithRandom(p) => p.parameters().as_key(reason),
            _ => Err(Error::InvalidParameter(reason)),
        }
    }
}

impl From<KeyParameter> for CipherParameters {
    fn from(value: KeyParameter) -> Self {
        Self::Key(value)
    }
}

impl From<ParametersWithIv> for CipherParameters {
    fn from(value: ParametersWithIv) -> Self {
        Self::WithIv(value)
    }
}

impl From<AeadParameters> for CipherParameters {
    fn from(value: AeadParameters) -> Self {
        Self::Aead(value)
    }
}

impl From<ParametersWithRandom> for CipherParameters {
    fn from(value: ParametersWithRandom) -> Self {
        Self::WithRandom(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn debug_hides_key() {
        let key = KeyParameter::new(&[0xaa; 16]);
        let printed = format!("{key:?}");
        assert_eq!(printed, "KeyParameter { len: 16 }");

        let wrapped = CipherParameters::from(ParametersWithIv::new(key, &[1; 16]));
        assert!(!format!("{wrapped:?}").contains("170"));
    }

    #[test]
    fn iv_composition() {
        let params = ParametersWithIv::new(KeyParameter::new(&[1, 2, 3]), &[9; 12]);
        assert_eq!(params.iv(), &[9; 12]);

        match params.parameters() {
            Some(CipherParameters::Key(key)) => assert_eq!(key.key(), &[1, 2, 3]),
            other => panic!("unexpected inner parameters {other:?}"),
        }

        assert!(ParametersWithIv::iv_only(&[0; 16]).parameters().is_none());
    }

    #[test]
    fn split_random_unwraps_one_layer() {
        let inner = CipherParameters::from(KeyParameter::new(&[7; 16]));
        let params = CipherParameters::from(
            ParametersWithRandom::new(inner, NonCryptoRandom::new(1))
        );

        let (inner, random) = params.split_random();
        assert!(matches!(inner, CipherParameters::Key(_)));
        assert_eq!(random, Some(&NonCryptoRandom::new(1)));
        assert!(params.as_key("no key").is_ok());
    }

    #[test]
    fn as_key_rejects_other_variants() {
        let params = CipherParameters::from(AeadParameters::new(KeyParameter::new(&[0; 16]), 128, &[0; 12]));
        assert!(matches!(
            params.as_key("need key"),
            Err(Error::InvalidParameter("need key"))
        ));
    }

    #[test]
    fn aead_builder() {
        let params = AeadParameters::new(KeyParameter::new(&[0; 16]), 96, &[1; 12])
            .with_associated_text(b"header");

        assert_eq!(params.mac_size_bits(), 96);
        assert_eq!(params.associated_text(), Some(b"header".as_slice()));
        assert!(AeadParameters::without_key(128, &[0; 7]).key().is_none());
    }
}

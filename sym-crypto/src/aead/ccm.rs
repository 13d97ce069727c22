use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;
use zeroize::Zeroize;

use crate::aes::AesEngine;
use crate::cipher::{BlockCipher, StreamCipher};
use crate::ct;
use crate::error::Error;
use crate::mac::{CbcBlockCipherMac, Mac};
use crate::modes::SicBlockCipher;
use crate::params::{CipherParameters, KeyParameter, ParametersWithIv};
use super::{AeadCipher, Tag};

const BLOCK_SIZE: usize = 16;
const NOT_INITIALISED: Error = Error::NotInitialized("CCM cipher uninitialised");
const ALREADY_SEALED: Error =
    Error::MisuseDetected("CCM cipher cannot be reused for encryption");

/// Counter with CBC-MAC.
///
/// CCM needs the message length before the first block can be authenticated, so the streaming
/// interface only buffers: [`process_bytes`] writes nothing and [`do_final`] processes the whole
/// packet. [`process_packet`] does the same in a single call.
///
/// The nonce is 7 to 13 bytes. A shorter nonce leaves more bytes to encode the message length,
/// with a 13 byte nonce packets are limited to 64 KiB.
///
/// An encrypting instance seals a single packet per `init`; further encryption fails with
/// [`Error::MisuseDetected`] until it is re-initialised with a fresh nonce.
///
/// [`process_bytes`]: AeadCipher::process_bytes
/// [`do_final`]: AeadCipher::do_final
/// [`process_packet`]: CcmBlockCipher::process_packet
pub struct CcmBlockCipher<C: BlockCipher = AesEngine> {
    cipher: C,
    for_encryption: bool,
    key: Option<KeyParameter>,
    nonce: Vec<u8>,
    initial_associated_text: Option<Vec<u8>>,
    mac_size: usize,
    mac_block: Tag,
    associated_text: Vec<u8>,
    data: Vec<u8>,
    sealed: bool,
}

impl Default for CcmBlockCipher<AesEngine> {
    fn default() -> Self {
        Self::with_cipher(AesEngine::new())
    }
}

impl<C: BlockCipher> CcmBlockCipher<C> {
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the cipher's block size is not 16.
    pub fn new(cipher: C) -> Result<Self, Error> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(Error::InvalidParameter("cipher required with a block size of 16"));
        }
        Ok(Self::with_cipher(cipher))
    }

    fn with_cipher(cipher: C) -> Self {
        Self {
            cipher,
            for_encryption: false,
            key: None,
            nonce: Vec::new(),
            initial_associated_text: None,
            mac_size: 8,
            mac_block: Tag::zeroed(8),
            associated_text: Vec::new(),
            data: Vec::new(),
            sealed: false,
        }
    }

    /// The wrapped block cipher.
    pub const fn underlying_cipher(&self) -> &C {
        &self.cipher
    }

    fn check_status(&self) -> Result<(), Error> {
        if self.key.is_none() {
            Err(NOT_INITIALISED)
        } else if self.for_encryption && self.sealed {
            Err(ALREADY_SEALED)
        } else {
            Ok(())
        }
    }

    fn associated_text_len(&self) -> usize {
        self.initial_associated_text.as_ref().map_or(0, Vec::len) + self.associated_text.len()
    }

    /// Encrypts or decrypts a complete packet, independent of any buffered input.
    ///
    /// On encryption `output` receives the ciphertext followed by the tag, on decryption the
    /// trailing tag of `input` is verified and the plaintext written. Associated data buffered
    /// through [`process_aad_bytes`](AeadCipher::process_aad_bytes) is included.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before `init`.
    /// - [`Error::MisuseDetected`] if this instance already encrypted a packet since `init`.
    /// - [`Error::InvalidParameter`] if the packet is too large for the nonce length.
    /// - [`Error::DataTooShort`] if decrypting and `input` is shorter than the tag.
    /// - [`Error::OutputTooShort`] if `output` cannot hold the result.
    /// - [`Error::AuthenticationFailed`] if the tag does not verify, `output` is wiped.
    pub fn process_packet(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        self.check_status()?;
        let key = self.key.clone().ok_or(NOT_INITIALISED)?;

        let n = self.nonce.len();
        let q = 15 - n;
        if q < 4 && input.len() as u64 >= 1u64 << (8 * q) {
            return Err(Error::InvalidParameter("CCM packet too large for choice of q"));
        }

        let mut iv = [0u8; BLOCK_SIZE];
        iv[0] = ((q - 1) & 0x7) as u8;
        iv[1..=n].copy_from_slice(&self.nonce);
        let ctr_params: CipherParameters = ParametersWithIv::new(key, &iv).into();

        if self.for_encryption {
            let len = self.encrypt_packet(&ctr_params, input, output)?;
            self.sealed = true;
            Ok(len)
        } else {
            self.decrypt_packet(&ctr_params, input, output)
        }
    }

    fn encrypt_packet(
        &mut self,
        ctr_params: &CipherParameters,
        input: &[u8],
        output: &mut [u8]
    ) -> Result<usize, Error> {
        let out_len = input.len() + self.mac_size;
        if output.len() < out_len {
            return Err(Error::OutputTooShort);
        }

        let mut mac_block = self.calculate_mac(input)?;

        let mut ctr = SicBlockCipher::new(&mut self.cipher);
        ctr.init(true, ctr_params)?;

        // counter block zero masks the tag, the message starts at one
        let mut enc_mac = [0u8; BLOCK_SIZE];
        ctr.process_block(&mac_block, &mut enc_mac)?;
        StreamCipher::process_bytes(&mut ctr, input, &mut output[..input.len()])?;

        output[input.len()..out_len].copy_from_slice(&enc_mac[..self.mac_size]);
        self.mac_block = Tag::new(&enc_mac[..self.mac_size]);

        mac_block.zeroize();
        Ok(out_len)
    }

    fn decrypt_packet(
        &mut self,
        ctr_params: &CipherParameters,
        input: &[u8],
        output: &mut [u8]
    ) -> Result<usize, Error> {
        if input.len() < self.mac_size {
            return Err(Error::DataTooShort("data too short"));
        }
        let out_len = input.len() - self.mac_size;
        if output.len() < out_len {
            return Err(Error::OutputTooShort);
        }

        let (body, received) = input.split_at(out_len);

        let mut ctr = SicBlockCipher::new(&mut self.cipher);
        ctr.init(false, ctr_params)?;

        let mut enc_mac = [0u8; BLOCK_SIZE];
        enc_mac[..self.mac_size].copy_from_slice(received);
        let mut expected = [0u8; BLOCK_SIZE];
        ctr.process_block(&enc_mac, &mut expected)?;
        StreamCipher::process_bytes(&mut ctr, body, &mut output[..out_len])?;

        let mut calculated = self.calculate_mac(&output[..out_len])?;
        let res = ct::ct_eq_res(&expected[..self.mac_size], &calculated[..self.mac_size]);

        self.mac_block = Tag::new(received);
        expected.zeroize();
        calculated.zeroize();

        if res.is_err() {
            output[..out_len].zeroize();
            log::warn!("CCM authentication failed");
            return Err(Error::AuthenticationFailed("mac check in CCM failed"));
        }

        Ok(out_len)
    }

    /// CBC-MAC over `B0`, the length prefixed associated data and `data`.
    fn calculate_mac(&mut self, data: &[u8]) -> Result<[u8; BLOCK_SIZE], Error> {
        let key = self.key.clone().ok_or(NOT_INITIALISED)?;
        let text_len = self.associated_text_len();

        let mut b0 = [0u8; BLOCK_SIZE];
        if text_len > 0 {
            b0[0] |= 0x40;
        }
        b0[0] |= ((((self.mac_size - 2) / 2) & 0x7) << 3) as u8;
        b0[0] |= ((14 - self.nonce.len()) & 0x7) as u8;
        b0[1..=self.nonce.len()].copy_from_slice(&self.nonce);

        let q = 15 - self.nonce.len();
        let mut len = data.len() as u64;
        for b in b0[BLOCK_SIZE - q..].iter_mut().rev() {
            *b = len as u8;
            len >>= 8;
        }

        let mut mac = CbcBlockCipherMac::with_mac_size(&mut self.cipher, self.mac_size * 8)?;
        mac.init(&CipherParameters::Key(key))?;
        mac.update_bytes(&b0)?;

        if text_len > 0 {
            let prefix_len = if text_len < (1 << 16) - (1 << 8) {
                mac.update_bytes(&(text_len as u16).to_be_bytes())?;
                2
            } else {
                mac.update_bytes(&[0xff, 0xfe])?;
                mac.update_bytes(&(text_len as u32).to_be_bytes())?;
                6
            };

            if let Some(text) = &self.initial_associated_text {
                mac.update_bytes(text)?;
            }
            mac.update_bytes(&self.associated_text)?;

            let used = (prefix_len + text_len) % BLOCK_SIZE;
            if used != 0 {
                mac.update_bytes(&[0u8; BLOCK_SIZE][used..])?;
            }
        }

        mac.update_bytes(data)?;

        let mut out = [0u8; BLOCK_SIZE];
        mac.do_final(&mut out)?;
        Ok(out)
    }
}

impl<C: BlockCipher> AeadCipher for CcmBlockCipher<C> {
    fn algorithm_name(&self) -> String {
        format!("{}/CCM", self.cipher.algorithm_name())
    }

    fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error> {
        let (params, _) = params.split_random();
        let (key, mac_bits, nonce, associated_text) = match params {
            CipherParameters::Aead(p) => {
                (p.key(), p.mac_size_bits(), p.nonce(), p.associated_text())
            }
            CipherParameters::WithIv(p) => {
                let key = match p.parameters() {
                    Some(inner) => Some(inner.as_key("invalid parameters passed to CCM")?),
                    None => None,
                };
                (key, 64, p.iv(), None)
            }
            _ => return Err(Error::InvalidParameter("invalid parameters passed to CCM")),
        };

        if !(32..=128).contains(&mac_bits) || mac_bits % 16 != 0 {
            return Err(Error::InvalidParameter(
                "tag length in octets must be one of {4,6,8,10,12,14,16}"
            ));
        }
        if !(7..=13).contains(&nonce.len()) {
            return Err(Error::InvalidParameter("nonce must have length from 7 to 13 octets"));
        }

        if for_encryption && self.nonce == nonce {
            let same_key = match (key, &self.key) {
                (None, _) => true,
                (Some(new), Some(last)) => ct::ct_eq(new.key(), last.key()),
                (Some(_), None) => false,
            };
            if same_key {
                log::warn!("CCM nonce reuse for encryption rejected");
                return Err(Error::MisuseDetected("cannot reuse nonce for CCM encryption"));
            }
        }

        match key {
            Some(key) => self.key = Some(key.clone()),
            None if self.key.is_none() => {
                return Err(Error::InvalidParameter("key must be specified in initial init"));
            }
            None => {}
        }

        self.for_encryption = for_encryption;
        self.mac_size = mac_bits / 8;
        self.nonce.zeroize();
        self.nonce.extend_from_slice(nonce);
        self.initial_associated_text = associated_text.map(<[u8]>::to_vec);
        self.mac_block = Tag::zeroed(self.mac_size);
        self.sealed = false;
        self.reset();

        log::debug!(
            "CCM initialised: encrypt={}, nonce_len={}, tag_len={}",
            for_encryption, nonce.len(), self.mac_size
        );
        Ok(())
    }

    fn mac_size(&self) -> usize {
        self.mac_size
    }

    fn process_aad_byte(&mut self, input: u8) -> Result<(), Error> {
        self.check_status()?;
        self.associated_text.push(input);
        Ok(())
    }

    fn process_aad_bytes(&mut self, input: &[u8]) -> Result<(), Error> {
        self.check_status()?;
        self.associated_text.extend_from_slice(input);
        Ok(())
    }

    fn process_byte(&mut self, input: u8, _output: &mut [u8]) -> Result<usize, Error> {
        self.check_status()?;
        self.data.push(input);
        Ok(0)
    }

    fn process_bytes(&mut self, input: &[u8], _output: &mut [u8]) -> Result<usize, Error> {
        self.check_status()?;
        self.data.extend_from_slice(input);
        Ok(0)
    }

    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        self.check_status()?;
        if output.len() < self.output_size(0) {
            return Err(Error::OutputTooShort);
        }

        let mut data = mem::take(&mut self.data);
        let res = self.process_packet(&data, output);

        data.zeroize();
        self.data = data;
        self.reset();
        res
    }

    fn mac(&self) -> Tag {
        self.mac_block
    }

    fn update_output_size(&self, _len: usize) -> usize {
        0
    }

    fn output_size(&self, len: usize) -> usize {
        let total = len + self.data.len();
        if self.for_encryption {
            total + self.mac_size
        } else {
            total.saturating_sub(self.mac_size)
        }
    }

    fn reset(&mut self) {
        self.cipher.reset();
        self.associated_text.zeroize();
        self.data.zeroize();
    }
}

impl<C: BlockCipher> Drop for CcmBlockCipher<C> {
    fn drop(&mut self) {
        self.associated_text.zeroize();
        self.data.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use hex_literal::hex;
    use crate::aead::AesCcm;
    use crate::params::AeadParameters;

    const KEY: [u8; 16] = hex!("404142434445464748494a4b4c4d4e4f");

    fn seal(ccm: &mut AesCcm, aad: &[u8], input: &[u8]) -> Result<Vec<u8>, Error> {
        ccm.process_aad_bytes(aad)?;
        assert_eq!(ccm.process_bytes(input, &mut [])?, 0);
        let mut out = vec![0u8; ccm.output_size(0)];
        let n = ccm.do_final(&mut out)?;
        out.truncate(n);
        Ok(out)
    }

    fn params(bits: usize, nonce: &[u8]) -> CipherParameters {
        AeadParameters::new(KeyParameter::new(&KEY), bits, nonce).into()
    }

    #[test]
    fn random_wrapper_is_unwrapped() {
        use crate::params::ParametersWithRandom;
        use crate::random::NonCryptoRandom;

        let nonce = hex!("10111213141516");
        let wrapped: CipherParameters =
            ParametersWithRandom::new(params(32, &nonce), NonCryptoRandom::new(9)).into();

        let mut ccm = AesCcm::default();
        ccm.init(true, &wrapped).unwrap();
        assert_eq!(
            seal(&mut ccm, &hex!("0001020304050607"), &hex!("20212223")).unwrap(),
            hex!("7162015b4dac255d")
        );
    }

    #[test]
    fn one_packet_per_encrypting_init() {
        let nonce = [5u8; 12];
        let mut ccm = AesCcm::default();
        ccm.init(true, &params(64, &nonce)).unwrap();
        let first = seal(&mut ccm, &[], b"first message").unwrap();

        assert_eq!(seal(&mut ccm, &[], b"second message"), Err(ALREADY_SEALED));
        let mut out = [0u8; 32];
        assert_eq!(ccm.process_packet(b"third", &mut out), Err(ALREADY_SEALED));
        assert_eq!(ccm.do_final(&mut out), Err(ALREADY_SEALED));

        // a fresh nonce re-arms encryption
        ccm.init(true, &params(64, &[6u8; 12])).unwrap();
        assert_eq!(ccm.process_packet(b"third", &mut out), Ok(13));

        // decryption stays usable for the same nonce
        let mut dec = AesCcm::default();
        dec.init(false, &params(64, &nonce)).unwrap();
        assert_eq!(seal(&mut dec, &[], &first).unwrap(), b"first message");
        assert_eq!(seal(&mut dec, &[], &first).unwrap(), b"first message");
    }

    // SP 800-38C C.1 to C.3
    #[test]
    fn sp800_38c_examples() {
        let cases: [(usize, &[u8], &[u8], &[u8], &[u8]); 3] = [
            (
                32,
                &hex!("10111213141516"),
                &hex!("0001020304050607"),
                &hex!("20212223"),
                &hex!("7162015b4dac255d"),
            ),
            (
                48,
                &hex!("1011121314151617"),
                &hex!("000102030405060708090a0b0c0d0e0f"),
                &hex!("202122232425262728292a2b2c2d2e2f"),
                &hex!("d2a1f0e051ea5f62081a7792073d593d1fc64fbfaccd"),
            ),
            (
                64,
                &hex!("101112131415161718191a1b"),
                &hex!("000102030405060708090a0b0c0d0e0f10111213"),
                &hex!("202122232425262728292a2b2c2d2e2f3031323334353637"),
                &hex!(
                    "e3b201a9f5b71a7a9b1ceaeccd97e70b"
                    "6176aad9a4428aa5484392fbc1b09951"
                ),
            ),
        ];

        for (bits, nonce, aad, plain, sealed) in cases {
            let mut ccm = AesCcm::default();
            ccm.init(true, &params(bits, nonce)).unwrap();
            assert_eq!(seal(&mut ccm, aad, plain).unwrap(), sealed);
            assert_eq!(ccm.mac().as_slice(), &sealed[plain.len()..]);

            let mut ccm = AesCcm::default();
            ccm.init(false, &params(bits, nonce)).unwrap();
            assert_eq!(seal(&mut ccm, aad, sealed).unwrap(), plain);
        }
    }

    #[test]
    fn process_packet_one_shot() {
        let nonce = hex!("101112131415161718191a1b");
        let params: CipherParameters = AeadParameters::new(KeyParameter::new(&KEY), 64, &nonce)
            .with_associated_text(&hex!("000102030405060708090a0b0c0d0e0f10111213"))
            .into();
        let plain = hex!("202122232425262728292a2b2c2d2e2f3031323334353637");

        let mut ccm = AesCcm::default();
        ccm.init(true, &params).unwrap();
        let mut sealed = [0u8; 32];
        assert_eq!(ccm.process_packet(&plain, &mut sealed), Ok(32));
        assert_eq!(sealed[24..], hex!("484392fbc1b09951"));

        ccm.init(false, &params).unwrap();
        let mut opened = [0u8; 24];
        assert_eq!(ccm.process_packet(&sealed, &mut opened), Ok(24));
        assert_eq!(opened, plain);
        assert_eq!(ccm.algorithm_name(), "AES/CCM");
    }

    #[test]
    fn long_associated_data_prefix() {
        let key = hex!("0102030405060708090a0b0c0d0e0f10");
        let nonce = hex!("1112131415161718191a1b1c");
        let aad: Vec<u8> = (0..0xff00usize).map(|i| (i % 251) as u8).collect();

        let mut ccm = AesCcm::default();
        ccm.init(true, &AeadParameters::new(KeyParameter::new(&key), 128, &nonce).into()).unwrap();
        assert_eq!(
            seal(&mut ccm, &aad, b"abc").unwrap(),
            hex!("2d2f713f236f10c75a1d80a62081805c769592")
        );
    }

    #[test]
    fn parameter_validation() {
        let mut ccm = AesCcm::default();
        for bits in [0, 24, 40, 72, 144] {
            assert!(matches!(
                ccm.init(true, &params(bits, &[0u8; 12])),
                Err(Error::InvalidParameter(_))
            ));
        }
        for len in [0, 6, 14] {
            assert!(matches!(
                ccm.init(true, &params(64, &[0u8; 14][..len])),
                Err(Error::InvalidParameter(_))
            ));
        }

        assert!(matches!(
            ccm.init(true, &ParametersWithIv::iv_only(&[0u8; 12]).into()),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(ccm.process_aad_byte(0), Err(NOT_INITIALISED));

        ccm.init(true, &ParametersWithIv::new(KeyParameter::new(&KEY), &[0u8; 12]).into())
            .unwrap();
        assert_eq!(ccm.mac_size(), 8);
    }

    #[test]
    fn packet_size_limit() {
        // a 13 byte nonce leaves two length bytes
        let mut ccm = AesCcm::default();
        ccm.init(true, &params(32, &[0u8; 13])).unwrap();

        let big = vec![0u8; 1 << 16];
        let mut out = vec![0u8; big.len() + 4];
        assert!(matches!(ccm.process_packet(&big, &mut out), Err(Error::InvalidParameter(_))));
        assert_eq!(ccm.process_packet(&big[1..], &mut out), Ok(big.len() - 1 + 4));
    }

    #[test]
    fn tampering_fails() {
        let nonce = hex!("10111213141516");
        let mut sealed = hex!("7162015b4dac255d");
        sealed[5] ^= 0x01;

        let mut ccm = AesCcm::default();
        ccm.init(false, &params(32, &nonce)).unwrap();
        assert!(matches!(
            seal(&mut ccm, &hex!("0001020304050607"), &sealed),
            Err(Error::AuthenticationFailed(_))
        ));

        assert!(matches!(seal(&mut ccm, &[], &sealed[..3]), Err(Error::DataTooShort(_))));
    }

    #[test]
    fn nonce_reuse_rejected() {
        let nonce = [7u8; 12];
        let mut ccm = AesCcm::default();
        ccm.init(true, &params(64, &nonce)).unwrap();

        assert!(matches!(ccm.init(true, &params(64, &nonce)), Err(Error::MisuseDetected(_))));
        assert!(matches!(
            ccm.init(true, &AeadParameters::without_key(64, &nonce).into()),
            Err(Error::MisuseDetected(_))
        ));
        assert_eq!(ccm.init(true, &params(64, &[8u8; 12])), Ok(()));
        assert_eq!(ccm.init(false, &params(64, &[8u8; 12])), Ok(()));
    }

    #[test]
    fn short_output_keeps_buffered_data() {
        let mut ccm = AesCcm::default();
        ccm.init(true, &params(64, &[1u8; 12])).unwrap();
        ccm.process_bytes(b"buffered", &mut []).unwrap();

        assert_eq!(ccm.output_size(0), 16);
        let mut out = [0u8; 15];
        assert_eq!(ccm.do_final(&mut out), Err(Error::OutputTooShort));

        let mut out = [0u8; 16];
        assert_eq!(ccm.do_final(&mut out), Ok(16));
    }

    #[test]
    fn empty_message() {
        let mut ccm = AesCcm::default();
        ccm.init(true, &params(64, &[3u8; 12])).unwrap();
        let sealed = seal(&mut ccm, &[], &[]).unwrap();
        assert_eq!(sealed.len(), 8);

        let mut ccm = AesCcm::default();
        ccm.init(false, &params(64, &[3u8; 12])).unwrap();
        assert_eq!(seal(&mut ccm, &[], &sealed).unwrap(), b"");
    }
}

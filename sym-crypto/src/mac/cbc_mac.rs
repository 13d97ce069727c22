use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroize;

use crate::cipher::BlockCipher;
use crate::error::Error;
use crate::modes::CbcBlockCipher;
use crate::paddings::BlockCipherPadding;
use crate::params::CipherParameters;
use super::Mac;

const NOT_INITIALISED: Error = Error::NotInitialized("CBC-MAC uninitialised");

/// A MAC from the last block of a CBC encryption under a zero IV.
///
/// The final partial block is zero filled unless a padding is supplied. The full block is
/// truncated to the configured MAC size.
///
/// # Security
///
/// Plain CBC-MAC is only secure for messages of one fixed length. CCM prefixes the message
/// length for this reason.
pub struct CbcBlockCipherMac<C: BlockCipher> {
    cipher: CbcBlockCipher<C>,
    padding: Option<Box<dyn BlockCipherPadding>>,
    buf: Vec<u8>,
    buf_off: usize,
    mac: Vec<u8>,
    mac_size: usize,
    initialised: bool,
}

impl<C: BlockCipher> CbcBlockCipherMac<C> {
    /// A MAC half the block size of `cipher`.
    pub fn new(cipher: C) -> Self {
        let bits = cipher.block_size() * 8 / 2;
        Self::build(cipher, bits, None)
    }

    /// A MAC of `mac_size_bits`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] unless `mac_size_bits` is a multiple of 8 no larger than the
    /// block.
    pub fn with_mac_size(cipher: C, mac_size_bits: usize) -> Result<Self, Error> {
        Self::checked(cipher, mac_size_bits, None)
    }

    /// A MAC of `mac_size_bits` padding the final block with `padding`.
    ///
    /// # Errors
    ///
    /// As [`with_mac_size`](Self::with_mac_size).
    pub fn with_padding(
        cipher: C,
        mac_size_bits: usize,
        padding: Box<dyn BlockCipherPadding>
    ) -> Result<Self, Error> {
        Self::checked(cipher, mac_size_bits, Some(padding))
    }

    fn checked(
        cipher: C,
        mac_size_bits: usize,
        padding: Option<Box<dyn BlockCipherPadding>>
    ) -> Result<Self, Error> {
        if mac_size_bits % 8 != 0 {
            return Err(Error::InvalidParameter("MAC size must be multiple of 8"));
        }
        if mac_size_bits == 0 || mac_size_bits > cipher.block_size() * 8 {
            return Err(Error::InvalidParameter("MAC size must be no larger than the block"));
        }
        Ok(Self::build(cipher, mac_size_bits, padding))
    }

    fn build(cipher: C, mac_size_bits: usize, padding: Option<Box<dyn BlockCipherPadding>>) -> Self {
        let bs = cipher.block_size();
        Self {
            cipher: CbcBlockCipher::new(cipher),
            padding,
            buf: vec![0; bs],
            buf_off: 0,
            mac: vec![0; bs],
            mac_size: mac_size_bits / 8,
            initialised: false,
        }
    }

    fn chain(&mut self, block: &[u8]) -> Result<(), Error> {
        self.cipher.process_block(block, &mut self.mac).map(|_| ())
    }

    fn chain_buffer(&mut self) -> Result<(), Error> {
        self.cipher.process_block(&self.buf, &mut self.mac)?;
        self.buf_off = 0;
        Ok(())
    }
}

impl<C: BlockCipher> Mac for CbcBlockCipherMac<C> {
    fn algorithm_name(&self) -> String {
        format!("{}-MAC", self.cipher.algorithm_name())
    }

    fn init(&mut self, params: &CipherParameters) -> Result<(), Error> {
        self.reset();
        self.initialised = false;

        let (params, random) = params.split_random();
        if let Some(padding) = self.padding.as_mut() {
            padding.init(random);
        }

        self.cipher.init(true, params)?;
        self.initialised = true;
        Ok(())
    }

    #[inline]
    fn mac_size(&self) -> usize {
        self.mac_size
    }

    fn update(&mut self, input: u8) -> Result<(), Error> {
        if !self.initialised {
            return Err(NOT_INITIALISED);
        }
        if self.buf_off == self.buf.len() {
            self.chain_buffer()?;
        }

        self.buf[self.buf_off] = input;
        self.buf_off += 1;
        Ok(())
    }

    fn update_bytes(&mut self, mut input: &[u8]) -> Result<(), Error> {
        if !self.initialised {
            return Err(NOT_INITIALISED);
        }

        let bs = self.buf.len();
        let gap = bs - self.buf_off;

        // a full block stays buffered so do_final always has one to pad
        if input.len() > gap {
            self.buf[self.buf_off..].copy_from_slice(&input[..gap]);
            self.chain_buffer()?;
            input = &input[gap..];

            while input.len() > bs {
                self.chain(&input[..bs])?;
                input = &input[bs..];
            }
        }

        self.buf[self.buf_off..self.buf_off + input.len()].copy_from_slice(input);
        self.buf_off += input.len();
        Ok(())
    }

    fn do_final(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        if !self.initialised {
            return Err(NOT_INITIALISED);
        }
        if output.len() < self.mac_size {
            return Err(Error::OutputTooShort);
        }

        if let Some(padding) = self.padding.as_mut() {
            if self.buf_off == self.buf.len() {
                self.cipher.process_block(&self.buf, &mut self.mac)?;
                self.buf_off = 0;
            }
            padding.add_padding(&mut self.buf, self.buf_off);
        } else {
            self.buf[self.buf_off..].fill(0);
        }

        self.chain_buffer()?;
        output[..self.mac_size].copy_from_slice(&self.mac[..self.mac_size]);

        self.reset();
        Ok(self.mac_size)
    }

    fn reset(&mut self) {
        self.buf.as_mut_slice().zeroize();
        self.mac.as_mut_slice().zeroize();
        self.buf_off = 0;
        self.cipher.reset();
    }
}

impl<C: BlockCipher> Drop for CbcBlockCipherMac<C> {
    fn drop(&mut self) {
        self.buf.as_mut_slice().zeroize();
        self.mac.as_mut_slice().zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use crate::aes::AesEngine;
    use crate::paddings::Pkcs7Padding;
    use crate::params::KeyParameter;

    const KEY: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");
    const PLAIN: [u8; 32] = hex!(
        "6bc1bee22e409f96e93d7e117393172a"
        "ae2d8a571e03ac9c9eb76fac45af8e51"
    );

    fn keyed(mut mac: CbcBlockCipherMac<AesEngine>) -> CbcBlockCipherMac<AesEngine> {
        mac.init(&KeyParameter::new(&KEY).into()).unwrap();
        mac
    }

    fn full_mac() -> CbcBlockCipherMac<AesEngine> {
        keyed(CbcBlockCipherMac::with_mac_size(AesEngine::new(), 128).unwrap())
    }

    #[test]
    fn aligned_message() {
        let mut mac = full_mac();
        mac.update_bytes(&PLAIN).unwrap();

        let mut out = [0u8; 16];
        assert_eq!(mac.do_final(&mut out), Ok(16));
        assert_eq!(out, hex!("b148c17f309ee692287ae57cf12add49"));
    }

    #[test]
    fn zero_filled_tail() {
        let mut mac = full_mac();
        for b in &PLAIN[..20] {
            mac.update(*b).unwrap();
        }

        let mut out = [0u8; 16];
        mac.do_final(&mut out).unwrap();
        assert_eq!(out, hex!("6e88a8636087aac6a0507cfa4d958581"));

        // the empty message is one zero block
        mac.do_final(&mut out).unwrap();
        assert_eq!(out, hex!("7df76b0c1ab899b33e42f047b91b546f"));
    }

    #[test]
    fn padded_tail() {
        let mut mac = keyed(
            CbcBlockCipherMac::with_padding(AesEngine::new(), 128, Box::new(Pkcs7Padding)).unwrap()
        );

        mac.update_bytes(&PLAIN[..20]).unwrap();
        let mut out = [0u8; 16];
        mac.do_final(&mut out).unwrap();
        assert_eq!(out, hex!("f8db671f4c688065ad607a1a5fe39f01"));

        // an aligned message gains a whole block of padding
        mac.update_bytes(&PLAIN[..16]).unwrap();
        mac.update_bytes(&PLAIN[16..]).unwrap();
        mac.do_final(&mut out).unwrap();
        assert_eq!(out, hex!("7565e3be911c2c899294914db4d887c3"));
    }

    #[test]
    fn default_size_is_half_block() {
        let mut mac = keyed(CbcBlockCipherMac::new(AesEngine::new()));
        assert_eq!(mac.mac_size(), 8);
        assert_eq!(mac.algorithm_name(), "AES/CBC-MAC");

        mac.update_bytes(&PLAIN).unwrap();
        let mut out = [0u8; 8];
        assert_eq!(mac.do_final(&mut out), Ok(8));
        assert_eq!(out, hex!("b148c17f309ee692"));
    }

    #[test]
    fn mac_size_validation() {
        for bits in [0, 12, 136] {
            assert!(matches!(
                CbcBlockCipherMac::with_mac_size(AesEngine::new(), bits),
                Err(Error::InvalidParameter(_))
            ));
        }
        assert!(CbcBlockCipherMac::with_mac_size(AesEngine::new(), 32).is_ok());
    }

    #[test]
    fn lifecycle_errors() {
        let mut mac = CbcBlockCipherMac::new(AesEngine::new());
        assert_eq!(mac.update(0), Err(NOT_INITIALISED));
        assert_eq!(mac.do_final(&mut [0u8; 8]), Err(NOT_INITIALISED));

        let mut mac = keyed(mac);
        assert_eq!(mac.do_final(&mut [0u8; 7]), Err(Error::OutputTooShort));
    }
}

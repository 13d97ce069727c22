use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroize;

use crate::cipher::BlockCipher;
use crate::error::Error;
use crate::params::CipherParameters;

/// Cipher block chaining.
///
/// `cbc_v` holds the mask for the next block, the previous ciphertext or the IV. Decryption keeps
/// the incoming ciphertext in `cbc_next_v` and swaps the registers after every block.
///
/// Initialising with plain key parameters uses an all zero IV. A [`ParametersWithIv`] without
/// inner parameters only replaces the IV and keeps the current key.
///
/// [`ParametersWithIv`]: crate::params::ParametersWithIv
pub struct CbcBlockCipher<C: BlockCipher> {
    cipher: C,
    iv: Vec<u8>,
    cbc_v: Vec<u8>,
    cbc_next_v: Vec<u8>,
    block_size: usize,
    for_encryption: bool,
}

impl<C: BlockCipher> CbcBlockCipher<C> {
    pub fn new(cipher: C) -> Self {
        let block_size = cipher.block_size();
        Self {
            cipher,
            iv: vec![0; block_size],
            cbc_v: vec![0; block_size],
            cbc_next_v: vec![0; block_size],
            block_size,
            for_encryption: true,
        }
    }

    /// The wrapped block cipher.
    pub const fn underlying_cipher(&self) -> &C {
        &self.cipher
    }

    fn encrypt_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        for (v, i) in self.cbc_v.iter_mut().zip(input) {
            *v ^= *i;
        }

        let len = self.cipher.process_block(&self.cbc_v, output)?;
        self.cbc_v.copy_from_slice(&output[..self.block_size]);
        Ok(len)
    }

    fn decrypt_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        self.cbc_next_v.copy_from_slice(&input[..self.block_size]);

        let len = self.cipher.process_block(input, output)?;
        for (o, v) in output.iter_mut().zip(&self.cbc_v) {
            *o ^= *v;
        }

        core::mem::swap(&mut self.cbc_v, &mut self.cbc_next_v);
        Ok(len)
    }
}

impl<C: BlockCipher> BlockCipher for CbcBlockCipher<C> {
    fn algorithm_name(&self) -> String {
        format!("{}/CBC", self.cipher.algorithm_name())
    }

    fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), Error> {
        let (params, _) = params.split_random();
        let old_encrypting = self.for_encryption;
        self.for_encryption = for_encryption;

        if let CipherParameters::WithIv(p) = params {
            if p.iv().len() != self.block_size {
                return Err(Error::InvalidParameter(
                    "initialisation vector must be the same length as block size"
                ));
            }
            self.iv.copy_from_slice(p.iv());
            self.reset();

            match p.parameters() {
                Some(inner) => self.cipher.init(for_encryption, inner),
                None if old_encrypting != for_encryption => Err(Error::InvalidParameter(
                    "cannot change encrypting state without providing key"
                )),
                None => Ok(()),
            }
        } else {
            self.iv.fill(0);
            self.reset();
            self.cipher.init(for_encryption, params)
        }
    }

    #[inline]
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        if input.len() < self.block_size {
            return Err(Error::DataTooShort("input buffer too short"));
        }
        if output.len() < self.block_size {
            return Err(Error::OutputTooShort);
        }

        if self.for_encryption {
            self.encrypt_block(input, output)
        } else {
            self.decrypt_block(input, output)
        }
    }

    fn reset(&mut self) {
        self.cbc_v.copy_from_slice(&self.iv);
        self.cbc_next_v.as_mut_slice().zeroize();
        self.cipher.reset();
    }
}

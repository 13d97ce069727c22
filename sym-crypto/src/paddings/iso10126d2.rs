use rand_core::RngCore;

use crate::error::Error;
use crate::random::NonCryptoRandom;
use super::{BlockCipherPadding, CORRUPTED};

/// ISO 10126-2: random fill bytes with the pad length in the final byte.
#[derive(Clone, Debug, Default)]
pub struct Iso10126d2Padding {
    random: NonCryptoRandom,
}

impl Iso10126d2Padding {
    pub const fn new(random: NonCryptoRandom) -> Self {
        Self { random }
    }
}

impl BlockCipherPadding for Iso10126d2Padding {
    fn init(&mut self, random: Option<&NonCryptoRandom>) {
        if let Some(random) = random {
            self.random = random.clone();
        }
    }

    fn padding_name(&self) -> &'static str {
        "ISO10126-2"
    }

    fn add_padding(&mut self, block: &mut [u8], offset: usize) -> usize {
        let code = block.len() - offset;
        let last = block.len() - 1;

        self.random.fill_bytes(&mut block[offset..last]);
        block[last] = code as u8;
        code
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize, Error> {
        match block.last() {
            Some(&count) if count != 0 && usize::from(count) <= block.len() => Ok(count.into()),
            _ => Err(CORRUPTED),
        }
    }
}

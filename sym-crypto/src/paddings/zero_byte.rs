use crate::error::Error;
use super::BlockCipherPadding;

/// Zero fill. Ambiguous for messages ending in zero bytes, the pad count is the number of
/// trailing zeros.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroBytePadding;

impl BlockCipherPadding for ZeroBytePadding {
    fn padding_name(&self) -> &'static str {
        "ZeroByte"
    }

    fn add_padding(&mut self, block: &mut [u8], offset: usize) -> usize {
        block[offset..].fill(0);
        block.len() - offset
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize, Error> {
        Ok(block.iter().rev().take_while(|&&b| b == 0).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_trailing_zeros() {
        let mut block = [7u8; 8];
        assert_eq!(ZeroBytePadding.add_padding(&mut block, 6), 2);
        assert_eq!(ZeroBytePadding.pad_count(&block), Ok(2));
        assert_eq!(ZeroBytePadding.pad_count(&[1u8; 8]), Ok(0));
    }
}

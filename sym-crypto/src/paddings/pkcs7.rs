use crate::ct;
use crate::error::Error;
use crate::opaque_res::Res;
use super::{BlockCipherPadding, CORRUPTED};

/// PKCS#7: every padding byte holds the padding length.
#[derive(Copy, Clone, Debug, Default)]
pub struct Pkcs7Padding;

impl BlockCipherPadding for Pkcs7Padding {
    fn padding_name(&self) -> &'static str {
        "PKCS7"
    }

    fn add_padding(&mut self, block: &mut [u8], offset: usize) -> usize {
        let code = block.len() - offset;
        block[offset..].fill(code as u8);
        code
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize, Error> {
        let len = block.len();
        let Some(&last) = block.last() else { return Err(CORRUPTED) };
        let count = u32::from(last);

        let mut res = Res::new();
        res.ensure_mask(ct::lte(count, len as u32) as u8);
        res.ensure_mask(ct::byte_eq(last, 0) ^ 1);

        // every byte inside the claimed pad must equal the count
        let mut failed = 0u8;
        for (i, &b) in block.iter().enumerate() {
            let in_pad = ct::lte((len - i) as u32, count) as u8;
            failed |= in_pad & (ct::byte_eq(b, last) ^ 1);
        }
        res.ensure_mask(failed ^ 1);

        res.unit_err(count as usize, CORRUPTED)
    }
}

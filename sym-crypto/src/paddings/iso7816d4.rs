use crate::ct;
use crate::error::Error;
use super::{BlockCipherPadding, CORRUPTED};

/// ISO 7816-4: a single `0x80` marker followed by zero bytes.
#[derive(Copy, Clone, Debug, Default)]
pub struct Iso7816d4Padding;

impl BlockCipherPadding for Iso7816d4Padding {
    fn padding_name(&self) -> &'static str {
        "ISO7816-4"
    }

    fn add_padding(&mut self, block: &mut [u8], offset: usize) -> usize {
        let added = block.len() - offset;
        block[offset] = 0x80;
        block[offset + 1..].fill(0);
        added
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize, Error> {
        let mut found = 0u32;
        let mut bad = 0u32;
        let mut count = 0u32;

        // scan from the end, every byte before the marker is reached must be zero
        for &b in block.iter().rev() {
            let searching = found ^ 1;
            let is_zero = u32::from(ct::byte_eq(b, 0));
            let is_marker = u32::from(ct::byte_eq(b, 0x80));

            bad |= (searching & (is_zero | is_marker)) ^ searching;
            count += searching;
            found |= searching & is_marker;
        }

        if (bad | (found ^ 1)) == 0 {
            Ok(count as usize)
        } else {
            Err(CORRUPTED)
        }
    }
}

//! Confidentiality-only modes of operation.
//!
//! Both modes wrap any [`BlockCipher`](crate::cipher::BlockCipher), owned or borrowed.
mod cbc;
mod ctr;

pub use cbc::CbcBlockCipher;
pub use ctr::SicBlockCipher;

/// Alias for the segmented integer counter mode under its usual name.
pub type CtrBlockCipher<C> = SicBlockCipher<C>;

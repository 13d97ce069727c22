//! Portable symmetric cryptography.
//!
//! Block ciphers, modes of operation, authenticated encryption, digests and MACs written in safe
//! Rust, operating purely on caller supplied byte buffers. Every primitive follows the same
//! lifecycle: construct once, [`init`] per message with a [`CipherParameters`], feed bytes, then
//! finish with `do_final` which returns the instance to a clean, re-usable state.
//!
//! [`init`]: cipher::BlockCipher::init
//! [`CipherParameters`]: params::CipherParameters
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(
    clippy::pedantic,
    clippy::nursery,
    clippy::all
)]
// block and word arithmetic narrows deliberately, all widths are fixed by the algorithms.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::inline_always)]
// constant-time bitwise hacks
#![allow(clippy::cast_sign_loss)]
// round functions read best with single letter state words
#![allow(clippy::many_single_char_names)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
pub mod opaque_res;
pub mod ct;
pub mod pack;
pub mod params;
pub mod random;

pub mod cipher;
pub mod paddings;
pub mod aes;
pub mod modes;
pub mod aead;

pub mod hash;
pub mod mac;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::Error;

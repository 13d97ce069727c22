#![allow(dead_code)]

use sym_crypto::aead::AeadCipher;
use sym_crypto::cipher::{BlockCipher, PaddedBufferedBlockCipher};
use sym_crypto::params::CipherParameters;
use sym_crypto::Error;

/// Runs the SHAVS Monte Carlo iteration from a counting seed (`00 01 02 ..`) for `$cases`
/// checkpoints. Every checkpoint is compared with `$reference` run through the same iteration, and
/// the first and last are pinned as regression values.
macro_rules! make_mc_test {
    (
        hasher: $hasher:ty,
        reference: $reference:ty,
        sz: $sz:literal,
        cases: $max:literal,
        first: $first:literal,
        last: $last:literal
    ) => {{
        use sym_crypto::hash::Digest as _;

        let mut seed = [0u8; $sz];
        for (i, b) in seed.iter_mut().enumerate() {
            *b = i as u8;
        }

        let mut hasher = <$hasher>::new();
        let mut reference = <$reference as ::digest::Digest>::new();
        let mut checkpoints = Vec::with_capacity($max);

        for j in 0..$max {
            let mut md = [seed; 3];
            let mut rc_md = [seed; 3];
            for _i in 3..1003 {
                hasher.update_bytes(&md[0]);
                hasher.update_bytes(&md[1]);
                hasher.update_bytes(&md[2]);

                md.rotate_left(1);
                assert_eq!(hasher.do_final(&mut md[2]), Ok($sz));

                for m in rc_md.iter() {
                    ::digest::Digest::update(&mut reference, m);
                }
                rc_md.rotate_left(1);
                rc_md[2].copy_from_slice(&::digest::Digest::finalize_reset(&mut reference));
            }

            assert_eq!(md[2], rc_md[2], "checkpoint {j} differs from the reference");
            seed = md[2];
            checkpoints.push(seed);
        }

        assert_eq!(hex::encode(checkpoints[0]), $first, "first checkpoint");
        assert_eq!(hex::encode(checkpoints[$max - 1]), $last, "last checkpoint");
    }};
}

/// Encrypts with an AEAD cipher in one pass.
pub fn seal<A: AeadCipher>(
    cipher: &mut A,
    params: &CipherParameters,
    aad: &[u8],
    message: &[u8]
) -> Result<Vec<u8>, Error> {
    cipher.init(true, params)?;
    finish(cipher, aad, message)
}

/// Decrypts and verifies with an AEAD cipher in one pass.
pub fn open<A: AeadCipher>(
    cipher: &mut A,
    params: &CipherParameters,
    aad: &[u8],
    sealed: &[u8]
) -> Result<Vec<u8>, Error> {
    cipher.init(false, params)?;
    finish(cipher, aad, sealed)
}

fn finish<A: AeadCipher>(cipher: &mut A, aad: &[u8], input: &[u8]) -> Result<Vec<u8>, Error> {
    cipher.process_aad_bytes(aad)?;

    let mut out = vec![0u8; cipher.output_size(input.len())];
    let mut len = cipher.process_bytes(input, &mut out)?;
    len += cipher.do_final(&mut out[len..])?;

    out.truncate(len);
    Ok(out)
}

/// Runs `input` through a padded buffered cipher, returning everything written.
pub fn pad_process<C: BlockCipher>(
    cipher: &mut PaddedBufferedBlockCipher<C>,
    for_encryption: bool,
    params: &CipherParameters,
    input: &[u8]
) -> Result<Vec<u8>, Error> {
    cipher.init(for_encryption, params)?;

    let mut out = vec![0u8; cipher.output_size(input.len())];
    let mut len = cipher.process_bytes(input, &mut out)?;
    len += cipher.do_final(&mut out[len..])?;

    out.truncate(len);
    Ok(out)
}

/// `start`, `start + 1`, ... as bytes, the message pattern used throughout the vectors.
pub fn counting(start: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| start.wrapping_add(i as u8)).collect()
}

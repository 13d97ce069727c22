pub mod common;

use common::{open, pad_process, seal};
use proptest::prelude::*;

use sym_crypto::aead::{AesCcm, AesGcm};
use sym_crypto::aes::AesEngine;
use sym_crypto::cipher::{BufferedBlockCipher, PaddedBufferedBlockCipher};
use sym_crypto::modes::{CbcBlockCipher, SicBlockCipher};
use sym_crypto::params::{AeadParameters, CipherParameters, KeyParameter, ParametersWithIv};
use sym_crypto::Error;

fn any_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![Just(16usize), Just(24), Just(32)]
        .prop_flat_map(|len| proptest::collection::vec(any::<u8>(), len))
}

fn any_message(max: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..=max)
}

proptest! {
    #[test]
    fn cbc_pkcs7(key in any_key(), iv in any::<[u8; 16]>(), message in any_message(200)) {
        let params: CipherParameters = ParametersWithIv::new(KeyParameter::new(&key), &iv).into();
        let mut cipher = PaddedBufferedBlockCipher::new(CbcBlockCipher::new(AesEngine::new()));

        let sealed = pad_process(&mut cipher, true, &params, &message).unwrap();
        prop_assert_eq!(sealed.len(), (message.len() / 16 + 1) * 16);
        prop_assert_eq!(pad_process(&mut cipher, false, &params, &sealed).unwrap(), message);
    }

    #[test]
    fn ctr(
        key in any_key(),
        iv in any::<[u8; 16]>(),
        iv_len in 8usize..=16,
        message in any_message(200)
    ) {
        let params: CipherParameters =
            ParametersWithIv::new(KeyParameter::new(&key), &iv[..iv_len]).into();
        let mut cipher = BufferedBlockCipher::new(SicBlockCipher::new(AesEngine::new()));

        let mut run = |for_encryption: bool, input: &[u8]| -> Result<Vec<u8>, Error> {
            cipher.init(for_encryption, &params)?;
            let mut out = vec![0u8; input.len()];
            let n = cipher.process_bytes(input, &mut out)?;
            cipher.do_final(&mut out[n..])?;
            Ok(out)
        };

        let sealed = run(true, &message).unwrap();
        prop_assert_eq!(sealed.len(), message.len());
        prop_assert_eq!(run(false, &sealed).unwrap(), message);
    }

    #[test]
    fn gcm_round_trip_and_tamper(
        key in any_key(),
        nonce in any_message(24).prop_filter("non-empty nonce", |n| !n.is_empty()),
        tag_words in 1usize..=4,
        aad in any_message(48),
        message in any_message(120),
        flip in any::<usize>()
    ) {
        let params: CipherParameters =
            AeadParameters::new(KeyParameter::new(&key), tag_words * 32, &nonce).into();

        let sealed = seal(&mut AesGcm::default(), &params, &aad, &message).unwrap();
        prop_assert_eq!(sealed.len(), message.len() + tag_words * 4);
        prop_assert_eq!(open(&mut AesGcm::default(), &params, &aad, &sealed).unwrap(), message);

        let mut tampered = sealed;
        let bit = flip % (tampered.len() * 8);
        tampered[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(matches!(
            open(&mut AesGcm::default(), &params, &aad, &tampered),
            Err(Error::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn ccm_round_trip_and_tamper(
        key in any_key(),
        nonce in proptest::collection::vec(any::<u8>(), 7..=13),
        tag_pairs in 2usize..=8,
        aad in any_message(48),
        message in any_message(120),
        flip in any::<usize>()
    ) {
        let params: CipherParameters =
            AeadParameters::new(KeyParameter::new(&key), tag_pairs * 16, &nonce).into();

        let sealed = seal(&mut AesCcm::default(), &params, &aad, &message).unwrap();
        prop_assert_eq!(sealed.len(), message.len() + tag_pairs * 2);
        prop_assert_eq!(open(&mut AesCcm::default(), &params, &aad, &sealed).unwrap(), message);

        let mut tampered = sealed;
        let bit = flip % (tampered.len() * 8);
        tampered[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(matches!(
            open(&mut AesCcm::default(), &params, &aad, &tampered),
            Err(Error::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn associated_data_is_bound(
        key in any_key(),
        aad in any_message(32).prop_filter("non-empty", |a| !a.is_empty()),
        message in any_message(64)
    ) {
        let gcm: CipherParameters = AeadParameters::new(KeyParameter::new(&key), 128, &[9; 12]).into();
        let ccm: CipherParameters = AeadParameters::new(KeyParameter::new(&key), 128, &[9; 12]).into();

        let sealed = seal(&mut AesGcm::default(), &gcm, &aad, &message).unwrap();
        prop_assert!(open(&mut AesGcm::default(), &gcm, &[], &sealed).is_err());

        let sealed = seal(&mut AesCcm::default(), &ccm, &aad, &message).unwrap();
        prop_assert!(open(&mut AesCcm::default(), &ccm, &[], &sealed).is_err());
    }
}

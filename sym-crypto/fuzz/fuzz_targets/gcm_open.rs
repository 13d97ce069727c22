#![no_main]

use libfuzzer_sys::fuzz_target;
use sym_crypto::aead::{AeadCipher, AesGcm};
use sym_crypto::params::{AeadParameters, KeyParameter};

fuzz_target!(|data: &[u8]| {
    let params = AeadParameters::new(KeyParameter::new(&[7u8; 16]), 128, &[42u8; 12]).into();
    let mut gcm = AesGcm::default();
    gcm.init(false, &params).unwrap();

    let (aad, sealed) = data.split_at(data.len() / 4);
    let mut out = vec![0u8; gcm.output_size(sealed.len())];

    gcm.process_aad_bytes(aad).unwrap();
    let n = gcm.process_bytes(sealed, &mut out).unwrap();
    let _ = gcm.do_final(&mut out[n..]);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use sym_crypto::aead::{AeadCipher, AesCcm};
use sym_crypto::params::{AeadParameters, KeyParameter};

fuzz_target!(|data: &[u8]| {
    let params = AeadParameters::new(KeyParameter::new(&[7u8; 16]), 64, &[42u8; 13]).into();
    let mut ccm = AesCcm::default();
    ccm.init(false, &params).unwrap();

    let mut out = vec![0u8; data.len()];
    let _ = ccm.process_packet(data, &mut out);
});

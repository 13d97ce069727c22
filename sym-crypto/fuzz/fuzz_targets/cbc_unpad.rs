#![no_main]

use libfuzzer_sys::fuzz_target;
use sym_crypto::aes::AesEngine;
use sym_crypto::cipher::PaddedBufferedBlockCipher;
use sym_crypto::modes::CbcBlockCipher;
use sym_crypto::params::{KeyParameter, ParametersWithIv};

fuzz_target!(|data: &[u8]| {
    let params = ParametersWithIv::new(KeyParameter::new(&[7u8; 32]), &[1u8; 16]).into();
    let mut cipher = PaddedBufferedBlockCipher::new(CbcBlockCipher::new(AesEngine::new()));
    cipher.init(false, &params).unwrap();

    let mut out = vec![0u8; cipher.output_size(data.len())];
    let n = cipher.process_bytes(data, &mut out).unwrap();
    let _ = cipher.do_final(&mut out[n..]);
});

use aes_gcm::{Aes256Gcm, KeyInit};
use aes_gcm::aead::AeadMut;
use criterion::{Criterion, black_box, criterion_group, criterion_main, Throughput};
use sym_crypto::aead::{AeadCipher, AesCcm, AesGcm, BasicGcmMultiplier, GcmBlockCipher};
use sym_crypto::aes::{AesEngine, Key};
use sym_crypto::params::{AeadParameters, CipherParameters, KeyParameter};

fn params(key: &Key, nonce: &[u8]) -> CipherParameters {
    AeadParameters::new(KeyParameter::from(key), 128, nonce).into()
}

fn decrypt_into<A: AeadCipher>(aead: &mut A, params: &CipherParameters, sealed: &[u8], out: &mut [u8]) {
    aead.init(false, params).unwrap();
    let n = aead.process_bytes(sealed, out).unwrap();
    aead.do_final(&mut out[n..]).unwrap();
}

fn bench_block_multiple(c: &mut Criterion) {
    let inp = [7u8; 4096];
    let mut out = [0u8; 4096 + 16];

    let k_256 = Key::Aes256([8u8; 32]);
    let nonce = [3u8; 12];
    let gcm_params = params(&k_256, &nonce);

    // decryption can repeat a nonce, so benchmark both directions through it
    let mut sealed = vec![0u8; inp.len() + 16];
    {
        let mut aes_256 = AesGcm::default();
        aes_256.init(true, &gcm_params).unwrap();
        let n = aes_256.process_bytes(&inp, &mut sealed).unwrap();
        aes_256.do_final(&mut sealed[n..]).unwrap();
    }

    let mut g = c.benchmark_group("aes-gcm-block-multiple");
    g.throughput(Throughput::Bytes(inp.len() as u64));

    let mut tables = AesGcm::default();
    g.bench_function("sym/decrypt-aes-256-tables-4k", |b| {
        b.iter(|| decrypt_into(&mut tables, &gcm_params, black_box(&sealed), &mut out))
    });

    let mut basic = GcmBlockCipher::<AesEngine, BasicGcmMultiplier>::new(AesEngine::new()).unwrap();
    g.bench_function("sym/decrypt-aes-256-basic", |b| {
        b.iter(|| decrypt_into(&mut basic, &gcm_params, black_box(&sealed), &mut out))
    });

    let mut counter = 0u64;
    let mut encryptor = AesGcm::default();
    g.bench_function("sym/encrypt-aes-256", |b| {
        b.iter(|| {
            counter += 1;
            let mut fresh = [0u8; 12];
            fresh[..8].copy_from_slice(&counter.to_be_bytes());

            encryptor.init(true, &params(&k_256, &fresh)).unwrap();
            let n = encryptor.process_bytes(black_box(&inp), &mut out).unwrap();
            black_box(encryptor.do_final(&mut out[n..]).unwrap())
        })
    });

    let mut r_c_aes_256 = Aes256Gcm::new_from_slice(k_256.as_slice())
        .unwrap();

    g.bench_function("rust-crypto/encrypt-aes-256", |b| {
        b.iter(|| {
            let res = r_c_aes_256
                .encrypt(aes_gcm::Nonce::from_slice(&nonce), black_box(inp.as_slice()))
                .unwrap();

            black_box(res);
        })
    });

    g.finish();
}

fn bench_ccm(c: &mut Criterion) {
    let inp = [7u8; 4096];
    let mut out = [0u8; 4096 + 16];
    let k_128 = Key::Aes128([8u8; 16]);

    let mut g = c.benchmark_group("aes-ccm");
    g.throughput(Throughput::Bytes(inp.len() as u64));

    let mut counter = 0u64;
    let mut ccm = AesCcm::default();
    g.bench_function("sym/encrypt-aes-128", |b| {
        b.iter(|| {
            counter += 1;
            let mut fresh = [0u8; 12];
            fresh[..8].copy_from_slice(&counter.to_be_bytes());

            ccm.init(true, &params(&k_128, &fresh)).unwrap();
            black_box(ccm.process_packet(black_box(&inp), &mut out).unwrap())
        })
    });

    g.finish();
}

criterion_group!(benches, bench_block_multiple, bench_ccm);
criterion_main!(benches);

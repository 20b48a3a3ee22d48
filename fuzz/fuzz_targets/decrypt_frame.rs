#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use tdf_envelope::{AesGcmCipher, Binary, Error, RustCryptoService, SymmetricCipher};

static CIPHER: Lazy<AesGcmCipher<RustCryptoService>> = Lazy::new(|| AesGcmCipher::new(RustCryptoService::new()));

static KEY: Lazy<Binary> = Lazy::new(|| Binary::from_bytes(vec![0x5Au8; 32]));

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must never decrypt, only fail cleanly.
    match CIPHER.decrypt(data, &KEY, None) {
        Ok(_) => panic!("forged frame accepted"),
        Err(Error::Authentication) | Err(Error::Crypto(_)) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
    }
});

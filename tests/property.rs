//! Property tests for key splitting and the framed cipher.

use proptest::prelude::*;

use tdf_envelope::wire::TAG_BYTES;
use tdf_envelope::{bxor, merge, split, AesGcmCipher, Binary, Error, RustCryptoService, SymmetricCipher};

#[test]
fn split_merge_fixed_counts() {
    let key = [0x5Au8; 32];
    for n in [1usize, 2, 3, 8] {
        let shares = split(&key, n).unwrap();
        assert_eq!(shares.len(), n);
        assert_eq!(merge(&shares).unwrap().as_slice(), &key);
    }
}

proptest! {
    /// x ^ y ^ y == x
    #[test]
    fn bxor_is_an_involution(pair in (1usize..64).prop_flat_map(|len| {
        (prop::collection::vec(any::<u8>(), len), prop::collection::vec(any::<u8>(), len))
    })) {
        let (x, y) = pair;
        let once = bxor(&x, &y).unwrap();
        prop_assert_eq!(bxor(&once, &y).unwrap(), x);
    }

    #[test]
    fn merge_inverts_split(key in prop::collection::vec(any::<u8>(), 1..64), n in 1usize..=8) {
        let shares = split(&key, n).unwrap();
        prop_assert_eq!(shares.len(), n);
        prop_assert!(shares.iter().all(|s| s.len() == key.len()));
        let merged = merge(&shares).unwrap();
        prop_assert_eq!(merged.as_slice(), key.as_slice());
    }

    /// With two or more shares no single share reveals the key.
    #[test]
    fn no_share_equals_key(key in prop::collection::vec(any::<u8>(), 16..64), n in 2usize..=6) {
        let shares = split(&key, n).unwrap();
        prop_assert!(shares.iter().all(|s| s.as_slice() != key.as_slice()));
    }

    #[test]
    fn cipher_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..1024)) {
        let cipher = AesGcmCipher::new(RustCryptoService::new());
        let key = Binary::from_bytes(cipher.generate_key().unwrap().to_vec());
        let iv = Binary::from_bytes(cipher.generate_initialization_vector().unwrap());
        let plaintext = Binary::from_bytes(plaintext);

        let frame = cipher.encrypt(&plaintext, &key, &iv).unwrap().payload;
        prop_assert_eq!(cipher.decrypt(frame.as_bytes(), &key, None).unwrap().payload, plaintext);
    }

    #[test]
    fn any_tag_bit_flip_is_rejected(
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        byte in 0usize..TAG_BYTES,
        bit in 0u8..8,
    ) {
        let cipher = AesGcmCipher::new(RustCryptoService::new());
        let key = Binary::from_bytes(cipher.generate_key().unwrap().to_vec());
        let iv = Binary::from_bytes(cipher.generate_initialization_vector().unwrap());

        let mut frame = cipher.encrypt(&Binary::from_bytes(plaintext), &key, &iv).unwrap().payload.into_vec();
        let at = frame.len() - TAG_BYTES + byte;
        frame[at] ^= 1 << bit;
        prop_assert_eq!(cipher.decrypt(&frame, &key, None).unwrap_err(), Error::Authentication);
    }
}

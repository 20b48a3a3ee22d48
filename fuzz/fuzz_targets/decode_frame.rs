#![no_main]

use libfuzzer_sys::fuzz_target;
use tdf_envelope::wire::{decode_frame, encode_frame, MIN_FRAME_BYTES};

fuzz_target!(|data: &[u8]| {
    match decode_frame(data) {
        Ok(parts) => {
            assert!(data.len() >= MIN_FRAME_BYTES);
            let rebuilt = encode_frame(parts.iv, parts.ciphertext, parts.tag).unwrap();
            assert_eq!(rebuilt, data);
        }
        Err(_) => assert!(data.len() < MIN_FRAME_BYTES),
    }
});

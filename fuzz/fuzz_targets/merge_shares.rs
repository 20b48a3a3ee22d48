#![no_main]

use libfuzzer_sys::fuzz_target;
use tdf_envelope::{merge, split};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let n = (data[0] as usize % 8) + 1;
    let key = &data[1..];

    let shares = split(key, n).unwrap();
    assert_eq!(merge(&shares).unwrap().as_slice(), key);
});

//! Criterion benchmarks for the framed cipher, key splitting and envelope
//! sealing.
//!
//! Run with: `cargo bench --bench throughput`
//!
//! Sealing cost is dominated by RSA-OAEP, one wrap per recipient; the cipher
//! group shows the symmetric floor underneath it.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tdf_envelope::{
    merge, split, AesGcmCipher, Binary, CryptoService, Envelope, Recipient, RustCryptoService, SymmetricCipher,
};

/// Payload sizes to benchmark.
const PAYLOAD_SIZES: &[usize] = &[64, 1024, 65_536, 1_048_576];

// ---------------------------------------------------------------------------
// Framed AES-256-GCM
// ---------------------------------------------------------------------------

fn bench_cipher(c: &mut Criterion) {
    let mut group = c.benchmark_group("cipher");

    let cipher = AesGcmCipher::new(RustCryptoService::new());
    let key = Binary::from_bytes(cipher.generate_key().unwrap().to_vec());
    let iv = Binary::from_bytes(cipher.generate_initialization_vector().unwrap());

    for &size in PAYLOAD_SIZES {
        let plaintext = Binary::from_bytes(vec![0x42u8; size]);
        let frame = cipher.encrypt(&plaintext, &key, &iv).unwrap().payload;
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encrypt", size), &plaintext, |b, pt| {
            b.iter(|| cipher.encrypt(pt, &key, &iv).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("decrypt", size), &frame, |b, frame| {
            b.iter(|| cipher.decrypt(frame.as_bytes(), &key, None).unwrap());
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// XOR split / merge
// ---------------------------------------------------------------------------

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    let key = [0x24u8; 32];

    for n in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("split_merge", n), &n, |b, &n| {
            b.iter(|| {
                let shares = split(&key, n).unwrap();
                merge(&shares).unwrap()
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Envelope seal / open
// ---------------------------------------------------------------------------

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");
    group.sample_size(20);

    let envelope = Envelope::new(RustCryptoService::new());
    let pair = envelope.service().generate_key_pair(None).unwrap();
    let pem = envelope.service().to_pem_pair(&pair).unwrap();

    for n in [1usize, 3] {
        let recipients: Vec<_> = (0..n)
            .map(|i| Recipient::new(format!("kas-{}", i), pem.public_key.clone()))
            .collect();
        let privates: Vec<&str> = (0..n).map(|_| pem.private_key.as_str()).collect();
        let payload = Binary::from_bytes(vec![0x42u8; 1024]);
        let sealed = envelope.seal(&payload, &recipients).unwrap();

        group.bench_with_input(BenchmarkId::new("seal", n), &recipients, |b, r| {
            b.iter(|| envelope.seal(&payload, r).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("open", n), &sealed, |b, s| {
            b.iter(|| envelope.open(s, &privates).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cipher, bench_split, bench_envelope);
criterion_main!(benches);

//! XOR key splitting.
//!
//! A key is split into N shares such that the XOR of all N reproduces it.
//! Every share is required; there is no threshold recovery.

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::random;
use crate::service::CryptoService;

/// One fragment of a split key. Same length as the key.
pub type Share = Zeroizing<Vec<u8>>;

/// Element-wise XOR of two equal-length byte sequences.
pub fn bxor(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(Error::ShareLength {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x ^ y).collect())
}

/// Split `key` into `n` shares using the OS random source.
pub fn split(key: &[u8], n: usize) -> Result<Vec<Share>> {
    split_from(key, n, random::random_bytes)
}

/// Split `key` into `n` shares, drawing randomness from `service`.
pub fn split_with<S>(service: &S, key: &[u8], n: usize) -> Result<Vec<Share>>
where
    S: CryptoService + ?Sized,
{
    split_from(key, n, |len| service.random_bytes(len))
}

fn split_from<F>(key: &[u8], n: usize, mut draw: F) -> Result<Vec<Share>>
where
    F: FnMut(usize) -> Result<Vec<u8>>,
{
    if n == 0 {
        return Err(Error::ShareCount("split requires at least one share"));
    }

    // n == 1 draws nothing: the only share is the key itself.
    let mut last = Zeroizing::new(key.to_vec());
    let mut shares = Vec::with_capacity(n);
    for _ in 1..n {
        let share = Zeroizing::new(draw(key.len())?);
        xor_into(&mut last, &share)?;
        shares.push(share);
    }
    shares.push(last);
    Ok(shares)
}

/// XOR-fold all shares back into the key.
pub fn merge<S: AsRef<[u8]>>(shares: &[S]) -> Result<Zeroizing<Vec<u8>>> {
    let (first, rest) = shares
        .split_first()
        .ok_or(Error::ShareCount("merge requires at least one share"))?;

    let mut key = Zeroizing::new(first.as_ref().to_vec());
    for share in rest {
        xor_into(&mut key, share.as_ref())?;
    }
    Ok(key)
}

fn xor_into(acc: &mut [u8], other: &[u8]) -> Result<()> {
    if acc.len() != other.len() {
        return Err(Error::ShareLength {
            expected: acc.len(),
            found: other.len(),
        });
    }
    for (a, b) in acc.iter_mut().zip(other) {
        *a ^= b;
    }
    Ok(())
}

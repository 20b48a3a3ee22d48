//! OS randomness.

use std::panic::{self, AssertUnwindSafe};

use rand_core::{CryptoRng, RngCore};

use crate::error::{Error, Result};

type Fill = fn(&mut [u8]) -> core::result::Result<(), getrandom::Error>;

/// Fill a fresh buffer from the OS CSPRNG.
///
/// Every call reads the OS source directly; there is no process-wide RNG state.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    getrandom::getrandom(&mut buf).map_err(|_| Error::Entropy)?;
    Ok(buf)
}

/// RNG handed to backends that draw internally (RSA keygen, OAEP padding).
///
/// `RngCore::fill_bytes` cannot report failure, so a failed draw unwinds out
/// of the backend and [`with_entropy`] turns it into [`Error::Entropy`].
/// Under `panic = "abort"` a failed draw aborts the process instead.
pub(crate) struct EntropyRng {
    fill: Fill,
}

/// Unwind payload for a failed draw.
struct EntropyFailure;

impl RngCore for EntropyRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if self.try_fill_bytes(dest).is_err() {
            // resume_unwind skips the panic hook: nothing is printed.
            panic::resume_unwind(Box::new(EntropyFailure));
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        (self.fill)(dest).map_err(rand_core::Error::from)
    }
}

impl CryptoRng for EntropyRng {}

/// Run `op` with an OS-backed RNG; a failed draw becomes [`Error::Entropy`].
pub(crate) fn with_entropy<T>(op: impl FnOnce(&mut EntropyRng) -> T) -> Result<T> {
    with_fill(getrandom::getrandom, op)
}

fn with_fill<T>(fill: Fill, op: impl FnOnce(&mut EntropyRng) -> T) -> Result<T> {
    let mut rng = EntropyRng { fill };
    match panic::catch_unwind(AssertUnwindSafe(|| op(&mut rng))) {
        Ok(value) => Ok(value),
        Err(payload) if payload.is::<EntropyFailure>() => {
            tracing::debug!("OS random source failed");
            Err(Error::Entropy)
        }
        Err(payload) => panic::resume_unwind(payload),
    }
}

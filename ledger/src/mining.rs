//! The fixed unit of CPU work performed by every `mine` call.
//!
//! The cost is what matters here, not the output: each call hashes the
//! decimal form of every index below `iterations` with SHA-256, so the work
//! is deterministic and scales linearly with the iteration count.

use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::hint::black_box;

pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

/// Runs the work unit and returns the XOR-fold of every digest as hex.
///
/// Blocking and CPU-bound; async callers must run it on the blocking pool.
pub fn proof_of_work(iterations: u64) -> String {
    let mut folded = [0u8; 32];
    let mut index = String::with_capacity(20);

    for i in 0..iterations {
        index.clear();
        // Writing to a String cannot fail
        let _ = write!(index, "{i}");

        let digest = Sha256::digest(black_box(index.as_bytes()));
        for (acc, byte) in folded.iter_mut().zip(digest.iter()) {
            *acc ^= byte;
        }
    }

    hex::encode(folded)
}

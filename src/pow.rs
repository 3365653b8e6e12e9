use blake3::Hasher;
use tracing::debug;

/// Leading zero hex nibbles a winning guess must carry.
pub const DEFAULT_DIFFICULTY: usize = 4;

fn guess_hash(last_proof: u64, proof: u64, last_hash: &str) -> String {
    let mut h = Hasher::new();
    h.update(last_proof.to_string().as_bytes());
    h.update(proof.to_string().as_bytes());
    h.update(last_hash.as_bytes());
    h.finalize().to_hex().to_string()
}

/// True iff `blake3(last_proof ++ proof ++ last_hash)` starts with
/// `difficulty` zero nibbles.
pub fn valid_proof(last_proof: u64, proof: u64, last_hash: &str, difficulty: usize) -> bool {
    let hash = guess_hash(last_proof, proof, last_hash);
    hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Brute-force the smallest proof satisfying [`valid_proof`]. Unbounded and
/// CPU-bound; callers must keep it off latency-sensitive paths. The only
/// bound on the search is the configured difficulty.
pub fn find_proof(last_proof: u64, last_hash: &str, difficulty: usize) -> u64 {
    let mut proof = 0u64;
    while !valid_proof(last_proof, proof, last_hash, difficulty) {
        proof += 1;
    }
    debug!(proof, difficulty, "proof-of-work solved");
    proof
}

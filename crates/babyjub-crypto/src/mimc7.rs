//! MiMC-7 hash over the BabyJubjub base field.
//!
//! Matches the circomlib `mimc7` construction: 91 rounds of `t^7` with
//! round constants derived from the seed string `"mimc"` by an iterated
//! Keccak-256 chain, and a Miyaguchi-Preneel style sequence hash
//! `r <- r + x_i + MiMC7(x_i, r)`.

use ark_ff::{Field, PrimeField};
use babyjub_types::Fq;
use lazy_static::lazy_static;
use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

const SEED: &str = "mimc";
const N_ROUNDS: usize = 91;

lazy_static! {
    static ref ROUND_CONSTANTS: Vec<Fq> = generate_constants(N_ROUNDS);
}

/// Round constants: c[0] = 0, then each constant is the previous Keccak-256
/// digest re-hashed, interpreted as a big-endian integer and reduced mod q.
/// The chain starts from keccak256(SEED) and hashes the minimal big-endian
/// byte representation at every step.
fn generate_constants(n_rounds: usize) -> Vec<Fq> {
    let mut cts = Vec::with_capacity(n_rounds);
    cts.push(Fq::from(0u64));
    let mut c = BigUint::from_bytes_be(&Keccak256::digest(SEED.as_bytes()));
    for _ in 1..n_rounds {
        c = BigUint::from_bytes_be(&Keccak256::digest(c.to_bytes_be()));
        cts.push(Fq::from_le_bytes_mod_order(&c.to_bytes_le()));
    }
    cts
}

/// The keyed MiMC-7 permutation-based hash of a single field element.
pub fn mimc7_hash(x_in: &Fq, k: &Fq) -> Fq {
    let cts = &*ROUND_CONSTANTS;
    let mut r = Fq::from(0u64);
    for (i, c) in cts.iter().enumerate() {
        let t = if i == 0 { *x_in + k } else { r + k + c };
        let t2 = t.square();
        let t4 = t2.square();
        r = t4 * t2 * t;
    }
    r + k
}

/// Hash a sequence of field elements with an optional key (default 0).
pub fn hash(inputs: &[Fq], key: Option<&Fq>) -> Fq {
    let mut r = key.copied().unwrap_or_else(|| Fq::from(0u64));
    for x in inputs {
        r = r + x + mimc7_hash(x, &r);
    }
    r
}

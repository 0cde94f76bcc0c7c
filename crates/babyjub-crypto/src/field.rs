//! Base field helpers for BabyJubjub.
//!
//! The base field is the BN254 scalar field
//! `q = 21888242871839275222246405745257275088548364400416034343698204186575808495617`.
//! Arithmetic lives in ark-ff's fixed-width Montgomery representation; this
//! module adds the byte-level boundary: canonical 32-byte little-endian
//! encoding, checked decoding, inversion and square roots with library
//! errors, and the coordinate sign used by point compression.

use ark_ff::{BigInteger, BigInteger256, Field, PrimeField};
use babyjub_types::{BabyjubError, Fq, Result};
use num_bigint::BigUint;

/// Serialize a field element as exactly 32 little-endian bytes.
pub fn fq_to_le_bytes(f: &Fq) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&f.into_bigint().to_bytes_le());
    bytes
}

/// Parse 32 little-endian bytes as a canonical field element.
///
/// Fails with `NonCanonical` when the integer value is >= q. This is the
/// parsing path for cryptographic material (point decompression, scalars).
pub fn fq_from_le_bytes(bytes: &[u8; 32]) -> Result<Fq> {
    let bi = BigInteger256::new([
        u64::from_le_bytes(bytes[0..8].try_into().unwrap()),
        u64::from_le_bytes(bytes[8..16].try_into().unwrap()),
        u64::from_le_bytes(bytes[16..24].try_into().unwrap()),
        u64::from_le_bytes(bytes[24..32].try_into().unwrap()),
    ]);
    Fq::from_bigint(bi).ok_or(BabyjubError::NonCanonical)
}

/// Parse little-endian bytes of any length, reducing mod q.
///
/// Message-ingestion path: values >= q are accepted and reduced.
pub fn fq_from_le_bytes_reduced(bytes: &[u8]) -> Fq {
    Fq::from_le_bytes_mod_order(bytes)
}

/// Canonical integer representative of a field element.
pub fn fq_to_biguint(f: &Fq) -> BigUint {
    BigUint::from_bytes_le(&f.into_bigint().to_bytes_le())
}

/// Multiplicative inverse. Fails with `ZeroInverse` on zero.
pub fn inverse(a: &Fq) -> Result<Fq> {
    a.inverse().ok_or(BabyjubError::ZeroInverse)
}

/// Some square root of `a`, or `NonResidue` when none exists.
///
/// q = 1 (mod 16), so ark-ff's Tonelli-Shanks precomputation is in play.
/// Which of the two roots is returned is unspecified; callers that need a
/// particular one select by [`coord_sign`].
pub fn sqrt(a: &Fq) -> Result<Fq> {
    a.sqrt().ok_or(BabyjubError::NonResidue)
}

/// Sign of a coordinate: true iff its canonical representative exceeds
/// (q-1)/2, i.e. iff it is larger than its additive inverse.
pub fn coord_sign(x: &Fq) -> bool {
    x.into_bigint() > (-*x).into_bigint()
}

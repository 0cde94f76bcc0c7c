//! Poseidon hash adapter (circomlib parameters over the BabyJubjub base
//! field).
//!
//! The permutation itself comes from `light-poseidon`; this module only
//! fixes the parameter set (`new_circom`, width = input count) and the
//! error mapping so callers see the same `hash(inputs) -> field element`
//! surface as the MiMC-7 module.

use babyjub_types::{BabyjubError, Fq, Result};
use light_poseidon::{Poseidon, PoseidonHasher};

/// Hash a sequence of field elements with the circomlib Poseidon instance
/// of matching width. Widths outside 1..=12 are rejected by the backend.
pub fn hash(inputs: &[Fq]) -> Result<Fq> {
    let mut hasher =
        Poseidon::<Fq>::new_circom(inputs.len()).map_err(|e| BabyjubError::Hash(e.to_string()))?;
    hasher.hash(inputs).map_err(|e| BabyjubError::Hash(e.to_string()))
}

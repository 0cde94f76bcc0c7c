//! BabyJubjub curve arithmetic and EdDSA signatures for zk-SNARK tooling.
//!
//! The curve is a twisted Edwards curve over the BN254 scalar field, so its
//! group law is cheap to verify inside arithmetic circuits. The EdDSA
//! construction derives its challenge from a circuit-friendly hash (MiMC-7
//! or Poseidon) and its byte encodings are bit-compatible with the
//! circomlib ecosystem.

pub mod babyjubjub;
pub mod eddsa;
pub mod field;
pub mod mimc7;
pub mod poseidon;

pub use babyjub_types::{BabyjubError, Fq, Fs, Result};
pub use babyjubjub::Point;
pub use eddsa::{
    ChallengeHash, CompressedPublicKey, CompressedSignature, Mimc7, Poseidon, PrivateKey,
    PublicKey, Signature,
};

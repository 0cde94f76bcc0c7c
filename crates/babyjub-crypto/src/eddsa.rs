//! EdDSA over BabyJubjub with a circuit-friendly challenge hash.
//!
//! Key expansion follows the Ed25519 shape adapted to BabyJubjub: the
//! 32-byte seed is stretched with BLAKE-512, the low half is pruned and
//! shifted right by three bits to obtain the signing scalar, the high half
//! seeds the deterministic nonce. The challenge `k = H(R8.x, R8.y, A.x,
//! A.y, m)` uses either MiMC-7 or Poseidon; the two choices are distinct,
//! non-interoperable schemes. Verification is cofactored:
//! `[8][S]B8 = [8]R8 + [8][k]A`.

use ark_ff::{BigInteger, PrimeField};
use babyjub_types::{BabyjubError, Fq, Fs, Result};
use blake::Blake;
use num_bigint::{BigInt, BigUint, Sign};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::babyjubjub::{Point, SUBORDER};
use crate::field;
use crate::{mimc7, poseidon};

/// Circuit-friendly hash used to derive the signature challenge.
///
/// Implementations map a fixed sequence of field elements to one field
/// element; signing and verification are generic over this capability.
pub trait ChallengeHash {
    fn hash(inputs: &[Fq]) -> Result<Fq>;
}

/// MiMC-7 challenge hash (circomlib `mimc7.hash`, key 0).
pub struct Mimc7;

impl ChallengeHash for Mimc7 {
    fn hash(inputs: &[Fq]) -> Result<Fq> {
        Ok(mimc7::hash(inputs, None))
    }
}

/// Poseidon challenge hash (circomlib parameters).
pub struct Poseidon;

impl ChallengeHash for Poseidon {
    fn hash(inputs: &[Fq]) -> Result<Fq> {
        poseidon::hash(inputs)
    }
}

/// Compute a BLAKE-512 digest.
fn blake512(input: &[u8]) -> [u8; 64] {
    let mut output = [0u8; 64];
    let mut hasher = Blake::new(512).unwrap();
    hasher.update(input);
    hasher.finalise(&mut output);
    output
}

/// Ed25519-style pruning of the low half of the key expansion: clear the
/// three least-significant bits, clear the top bit, set bit 254.
fn prune_buffer(buf: &mut [u8; 32]) {
    buf[0] &= 0xF8;
    buf[31] &= 0x7F;
    buf[31] |= 0x40;
}

/// Subgroup scalar from the canonical little-endian bytes of a base field
/// element, reduced mod l.
fn fs_from_fq(f: &Fq) -> Fs {
    Fs::from_le_bytes_mod_order(&field::fq_to_le_bytes(f))
}

fn fs_to_bigint(s: &Fs) -> BigInt {
    BigInt::from_bytes_le(Sign::Plus, &s.into_bigint().to_bytes_le())
}

/// An EdDSA private key: an opaque 32-byte seed.
#[derive(Clone)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Sample a fresh private key from the operating system CSPRNG.
    ///
    /// There is no fallback source; failure to gather entropy surfaces as
    /// `RngUnavailable`.
    pub fn generate() -> Result<PrivateKey> {
        let mut buf = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| BabyjubError::RngUnavailable(e.to_string()))?;
        Ok(PrivateKey(buf))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> PrivateKey {
        PrivateKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The derived signing scalar: pruned low half of BLAKE-512(seed),
    /// interpreted little-endian and shifted right by three bits.
    pub fn scalar(&self) -> BigUint {
        let h = blake512(&self.0);
        let mut s_buf: [u8; 32] = h[..32].try_into().unwrap();
        prune_buffer(&mut s_buf);
        BigUint::from_bytes_le(&s_buf) >> 3
    }

    /// The public key `A = [s] B8`.
    pub fn public(&self) -> PublicKey {
        let s = BigInt::from_biguint(Sign::Plus, self.scalar());
        PublicKey(Point::base8().mul_scalar(&s))
    }

    /// Sign a message (a single field element) with the chosen challenge
    /// hash.
    pub fn sign<H: ChallengeHash>(&self, msg: &Fq) -> Result<Signature> {
        let h = blake512(&self.0);
        let mut s_buf: [u8; 32] = h[..32].try_into().unwrap();
        prune_buffer(&mut s_buf);
        let s_scalar: BigUint = BigUint::from_bytes_le(&s_buf) >> 3;
        let s = Fs::from_le_bytes_mod_order(&s_scalar.to_bytes_le());

        // deterministic nonce r = BLAKE-512(h[32..] || m_le32) mod l
        let mut nonce_input = [0u8; 64];
        nonce_input[..32].copy_from_slice(&h[32..]);
        nonce_input[32..].copy_from_slice(&field::fq_to_le_bytes(msg));
        let r = Fs::from_le_bytes_mod_order(&blake512(&nonce_input));

        let r8 = Point::base8().mul_scalar(&fs_to_bigint(&r));
        let a = self.public().0;

        let k = H::hash(&[r8.x, r8.y, a.x, a.y, *msg])?;

        // S = r + k*s mod l, stored widened into the base field
        let s_sig = r + fs_from_fq(&k) * s;
        Ok(Signature {
            r8,
            s: field::fq_from_le_bytes_reduced(&s_sig.into_bigint().to_bytes_le()),
        })
    }

    /// Sign with the MiMC-7 challenge hash.
    pub fn sign_mimc7(&self, msg: &Fq) -> Result<Signature> {
        self.sign::<Mimc7>(msg)
    }

    /// Sign with the Poseidon challenge hash.
    pub fn sign_poseidon(&self, msg: &Fq) -> Result<Signature> {
        self.sign::<Poseidon>(msg)
    }
}

/// An EdDSA public key: a point in the prime-order subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(pub Point);

impl PublicKey {
    /// Verify a signature with the chosen challenge hash.
    ///
    /// Returns false when `R8` is off the curve, `S >= l`, the public key
    /// is outside the prime-order subgroup, or the cofactored equation
    /// does not hold. Multiplying both sides by 8 absorbs any low-order
    /// component of `R8`, so no subgroup check on `R8` is needed.
    pub fn verify<H: ChallengeHash>(&self, msg: &Fq, sig: &Signature) -> bool {
        if !sig.r8.in_curve() {
            return false;
        }
        if !self.0.in_subgroup() {
            return false;
        }
        let s_int = field::fq_to_biguint(&sig.s);
        if s_int >= *SUBORDER {
            return false;
        }
        let k = match H::hash(&[sig.r8.x, sig.r8.y, self.0.x, self.0.y, *msg]) {
            Ok(k) => k,
            Err(_) => return false,
        };

        let eight = BigInt::from(8);
        let left = Point::base8()
            .mul_scalar(&BigInt::from_biguint(Sign::Plus, s_int))
            .mul_scalar(&eight);
        let k_int = BigInt::from_biguint(Sign::Plus, field::fq_to_biguint(&k));
        let right = sig
            .r8
            .mul_scalar(&eight)
            .add(&self.0.mul_scalar(&k_int).mul_scalar(&eight));
        left == right
    }

    /// Verify a MiMC-7 signature.
    pub fn verify_mimc7(&self, msg: &Fq, sig: &Signature) -> bool {
        self.verify::<Mimc7>(msg, sig)
    }

    /// Verify a Poseidon signature.
    pub fn verify_poseidon(&self, msg: &Fq, sig: &Signature) -> bool {
        self.verify::<Poseidon>(msg, sig)
    }

    pub fn compress(&self) -> CompressedPublicKey {
        CompressedPublicKey(self.0.compress())
    }
}

/// An EdDSA signature: a subgroup point `R8` and a scalar `S` stored in
/// the wider base-field range. Verification treats `S` modulo l and
/// rejects `S >= l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r8: Point,
    pub s: Fq,
}

impl Signature {
    pub fn compress(&self) -> CompressedSignature {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&self.r8.compress());
        buf[32..].copy_from_slice(&field::fq_to_le_bytes(&self.s));
        CompressedSignature(buf)
    }
}

/// Compressed public key: `compress(A)`, 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedPublicKey(pub [u8; 32]);

impl CompressedPublicKey {
    /// Decompress and enforce subgroup membership; a valid public key must
    /// pass the cofactor check.
    pub fn decompress(&self) -> Result<PublicKey> {
        let p = Point::decompress(self.0)?;
        if !p.in_subgroup() {
            return Err(BabyjubError::InvalidPoint);
        }
        Ok(PublicKey(p))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_bytes(bytes: [u8; 32]) -> CompressedPublicKey {
        CompressedPublicKey(bytes)
    }
}

/// Compressed signature: `compress(R8) || S` little-endian, 64 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedSignature(pub [u8; 64]);

impl CompressedSignature {
    /// Parse the point and the canonical scalar. `S < l` is NOT enforced
    /// here; verification rejects out-of-range scalars.
    pub fn decompress(&self) -> Result<Signature> {
        let r8 = Point::decompress(self.0[..32].try_into().unwrap())?;
        let s = field::fq_from_le_bytes(&self.0[32..].try_into().unwrap())?;
        Ok(Signature { r8, s })
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    pub fn from_bytes(bytes: [u8; 64]) -> CompressedSignature {
        CompressedSignature(bytes)
    }
}

impl Serialize for CompressedPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for CompressedPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(&s))
            .map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))?;
        Ok(CompressedPublicKey(arr))
    }
}

impl Serialize for CompressedSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for CompressedSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(&s))
            .map_err(serde::de::Error::custom)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 64 bytes"))?;
        Ok(CompressedSignature(arr))
    }
}

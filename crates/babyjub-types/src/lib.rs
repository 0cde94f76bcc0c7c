use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use thiserror::Error;

/// BabyJubjub base field element (the BN254 scalar field).
pub type Fq = ark_bn254::Fr;

/// Scalar in the prime-order subgroup, i.e. an integer modulo the
/// subgroup order l.
pub type Fs = ark_ed_on_bn254::Fr;

/// Library error types.
#[derive(Debug, Error)]
pub enum BabyjubError {
    #[error("division by zero in field inversion")]
    ZeroInverse,

    #[error("no modular square root exists")]
    NonResidue,

    #[error("non-canonical field encoding")]
    NonCanonical,

    #[error("invalid compressed point")]
    InvalidPoint,

    #[error("hash failed: {0}")]
    Hash(String),

    #[error("entropy source unavailable: {0}")]
    RngUnavailable(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid decimal string: {0}")]
    InvalidDecimal(String),
}

pub type Result<T> = std::result::Result<T, BabyjubError>;

/// Parse a 0x-prefixed (or bare) big-endian hex string into a field element.
pub fn hex_to_field(hex_str: &str) -> Result<Fq> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(hex_str).map_err(|e| BabyjubError::InvalidHex(e.to_string()))?;
    let mut padded = [0u8; 32];
    let offset = 32usize.saturating_sub(bytes.len());
    padded[offset..].copy_from_slice(&bytes);
    // ark-ff consumes little-endian bytes
    padded.reverse();
    Ok(Fq::from_le_bytes_mod_order(&padded))
}

/// Convert a field element to a 0x-prefixed big-endian hex string (64 chars).
pub fn field_to_hex(f: &Fq) -> String {
    let bytes = f.into_bigint().to_bytes_be();
    format!("0x{}", hex::encode(bytes))
}

/// Parse a decimal string into a field element, reducing mod the field order.
pub fn field_from_dec_str(s: &str) -> Result<Fq> {
    let n: BigUint = s
        .parse()
        .map_err(|_| BabyjubError::InvalidDecimal(s.to_string()))?;
    Ok(Fq::from_le_bytes_mod_order(&n.to_bytes_le()))
}

/// Convert a field element to its canonical decimal string.
pub fn field_to_dec_str(f: &Fq) -> String {
    BigUint::from_bytes_le(&f.into_bigint().to_bytes_le()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_field_roundtrip() {
        let f = Fq::from(42u64);
        let hex = field_to_hex(&f);
        assert_eq!(
            hex,
            "0x000000000000000000000000000000000000000000000000000000000000002a"
        );
        let back = hex_to_field(&hex).unwrap();
        assert_eq!(f, back);
    }

    #[test]
    fn test_dec_str_roundtrip() {
        let f = field_from_dec_str(
            "2736030358979909402780800718157159386076813972158567259200215660948447373041",
        )
        .unwrap();
        assert_eq!(
            field_to_dec_str(&f),
            "2736030358979909402780800718157159386076813972158567259200215660948447373041"
        );
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(hex_to_field("0xzz").is_err());
    }

    #[test]
    fn test_invalid_decimal_rejected() {
        assert!(field_from_dec_str("12ab").is_err());
    }
}

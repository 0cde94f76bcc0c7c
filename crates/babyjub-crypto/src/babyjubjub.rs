//! BabyJubjub twisted Edwards curve arithmetic.
//!
//! Curve equation: `A*x^2 + y^2 = 1 + D*x^2*y^2` over the BN254 scalar
//! field, with the circomlib parameters `A = 168700`, `D = 168696`.
//! The group has order `8 * l`; `B8` generates the prime-order subgroup of
//! order `l`. The identity is `(0, 1)` and the unified addition formula is
//! complete, so no point is special-cased.

use ark_ff::Field;
use babyjub_types::{field_from_dec_str, BabyjubError, Fq, Result};
use lazy_static::lazy_static;
use num_bigint::{BigInt, BigUint, Sign};

use crate::field;

/// x coordinate of the subgroup generator B8 (circomlib Base8).
pub const BASE8_X: &str =
    "5299619240641551281634865583518297030282874472190772894086521144482721001553";

/// y coordinate of the subgroup generator B8.
pub const BASE8_Y: &str =
    "16950150798460657717958625567821834550301663161624707787222815936182638968203";

const ORDER_DEC: &str =
    "21888242871839275222246405745257275088614511777268538073601725287587578984328";

const SUBORDER_DEC: &str =
    "2736030358979909402780800718157159386076813972158567259200215660948447373041";

lazy_static! {
    /// Order of the full curve group, 8 * l.
    pub static ref ORDER: BigUint = ORDER_DEC.parse().unwrap();

    /// Order l of the prime subgroup generated by B8.
    pub static ref SUBORDER: BigUint = SUBORDER_DEC.parse().unwrap();
}

/// Curve parameter A = 168700.
pub fn param_a() -> Fq {
    Fq::from(168700u64)
}

/// Curve parameter D = 168696.
pub fn param_d() -> Fq {
    Fq::from(168696u64)
}

/// A point on the BabyJubjub curve in affine coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: Fq,
    pub y: Fq,
}

impl Point {
    /// The identity element (0, 1).
    pub fn identity() -> Self {
        Point {
            x: Fq::from(0u64),
            y: Fq::from(1u64),
        }
    }

    /// The cofactor-cleared generator B8 of the prime-order subgroup.
    pub fn base8() -> Self {
        Point {
            x: field_from_dec_str(BASE8_X).unwrap(),
            y: field_from_dec_str(BASE8_Y).unwrap(),
        }
    }

    /// Unified twisted Edwards addition.
    ///
    /// x3 = (x1*y2 + y1*x2) / (1 + D*x1*x2*y1*y2)
    /// y3 = (y1*y2 - A*x1*x2) / (1 - D*x1*x2*y1*y2)
    ///
    /// The formula is complete on the curve: the denominators are nonzero
    /// for any pair of curve points, including doubling and the identity.
    pub fn add(&self, other: &Point) -> Point {
        let a = param_a();
        let d = param_d();
        let one = Fq::from(1u64);

        let x1y2 = self.x * other.y;
        let y1x2 = self.y * other.x;
        let x1x2 = self.x * other.x;
        let y1y2 = self.y * other.y;
        let dxy = d * x1x2 * y1y2;

        let x3 = (x1y2 + y1x2) * (one + dxy).inverse().expect("degenerate addition");
        let y3 = (y1y2 - a * x1x2) * (one - dxy).inverse().expect("degenerate addition");

        Point { x: x3, y: y3 }
    }

    /// Negation: -(x, y) = (-x, y).
    pub fn neg(&self) -> Point {
        Point {
            x: -self.x,
            y: self.y,
        }
    }

    /// Scalar multiplication `[s] P` by double-and-add over the bits of |s|.
    ///
    /// Negative scalars negate the result. Runs in time proportional to the
    /// bit length of the scalar.
    pub fn mul_scalar(&self, s: &BigInt) -> Point {
        let n = s.magnitude();
        let mut result = Point::identity();
        let mut current = *self;
        for i in 0..n.bits() {
            if n.bit(i) {
                result = result.add(&current);
            }
            current = current.add(&current);
        }
        if s.sign() == Sign::Minus {
            result.neg()
        } else {
            result
        }
    }

    /// Check the curve equation: `A*x^2 + y^2 = 1 + D*x^2*y^2`.
    pub fn in_curve(&self) -> bool {
        let x2 = self.x * self.x;
        let y2 = self.y * self.y;
        param_a() * x2 + y2 == Fq::from(1u64) + param_d() * x2 * y2
    }

    /// Check membership in the prime-order subgroup: on the curve and
    /// `[l] P = (0, 1)`. This is the cofactor check that rejects the eight
    /// low-order points.
    pub fn in_subgroup(&self) -> bool {
        if !self.in_curve() {
            return false;
        }
        let l = BigInt::from_biguint(Sign::Plus, SUBORDER.clone());
        self.mul_scalar(&l) == Point::identity()
    }

    /// Compress to 32 bytes: `y` in little-endian with the top bit of the
    /// last byte carrying the sign of `x`.
    pub fn compress(&self) -> [u8; 32] {
        let mut buf = field::fq_to_le_bytes(&self.y);
        if field::coord_sign(&self.x) {
            buf[31] |= 0x80;
        }
        buf
    }

    /// Decompress 32 bytes into a point.
    ///
    /// Rejects a non-canonical `y` with `NonCanonical` and an unsolvable
    /// `x` with `InvalidPoint`. Subgroup membership is NOT checked here;
    /// callers that require it run [`Point::in_subgroup`].
    pub fn decompress(buf: [u8; 32]) -> Result<Point> {
        let sign = buf[31] & 0x80 != 0;
        let mut y_buf = buf;
        y_buf[31] &= 0x7F;
        let y = field::fq_from_le_bytes(&y_buf)?;

        // x^2 = (1 - y^2) / (A - D*y^2)
        let one = Fq::from(1u64);
        let y2 = y * y;
        let denominator = param_a() - param_d() * y2;
        let x2 = (one - y2) * field::inverse(&denominator).map_err(|_| BabyjubError::InvalidPoint)?;

        let mut x = field::sqrt(&x2).map_err(|_| BabyjubError::InvalidPoint)?;
        if field::coord_sign(&x) != sign {
            x = -x;
        }

        Ok(Point { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use babyjub_types::field_to_dec_str;

    fn point_from_dec(x: &str, y: &str) -> Point {
        Point {
            x: field_from_dec_str(x).unwrap(),
            y: field_from_dec_str(y).unwrap(),
        }
    }

    #[test]
    fn test_add_identity_to_identity() {
        let e = Point::identity();
        let r = e.add(&e);
        assert_eq!(r, Point::identity());
    }

    #[test]
    fn test_base8_on_curve_and_in_subgroup() {
        let b8 = Point::base8();
        assert!(b8.in_curve());
        assert!(b8.in_subgroup());
    }

    #[test]
    fn test_identity_in_curve() {
        assert!(Point::identity().in_curve());
        // (1, 0) is not on the curve
        let p = Point {
            x: Fq::from(1u64),
            y: Fq::from(0u64),
        };
        assert!(!p.in_curve());
    }

    #[test]
    fn test_suborder_times_base8_is_identity() {
        let l = BigInt::from_biguint(Sign::Plus, SUBORDER.clone());
        assert_eq!(Point::base8().mul_scalar(&l), Point::identity());
    }

    #[test]
    fn test_order_is_eight_times_suborder() {
        assert_eq!(&*ORDER, &(&*SUBORDER * 8u8));
    }

    #[test]
    fn test_mul_zero_and_one() {
        let b8 = Point::base8();
        assert_eq!(b8.mul_scalar(&BigInt::from(0)), Point::identity());
        assert_eq!(b8.mul_scalar(&BigInt::from(1)), b8);
    }

    #[test]
    fn test_mul_negative_scalar() {
        let b8 = Point::base8();
        let p = b8.mul_scalar(&BigInt::from(-5));
        assert_eq!(p, b8.mul_scalar(&BigInt::from(5)).neg());
        // -5*P + 5*P = identity
        assert_eq!(p.add(&b8.mul_scalar(&BigInt::from(5))), Point::identity());
    }

    #[test]
    fn test_addition_laws() {
        let b8 = Point::base8();
        let p = b8.mul_scalar(&BigInt::from(3));
        let q = b8.mul_scalar(&BigInt::from(5));
        let r = b8.mul_scalar(&BigInt::from(7));
        // commutativity
        assert_eq!(p.add(&q), q.add(&p));
        // associativity
        assert_eq!(p.add(&q).add(&r), p.add(&q.add(&r)));
        // identity
        assert_eq!(p.add(&Point::identity()), p);
    }

    #[test]
    fn test_scalar_distributivity() {
        let b8 = Point::base8();
        for (a, b) in [(2u64, 3u64), (17, 40), (255, 256)] {
            let left = b8.mul_scalar(&BigInt::from(a + b));
            let right = b8
                .mul_scalar(&BigInt::from(a))
                .add(&b8.mul_scalar(&BigInt::from(b)));
            assert_eq!(left, right);
            // [a*b]P = [a]([b]P)
            assert_eq!(
                b8.mul_scalar(&BigInt::from(a * b)),
                b8.mul_scalar(&BigInt::from(b)).mul_scalar(&BigInt::from(a))
            );
        }
    }

    #[test]
    fn test_multiples_of_base8_stay_in_subgroup() {
        let b8 = Point::base8();
        for s in [2u64, 31, 1023] {
            assert!(b8.mul_scalar(&BigInt::from(s)).in_subgroup());
        }
    }

    #[test]
    fn test_decompress_identity() {
        let e = Point::identity();
        let buf = e.compress();
        assert_eq!(buf[31] & 0x80, 0);
        assert_eq!(Point::decompress(buf).unwrap(), e);
    }

    #[test]
    fn test_decompress_rejects_non_canonical_y() {
        // all-ones below the sign position is far above q
        let mut buf = [0xFF; 32];
        buf[31] = 0x7F;
        assert!(matches!(
            Point::decompress(buf),
            Err(BabyjubError::NonCanonical)
        ));
    }

    #[test]
    fn test_decompress_small_y_values() {
        // roughly half of all y values admit no x; every accepted point
        // must satisfy the curve equation
        let mut rejected = 0;
        for yv in 0u8..50 {
            let mut buf = [0u8; 32];
            buf[0] = yv;
            match Point::decompress(buf) {
                Ok(p) => assert!(p.in_curve()),
                Err(BabyjubError::InvalidPoint) => rejected += 1,
                Err(e) => panic!("unexpected decompression error: {e}"),
            }
        }
        assert!(rejected > 0);
    }

    #[test]
    fn test_compress_decompress_multiples() {
        let b8 = Point::base8();
        for i in 0..64u64 {
            let p = b8.mul_scalar(&BigInt::from(i));
            let buf = p.compress();
            assert_eq!(Point::decompress(buf).unwrap(), p);
        }
    }

    #[test]
    fn test_vectors_from_json() {
        let data = include_str!("../../../tests/vectors/babyjubjub.json");
        let vectors: serde_json::Value = serde_json::from_str(data).unwrap();

        for v in vectors["point_add"].as_array().unwrap() {
            let p = point_from_dec(v["p_x"].as_str().unwrap(), v["p_y"].as_str().unwrap());
            let q = point_from_dec(v["q_x"].as_str().unwrap(), v["q_y"].as_str().unwrap());
            let r = p.add(&q);
            assert_eq!(
                field_to_dec_str(&r.x),
                v["expected_x"].as_str().unwrap(),
                "point_add X mismatch for '{}'",
                v["name"].as_str().unwrap()
            );
            assert_eq!(
                field_to_dec_str(&r.y),
                v["expected_y"].as_str().unwrap(),
                "point_add Y mismatch for '{}'",
                v["name"].as_str().unwrap()
            );
        }

        for v in vectors["scalar_mul"].as_array().unwrap() {
            let p = point_from_dec(v["p_x"].as_str().unwrap(), v["p_y"].as_str().unwrap());
            let s: BigInt = v["scalar"].as_str().unwrap().parse().unwrap();
            let r = p.mul_scalar(&s);
            assert_eq!(
                field_to_dec_str(&r.x),
                v["expected_x"].as_str().unwrap(),
                "scalar_mul X mismatch for '{}'",
                v["name"].as_str().unwrap()
            );
            assert_eq!(
                field_to_dec_str(&r.y),
                v["expected_y"].as_str().unwrap(),
                "scalar_mul Y mismatch for '{}'",
                v["name"].as_str().unwrap()
            );
        }

        for v in vectors["membership"].as_array().unwrap() {
            let p = point_from_dec(v["x"].as_str().unwrap(), v["y"].as_str().unwrap());
            assert_eq!(
                p.in_curve(),
                v["in_curve"].as_bool().unwrap(),
                "in_curve mismatch for '{}'",
                v["name"].as_str().unwrap()
            );
            assert_eq!(
                p.in_subgroup(),
                v["in_subgroup"].as_bool().unwrap(),
                "in_subgroup mismatch for '{}'",
                v["name"].as_str().unwrap()
            );
        }

        for v in vectors["compress"].as_array().unwrap() {
            let p = point_from_dec(v["x"].as_str().unwrap(), v["y"].as_str().unwrap());
            let buf = p.compress();
            assert_eq!(
                hex::encode(buf),
                v["compressed"].as_str().unwrap(),
                "compress mismatch for '{}'",
                v["name"].as_str().unwrap()
            );
            let p2 = Point::decompress(buf).unwrap();
            assert_eq!(p2, p, "decompress mismatch for '{}'", v["name"].as_str().unwrap());
        }
    }
}

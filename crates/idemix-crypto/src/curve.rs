//! # Scalar and Point Encoding
//!
//! Fixed-width big-endian encodings for BLS12-381 scalars and points, the
//! domain hash [`hash_mod_order`], and the Fiat–Shamir transcript used by
//! every proof in the engine.
//!
//! Decoding is strict: a scalar must be exactly [`SCALAR_BYTES`] wide and
//! already reduced, a coordinate exactly [`FIELD_BYTES`] wide and reduced,
//! and a point must be on the curve and in the prime-order subgroup. Any
//! accepted encoding therefore re-encodes to the same bytes.

use ark_bls12_381::{Fq, Fq2, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::CurveGroup;
use ark_ff::{BigInteger, PrimeField};
use sha2::{Digest, Sha256};

use crate::error::IdemixError;
use crate::wire::{Ecp, Ecp2};

/// Width of an encoded scalar.
pub const SCALAR_BYTES: usize = 32;

/// Width of an encoded base-field coordinate.
pub const FIELD_BYTES: usize = 48;

/// Hash arbitrary bytes to a scalar: SHA-256, read big-endian, reduced
/// modulo the group order.
pub fn hash_mod_order(data: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(&Sha256::digest(data))
}

/// Fixed-width big-endian encoding of a scalar.
pub fn big_to_bytes(x: &Fr) -> Vec<u8> {
    x.into_bigint().to_bytes_be()
}

/// Strict inverse of [`big_to_bytes`].
pub fn big_from_bytes(bytes: &[u8]) -> Result<Fr, IdemixError> {
    if bytes.len() != SCALAR_BYTES {
        return Err(IdemixError::InvalidScalar(format!(
            "expected {SCALAR_BYTES} bytes, got {}",
            bytes.len()
        )));
    }
    let x = Fr::from_be_bytes_mod_order(bytes);
    if big_to_bytes(&x) != bytes {
        return Err(IdemixError::InvalidScalar(
            "value is not reduced modulo the group order".into(),
        ));
    }
    Ok(x)
}

fn fq_to_bytes(x: &Fq) -> Vec<u8> {
    x.into_bigint().to_bytes_be()
}

fn fq_from_bytes(bytes: &[u8], what: &str) -> Result<Fq, IdemixError> {
    if bytes.len() != FIELD_BYTES {
        return Err(IdemixError::InvalidPoint(format!(
            "{what}: expected {FIELD_BYTES}-byte coordinate, got {}",
            bytes.len()
        )));
    }
    let x = Fq::from_be_bytes_mod_order(bytes);
    if fq_to_bytes(&x) != bytes {
        return Err(IdemixError::InvalidPoint(format!(
            "{what}: coordinate is not reduced modulo the field prime"
        )));
    }
    Ok(x)
}

pub(crate) fn g1_to_wire(p: &G1Projective) -> Ecp {
    let a = p.into_affine();
    Ecp {
        x: fq_to_bytes(&a.x),
        y: fq_to_bytes(&a.y),
    }
}

/// Parse a G1 point from its affine coordinates.
pub(crate) fn g1_from_coordinates(
    x: &[u8],
    y: &[u8],
    what: &str,
) -> Result<G1Projective, IdemixError> {
    let p = G1Affine::new_unchecked(fq_from_bytes(x, what)?, fq_from_bytes(y, what)?);
    if !p.is_on_curve() {
        return Err(IdemixError::InvalidPoint(format!(
            "{what}: point is not on the curve"
        )));
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(IdemixError::InvalidPoint(format!(
            "{what}: point is not in the prime-order subgroup"
        )));
    }
    Ok(p.into())
}

pub(crate) fn g1_from_wire(ecp: Option<&Ecp>, what: &str) -> Result<G1Projective, IdemixError> {
    let ecp = ecp.ok_or_else(|| IdemixError::InvalidPoint(format!("{what}: missing")))?;
    g1_from_coordinates(&ecp.x, &ecp.y, what)
}

pub(crate) fn g2_to_wire(p: &G2Projective) -> Ecp2 {
    let a = p.into_affine();
    Ecp2 {
        xa: fq_to_bytes(&a.x.c0),
        xb: fq_to_bytes(&a.x.c1),
        ya: fq_to_bytes(&a.y.c0),
        yb: fq_to_bytes(&a.y.c1),
    }
}

pub(crate) fn g2_from_wire(ecp: Option<&Ecp2>, what: &str) -> Result<G2Projective, IdemixError> {
    let ecp = ecp.ok_or_else(|| IdemixError::InvalidPoint(format!("{what}: missing")))?;
    let x = Fq2::new(fq_from_bytes(&ecp.xa, what)?, fq_from_bytes(&ecp.xb, what)?);
    let y = Fq2::new(fq_from_bytes(&ecp.ya, what)?, fq_from_bytes(&ecp.yb, what)?);
    let p = G2Affine::new_unchecked(x, y);
    if !p.is_on_curve() {
        return Err(IdemixError::InvalidPoint(format!(
            "{what}: point is not on the curve"
        )));
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(IdemixError::InvalidPoint(format!(
            "{what}: point is not in the prime-order subgroup"
        )));
    }
    Ok(p.into())
}

/// Parse a list of scalars, naming the list in errors.
pub(crate) fn scalars_from_bytes(values: &[Vec<u8>], what: &str) -> Result<Vec<Fr>, IdemixError> {
    values
        .iter()
        .map(|v| {
            big_from_bytes(v).map_err(|e| IdemixError::InvalidScalar(format!("{what}: {e}")))
        })
        .collect()
}

/// Fiat–Shamir transcript. Every append is length-prefixed so that
/// distinct sequences of inputs never hash to the same challenge.
pub(crate) struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    pub(crate) fn new(label: &[u8]) -> Self {
        let mut transcript = Self {
            hasher: Sha256::new(),
        };
        transcript.append_bytes(label);
        transcript
    }

    pub(crate) fn append_bytes(&mut self, data: &[u8]) {
        self.hasher.update((data.len() as u64).to_be_bytes());
        self.hasher.update(data);
    }

    pub(crate) fn append_g1(&mut self, p: &G1Projective) {
        let ecp = g1_to_wire(p);
        self.append_bytes(&ecp.x);
        self.append_bytes(&ecp.y);
    }

    pub(crate) fn append_g2(&mut self, p: &G2Projective) {
        let ecp = g2_to_wire(p);
        self.append_bytes(&ecp.xa);
        self.append_bytes(&ecp.xb);
        self.append_bytes(&ecp.ya);
        self.append_bytes(&ecp.yb);
    }

    pub(crate) fn append_scalar(&mut self, x: &Fr) {
        self.append_bytes(&big_to_bytes(x));
    }

    pub(crate) fn challenge(self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::Group;
    use ark_std::UniformRand;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scalar_encoding_is_fixed_width() {
        assert_eq!(big_to_bytes(&Fr::from(1u64)).len(), SCALAR_BYTES);
        let mut expected = vec![0u8; SCALAR_BYTES];
        expected[SCALAR_BYTES - 1] = 7;
        assert_eq!(big_to_bytes(&Fr::from(7u64)), expected);
    }

    #[test]
    fn test_scalar_decoding_rejects_wrong_width() {
        assert!(matches!(
            big_from_bytes(&[1u8; 31]),
            Err(IdemixError::InvalidScalar(_))
        ));
        assert!(big_from_bytes(&[]).is_err());
    }

    #[test]
    fn test_scalar_decoding_rejects_unreduced() {
        assert!(big_from_bytes(&[0xff; SCALAR_BYTES]).is_err());
    }

    #[test]
    fn test_hash_mod_order_deterministic() {
        assert_eq!(hash_mod_order(b"org1"), hash_mod_order(b"org1"));
        assert_ne!(hash_mod_order(b"org1"), hash_mod_order(b"org2"));
    }

    #[test]
    fn test_g1_roundtrip_through_coordinates() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = G1Projective::rand(&mut rng);
        let ecp = g1_to_wire(&p);
        assert_eq!(ecp.x.len(), FIELD_BYTES);
        assert_eq!(g1_from_coordinates(&ecp.x, &ecp.y, "p").unwrap(), p);
    }

    #[test]
    fn test_g1_off_curve_rejected() {
        let ecp = g1_to_wire(&G1Projective::generator());
        let mut y = ecp.y.clone();
        y[FIELD_BYTES - 1] ^= 1;
        assert!(g1_from_coordinates(&ecp.x, &y, "p").is_err());
    }

    #[test]
    fn test_identity_point_rejected() {
        let zero = vec![0u8; FIELD_BYTES];
        assert!(g1_from_coordinates(&zero, &zero, "p").is_err());
    }

    #[test]
    fn test_g2_roundtrip() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = G2Projective::rand(&mut rng);
        let ecp = g2_to_wire(&p);
        assert_eq!(g2_from_wire(Some(&ecp), "w").unwrap(), p);
        assert!(g2_from_wire(None, "w").is_err());
    }

    #[test]
    fn test_transcript_is_length_prefixed() {
        let mut a = Transcript::new(b"t");
        a.append_bytes(b"ab");
        a.append_bytes(b"c");
        let mut b = Transcript::new(b"t");
        b.append_bytes(b"a");
        b.append_bytes(b"bc");
        assert_ne!(a.challenge(), b.challenge());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn accepted_scalars_reencode_identically(bytes in proptest::collection::vec(any::<u8>(), SCALAR_BYTES)) {
            if let Ok(x) = big_from_bytes(&bytes) {
                prop_assert_eq!(big_to_bytes(&x), bytes);
            }
        }

        #[test]
        fn hashed_scalars_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let x = hash_mod_order(&data);
            prop_assert_eq!(big_from_bytes(&big_to_bytes(&x)).unwrap(), x);
        }
    }
}

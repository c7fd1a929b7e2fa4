//! # Pseudonyms
//!
//! `Nym = HSk·sk + HRand·r` for a fresh random `r`. The pair `(sk, r)` opens
//! the pseudonym; without them two pseudonyms of the same key are
//! unlinkable.

use ark_bls12_381::{Fr, G1Projective};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};

use crate::credential::SecretKey;
use crate::curve::{g1_from_coordinates, g1_to_wire};
use crate::error::IdemixError;
use crate::issuer::IssuerPublicKey;

/// A pseudonym point.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nym(pub(crate) G1Projective);

impl Nym {
    /// 48-byte big-endian x coordinate.
    pub fn x_bytes(&self) -> Vec<u8> {
        g1_to_wire(&self.0).x
    }

    /// 48-byte big-endian y coordinate.
    pub fn y_bytes(&self) -> Vec<u8> {
        g1_to_wire(&self.0).y
    }

    /// Rebuild a pseudonym from its coordinates, rejecting points that are
    /// off the curve or outside the prime-order subgroup.
    pub fn from_coordinates(x: &[u8], y: &[u8]) -> Result<Self, IdemixError> {
        Ok(Self(g1_from_coordinates(x, y, "nym")?))
    }
}

impl std::fmt::Display for Nym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ecp = g1_to_wire(&self.0);
        write!(f, "({},{})", to_hex(&ecp.x), to_hex(&ecp.y))
    }
}

impl std::fmt::Debug for Nym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nym({}...)", &to_hex(&self.x_bytes())[..16])
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Derive a fresh pseudonym for `sk`. Returns the pseudonym and its
/// randomizer, which the caller must keep to sign under the pseudonym.
pub fn make_nym<R: RngCore + CryptoRng>(
    sk: &SecretKey,
    ipk: &IssuerPublicKey,
    rng: &mut R,
) -> (Nym, Fr) {
    let r_nym = Fr::rand(rng);
    let nym = ipk.h_sk * sk.0 + ipk.h_rand * r_nym;
    (Nym(nym), r_nym)
}

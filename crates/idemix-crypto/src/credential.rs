//! # Holder Keys, Credential Requests, and Credentials
//!
//! A holder proves knowledge of its secret key in a [`CredRequest`]; the
//! issuer answers with a [`Credential`] `(A, B, e, s)` where
//!
//! ```text
//! B = g1 + HSk·sk + HRand·s + Σ HAttr[i]·attr[i]
//! A = B · 1/(isk + e)
//! ```
//!
//! so that `e(A, W + g2·e) = e(B, g2)`.

use ark_bls12_381::{Bls12_381, Fr, G1Projective, G2Projective};
use ark_ec::pairing::Pairing;
use ark_ec::Group;
use ark_std::{UniformRand, Zero};
use idemix_core::decode;
use prost::Message;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::curve::{
    big_from_bytes, big_to_bytes, g1_from_wire, g1_to_wire, scalars_from_bytes, Transcript,
};
use crate::error::IdemixError;
use crate::issuer::{IssuerKey, IssuerPublicKey};
use crate::wire::{CredRequestWire, CredentialWire};

/// Holder secret key. Zeroized on drop.
pub struct SecretKey(pub(crate) Fr);

impl SecretKey {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(Fr::rand(rng))
    }

    /// Parse a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdemixError> {
        Ok(Self(big_from_bytes(bytes)?))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        big_to_bytes(&self.0)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// Holder's request for a credential: `nym = HSk·sk` with a Schnorr proof
/// of knowledge of `sk` bound to the issuer's nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredRequest {
    nym: G1Projective,
    issuer_nonce: Vec<u8>,
    proof_c: Fr,
    proof_s: Fr,
}

impl CredRequest {
    pub fn new<R: RngCore + CryptoRng>(
        sk: &SecretKey,
        issuer_nonce: &[u8],
        ipk: &IssuerPublicKey,
        rng: &mut R,
    ) -> Self {
        let nym = ipk.h_sk * sk.0;
        let mut r = Fr::rand(rng);
        let t = ipk.h_sk * r;
        let proof_c = request_challenge(&t, &nym, issuer_nonce, ipk);
        let proof_s = r + proof_c * sk.0;
        r.zeroize();
        Self {
            nym,
            issuer_nonce: issuer_nonce.to_vec(),
            proof_c,
            proof_s,
        }
    }

    /// Verify the proof of knowledge of the holder key.
    pub fn check(&self, ipk: &IssuerPublicKey) -> Result<(), IdemixError> {
        if self.nym.is_zero() {
            return Err(IdemixError::InvalidCredentialRequest(
                "pseudonym is the identity".into(),
            ));
        }
        let t = ipk.h_sk * self.proof_s - self.nym * self.proof_c;
        if request_challenge(&t, &self.nym, &self.issuer_nonce, ipk) != self.proof_c {
            return Err(IdemixError::InvalidCredentialRequest(
                "zero knowledge proof is invalid".into(),
            ));
        }
        Ok(())
    }

    pub fn encode(&self) -> Vec<u8> {
        CredRequestWire {
            nym: Some(g1_to_wire(&self.nym)),
            issuer_nonce: self.issuer_nonce.clone(),
            proof_c: big_to_bytes(&self.proof_c),
            proof_s: big_to_bytes(&self.proof_s),
        }
        .encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, IdemixError> {
        let wire: CredRequestWire = decode("CredRequest", bytes)?;
        Ok(Self {
            nym: g1_from_wire(wire.nym.as_ref(), "nym")?,
            issuer_nonce: wire.issuer_nonce,
            proof_c: big_from_bytes(&wire.proof_c)?,
            proof_s: big_from_bytes(&wire.proof_s)?,
        })
    }
}

fn request_challenge(
    t: &G1Projective,
    nym: &G1Projective,
    issuer_nonce: &[u8],
    ipk: &IssuerPublicKey,
) -> Fr {
    let mut transcript = Transcript::new(b"idemix/cred-request");
    transcript.append_g1(t);
    transcript.append_g1(&ipk.h_sk);
    transcript.append_g1(nym);
    transcript.append_bytes(issuer_nonce);
    transcript.append_bytes(ipk.hash());
    transcript.challenge()
}

/// Issuer signature over a holder key and attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub(crate) a: G1Projective,
    pub(crate) b: G1Projective,
    pub(crate) e: Fr,
    pub(crate) s: Fr,
    attrs: Vec<Vec<u8>>,
}

impl Credential {
    /// Issue a credential for `request` over `attrs`. Values bind to the
    /// issuer key's attribute names in order; trailing names may be left out.
    pub fn issue<R: RngCore + CryptoRng>(
        key: &IssuerKey,
        request: &CredRequest,
        attrs: &[Fr],
        rng: &mut R,
    ) -> Result<Self, IdemixError> {
        let ipk = key.public_key();
        request.check(ipk)?;
        if attrs.len() > ipk.h_attrs.len() {
            return Err(IdemixError::InvalidParameter(format!(
                "got {} attribute values, issuer key defines only {}",
                attrs.len(),
                ipk.h_attrs.len()
            )));
        }

        let e = Fr::rand(rng);
        let s = Fr::rand(rng);
        let b = commitment(ipk, &request.nym, &s, attrs);
        let a = b * key.credential_exponent(&e)?;
        Ok(Self {
            a,
            b,
            e,
            s,
            attrs: attrs.iter().map(big_to_bytes).collect(),
        })
    }

    /// Attribute values as 32-byte scalars, in issuer key order. May be
    /// shorter than the issuer key's attribute list.
    pub fn attrs(&self) -> &[Vec<u8>] {
        &self.attrs
    }

    /// Check that this credential was issued by `ipk` to the holder of `sk`.
    pub fn verify(&self, sk: &SecretKey, ipk: &IssuerPublicKey) -> Result<(), IdemixError> {
        if self.attrs.len() > ipk.h_attrs.len() {
            return Err(IdemixError::InvalidCredential(format!(
                "credential carries {} attributes, issuer key defines only {}",
                self.attrs.len(),
                ipk.h_attrs.len()
            )));
        }
        let attrs = self.attribute_scalars()?;
        let b = commitment(ipk, &(ipk.h_sk * sk.0), &self.s, &attrs);
        if b != self.b {
            return Err(IdemixError::InvalidCredential(
                "credential does not commit to the given secret key and attributes".into(),
            ));
        }
        if self.a.is_zero() {
            return Err(IdemixError::InvalidCredential("A is the identity".into()));
        }
        let lhs = Bls12_381::pairing(self.a, ipk.w + G2Projective::generator() * self.e);
        let rhs = Bls12_381::pairing(self.b, G2Projective::generator());
        if lhs != rhs {
            return Err(IdemixError::InvalidCredential(
                "issuer signature does not verify".into(),
            ));
        }
        Ok(())
    }

    pub fn encode(&self) -> Vec<u8> {
        CredentialWire {
            a: Some(g1_to_wire(&self.a)),
            b: Some(g1_to_wire(&self.b)),
            e: big_to_bytes(&self.e),
            s: big_to_bytes(&self.s),
            attrs: self.attrs.clone(),
        }
        .encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, IdemixError> {
        let wire: CredentialWire = decode("Credential", bytes)?;
        Ok(Self {
            a: g1_from_wire(wire.a.as_ref(), "a")?,
            b: g1_from_wire(wire.b.as_ref(), "b")?,
            e: big_from_bytes(&wire.e)?,
            s: big_from_bytes(&wire.s)?,
            attrs: wire.attrs,
        })
    }

    pub(crate) fn attribute_scalars(&self) -> Result<Vec<Fr>, IdemixError> {
        scalars_from_bytes(&self.attrs, "credential attribute")
    }
}

/// `g1 + nym + HRand·s + Σ HAttr[i]·attr[i]`, over the first `attrs.len()`
/// attribute bases.
pub(crate) fn commitment(
    ipk: &IssuerPublicKey,
    nym: &G1Projective,
    s: &Fr,
    attrs: &[Fr],
) -> G1Projective {
    let mut b = G1Projective::generator() + nym + ipk.h_rand * s;
    for (h, a) in ipk.h_attrs.iter().zip(attrs) {
        b += *h * a;
    }
    b
}

//! # Issuer Keys
//!
//! The issuer secret `isk` and its public key:
//!
//! - `h_sk`, `h_rand`: generators for the holder secret and blinding factor
//! - `h_attrs[i]`: one generator per named attribute
//! - `w = g2·isk`
//! - `bar_g1` random, `bar_g2 = bar_g1·isk`
//! - `(proof_c, proof_s)`: Schnorr proof of knowledge of `isk` across
//!   both `(g2, w)` and `(bar_g1, bar_g2)`
//! - `hash`: digest of the key's own encoding, bound into every signature
//!
//! ## Security Invariant
//!
//! A public key loaded from configuration must pass [`IssuerPublicKey::check`]
//! before anything is verified against it.

use std::collections::HashSet;

use ark_bls12_381::{Fr, G1Projective, G2Projective};
use ark_ec::Group;
use ark_ff::Field;
use ark_std::{UniformRand, Zero};
use idemix_core::decode;
use prost::Message;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::curve::{
    big_from_bytes, big_to_bytes, g1_from_wire, g1_to_wire, g2_from_wire, g2_to_wire,
    hash_mod_order, Transcript,
};
use crate::error::IdemixError;
use crate::wire::IssuerPublicKeyWire;

/// Public half of an issuer key.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuerPublicKey {
    pub(crate) attribute_names: Vec<String>,
    pub(crate) h_sk: G1Projective,
    pub(crate) h_rand: G1Projective,
    pub(crate) h_attrs: Vec<G1Projective>,
    pub(crate) w: G2Projective,
    pub(crate) bar_g1: G1Projective,
    pub(crate) bar_g2: G1Projective,
    pub(crate) proof_c: Fr,
    pub(crate) proof_s: Fr,
    pub(crate) hash: Vec<u8>,
}

impl IssuerPublicKey {
    /// Attribute names, in credential order.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Digest of this key's encoding, as bound into signatures.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Structural and proof-of-knowledge check.
    pub fn check(&self) -> Result<(), IdemixError> {
        if self.attribute_names.len() != self.h_attrs.len() {
            return Err(IdemixError::InvalidIssuerKey(format!(
                "inconsistent public key: {} attribute names but {} attribute generators",
                self.attribute_names.len(),
                self.h_attrs.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in &self.attribute_names {
            if !seen.insert(name.as_str()) {
                return Err(IdemixError::InvalidIssuerKey(format!(
                    "attribute {name} appears multiple times in attribute names"
                )));
            }
        }
        let g1_parts = [&self.h_sk, &self.h_rand, &self.bar_g1, &self.bar_g2];
        if g1_parts.iter().any(|p| p.is_zero())
            || self.h_attrs.iter().any(|p| p.is_zero())
            || self.w.is_zero()
        {
            return Err(IdemixError::InvalidIssuerKey(
                "some part of the public key is undefined".into(),
            ));
        }

        let t1 = G2Projective::generator() * self.proof_s - self.w * self.proof_c;
        let t2 = self.bar_g1 * self.proof_s - self.bar_g2 * self.proof_c;
        if key_proof_challenge(&t1, &t2, &self.w, &self.bar_g1, &self.bar_g2) != self.proof_c {
            return Err(IdemixError::InvalidIssuerKey(
                "proof of secret key knowledge verification failed".into(),
            ));
        }
        Ok(())
    }

    /// Protobuf encoding, including the stored hash.
    pub fn encode(&self) -> Vec<u8> {
        self.to_wire().encode_to_vec()
    }

    /// Parse an encoded public key. Points and scalars are validated here;
    /// the proof of knowledge is left to [`check`](Self::check).
    pub fn decode(bytes: &[u8]) -> Result<Self, IdemixError> {
        let wire: IssuerPublicKeyWire = decode("IssuerPublicKey", bytes)?;
        Ok(Self {
            h_sk: g1_from_wire(wire.h_sk.as_ref(), "h_sk")?,
            h_rand: g1_from_wire(wire.h_rand.as_ref(), "h_rand")?,
            h_attrs: wire
                .h_attrs
                .iter()
                .map(|p| g1_from_wire(Some(p), "h_attrs"))
                .collect::<Result<_, _>>()?,
            w: g2_from_wire(wire.w.as_ref(), "w")?,
            bar_g1: g1_from_wire(wire.bar_g1.as_ref(), "bar_g1")?,
            bar_g2: g1_from_wire(wire.bar_g2.as_ref(), "bar_g2")?,
            proof_c: big_from_bytes(&wire.proof_c)?,
            proof_s: big_from_bytes(&wire.proof_s)?,
            hash: wire.hash,
            attribute_names: wire.attribute_names,
        })
    }

    /// Recompute `hash` over the encoding with the hash field cleared.
    pub fn set_hash(&mut self) {
        self.hash = Vec::new();
        self.hash = big_to_bytes(&hash_mod_order(&self.encode()));
    }

    fn to_wire(&self) -> IssuerPublicKeyWire {
        IssuerPublicKeyWire {
            attribute_names: self.attribute_names.clone(),
            h_sk: Some(g1_to_wire(&self.h_sk)),
            h_rand: Some(g1_to_wire(&self.h_rand)),
            h_attrs: self.h_attrs.iter().map(g1_to_wire).collect(),
            w: Some(g2_to_wire(&self.w)),
            bar_g1: Some(g1_to_wire(&self.bar_g1)),
            bar_g2: Some(g1_to_wire(&self.bar_g2)),
            proof_c: big_to_bytes(&self.proof_c),
            proof_s: big_to_bytes(&self.proof_s),
            hash: self.hash.clone(),
        }
    }
}

impl std::fmt::Debug for IssuerPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hash: String = self.hash.iter().take(8).map(|b| format!("{b:02x}")).collect();
        f.debug_struct("IssuerPublicKey")
            .field("attribute_names", &self.attribute_names)
            .field("hash", &format!("{hash}..."))
            .finish()
    }
}

/// Issuer key pair. The secret scalar is zeroized on drop.
pub struct IssuerKey {
    pub(crate) isk: Fr,
    ipk: IssuerPublicKey,
}

impl IssuerKey {
    /// Generate a fresh key for the given attribute names.
    pub fn generate<R: RngCore + CryptoRng>(
        attribute_names: &[&str],
        rng: &mut R,
    ) -> Result<Self, IdemixError> {
        let mut seen = HashSet::new();
        for name in attribute_names {
            if !seen.insert(*name) {
                return Err(IdemixError::InvalidParameter(format!(
                    "attribute {name} appears multiple times in attribute names"
                )));
            }
        }

        let isk = Fr::rand(rng);
        let w = G2Projective::generator() * isk;
        let bar_g1 = G1Projective::rand(rng);
        let bar_g2 = bar_g1 * isk;

        let mut r = Fr::rand(rng);
        let t1 = G2Projective::generator() * r;
        let t2 = bar_g1 * r;
        let proof_c = key_proof_challenge(&t1, &t2, &w, &bar_g1, &bar_g2);
        let proof_s = r + proof_c * isk;
        r.zeroize();

        let mut ipk = IssuerPublicKey {
            attribute_names: attribute_names.iter().map(|s| s.to_string()).collect(),
            h_sk: G1Projective::rand(rng),
            h_rand: G1Projective::rand(rng),
            h_attrs: attribute_names
                .iter()
                .map(|_| G1Projective::rand(rng))
                .collect(),
            w,
            bar_g1,
            bar_g2,
            proof_c,
            proof_s,
            hash: Vec::new(),
        };
        ipk.set_hash();
        Ok(Self { isk, ipk })
    }

    pub fn public_key(&self) -> &IssuerPublicKey {
        &self.ipk
    }

    /// `1 / (isk + e)`, the credential exponent.
    pub(crate) fn credential_exponent(&self, e: &Fr) -> Result<Fr, IdemixError> {
        (self.isk + e)
            .inverse()
            .ok_or_else(|| IdemixError::InvalidParameter("isk + e is zero".into()))
    }
}

impl Drop for IssuerKey {
    fn drop(&mut self) {
        self.isk.zeroize();
    }
}

impl std::fmt::Debug for IssuerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerKey")
            .field("isk", &"[REDACTED]")
            .field("ipk", &self.ipk)
            .finish()
    }
}

fn key_proof_challenge(
    t1: &G2Projective,
    t2: &G1Projective,
    w: &G2Projective,
    bar_g1: &G1Projective,
    bar_g2: &G1Projective,
) -> Fr {
    let mut transcript = Transcript::new(b"idemix/issuer-key");
    transcript.append_g2(t1);
    transcript.append_g1(t2);
    transcript.append_g2(&G2Projective::generator());
    transcript.append_g1(bar_g1);
    transcript.append_g2(w);
    transcript.append_g1(bar_g2);
    transcript.challenge()
}

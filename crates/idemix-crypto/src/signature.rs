//! # Selective-Disclosure Signatures
//!
//! A signature is a non-interactive proof that the signer holds a credential
//! from the issuer, that its pseudonym opens to the credential's secret key,
//! and that each disclosed attribute has the claimed value. The message is
//! bound into the Fiat–Shamir challenge.
//!
//! The credential is first randomized with fresh `r1`, `r2` (`r3 = 1/r1`):
//!
//! ```text
//! A'   = A·r1
//! ABar = B·r1 - A'·e              (= A'·isk)
//! B'   = B·r1 - HRand·r2
//! s'   = s - r2·r3
//! ```
//!
//! Verification checks `e(A', W) = e(ABar, g2)` and then the three proof
//! relations:
//!
//! ```text
//! ABar - B' = -A'·e + HRand·r2
//! g1 + Σ_disclosed HAttr·a = B'·r3 - HSk·sk - HRand·s' - Σ_hidden HAttr·a
//! Nym = HSk·sk + HRand·rNym
//! ```
//!
//! ## Disclosure
//!
//! `disclosure[i] != 0` discloses attribute `i`: the verifier supplies its
//! value. Hidden attributes get a response in `proof_s_attrs`, in index order.

use ark_bls12_381::{Bls12_381, Fr, G1Projective, G2Projective};
use ark_ec::pairing::Pairing;
use ark_ec::Group;
use ark_ff::Field;
use ark_std::{UniformRand, Zero};
use idemix_core::decode;
use prost::Message;
use rand::{CryptoRng, RngCore};

use crate::credential::{Credential, SecretKey};
use crate::curve::{
    big_from_bytes, big_to_bytes, g1_from_wire, g1_to_wire, scalars_from_bytes, Transcript,
};
use crate::error::IdemixError;
use crate::issuer::IssuerPublicKey;
use crate::nym::Nym;
use crate::wire::SignatureWire;

/// A zero-knowledge signature of credential possession.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    a_prime: G1Projective,
    a_bar: G1Projective,
    b_prime: G1Projective,
    proof_c: Fr,
    proof_s_sk: Fr,
    proof_s_e: Fr,
    proof_s_r2: Fr,
    proof_s_r3: Fr,
    proof_s_s_prime: Fr,
    proof_s_attrs: Vec<Fr>,
    nonce: Fr,
    nym: Nym,
    proof_s_r_nym: Fr,
}

/// Commitments of one proof run.
struct Commitments {
    t1: G1Projective,
    t2: G1Projective,
    t3: G1Projective,
}

impl Signature {
    /// Sign `msg` with `cred`, under the pseudonym `nym` opened by
    /// `(sk, r_nym)`, disclosing the attributes flagged in `disclosure`.
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: RngCore + CryptoRng>(
        cred: &Credential,
        sk: &SecretKey,
        nym: &Nym,
        r_nym: &Fr,
        ipk: &IssuerPublicKey,
        disclosure: &[u8],
        msg: &[u8],
        rng: &mut R,
    ) -> Result<Self, IdemixError> {
        let n = ipk.h_attrs.len();
        if cred.attrs().len() > n {
            return Err(IdemixError::InvalidParameter(format!(
                "credential carries {} attributes, issuer key defines only {n}",
                cred.attrs().len()
            )));
        }
        if disclosure.len() != cred.attrs().len() {
            return Err(IdemixError::InvalidParameter(format!(
                "disclosure has {} flags, credential carries {} attributes",
                disclosure.len(),
                cred.attrs().len()
            )));
        }
        let attrs = cred.attribute_scalars()?;
        let hidden = hidden_indices(disclosure);

        let r1 = Fr::rand(rng);
        let r2 = Fr::rand(rng);
        let r3 = r1
            .inverse()
            .ok_or_else(|| IdemixError::InvalidParameter("randomizer r1 is zero".into()))?;
        let nonce = Fr::rand(rng);

        let a_prime = cred.a * r1;
        let a_bar = cred.b * r1 - a_prime * cred.e;
        let b_prime = cred.b * r1 - ipk.h_rand * r2;
        let s_prime = cred.s - r2 * r3;

        let r_sk = Fr::rand(rng);
        let r_e = Fr::rand(rng);
        let r_r2 = Fr::rand(rng);
        let r_r3 = Fr::rand(rng);
        let r_s_prime = Fr::rand(rng);
        let r_r_nym = Fr::rand(rng);
        let r_attrs: Vec<Fr> = hidden.iter().map(|_| Fr::rand(rng)).collect();

        let t1 = a_prime * (-r_e) + ipk.h_rand * r_r2;
        let mut t2 = b_prime * r_r3 - ipk.h_sk * r_sk - ipk.h_rand * r_s_prime;
        for (&i, r) in hidden.iter().zip(&r_attrs) {
            t2 -= ipk.h_attrs[i] * r;
        }
        let t3 = ipk.h_sk * r_sk + ipk.h_rand * r_r_nym;

        let proof_c = challenge(
            &Commitments { t1, t2, t3 },
            &a_prime,
            &a_bar,
            &b_prime,
            nym,
            ipk,
            disclosure,
            msg,
            &nonce,
        );

        Ok(Self {
            a_prime,
            a_bar,
            b_prime,
            proof_c,
            proof_s_sk: r_sk + proof_c * sk.0,
            proof_s_e: r_e + proof_c * cred.e,
            proof_s_r2: r_r2 + proof_c * r2,
            proof_s_r3: r_r3 + proof_c * r3,
            proof_s_s_prime: r_s_prime + proof_c * s_prime,
            proof_s_attrs: hidden
                .iter()
                .zip(&r_attrs)
                .map(|(&i, r)| *r + proof_c * attrs[i])
                .collect(),
            nonce,
            nym: *nym,
            proof_s_r_nym: r_r_nym + proof_c * r_nym,
        })
    }

    /// Verify against the issuer key, the message, and the values of the
    /// disclosed attributes. `disclosure` covers the signer's credential
    /// attributes, a prefix of the issuer key's; `attribute_values` holds one
    /// entry per flag and entries at hidden positions are ignored.
    pub fn verify(
        &self,
        disclosure: &[u8],
        ipk: &IssuerPublicKey,
        msg: &[u8],
        attribute_values: &[Fr],
    ) -> Result<(), IdemixError> {
        let n = ipk.h_attrs.len();
        if disclosure.len() > n {
            return Err(IdemixError::SignatureVerification(format!(
                "disclosure has {} flags, issuer key defines only {n} attributes",
                disclosure.len()
            )));
        }
        if attribute_values.len() != disclosure.len() {
            return Err(IdemixError::SignatureVerification(format!(
                "expected {} attribute values, got {}",
                disclosure.len(),
                attribute_values.len()
            )));
        }
        let hidden = hidden_indices(disclosure);
        if hidden.len() != self.proof_s_attrs.len() {
            return Err(IdemixError::SignatureVerification(format!(
                "expected {} hidden attribute responses, got {}",
                hidden.len(),
                self.proof_s_attrs.len()
            )));
        }
        if self.a_prime.is_zero() {
            return Err(IdemixError::SignatureVerification(
                "A' is the identity".into(),
            ));
        }
        if Bls12_381::pairing(self.a_prime, ipk.w)
            != Bls12_381::pairing(self.a_bar, G2Projective::generator())
        {
            return Err(IdemixError::SignatureVerification(
                "A' and ABar are not consistent with the issuer key".into(),
            ));
        }

        let c = self.proof_c;
        let t1 = self.a_prime * (-self.proof_s_e) + ipk.h_rand * self.proof_s_r2
            - (self.a_bar - self.b_prime) * c;

        let mut disclosed = G1Projective::generator();
        for (i, flag) in disclosure.iter().enumerate() {
            if *flag != 0 {
                disclosed += ipk.h_attrs[i] * attribute_values[i];
            }
        }
        let mut t2 = self.b_prime * self.proof_s_r3
            - ipk.h_sk * self.proof_s_sk
            - ipk.h_rand * self.proof_s_s_prime;
        for (&i, z) in hidden.iter().zip(&self.proof_s_attrs) {
            t2 -= ipk.h_attrs[i] * z;
        }
        t2 -= disclosed * c;

        let t3 = ipk.h_sk * self.proof_s_sk + ipk.h_rand * self.proof_s_r_nym - self.nym.0 * c;

        let expected = challenge(
            &Commitments { t1, t2, t3 },
            &self.a_prime,
            &self.a_bar,
            &self.b_prime,
            &self.nym,
            ipk,
            disclosure,
            msg,
            &self.nonce,
        );
        if expected != c {
            return Err(IdemixError::SignatureVerification(
                "zero knowledge proof is invalid".into(),
            ));
        }
        Ok(())
    }

    /// Pseudonym the signature was produced under.
    pub fn nym(&self) -> &Nym {
        &self.nym
    }

    pub fn encode(&self) -> Vec<u8> {
        SignatureWire {
            a_prime: Some(g1_to_wire(&self.a_prime)),
            a_bar: Some(g1_to_wire(&self.a_bar)),
            b_prime: Some(g1_to_wire(&self.b_prime)),
            proof_c: big_to_bytes(&self.proof_c),
            proof_s_sk: big_to_bytes(&self.proof_s_sk),
            proof_s_e: big_to_bytes(&self.proof_s_e),
            proof_s_r2: big_to_bytes(&self.proof_s_r2),
            proof_s_r3: big_to_bytes(&self.proof_s_r3),
            proof_s_s_prime: big_to_bytes(&self.proof_s_s_prime),
            proof_s_attrs: self.proof_s_attrs.iter().map(big_to_bytes).collect(),
            nonce: big_to_bytes(&self.nonce),
            nym: Some(g1_to_wire(&self.nym.0)),
            proof_s_r_nym: big_to_bytes(&self.proof_s_r_nym),
        }
        .encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, IdemixError> {
        let wire: SignatureWire = decode("Signature", bytes)?;
        Ok(Self {
            a_prime: g1_from_wire(wire.a_prime.as_ref(), "a_prime")?,
            a_bar: g1_from_wire(wire.a_bar.as_ref(), "a_bar")?,
            b_prime: g1_from_wire(wire.b_prime.as_ref(), "b_prime")?,
            proof_c: big_from_bytes(&wire.proof_c)?,
            proof_s_sk: big_from_bytes(&wire.proof_s_sk)?,
            proof_s_e: big_from_bytes(&wire.proof_s_e)?,
            proof_s_r2: big_from_bytes(&wire.proof_s_r2)?,
            proof_s_r3: big_from_bytes(&wire.proof_s_r3)?,
            proof_s_s_prime: big_from_bytes(&wire.proof_s_s_prime)?,
            proof_s_attrs: scalars_from_bytes(&wire.proof_s_attrs, "proof_s_attrs")?,
            nonce: big_from_bytes(&wire.nonce)?,
            nym: Nym(g1_from_wire(wire.nym.as_ref(), "nym")?),
            proof_s_r_nym: big_from_bytes(&wire.proof_s_r_nym)?,
        })
    }
}

fn hidden_indices(disclosure: &[u8]) -> Vec<usize> {
    disclosure
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag == 0)
        .map(|(i, _)| i)
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn challenge(
    commitments: &Commitments,
    a_prime: &G1Projective,
    a_bar: &G1Projective,
    b_prime: &G1Projective,
    nym: &Nym,
    ipk: &IssuerPublicKey,
    disclosure: &[u8],
    msg: &[u8],
    nonce: &Fr,
) -> Fr {
    let mut transcript = Transcript::new(b"idemix/signature");
    transcript.append_g1(&commitments.t1);
    transcript.append_g1(&commitments.t2);
    transcript.append_g1(&commitments.t3);
    transcript.append_g1(a_prime);
    transcript.append_g1(a_bar);
    transcript.append_g1(b_prime);
    transcript.append_g1(&nym.0);
    transcript.append_bytes(ipk.hash());
    transcript.append_bytes(disclosure);
    transcript.append_bytes(msg);
    transcript.append_scalar(nonce);
    transcript.challenge()
}

//! # idemix-crypto — Anonymous-Credential Engine
//!
//! Pairing-based anonymous credentials over BLS12-381:
//!
//! - **Issuer keys** (`issuer.rs`): issuer secret `isk`, public key with
//!   per-attribute generators, `W = g2^isk`, and a proof of knowledge of
//!   `isk` checked by [`IssuerPublicKey::check`].
//! - **Credentials** (`credential.rs`): BBS+-style signatures `(A, B, e, s)`
//!   binding a holder secret key to committed attribute values, plus the
//!   credential request a holder sends to the issuer.
//! - **Pseudonyms** (`nym.rs`): `Nym = HSk^sk · HRand^r`, re-randomized per
//!   derivation so two pseudonyms of one key are unlinkable.
//! - **Signatures** (`signature.rs`): non-interactive zero-knowledge proofs
//!   of credential possession that disclose a chosen subset of attributes
//!   and bind a message and a pseudonym.
//! - **Encoding** (`curve.rs`): fixed-width big-endian scalars and
//!   coordinates, the domain hash `hash_mod_order`, and the Fiat–Shamir
//!   transcript.
//!
//! ## Security Invariants
//!
//! - Secret scalars (`isk`, holder keys) are zeroized on drop and never
//!   appear in `Debug` output.
//! - Every decoded point is checked to lie on the curve and in the prime
//!   order subgroup; every decoded scalar must be canonically reduced.
//! - Randomness is always supplied by the caller as `RngCore + CryptoRng`;
//!   the engine holds no random state of its own.

pub mod credential;
pub mod curve;
pub mod error;
pub mod issuer;
pub mod nym;
pub mod signature;
mod wire;

pub use ark_bls12_381::Fr;
pub use credential::{CredRequest, Credential, SecretKey};
pub use curve::{big_from_bytes, big_to_bytes, hash_mod_order, FIELD_BYTES, SCALAR_BYTES};
pub use error::IdemixError;
pub use issuer::{IssuerKey, IssuerPublicKey};
pub use nym::{make_nym, Nym};
pub use signature::Signature;

//! # idemix-msp — Anonymous-Credential Membership Service Provider
//!
//! Validates participant identities and evaluates access-control principals
//! without a stable real-world identifier. An identity is a pseudonym plus
//! two attributes its credential commits to: an organizational unit and a
//! role (MEMBER or ADMIN).
//!
//! - **Setup** (`provider.rs`): typed configuration → checked issuer key and
//!   an optional default signer whose credential matches its configured OU
//!   and role.
//! - **Identities** (`identity.rs`, `signer.rs`): public identities with a
//!   canonical wire form, and a signing identity holding the secret key,
//!   credential, and pseudonym randomizer.
//! - **Validation and principals** (`principal.rs`): ROLE, ORGANIZATION_UNIT,
//!   and IDENTITY predicates.
//! - **Configuration directory** (`config.rs`): on-disk layout loader.
//!
//! ## Security Invariants
//!
//! - Every entry point rejects identities naming a different provider.
//! - Signature verification recomputes the OU and Role attribute values from
//!   the identity's own records, so a signature only verifies for the
//!   records its credential commits to.
//! - Deserialization is structural. Membership is proven by a signature,
//!   not by parsing.
//!
//! ## Crate Policy
//!
//! - Diagnostics go through `tracing`, inside a per-provider `idemix_msp`
//!   span. Secret material is never logged; messages and signatures are
//!   logged by length only.
//! - Randomness is injected at setup; each signer owns a seeded `StdRng`
//!   behind a mutex.

mod attributes;
pub mod config;
mod context;
pub mod error;
pub mod identity;
mod principal;
pub mod provider;
pub mod signer;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use attributes::{ou_attribute, role_attribute, ATTRIBUTE_NAME_OU, ATTRIBUTE_NAME_ROLE};
pub use config::load_idemix_msp_config;
pub use error::MspError;
pub use identity::{IdemixIdentity, Identity, IdentityIdentifier, IdentityRef, OuIdentifier};
pub use provider::IdemixMsp;
pub use signer::{IdemixSigningIdentity, SigningIdentity};

//! Shared key-material builders for the provider integration tests.

use idemix_core::{IdemixMspSignerConfig, MspConfig};
use idemix_crypto::IssuerKey;
use idemix_msp::{fixtures, IdemixMsp};

pub struct Issued {
    pub key: IssuerKey,
    pub signer: IdemixMspSignerConfig,
}

/// Issuer key plus a signer configuration for `msp`/`ou`.
pub fn issue(msp: &str, ou: &str, is_admin: bool, seed: u64) -> Issued {
    let mut rng = fixtures::rng(seed);
    let key = fixtures::issuer_key(&mut rng).expect("issuer key");
    let signer = fixtures::signer_config(&key, msp, ou, is_admin, &mut rng).expect("credential");
    Issued { key, signer }
}

pub fn config(name: &str, issued: &Issued, with_signer: bool) -> MspConfig {
    fixtures::msp_config(name, &issued.key, with_signer.then(|| issued.signer.clone()))
}

/// Signing provider and a verification-only provider sharing one issuer.
pub fn provider_pair(name: &str, ou: &str, is_admin: bool, seed: u64) -> (IdemixMsp, IdemixMsp) {
    let issued = issue(name, ou, is_admin, seed);
    let mut rng = fixtures::rng(seed + 1000);
    let signing = IdemixMsp::setup_with(&config(name, &issued, true), &tracing::Span::none(), &mut rng)
        .expect("signing provider");
    let verifying =
        IdemixMsp::setup_with(&config(name, &issued, false), &tracing::Span::none(), &mut rng)
            .expect("verifying provider");
    (signing, verifying)
}

/// Provider over `issued`, set up with its own RNG seed.
pub fn setup(name: &str, issued: &Issued, with_signer: bool, rng_seed: u64) -> IdemixMsp {
    let mut rng = fixtures::rng(rng_seed);
    IdemixMsp::setup_with(&config(name, issued, with_signer), &tracing::Span::none(), &mut rng)
        .expect("provider setup")
}

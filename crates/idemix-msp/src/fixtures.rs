//! Key material for tests: issuer keys, issued signer configurations, and
//! ready providers. Compiled for this crate's tests and, behind the
//! `fixtures` feature, for downstream test suites.

use std::path::Path;

use idemix_core::{IdemixMspConfig, IdemixMspSignerConfig, MspConfig, OrganizationalUnit, Role};
use idemix_crypto::{CredRequest, Credential, IdemixError, IssuerKey, SecretKey};
use prost::Message;
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};

use crate::attributes::{ou_attribute, role_attribute, ATTRIBUTE_NAME_OU, ATTRIBUTE_NAME_ROLE};
use crate::config::{ISSUER_PUBLIC_KEY_FILE, MSP_DIR, SIGNER_CONFIG_FILE, USER_DIR};
use crate::error::MspError;
use crate::provider::IdemixMsp;

/// Deterministic RNG for reproducible fixtures.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Issuer key with the `OU`, `Role` attribute schema.
pub fn issuer_key<R: RngCore + CryptoRng>(rng: &mut R) -> Result<IssuerKey, IdemixError> {
    IssuerKey::generate(&[ATTRIBUTE_NAME_OU, ATTRIBUTE_NAME_ROLE], rng)
}

/// Issuer key with an arbitrary attribute schema.
pub fn issuer_key_with_attributes<R: RngCore + CryptoRng>(
    names: &[&str],
    rng: &mut R,
) -> Result<IssuerKey, IdemixError> {
    IssuerKey::generate(names, rng)
}

/// Issue a credential for a fresh holder key and package it as a signer
/// configuration for provider `msp`.
pub fn signer_config<R: RngCore + CryptoRng>(
    key: &IssuerKey,
    msp: &str,
    ou: &str,
    is_admin: bool,
    rng: &mut R,
) -> Result<IdemixMspSignerConfig, IdemixError> {
    let sk = SecretKey::generate(rng);
    let mut nonce = [0u8; 32];
    rng.fill_bytes(&mut nonce);
    let request = CredRequest::new(&sk, &nonce, key.public_key(), rng);
    let attrs = [
        ou_attribute(&OrganizationalUnit::new(msp, ou)),
        role_attribute(&Role::for_signer(msp, is_admin)),
    ];
    let cred = Credential::issue(key, &request, &attrs, rng)?;
    Ok(IdemixMspSignerConfig {
        cred: cred.encode(),
        sk: sk.to_bytes(),
        organizational_unit_identifier: ou.to_string(),
        is_admin,
    })
}

/// IDEMIX provider configuration named `name` over `key`.
pub fn msp_config(name: &str, key: &IssuerKey, signer: Option<IdemixMspSignerConfig>) -> MspConfig {
    MspConfig::idemix(&IdemixMspConfig {
        name: name.to_string(),
        ipk: key.public_key().encode(),
        signer,
    })
}

/// Provider `name` whose default signer belongs to `ou`.
pub fn provider(name: &str, ou: &str, is_admin: bool, seed: u64) -> Result<IdemixMsp, MspError> {
    let mut rng = rng(seed);
    let key = issuer_key(&mut rng).map_err(|source| MspError::MalformedKeyMaterial {
        what: "fixture issuer key",
        source,
    })?;
    let signer = signer_config(&key, name, ou, is_admin, &mut rng).map_err(|source| {
        MspError::MalformedKeyMaterial {
            what: "fixture signer config",
            source,
        }
    })?;
    IdemixMsp::setup_with(
        &msp_config(name, &key, Some(signer)),
        &tracing::Span::none(),
        &mut rng,
    )
}

/// Write `key`'s public half and, optionally, `signer` in the layout read by
/// [`load_idemix_msp_config`](crate::config::load_idemix_msp_config).
pub fn write_config_dir(
    dir: &Path,
    key: &IssuerKey,
    signer: Option<&IdemixMspSignerConfig>,
) -> Result<(), MspError> {
    let write = |path: std::path::PathBuf, bytes: Vec<u8>| -> Result<(), MspError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| MspError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, bytes).map_err(|source| MspError::Io { path, source })
    };
    write(
        dir.join(MSP_DIR).join(ISSUER_PUBLIC_KEY_FILE),
        key.public_key().encode(),
    )?;
    if let Some(signer) = signer {
        write(dir.join(USER_DIR).join(SIGNER_CONFIG_FILE), signer.encode_to_vec())?;
    }
    Ok(())
}

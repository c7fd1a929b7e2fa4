//! # Configuration Directory Loader
//!
//! Builds an IDEMIX [`MspConfig`] from an on-disk layout:
//!
//! ```text
//! <dir>/msp/IssuerPublicKey     encoded issuer public key (required)
//! <dir>/user/SignerConfig       encoded IdemixMSPSignerConfig (optional)
//! ```
//!
//! A missing signer file yields a verification-only configuration. Any
//! other read failure is an error.

use std::io::ErrorKind;
use std::path::Path;

use idemix_core::{decode, IdemixMspConfig, IdemixMspSignerConfig, MspConfig};

use crate::error::MspError;

/// Directory holding the issuer public key.
pub const MSP_DIR: &str = "msp";
/// Directory holding the signer configuration.
pub const USER_DIR: &str = "user";
pub const ISSUER_PUBLIC_KEY_FILE: &str = "IssuerPublicKey";
pub const SIGNER_CONFIG_FILE: &str = "SignerConfig";

/// Read the provider configuration for `name` from `dir`.
pub fn load_idemix_msp_config(dir: &Path, name: &str) -> Result<MspConfig, MspError> {
    let ipk_path = dir.join(MSP_DIR).join(ISSUER_PUBLIC_KEY_FILE);
    let ipk = std::fs::read(&ipk_path).map_err(|source| MspError::Io {
        path: ipk_path.clone(),
        source,
    })?;

    let signer_path = dir.join(USER_DIR).join(SIGNER_CONFIG_FILE);
    let signer = match std::fs::read(&signer_path) {
        Ok(bytes) => {
            let signer: IdemixMspSignerConfig = decode("IdemixMSPSignerConfig", &bytes)
                .map_err(|source| MspError::MalformedConfig {
                    what: "signer config",
                    source,
                })?;
            Some(signer)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(
                path = %signer_path.display(),
                "no signer config found, configuring a verification-only msp"
            );
            None
        }
        Err(source) => {
            return Err(MspError::Io {
                path: signer_path,
                source,
            })
        }
    };

    Ok(MspConfig::idemix(&IdemixMspConfig {
        name: name.to_string(),
        ipk,
        signer,
    }))
}

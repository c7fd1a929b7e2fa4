//! # Inspect Subcommand
//!
//! Prints the provider's issuer key schema and default signer as JSON.
//! Secret material is never part of the report.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use idemix_core::{ProviderType, RoleKind};
use idemix_msp::{IdemixMsp, Identity, IdentityIdentifier};
use serde::Serialize;

/// Arguments for `idemix inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {}

/// Provider summary.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub msp: String,
    pub provider_type: &'static str,
    pub attribute_names: Vec<String>,
    /// Hex digest of the issuer public key.
    pub issuer_key_hash: String,
    /// `None` for verification-only providers.
    pub signer: Option<SignerReport>,
}

#[derive(Debug, Serialize)]
pub struct SignerReport {
    pub identifier: IdentityIdentifier,
    pub organizational_unit: String,
    pub role: RoleKind,
    /// Hex of the serialized public identity.
    pub identity: String,
}

/// Execute `idemix inspect`.
pub fn run_inspect(_args: &InspectArgs, dir: &Path, name: &str) -> Result<u8> {
    let msp = crate::load_msp(dir, name)?;
    println!("{}", serde_json::to_string_pretty(&inspect(&msp))?);
    Ok(0)
}

pub fn inspect(msp: &IdemixMsp) -> InspectReport {
    let ipk = msp.issuer_public_key();
    let signer = msp.default_signing_identity().ok().map(|signer| {
        let public = signer.public_version();
        SignerReport {
            identifier: public.identifier().clone(),
            organizational_unit: public.organizational_unit().identifier.clone(),
            role: public.role().kind,
            identity: hex::encode(public.serialize()),
        }
    });
    InspectReport {
        msp: msp.identifier().to_string(),
        provider_type: match msp.provider_type() {
            ProviderType::Idemix => "IDEMIX",
            ProviderType::Fabric => "FABRIC",
        },
        attribute_names: ipk.attribute_names().to_vec(),
        issuer_key_hash: hex::encode(ipk.hash()),
        signer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idemix_msp::fixtures;

    #[test]
    fn report_describes_signer() {
        let msp = fixtures::provider("org1MSP", "org1", true, 101).unwrap();
        let report = inspect(&msp);
        assert_eq!(report.msp, "org1MSP");
        assert_eq!(report.provider_type, "IDEMIX");
        assert_eq!(report.attribute_names, vec!["OU", "Role"]);
        assert_eq!(report.issuer_key_hash.len(), 64);

        let signer = report.signer.expect("signer present");
        assert_eq!(signer.organizational_unit, "org1");
        assert_eq!(signer.role, RoleKind::Admin);

        let json = serde_json::to_value(&inspect(&msp)).unwrap();
        assert_eq!(json["signer"]["role"], "ADMIN");
        assert_eq!(json["signer"]["identifier"]["mspid"], "org1MSP");
    }

    #[test]
    fn verification_only_report_has_no_signer() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = fixtures::rng(102);
        let key = fixtures::issuer_key(&mut rng).unwrap();
        fixtures::write_config_dir(dir.path(), &key, None).unwrap();

        let msp = crate::load_msp(dir.path(), "org1MSP").unwrap();
        assert!(inspect(&msp).signer.is_none());
        assert_eq!(run_inspect(&InspectArgs {}, dir.path(), "org1MSP").unwrap(), 0);
    }
}

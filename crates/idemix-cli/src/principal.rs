//! # Check-Principal Subcommand
//!
//! Evaluates one principal against a serialized identity. The principal is
//! scoped to the provider named by `--name`; exactly one predicate is given.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use idemix_core::{MspPrincipal, MspRole, MspRoleType, OrganizationalUnit};
use idemix_msp::IdemixMsp;

use crate::decode_hex;

/// Arguments for `idemix check-principal`.
#[derive(Args, Debug)]
pub struct CheckPrincipalArgs {
    /// Serialized identity to evaluate (hex).
    #[arg(long, value_name = "HEX")]
    pub identity: String,

    #[command(flatten)]
    pub predicate: PredicateArgs,
}

/// The principal to evaluate.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PredicateArgs {
    /// ROLE principal.
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,

    /// ORGANIZATION_UNIT principal.
    #[arg(long, value_name = "OU")]
    pub ou: Option<String>,

    /// IDENTITY principal: satisfied only by this exact serialized identity (hex).
    #[arg(long, value_name = "HEX")]
    pub same_as: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleArg {
    Member,
    Admin,
}

impl From<RoleArg> for MspRoleType {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Member => MspRoleType::Member,
            RoleArg::Admin => MspRoleType::Admin,
        }
    }
}

impl PredicateArgs {
    /// Build the principal envelope for provider `msp`.
    pub fn to_principal(&self, msp: &str) -> Result<MspPrincipal> {
        match (&self.role, &self.ou, &self.same_as) {
            (Some(role), _, _) => Ok(MspPrincipal::role(&MspRole {
                msp_identifier: msp.to_string(),
                role: MspRoleType::from(*role) as i32,
            })),
            (None, Some(ou), _) => Ok(MspPrincipal::organizational_unit(
                &OrganizationalUnit::new(msp, ou.as_str()).to_proto(),
            )),
            (None, None, Some(identity)) => {
                Ok(MspPrincipal::identity(decode_hex("principal identity", identity)?))
            }
            (None, None, None) => anyhow::bail!("one of --role, --ou, or --same-as is required"),
        }
    }
}

/// Execute `idemix check-principal`.
pub fn run_check_principal(args: &CheckPrincipalArgs, dir: &Path, name: &str) -> Result<u8> {
    let msp = crate::load_msp(dir, name)?;
    let principal = args.predicate.to_principal(name)?;
    cmd_check_principal(&msp, &args.identity, &principal)
}

pub fn cmd_check_principal(msp: &IdemixMsp, identity_hex: &str, principal: &MspPrincipal) -> Result<u8> {
    let identity = msp
        .deserialize_identity(&decode_hex("identity", identity_hex)?)
        .context("failed to deserialize identity")?;

    match msp.satisfies_principal(&identity, principal) {
        Ok(()) => {
            println!("OK: identity satisfies the principal");
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {e}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idemix_msp::{fixtures, Identity};

    fn predicate(role: Option<RoleArg>, ou: Option<&str>, same_as: Option<String>) -> PredicateArgs {
        PredicateArgs {
            role,
            ou: ou.map(str::to_string),
            same_as,
        }
    }

    fn signer_hex(msp: &IdemixMsp) -> String {
        hex::encode(msp.default_signing_identity().unwrap().serialize())
    }

    #[test]
    fn role_predicates() {
        let msp = fixtures::provider("org1MSP", "org1", false, 121).unwrap();
        let id = signer_hex(&msp);

        let member = predicate(Some(RoleArg::Member), None, None).to_principal("org1MSP").unwrap();
        assert_eq!(cmd_check_principal(&msp, &id, &member).unwrap(), 0);

        let admin = predicate(Some(RoleArg::Admin), None, None).to_principal("org1MSP").unwrap();
        assert_eq!(cmd_check_principal(&msp, &id, &admin).unwrap(), 1);
    }

    #[test]
    fn ou_predicates() {
        let msp = fixtures::provider("org1MSP", "org1", true, 122).unwrap();
        let id = signer_hex(&msp);

        let own = predicate(None, Some("org1"), None).to_principal("org1MSP").unwrap();
        assert_eq!(cmd_check_principal(&msp, &id, &own).unwrap(), 0);

        let other = predicate(None, Some("org2"), None).to_principal("org1MSP").unwrap();
        assert_eq!(cmd_check_principal(&msp, &id, &other).unwrap(), 1);
    }

    #[test]
    fn principal_for_another_msp_fails() {
        let msp = fixtures::provider("org1MSP", "org1", true, 123).unwrap();
        let id = signer_hex(&msp);
        let principal = predicate(Some(RoleArg::Member), None, None).to_principal("org2MSP").unwrap();
        assert_eq!(cmd_check_principal(&msp, &id, &principal).unwrap(), 1);
    }

    #[test]
    fn identity_predicate_matches_itself() {
        let msp = fixtures::provider("org1MSP", "org1", false, 124).unwrap();
        let id = signer_hex(&msp);
        let principal = predicate(None, None, Some(id.clone())).to_principal("org1MSP").unwrap();
        assert_eq!(cmd_check_principal(&msp, &id, &principal).unwrap(), 0);

        let other = predicate(None, None, Some("00".into())).to_principal("org1MSP").unwrap();
        assert_eq!(cmd_check_principal(&msp, &id, &other).unwrap(), 1);
    }

    #[test]
    fn bad_identity_hex_is_an_error() {
        let msp = fixtures::provider("org1MSP", "org1", false, 125).unwrap();
        let principal = predicate(Some(RoleArg::Member), None, None).to_principal("org1MSP").unwrap();
        assert!(cmd_check_principal(&msp, "not-hex", &principal).is_err());
        assert!(predicate(None, None, Some("xyz".into())).to_principal("org1MSP").is_err());
    }
}

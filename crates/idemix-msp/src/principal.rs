//! # Validator and Principal Evaluator
//!
//! ## Validation
//!
//! An identity is valid for a provider when it names the provider and the
//! provider's issuer key passes its well-formedness check. This does not
//! prove that anyone holds a credential for the identity's pseudonym; that
//! proof only comes from verifying a signature.
//!
//! ## Principals
//!
//! | Classification      | Satisfied when                                          |
//! |---------------------|---------------------------------------------------------|
//! | ROLE MEMBER         | identity validates                                      |
//! | ROLE ADMIN          | identity validates and holds the ADMIN role             |
//! | ORGANIZATION_UNIT   | identity validates and its OU identifier matches        |
//! | IDENTITY            | serialized identity equals the principal bytes exactly  |
//!
//! ROLE and ORGANIZATION_UNIT principals must name this provider.

use idemix_core::{
    decode, Classification, MspPrincipal, MspRole, MspRoleType, OrganizationUnit, RoleKind,
};

use crate::context::MspContext;
use crate::error::MspError;
use crate::identity::{IdemixIdentity, Identity};

impl MspContext {
    pub(crate) fn validate(&self, identity: &IdemixIdentity) -> Result<(), MspError> {
        let _guard = self.span.enter();
        tracing::info!(identity = %identity.id.id, "validating identity");
        if identity.id.mspid != self.name {
            return Err(MspError::IdentityMismatch {
                expected: self.name.clone(),
                actual: identity.id.mspid.clone(),
            });
        }
        self.ipk
            .check()
            .map_err(|source| MspError::CryptoVerification {
                message: "issuer public key is not valid".into(),
                source,
            })
    }

    pub(crate) fn satisfies_principal(
        &self,
        identity: &IdemixIdentity,
        principal: &MspPrincipal,
    ) -> Result<(), MspError> {
        let classification = Classification::try_from(principal.principal_classification)
            .map_err(|_| MspError::UnknownPrincipal(principal.principal_classification))?;
        let result = match classification {
            Classification::Role => self.satisfies_role(identity, &principal.principal),
            Classification::Identity => satisfies_identity(identity, &principal.principal),
            Classification::OrganizationUnit => self.satisfies_ou(identity, &principal.principal),
        };
        if let Err(e) = &result {
            let _guard = self.span.enter();
            tracing::debug!(
                identity = %identity.id.id,
                classification = ?classification,
                error = %e,
                "principal not satisfied"
            );
        }
        result
    }

    fn satisfies_role(&self, identity: &IdemixIdentity, payload: &[u8]) -> Result<(), MspError> {
        let role: MspRole = decode("MSPRole", payload).map_err(|source| MspError::Serialization {
            message: "could not unmarshal MSPRole from principal".into(),
            source,
        })?;
        self.require_own_name(&role.msp_identifier)?;
        match MspRoleType::try_from(role.role) {
            Ok(MspRoleType::Member) => self.validate(identity),
            Ok(MspRoleType::Admin) => {
                self.validate(identity)?;
                if identity.role.kind != RoleKind::Admin {
                    return Err(MspError::PrincipalMismatch("user is not an admin".into()));
                }
                Ok(())
            }
            Err(_) => Err(MspError::UnknownRole(role.role)),
        }
    }

    fn satisfies_ou(&self, identity: &IdemixIdentity, payload: &[u8]) -> Result<(), MspError> {
        let ou: OrganizationUnit =
            decode("OrganizationUnit", payload).map_err(|source| MspError::Serialization {
                message: "could not unmarshal OrganizationUnit from principal".into(),
                source,
            })?;
        self.require_own_name(&ou.msp_identifier)?;
        self.validate(identity)?;
        if ou.organizational_unit_identifier != identity.ou.identifier {
            return Err(MspError::PrincipalMismatch(
                "user is not part of the desired organizational unit".into(),
            ));
        }
        Ok(())
    }

    fn require_own_name(&self, msp_identifier: &str) -> Result<(), MspError> {
        if msp_identifier != self.name {
            return Err(MspError::IdentityMismatch {
                expected: self.name.clone(),
                actual: msp_identifier.to_string(),
            });
        }
        Ok(())
    }
}

fn satisfies_identity(identity: &IdemixIdentity, payload: &[u8]) -> Result<(), MspError> {
    if identity.serialize() != payload {
        return Err(MspError::PrincipalMismatch("the identities do not match".into()));
    }
    Ok(())
}

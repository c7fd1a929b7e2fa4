//! # Pseudonymous Identities
//!
//! An [`IdemixIdentity`] is a pseudonym plus the OU and Role records its
//! credential commits to. It carries no stable identifier: the derived
//! [`IdentityIdentifier`] is the provider name and the pseudonym's string
//! form, usable for lookup but never proof of anything by itself.
//!
//! ## Wire Format
//!
//! ```text
//! SerializedIdentity { mspid, id_bytes = SerializedIdemixIdentity {
//!     nym_x, nym_y,      48-byte big-endian coordinates
//!     ou,                encoded OrganizationUnit
//!     role,              encoded MSPRole
//! } }
//! ```
//!
//! `serialize()` is deterministic, so byte equality of serializations is
//! identity equality.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use idemix_core::{
    decode, MspPrincipal, OrganizationalUnit, Role, SerializedIdemixIdentity, SerializedIdentity,
};
use idemix_crypto::{IdemixError, Nym, Signature};
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::attributes::{ou_attribute, role_attribute, DISCLOSURE};
use crate::context::MspContext;
use crate::error::MspError;
use crate::signer::IdemixSigningIdentity;

/// Lookup key of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityIdentifier {
    /// Owning provider name.
    pub mspid: String,
    /// String form of the pseudonym, `(x,y)` in hex.
    pub id: String,
}

/// Organizational unit descriptor as reported to policy engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuIdentifier {
    /// Encoded issuer public key of the owning provider.
    pub certifiers_identifier: Vec<u8>,
    pub organizational_unit_identifier: String,
}

/// Operations every identity supports.
pub trait Identity {
    fn identifier(&self) -> &IdentityIdentifier;

    fn msp_identifier(&self) -> &str;

    /// Pseudonymous identities do not expire; always the Unix epoch.
    fn expires_at(&self) -> DateTime<Utc>;

    fn organizational_units(&self) -> Vec<OuIdentifier>;

    /// Validate against the owning provider.
    fn validate(&self) -> Result<(), MspError>;

    /// Verify a signature over `msg` made under this identity.
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<(), MspError>;

    /// Canonical wire encoding.
    fn serialize(&self) -> Vec<u8>;

    /// Evaluate `principal` against this identity, using the owning provider.
    fn satisfies_principal(&self, principal: &MspPrincipal) -> Result<(), MspError>;
}

/// Public identity of a pseudonym holder.
#[derive(Clone)]
pub struct IdemixIdentity {
    pub(crate) nym: Nym,
    pub(crate) role: Role,
    pub(crate) ou: OrganizationalUnit,
    pub(crate) id: IdentityIdentifier,
    pub(crate) ctx: Arc<MspContext>,
}

impl IdemixIdentity {
    pub(crate) fn new(
        ctx: Arc<MspContext>,
        nym: Nym,
        role: Role,
        ou: OrganizationalUnit,
    ) -> Self {
        let id = IdentityIdentifier {
            mspid: ctx.name.clone(),
            id: nym.to_string(),
        };
        Self {
            nym,
            role,
            ou,
            id,
            ctx,
        }
    }

    /// Structural parse of a serialized identity. Performs no cryptographic
    /// check; callers validate separately.
    pub(crate) fn deserialize(ctx: &Arc<MspContext>, bytes: &[u8]) -> Result<Self, MspError> {
        let envelope: SerializedIdentity =
            decode("SerializedIdentity", bytes).map_err(|source| MspError::Serialization {
                message: "could not deserialize a SerializedIdentity".into(),
                source,
            })?;
        if envelope.mspid != ctx.name {
            return Err(MspError::IdentityMismatch {
                expected: ctx.name.clone(),
                actual: envelope.mspid,
            });
        }

        let inner: SerializedIdemixIdentity =
            decode("SerializedIdemixIdentity", &envelope.id_bytes).map_err(|source| {
                MspError::Serialization {
                    message: "could not deserialize a SerializedIdemixIdentity".into(),
                    source,
                }
            })?;
        for (field, value) in [("nym_x", &inner.nym_x), ("nym_y", &inner.nym_y)] {
            if value.is_empty() {
                return Err(MspError::Serialization {
                    message: "unable to deserialize idemix identity: pseudonym is invalid".into(),
                    source: idemix_core::WireError::MissingField(field),
                });
            }
        }
        let nym =
            Nym::from_coordinates(&inner.nym_x, &inner.nym_y).map_err(MspError::InvalidPseudonym)?;

        let ou = OrganizationalUnit::decode(&inner.ou).map_err(|source| MspError::Serialization {
            message: "cannot deserialize the OU of the identity".into(),
            source,
        })?;
        let role = Role::decode(&inner.role).map_err(|source| MspError::Serialization {
            message: "cannot deserialize the role of the identity".into(),
            source,
        })?;

        Ok(Self::new(Arc::clone(ctx), nym, role, ou))
    }

    pub fn nym(&self) -> &Nym {
        &self.nym
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn organizational_unit(&self) -> &OrganizationalUnit {
        &self.ou
    }
}

impl Identity for IdemixIdentity {
    fn identifier(&self) -> &IdentityIdentifier {
        &self.id
    }

    fn msp_identifier(&self) -> &str {
        &self.id.mspid
    }

    fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }

    fn organizational_units(&self) -> Vec<OuIdentifier> {
        vec![OuIdentifier {
            certifiers_identifier: self.ctx.ipk_bytes.clone(),
            organizational_unit_identifier: self.ou.identifier.clone(),
        }]
    }

    fn validate(&self) -> Result<(), MspError> {
        self.ctx.validate(self)
    }

    /// Besides the engine check, the signature's pseudonym must be this
    /// identity's pseudonym.
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<(), MspError> {
        let _guard = self.ctx.span.enter();
        let signature = Signature::decode(sig).map_err(|source| MspError::CryptoVerification {
            message: "could not decode signature".into(),
            source,
        })?;
        let attribute_values = [ou_attribute(&self.ou), role_attribute(&self.role)];
        if let Err(source) = signature.verify(&DISCLOSURE, &self.ctx.ipk, msg, &attribute_values) {
            tracing::debug!(
                identity = %self.id.id,
                msg_len = msg.len(),
                sig_len = sig.len(),
                error = %source,
                "signature verification failed"
            );
            return Err(MspError::CryptoVerification {
                message: "signature is not valid for this identity".into(),
                source,
            });
        }
        if signature.nym() != &self.nym {
            tracing::debug!(identity = %self.id.id, "signature made under a different pseudonym");
            return Err(MspError::CryptoVerification {
                message: "signature is not valid for this identity".into(),
                source: IdemixError::SignatureVerification(
                    "signature pseudonym does not match the identity".into(),
                ),
            });
        }
        Ok(())
    }

    fn serialize(&self) -> Vec<u8> {
        let inner = SerializedIdemixIdentity {
            nym_x: self.nym.x_bytes(),
            nym_y: self.nym.y_bytes(),
            ou: self.ou.encode(),
            role: self.role.encode(),
        };
        SerializedIdentity {
            mspid: self.id.mspid.clone(),
            id_bytes: inner.encode_to_vec(),
        }
        .encode_to_vec()
    }

    fn satisfies_principal(&self, principal: &MspPrincipal) -> Result<(), MspError> {
        self.ctx.satisfies_principal(self, principal)
    }
}

impl PartialEq for IdemixIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.nym == other.nym
            && self.role == other.role
            && self.ou == other.ou
            && self.id == other.id
    }
}

impl Eq for IdemixIdentity {}

impl std::fmt::Debug for IdemixIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdemixIdentity")
            .field("id", &self.id)
            .field("ou", &self.ou.identifier)
            .field("role", &self.role.kind)
            .finish()
    }
}

/// An identity handed to the validator or principal evaluator: either a
/// public identity or a signing identity, viewed through its public part.
#[derive(Debug, Clone, Copy)]
pub enum IdentityRef<'a> {
    Public(&'a IdemixIdentity),
    Signing(&'a IdemixSigningIdentity),
}

impl<'a> IdentityRef<'a> {
    /// The public identity either variant carries.
    pub fn view(&self) -> &'a IdemixIdentity {
        match *self {
            Self::Public(identity) => identity,
            Self::Signing(signer) => signer.public_version(),
        }
    }
}

impl<'a> From<&'a IdemixIdentity> for IdentityRef<'a> {
    fn from(identity: &'a IdemixIdentity) -> Self {
        Self::Public(identity)
    }
}

impl<'a> From<&'a IdemixSigningIdentity> for IdentityRef<'a> {
    fn from(signer: &'a IdemixSigningIdentity) -> Self {
        Self::Signing(signer)
    }
}

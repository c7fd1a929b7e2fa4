//! # OU and Role Records
//!
//! Typed views over the [`OrganizationUnit`](crate::proto::OrganizationUnit)
//! and [`MspRole`](crate::proto::MspRole) wire records.
//!
//! The encoding of these records is what a credential commits to: the
//! issuer hashes `encode()` into the OU and Role attribute values, and every
//! verifier recomputes the same hash from the identity's own records. A
//! single differing byte breaks signature verification, so `encode()` must
//! reproduce exactly what `decode()` consumed for canonical inputs.

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::codec::decode;
use crate::error::WireError;
use crate::proto::{MspRole, MspRoleType, OrganizationUnit};

/// Organizational unit an identity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationalUnit {
    /// MSP identifier of the provider the unit belongs to.
    pub msp_identifier: String,
    /// Unit name within the provider (e.g. "org1").
    pub identifier: String,
    /// Certifier reference. Empty for units built from configuration;
    /// preserved verbatim for units parsed off the wire.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifiers_identifier: Vec<u8>,
}

impl OrganizationalUnit {
    /// A unit with no certifier reference.
    pub fn new(msp_identifier: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            msp_identifier: msp_identifier.into(),
            identifier: identifier.into(),
            certifiers_identifier: Vec::new(),
        }
    }

    /// Canonical protobuf encoding.
    pub fn encode(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Parse an encoded OU record.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let proto: OrganizationUnit = decode("OrganizationUnit", bytes)?;
        Ok(Self::from(proto))
    }

    /// Wire form of this unit.
    pub fn to_proto(&self) -> OrganizationUnit {
        OrganizationUnit {
            msp_identifier: self.msp_identifier.clone(),
            organizational_unit_identifier: self.identifier.clone(),
            certifiers_identifier: self.certifiers_identifier.clone(),
        }
    }
}

impl From<OrganizationUnit> for OrganizationalUnit {
    fn from(proto: OrganizationUnit) -> Self {
        Self {
            msp_identifier: proto.msp_identifier,
            identifier: proto.organizational_unit_identifier,
            certifiers_identifier: proto.certifiers_identifier,
        }
    }
}

/// Role kind carried by an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleKind {
    Member,
    Admin,
}

impl RoleKind {
    /// Map a raw wire value; anything outside MEMBER/ADMIN is rejected.
    pub fn from_wire(value: i32) -> Result<Self, WireError> {
        match MspRoleType::try_from(value) {
            Ok(MspRoleType::Member) => Ok(Self::Member),
            Ok(MspRoleType::Admin) => Ok(Self::Admin),
            Err(_) => Err(WireError::UnknownRoleKind(value)),
        }
    }

    /// Raw wire value.
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Member => MspRoleType::Member as i32,
            Self::Admin => MspRoleType::Admin as i32,
        }
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => f.write_str("MEMBER"),
            Self::Admin => f.write_str("ADMIN"),
        }
    }
}

/// Role an identity holds within its provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// MSP identifier of the provider granting the role.
    pub msp_identifier: String,
    /// MEMBER or ADMIN.
    pub kind: RoleKind,
}

impl Role {
    pub fn new(msp_identifier: impl Into<String>, kind: RoleKind) -> Self {
        Self {
            msp_identifier: msp_identifier.into(),
            kind,
        }
    }

    /// MEMBER, or ADMIN when `is_admin` is set.
    pub fn for_signer(msp_identifier: impl Into<String>, is_admin: bool) -> Self {
        let kind = if is_admin {
            RoleKind::Admin
        } else {
            RoleKind::Member
        };
        Self::new(msp_identifier, kind)
    }

    /// Canonical protobuf encoding.
    pub fn encode(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Parse an encoded role record, rejecting unknown role kinds.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let proto: MspRole = decode("MSPRole", bytes)?;
        Ok(Self {
            kind: RoleKind::from_wire(proto.role)?,
            msp_identifier: proto.msp_identifier,
        })
    }

    /// Wire form of this role.
    pub fn to_proto(&self) -> MspRole {
        MspRole {
            msp_identifier: self.msp_identifier.clone(),
            role: self.kind.to_wire(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decode_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = Role::decode(&bytes);
            let _ = OrganizationalUnit::decode(&bytes);
        }

        #[test]
        fn ou_encoding_is_stable(msp in "[A-Za-z0-9]{1,16}", unit in "[a-z0-9.-]{0,16}") {
            let ou = OrganizationalUnit::new(msp, unit);
            let bytes = ou.encode();
            prop_assert_eq!(OrganizationalUnit::decode(&bytes).unwrap().encode(), bytes);
        }
    }
}

//! # Protobuf Wire Messages
//!
//! Hand-declared `prost` messages. Field numbers and types follow the MSP
//! protobuf schema so that encodings interoperate byte-for-byte with other
//! implementations of the same schema.

use prost::Message;

/// Provider family carried in [`MspConfig::r#type`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ProviderType {
    /// X.509 certificate based provider.
    Fabric = 0,
    /// Anonymous-credential provider.
    Idemix = 1,
}

/// Provider-typed configuration envelope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MspConfig {
    /// Provider family tag, see [`ProviderType`].
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    /// Encoded provider-specific configuration.
    #[prost(bytes = "vec", tag = "2")]
    pub config: Vec<u8>,
}

/// Configuration of an anonymous-credential provider.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdemixMspConfig {
    /// Provider name; becomes the MSP identifier of every identity.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Encoded issuer public key.
    #[prost(bytes = "vec", tag = "2")]
    pub ipk: Vec<u8>,
    /// Default signer material. Absent for verification-only providers.
    #[prost(message, optional, tag = "3")]
    pub signer: Option<IdemixMspSignerConfig>,
}

/// Secret material of the default signer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdemixMspSignerConfig {
    /// Encoded credential.
    #[prost(bytes = "vec", tag = "1")]
    pub cred: Vec<u8>,
    /// Secret key as a 32-byte big-endian scalar.
    #[prost(bytes = "vec", tag = "2")]
    pub sk: Vec<u8>,
    /// OU the credential was issued for.
    #[prost(string, tag = "3")]
    pub organizational_unit_identifier: String,
    /// Whether the credential carries the ADMIN role.
    #[prost(bool, tag = "4")]
    pub is_admin: bool,
}

/// Outer identity envelope, shared by every provider family.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SerializedIdentity {
    /// MSP identifier of the owning provider.
    #[prost(string, tag = "1")]
    pub mspid: String,
    /// Provider-specific identity payload.
    #[prost(bytes = "vec", tag = "2")]
    pub id_bytes: Vec<u8>,
}

/// Inner payload of a pseudonymous identity.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SerializedIdemixIdentity {
    /// Pseudonym x coordinate, fixed-width big-endian.
    #[prost(bytes = "vec", tag = "1")]
    pub nym_x: Vec<u8>,
    /// Pseudonym y coordinate, fixed-width big-endian.
    #[prost(bytes = "vec", tag = "2")]
    pub nym_y: Vec<u8>,
    /// Encoded [`OrganizationUnit`].
    #[prost(bytes = "vec", tag = "3")]
    pub ou: Vec<u8>,
    /// Encoded [`MspRole`].
    #[prost(bytes = "vec", tag = "4")]
    pub role: Vec<u8>,
}

/// Organizational unit record.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrganizationUnit {
    #[prost(string, tag = "1")]
    pub msp_identifier: String,
    #[prost(string, tag = "2")]
    pub organizational_unit_identifier: String,
    #[prost(bytes = "vec", tag = "3")]
    pub certifiers_identifier: Vec<u8>,
}

/// Role kinds a principal or identity may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MspRoleType {
    Member = 0,
    Admin = 1,
}

/// Role record.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MspRole {
    #[prost(string, tag = "1")]
    pub msp_identifier: String,
    /// Raw enumeration value; see [`MspRoleType`]. Kept raw so that unknown
    /// kinds reach the principal evaluator instead of silently defaulting.
    #[prost(enumeration = "MspRoleType", tag = "2")]
    pub role: i32,
}

/// Principal classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Classification {
    Role = 0,
    OrganizationUnit = 1,
    Identity = 2,
}

/// An access-control predicate over identities.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MspPrincipal {
    /// Raw classification value; see [`Classification`].
    #[prost(enumeration = "Classification", tag = "1")]
    pub principal_classification: i32,
    /// Encoded predicate payload (role, OU, or serialized identity).
    #[prost(bytes = "vec", tag = "2")]
    pub principal: Vec<u8>,
}

impl MspPrincipal {
    /// Principal satisfied by identities holding `role`.
    pub fn role(role: &MspRole) -> Self {
        Self {
            principal_classification: Classification::Role as i32,
            principal: role.encode_to_vec(),
        }
    }

    /// Principal satisfied by members of `ou`.
    pub fn organizational_unit(ou: &OrganizationUnit) -> Self {
        Self {
            principal_classification: Classification::OrganizationUnit as i32,
            principal: ou.encode_to_vec(),
        }
    }

    /// Principal satisfied only by the identity serialized as `identity`.
    pub fn identity(identity: Vec<u8>) -> Self {
        Self {
            principal_classification: Classification::Identity as i32,
            principal: identity,
        }
    }
}

impl MspConfig {
    /// Wrap an anonymous-credential provider configuration.
    pub fn idemix(config: &IdemixMspConfig) -> Self {
        Self {
            r#type: ProviderType::Idemix as i32,
            config: config.encode_to_vec(),
        }
    }
}

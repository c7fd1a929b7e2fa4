//! # Provider Error Types
//!
//! Every failure the provider reports. Setup failures are fatal to the
//! instance being built; all other failures are scoped to one call.

use std::path::PathBuf;

use idemix_core::WireError;
use idemix_crypto::IdemixError;
use thiserror::Error;

/// Errors from provider setup, identity handling, and signing.
#[derive(Error, Debug)]
pub enum MspError {
    /// Configuration is of the wrong provider type or otherwise unusable.
    #[error("setup error: {0}")]
    Config(String),

    /// Configuration bytes could not be decoded.
    #[error("failed to decode {what}: {source}")]
    MalformedConfig {
        what: &'static str,
        #[source]
        source: WireError,
    },

    /// Issuer key or signer key material could not be decoded.
    #[error("failed to decode {what}: {source}")]
    MalformedKeyMaterial {
        what: &'static str,
        #[source]
        source: IdemixError,
    },

    /// Configuration directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Issuer key attribute names are not `OU`, `Role`, ...
    #[error("schema error: {0}")]
    Schema(String),

    /// Credential attributes do not match the configured OU or role.
    #[error("credential mismatch: {0}")]
    CredentialMismatch(String),

    /// A cryptographic check failed.
    #[error("{message}: {source}")]
    CryptoVerification {
        message: String,
        #[source]
        source: IdemixError,
    },

    /// The identity or principal names a different provider.
    #[error("the identity is a member of a different MSP (expected {expected}, got {actual})")]
    IdentityMismatch { expected: String, actual: String },

    /// A role, OU, or identity predicate is not met.
    #[error("{0}")]
    PrincipalMismatch(String),

    /// Principal classification outside ROLE / ORGANIZATION_UNIT / IDENTITY.
    #[error("invalid principal type {0}")]
    UnknownPrincipal(i32),

    /// Role kind outside MEMBER / ADMIN.
    #[error("invalid MSP role type {0}")]
    UnknownRole(i32),

    /// Identity or principal bytes are malformed or incomplete.
    #[error("{message}: {source}")]
    Serialization {
        message: String,
        #[source]
        source: WireError,
    },

    /// Pseudonym coordinates do not describe a valid point.
    #[error("unable to deserialize idemix identity: pseudonym is invalid: {0}")]
    InvalidPseudonym(#[source] IdemixError),

    /// The engine failed to produce a signature.
    #[error("failed to create signature: {0}")]
    Signing(#[source] IdemixError),

    /// Verification-only provider asked for its signer.
    #[error("this MSP does not have a default signer")]
    NoDefaultSigner,

    /// Operation the provider does not support.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mismatch_display() {
        let err = MspError::IdentityMismatch {
            expected: "org1MSP".into(),
            actual: "org2MSP".into(),
        };
        assert_eq!(
            err.to_string(),
            "the identity is a member of a different MSP (expected org1MSP, got org2MSP)"
        );
    }

    #[test]
    fn test_principal_mismatch_is_bare_message() {
        let err = MspError::PrincipalMismatch("user is not an admin".into());
        assert_eq!(err.to_string(), "user is not an admin");
    }

    #[test]
    fn test_sources_are_chained() {
        let err = MspError::Serialization {
            message: "could not deserialize a SerializedIdemixIdentity".into(),
            source: WireError::MissingField("nym_x"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("missing required field: nym_x"));
    }

    #[test]
    fn test_unit_variants_display() {
        assert!(MspError::NoDefaultSigner.to_string().contains("default signer"));
        assert_eq!(
            MspError::NotImplemented("signing identity lookup").to_string(),
            "signing identity lookup is not implemented"
        );
        assert_eq!(MspError::UnknownRole(7).to_string(), "invalid MSP role type 7");
    }
}

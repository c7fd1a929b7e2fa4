//! # Engine Error Types
//!
//! Structured errors for every engine operation. Uses `thiserror` with
//! enough context to tell which object and which check failed.

use idemix_core::WireError;
use thiserror::Error;

/// Errors from the anonymous-credential engine.
#[derive(Error, Debug)]
pub enum IdemixError {
    /// The bytes are not a valid encoding of the engine object.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// A scalar has the wrong width or is not reduced modulo the group order.
    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    /// A point is missing, off the curve, or outside the prime-order subgroup.
    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    /// The issuer public key failed its well-formedness check.
    #[error("invalid issuer public key: {0}")]
    InvalidIssuerKey(String),

    /// A credential request failed its proof check.
    #[error("invalid credential request: {0}")]
    InvalidCredentialRequest(String),

    /// A credential does not verify against the key material.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A signature does not verify.
    #[error("signature verification failed: {0}")]
    SignatureVerification(String),

    /// Caller-supplied arguments are inconsistent with the key material.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_issuer_key_display() {
        let err = IdemixError::InvalidIssuerKey("some part of the public key is undefined".into());
        assert!(format!("{err}").contains("undefined"));
    }

    #[test]
    fn wire_error_from_conversion() {
        let err = IdemixError::from(WireError::MissingField("a_prime"));
        assert!(format!("{err}").contains("a_prime"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn all_variants_are_debug() {
        let variants = vec![
            IdemixError::InvalidScalar("a".into()),
            IdemixError::InvalidPoint("b".into()),
            IdemixError::InvalidCredentialRequest("c".into()),
            IdemixError::InvalidCredential("d".into()),
            IdemixError::SignatureVerification("e".into()),
            IdemixError::InvalidParameter("f".into()),
        ];
        for v in variants {
            assert!(!format!("{v:?}").is_empty());
        }
    }
}

//! # Signing Identities
//!
//! An [`IdemixSigningIdentity`] wraps a public [`IdemixIdentity`] with the
//! secret material needed to sign under its pseudonym: the holder key, the
//! credential, and the pseudonym's randomizer.
//!
//! ## Security Invariant
//!
//! Secret material never leaves this type. `public_version()` returns the
//! embedded public identity, and `Debug` output redacts every secret.
//! The secret key and randomizer are zeroized on drop.

use chrono::{DateTime, Utc};
use idemix_core::MspPrincipal;
use idemix_crypto::{Credential, Fr, SecretKey, Signature};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use zeroize::Zeroize;

use crate::attributes::DISCLOSURE;
use crate::error::MspError;
use crate::identity::{IdemixIdentity, Identity, IdentityIdentifier, OuIdentifier};

/// An identity able to sign.
pub trait SigningIdentity: Identity {
    /// Sign `msg` under this identity's pseudonym, disclosing OU and Role.
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, MspError>;
}

/// The provider's default signer.
pub struct IdemixSigningIdentity {
    identity: IdemixIdentity,
    cred: Credential,
    sk: SecretKey,
    r_nym: Fr,
    rng: Mutex<StdRng>,
}

impl IdemixSigningIdentity {
    pub(crate) fn new(
        identity: IdemixIdentity,
        cred: Credential,
        sk: SecretKey,
        r_nym: Fr,
        rng: StdRng,
    ) -> Self {
        Self {
            identity,
            cred,
            sk,
            r_nym,
            rng: Mutex::new(rng),
        }
    }

    /// The public identity this signer signs as.
    pub fn public_version(&self) -> &IdemixIdentity {
        &self.identity
    }
}

impl SigningIdentity for IdemixSigningIdentity {
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, MspError> {
        let _guard = self.identity.ctx.span.enter();
        tracing::debug!(
            identity = %self.identity.id.id,
            msg_len = msg.len(),
            "idemix identity is signing"
        );
        let mut rng = self.rng.lock();
        let signature = Signature::new(
            &self.cred,
            &self.sk,
            &self.identity.nym,
            &self.r_nym,
            &self.identity.ctx.ipk,
            &DISCLOSURE,
            msg,
            &mut *rng,
        )
        .map_err(MspError::Signing)?;
        Ok(signature.encode())
    }
}

impl Identity for IdemixSigningIdentity {
    fn identifier(&self) -> &IdentityIdentifier {
        self.identity.identifier()
    }

    fn msp_identifier(&self) -> &str {
        self.identity.msp_identifier()
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.identity.expires_at()
    }

    fn organizational_units(&self) -> Vec<OuIdentifier> {
        self.identity.organizational_units()
    }

    fn validate(&self) -> Result<(), MspError> {
        self.identity.validate()
    }

    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<(), MspError> {
        self.identity.verify(msg, sig)
    }

    fn serialize(&self) -> Vec<u8> {
        self.identity.serialize()
    }

    fn satisfies_principal(&self, principal: &MspPrincipal) -> Result<(), MspError> {
        self.identity.satisfies_principal(principal)
    }
}

impl Drop for IdemixSigningIdentity {
    fn drop(&mut self) {
        self.r_nym.zeroize();
    }
}

impl std::fmt::Debug for IdemixSigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdemixSigningIdentity")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_sign_then_verify() {
        let msp = fixtures::provider("org1MSP", "org1", false, 51).unwrap();
        let signer = msp.default_signing_identity().unwrap();
        let sig = signer.sign(b"hello").unwrap();
        signer.verify(b"hello", &sig).unwrap();
        signer.public_version().verify(b"hello", &sig).unwrap();
    }

    #[test]
    fn test_empty_message() {
        let msp = fixtures::provider("org1MSP", "org1", false, 52).unwrap();
        let signer = msp.default_signing_identity().unwrap();
        let sig = signer.sign(b"").unwrap();
        signer.verify(b"", &sig).unwrap();
        assert!(signer.verify(b"x", &sig).is_err());
    }

    #[test]
    fn test_successive_signatures_differ() {
        let msp = fixtures::provider("org1MSP", "org1", false, 53).unwrap();
        let signer = msp.default_signing_identity().unwrap();
        assert_ne!(signer.sign(b"m").unwrap(), signer.sign(b"m").unwrap());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let msp = fixtures::provider("org1MSP", "org1", false, 54).unwrap();
        let rendered = format!("{:?}", msp.default_signing_identity().unwrap());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("SecretKey"));
    }

    #[test]
    fn test_concurrent_signing_shares_one_rng() {
        let msp = fixtures::provider("org1MSP", "org1", false, 55).unwrap();
        let signer = msp.default_signing_identity().unwrap();

        let signatures: Vec<Vec<u8>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| signer.sign(b"concurrent").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for sig in &signatures {
            signer.public_version().verify(b"concurrent", sig).unwrap();
        }
        let distinct: std::collections::HashSet<&Vec<u8>> = signatures.iter().collect();
        assert_eq!(distinct.len(), signatures.len());
    }

    #[test]
    fn test_signer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IdemixSigningIdentity>();
    }
}

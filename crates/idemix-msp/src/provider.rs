//! # Provider Setup and Entry Points
//!
//! [`IdemixMsp::setup_with`] turns a typed [`MspConfig`] into a ready
//! provider. Every step is a hard gate; a provider value only exists once
//! all of them pass:
//!
//! 1. The configuration must be of type IDEMIX.
//! 2. The IDEMIX configuration and the issuer public key must decode.
//! 3. The issuer key's attribute names must start with `OU`, `Role`, and
//!    the key must pass its well-formedness check (after its hash is set).
//! 4. Without a signer block the provider is verification-only.
//! 5. With one, the signer's credential must carry exactly the OU and Role
//!    attribute values the configuration implies and must verify against
//!    the signer's secret key and the issuer key.
//!
//! After setup the provider is immutable and `Send + Sync`.

use std::sync::Arc;

use idemix_core::{
    decode, IdemixMspConfig, IdemixMspSignerConfig, MspConfig, MspPrincipal, OrganizationalUnit,
    ProviderType, Role,
};
use idemix_crypto::{big_to_bytes, make_nym, Credential, IssuerPublicKey, SecretKey};
use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, Rng, RngCore, SeedableRng};

use crate::attributes::{ou_attribute, role_attribute, ATTRIBUTE_NAME_OU, ATTRIBUTE_NAME_ROLE};
use crate::context::MspContext;
use crate::error::MspError;
use crate::identity::{IdemixIdentity, IdentityIdentifier, IdentityRef};
use crate::signer::IdemixSigningIdentity;

/// Anonymous-credential membership service provider.
pub struct IdemixMsp {
    ctx: Arc<MspContext>,
    signer: Option<IdemixSigningIdentity>,
}

impl IdemixMsp {
    /// Set up from `config`, recording diagnostics under the current span and
    /// seeding the signer from the operating system RNG.
    pub fn setup(config: &MspConfig) -> Result<Self, MspError> {
        Self::setup_with(config, &tracing::Span::current(), &mut OsRng)
    }

    /// Set up from `config` with an explicit parent span and random source.
    pub fn setup_with<R: RngCore + CryptoRng>(
        config: &MspConfig,
        parent: &tracing::Span,
        rng: &mut R,
    ) -> Result<Self, MspError> {
        if config.r#type != ProviderType::Idemix as i32 {
            return Err(MspError::Config(format!(
                "config is not of type IDEMIX (got type {})",
                config.r#type
            )));
        }
        let conf: IdemixMspConfig = decode("IdemixMSPConfig", &config.config).map_err(|source| {
            MspError::MalformedConfig {
                what: "idemix msp config",
                source,
            }
        })?;

        let span = tracing::info_span!(parent: parent, "idemix_msp", msp = %conf.name);
        let _guard = span.enter();
        tracing::debug!("setting up idemix msp instance");

        let mut ipk =
            IssuerPublicKey::decode(&conf.ipk).map_err(|source| MspError::MalformedKeyMaterial {
                what: "issuer public key",
                source,
            })?;
        ipk.set_hash();
        check_schema(ipk.attribute_names())?;
        ipk.check().map_err(|source| MspError::CryptoVerification {
            message: "cannot setup idemix msp with invalid public key".into(),
            source,
        })?;

        let ctx = Arc::new(MspContext::new(conf.name, ipk, span.clone()));
        let signer = match conf.signer {
            None => {
                tracing::debug!("idemix msp setup as verification only msp (no signer config)");
                None
            }
            Some(signer_conf) => Some(build_signer(&ctx, &signer_conf, rng)?),
        };

        tracing::debug!("idemix msp setup done");
        Ok(Self { ctx, signer })
    }

    pub fn provider_type(&self) -> ProviderType {
        ProviderType::Idemix
    }

    /// Provider name, the MSP identifier of every identity it owns.
    pub fn identifier(&self) -> &str {
        &self.ctx.name
    }

    /// The checked issuer key.
    pub fn issuer_public_key(&self) -> &IssuerPublicKey {
        &self.ctx.ipk
    }

    pub fn default_signing_identity(&self) -> Result<&IdemixSigningIdentity, MspError> {
        self.signer.as_ref().ok_or(MspError::NoDefaultSigner)
    }

    /// Lookup of signers other than the default one.
    pub fn signing_identity(
        &self,
        _identifier: &IdentityIdentifier,
    ) -> Result<&IdemixSigningIdentity, MspError> {
        Err(MspError::NotImplemented("signing identity lookup"))
    }

    /// Anonymous-credential providers carry no TLS roots.
    pub fn tls_root_certs(&self) -> Vec<Vec<u8>> {
        Vec::new()
    }

    /// Anonymous-credential providers carry no TLS intermediates.
    pub fn tls_intermediate_certs(&self) -> Vec<Vec<u8>> {
        Vec::new()
    }

    /// Parse a serialized identity owned by this provider. Structural only;
    /// no credential or signature is checked.
    pub fn deserialize_identity(&self, bytes: &[u8]) -> Result<IdemixIdentity, MspError> {
        IdemixIdentity::deserialize(&self.ctx, bytes)
    }

    pub fn validate<'a>(&self, identity: impl Into<IdentityRef<'a>>) -> Result<(), MspError> {
        self.ctx.validate(identity.into().view())
    }

    pub fn satisfies_principal<'a>(
        &self,
        identity: impl Into<IdentityRef<'a>>,
        principal: &MspPrincipal,
    ) -> Result<(), MspError> {
        self.ctx.satisfies_principal(identity.into().view(), principal)
    }
}

impl std::fmt::Debug for IdemixMsp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdemixMsp")
            .field("name", &self.ctx.name)
            .field("ipk", &self.ctx.ipk)
            .field("signer", &self.signer)
            .finish()
    }
}

fn check_schema(names: &[String]) -> Result<(), MspError> {
    match names {
        [ou, role, ..] if ou == ATTRIBUTE_NAME_OU && role == ATTRIBUTE_NAME_ROLE => Ok(()),
        _ => Err(MspError::Schema(format!(
            "issuer public key must have attributes {ATTRIBUTE_NAME_OU}, {ATTRIBUTE_NAME_ROLE} first (got {names:?})"
        ))),
    }
}

fn build_signer<R: RngCore + CryptoRng>(
    ctx: &Arc<MspContext>,
    conf: &IdemixMspSignerConfig,
    rng: &mut R,
) -> Result<IdemixSigningIdentity, MspError> {
    let sk = SecretKey::from_bytes(&conf.sk).map_err(|source| MspError::MalformedKeyMaterial {
        what: "signer secret key",
        source,
    })?;
    let cred = Credential::decode(&conf.cred).map_err(|source| MspError::MalformedKeyMaterial {
        what: "signer credential",
        source,
    })?;

    let (nym, r_nym) = make_nym(&sk, &ctx.ipk, rng);
    let role = Role::for_signer(ctx.name.clone(), conf.is_admin);
    let ou = OrganizationalUnit::new(ctx.name.clone(), conf.organizational_unit_identifier.clone());

    let attrs = cred.attrs();
    if attrs.len() != 2 {
        return Err(MspError::CredentialMismatch(format!(
            "credential contains {} attribute values, expected 2",
            attrs.len()
        )));
    }
    if attrs[0] != big_to_bytes(&ou_attribute(&ou)) {
        return Err(MspError::CredentialMismatch(
            "credential does not contain the correct OU attribute value".into(),
        ));
    }
    if attrs[1] != big_to_bytes(&role_attribute(&role)) {
        return Err(MspError::CredentialMismatch(
            "credential does not contain the correct role attribute value".into(),
        ));
    }
    cred.verify(&sk, &ctx.ipk)
        .map_err(|source| MspError::CryptoVerification {
            message: "credential is not cryptographically valid".into(),
            source,
        })?;

    let identity = IdemixIdentity::new(Arc::clone(ctx), nym, role, ou);
    tracing::debug!(
        identity = %identity.id.id,
        ou = %conf.organizational_unit_identifier,
        admin = conf.is_admin,
        "default signing identity ready"
    );
    let signer_rng = StdRng::from_seed(rng.gen());
    Ok(IdemixSigningIdentity::new(identity, cred, sk, r_nym, signer_rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::identity::Identity;
    use crate::signer::SigningIdentity;
    use idemix_core::{ProviderType, SerializedIdemixIdentity, SerializedIdentity};
    use idemix_crypto::{hash_mod_order, CredRequest};
    use prost::Message;

    #[test]
    fn test_wrong_provider_type_rejected() {
        let mut rng = fixtures::rng(61);
        let key = fixtures::issuer_key(&mut rng).unwrap();
        let mut config = fixtures::msp_config("org1MSP", &key, None);
        config.r#type = ProviderType::Fabric as i32;
        assert!(matches!(
            IdemixMsp::setup_with(&config, &tracing::Span::none(), &mut rng),
            Err(MspError::Config(_))
        ));
    }

    #[test]
    fn test_garbage_config_rejected() {
        let config = MspConfig {
            r#type: ProviderType::Idemix as i32,
            config: vec![0xff, 0xff, 0xff],
        };
        assert!(matches!(
            IdemixMsp::setup(&config),
            Err(MspError::MalformedConfig { .. })
        ));
    }

    #[test]
    fn test_garbage_ipk_rejected() {
        let config = MspConfig::idemix(&IdemixMspConfig {
            name: "org1MSP".into(),
            ipk: vec![1, 2, 3],
            signer: None,
        });
        assert!(matches!(
            IdemixMsp::setup(&config),
            Err(MspError::MalformedKeyMaterial { what: "issuer public key", .. })
        ));
    }

    #[test]
    fn test_schema_enforced() {
        let mut rng = fixtures::rng(62);
        let key = fixtures::issuer_key_with_attributes(&["Role", "OU"], &mut rng).unwrap();
        let config = fixtures::msp_config("org1MSP", &key, None);
        assert!(matches!(
            IdemixMsp::setup_with(&config, &tracing::Span::none(), &mut rng),
            Err(MspError::Schema(_))
        ));

        let key = fixtures::issuer_key_with_attributes(&["OU"], &mut rng).unwrap();
        let config = fixtures::msp_config("org1MSP", &key, None);
        assert!(matches!(
            IdemixMsp::setup_with(&config, &tracing::Span::none(), &mut rng),
            Err(MspError::Schema(_))
        ));
    }

    #[test]
    fn test_verification_only_provider() {
        let mut rng = fixtures::rng(63);
        let key = fixtures::issuer_key(&mut rng).unwrap();
        let config = fixtures::msp_config("org1MSP", &key, None);
        let msp = IdemixMsp::setup_with(&config, &tracing::Span::none(), &mut rng).unwrap();
        assert!(matches!(
            msp.default_signing_identity(),
            Err(MspError::NoDefaultSigner)
        ));
        assert_eq!(msp.identifier(), "org1MSP");
        assert_eq!(msp.provider_type(), ProviderType::Idemix);
        assert!(msp.tls_root_certs().is_empty());
        assert!(msp.tls_intermediate_certs().is_empty());
    }

    #[test]
    fn test_signing_identity_lookup_not_implemented() {
        let msp = fixtures::provider("org1MSP", "org1", false, 64).unwrap();
        let id = msp.default_signing_identity().unwrap().identifier().clone();
        assert!(matches!(
            msp.signing_identity(&id),
            Err(MspError::NotImplemented(_))
        ));
    }

    fn setup_with_signer(
        name: &str,
        edit: impl FnOnce(&mut IdemixMspSignerConfig),
        seed: u64,
    ) -> Result<IdemixMsp, MspError> {
        let mut rng = fixtures::rng(seed);
        let key = fixtures::issuer_key(&mut rng).unwrap();
        let mut signer = fixtures::signer_config(&key, "org1MSP", "org1", false, &mut rng).unwrap();
        edit(&mut signer);
        let config = fixtures::msp_config(name, &key, Some(signer));
        IdemixMsp::setup_with(&config, &tracing::Span::none(), &mut rng)
    }

    #[test]
    fn test_credential_mismatch_on_ou() {
        let result = setup_with_signer("org1MSP", |s| s.organizational_unit_identifier = "org2".into(), 65);
        assert!(matches!(result, Err(MspError::CredentialMismatch(m)) if m.contains("OU")));
    }

    #[test]
    fn test_credential_mismatch_on_admin_flag() {
        let result = setup_with_signer("org1MSP", |s| s.is_admin = true, 66);
        assert!(matches!(result, Err(MspError::CredentialMismatch(m)) if m.contains("role")));
    }

    #[test]
    fn test_credential_mismatch_on_provider_name() {
        let result = setup_with_signer("org2MSP", |_| {}, 67);
        assert!(matches!(result, Err(MspError::CredentialMismatch(_))));
    }

    #[test]
    fn test_malformed_secret_key() {
        let result = setup_with_signer("org1MSP", |s| s.sk.truncate(31), 68);
        assert!(matches!(
            result,
            Err(MspError::MalformedKeyMaterial { what: "signer secret key", .. })
        ));
    }

    #[test]
    fn test_credential_from_other_issuer_fails_verification() {
        let mut rng = fixtures::rng(69);
        let key = fixtures::issuer_key(&mut rng).unwrap();
        let other = fixtures::issuer_key(&mut rng).unwrap();
        let signer = fixtures::signer_config(&other, "org1MSP", "org1", false, &mut rng).unwrap();
        let config = fixtures::msp_config("org1MSP", &key, Some(signer));
        assert!(matches!(
            IdemixMsp::setup_with(&config, &tracing::Span::none(), &mut rng),
            Err(MspError::CryptoVerification { .. })
        ));
    }

    #[test]
    fn test_extra_issuer_attributes_sign_and_verify() {
        let mut rng = fixtures::rng(71);
        let key =
            fixtures::issuer_key_with_attributes(&["OU", "Role", "Extra"], &mut rng).unwrap();
        let signer = fixtures::signer_config(&key, "org1MSP", "org1", false, &mut rng).unwrap();
        let signing = IdemixMsp::setup_with(
            &fixtures::msp_config("org1MSP", &key, Some(signer)),
            &tracing::Span::none(),
            &mut rng,
        )
        .unwrap();
        let verifying = IdemixMsp::setup_with(
            &fixtures::msp_config("org1MSP", &key, None),
            &tracing::Span::none(),
            &mut rng,
        )
        .unwrap();

        let signer = signing.default_signing_identity().unwrap();
        let sig = signer.sign(b"hello").unwrap();
        let peer = verifying.deserialize_identity(&signer.serialize()).unwrap();
        peer.verify(b"hello", &sig).unwrap();
        assert!(peer.verify(b"hellO", &sig).is_err());
    }

    #[test]
    fn test_credential_attribute_count_mismatch() {
        let mut rng = fixtures::rng(72);
        let key =
            fixtures::issuer_key_with_attributes(&["OU", "Role", "Extra"], &mut rng).unwrap();
        let sk = SecretKey::generate(&mut rng);
        let request = CredRequest::new(&sk, b"issuer-nonce", key.public_key(), &mut rng);
        let attrs = [
            ou_attribute(&OrganizationalUnit::new("org1MSP", "org1")),
            role_attribute(&Role::for_signer("org1MSP", false)),
            hash_mod_order(b"extra"),
        ];
        let cred = Credential::issue(&key, &request, &attrs, &mut rng).unwrap();
        let signer = IdemixMspSignerConfig {
            cred: cred.encode(),
            sk: sk.to_bytes(),
            organizational_unit_identifier: "org1".into(),
            is_admin: false,
        };
        let config = fixtures::msp_config("org1MSP", &key, Some(signer));
        assert!(matches!(
            IdemixMsp::setup_with(&config, &tracing::Span::none(), &mut rng),
            Err(MspError::CredentialMismatch(m)) if m.contains("3 attribute values")
        ));
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let msp = fixtures::provider("org1MSP", "org1", true, 70).unwrap();
        let identity = msp.default_signing_identity().unwrap().public_version();
        let bytes = identity.serialize();
        let parsed = msp.deserialize_identity(&bytes).unwrap();
        assert_eq!(&parsed, identity);
        assert_eq!(parsed.serialize(), bytes);
    }

    #[test]
    fn test_foreign_envelope_rejected() {
        let ours = fixtures::provider("org1MSP", "org1", false, 71).unwrap();
        let theirs = fixtures::provider("org2MSP", "org1", false, 72).unwrap();
        let bytes = theirs.default_signing_identity().unwrap().serialize();
        assert!(matches!(
            ours.deserialize_identity(&bytes),
            Err(MspError::IdentityMismatch { expected, actual }) if expected == "org1MSP" && actual == "org2MSP"
        ));
    }

    fn envelope(inner: &SerializedIdemixIdentity) -> Vec<u8> {
        SerializedIdentity {
            mspid: "org1MSP".into(),
            id_bytes: inner.encode_to_vec(),
        }
        .encode_to_vec()
    }

    #[test]
    fn test_missing_nym_is_a_serialization_error() {
        let msp = fixtures::provider("org1MSP", "org1", false, 73).unwrap();
        let inner = SerializedIdemixIdentity {
            nym_x: vec![],
            nym_y: vec![1; 48],
            ou: vec![],
            role: vec![],
        };
        assert!(matches!(
            msp.deserialize_identity(&envelope(&inner)),
            Err(MspError::Serialization { .. })
        ));
    }

    #[test]
    fn test_off_curve_nym_is_invalid_pseudonym() {
        let msp = fixtures::provider("org1MSP", "org1", false, 74).unwrap();
        let inner = SerializedIdemixIdentity {
            nym_x: vec![1; 48],
            nym_y: vec![2; 48],
            ou: vec![],
            role: vec![],
        };
        assert!(matches!(
            msp.deserialize_identity(&envelope(&inner)),
            Err(MspError::InvalidPseudonym(_))
        ));
    }

    #[test]
    fn test_unknown_role_in_identity_is_a_serialization_error() {
        let msp = fixtures::provider("org1MSP", "org1", false, 75).unwrap();
        let nym = *msp.default_signing_identity().unwrap().public_version().nym();
        let inner = SerializedIdemixIdentity {
            nym_x: nym.x_bytes(),
            nym_y: nym.y_bytes(),
            ou: OrganizationalUnit::new("org1MSP", "org1").encode(),
            role: idemix_core::MspRole {
                msp_identifier: "org1MSP".into(),
                role: 4,
            }
            .encode_to_vec(),
        };
        assert!(matches!(
            msp.deserialize_identity(&envelope(&inner)),
            Err(MspError::Serialization { .. })
        ));
    }

    #[test]
    fn test_organizational_units_report_issuer_key() {
        let msp = fixtures::provider("org1MSP", "org1", false, 76).unwrap();
        let units = msp.default_signing_identity().unwrap().organizational_units();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].organizational_unit_identifier, "org1");
        assert_eq!(units[0].certifiers_identifier, msp.issuer_public_key().encode());
    }

    #[test]
    fn test_identity_expires_at_epoch() {
        let msp = fixtures::provider("org1MSP", "org1", false, 77).unwrap();
        let identity = msp.default_signing_identity().unwrap();
        assert_eq!(identity.expires_at().timestamp(), 0);
    }

    #[test]
    fn test_provider_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IdemixMsp>();
    }
}

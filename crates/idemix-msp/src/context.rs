//! Shared, immutable provider state handed to every identity the provider
//! builds. Identities hold an `Arc` to it so they can validate and evaluate
//! principals without a reference to the provider itself.

use idemix_crypto::IssuerPublicKey;

#[derive(Debug)]
pub(crate) struct MspContext {
    /// Provider name; the MSP identifier of every identity it owns.
    pub(crate) name: String,
    /// Checked issuer key with its hash derived.
    pub(crate) ipk: IssuerPublicKey,
    /// Encoding of `ipk`, hash included. Certifier identifier of every OU.
    pub(crate) ipk_bytes: Vec<u8>,
    /// Diagnostic span all provider events are recorded in.
    pub(crate) span: tracing::Span,
}

impl MspContext {
    pub(crate) fn new(name: String, ipk: IssuerPublicKey, span: tracing::Span) -> Self {
        let ipk_bytes = ipk.encode();
        Self {
            name,
            ipk,
            ipk_bytes,
            span,
        }
    }
}

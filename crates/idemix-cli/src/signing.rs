//! # Sign and Verify Subcommands
//!
//! `sign` produces an attribute-disclosure signature with the provider's
//! default signer and prints it with the signer's serialized identity.
//! `verify` checks a signature against a serialized identity; it does not
//! need signer material, so it works on verification-only providers.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use idemix_msp::{IdemixMsp, Identity, SigningIdentity};
use serde::Serialize;

use crate::{decode_hex, MessageArgs};

/// Arguments for `idemix sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub message: MessageArgs,
}

/// Arguments for `idemix verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub message: MessageArgs,

    /// Serialized identity of the signer (hex).
    #[arg(long, value_name = "HEX")]
    pub identity: String,

    /// Signature to verify (hex).
    #[arg(long, value_name = "HEX")]
    pub signature: String,
}

/// Output of `idemix sign`.
#[derive(Debug, Serialize)]
pub struct SignReport {
    /// Hex of the signer's serialized identity.
    pub identity: String,
    /// Hex of the signature.
    pub signature: String,
}

/// Execute `idemix sign`.
pub fn run_sign(args: &SignArgs, dir: &Path, name: &str) -> Result<u8> {
    let msp = crate::load_msp(dir, name)?;
    let report = sign(&msp, &args.message.read()?)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

/// Execute `idemix verify`.
pub fn run_verify(args: &VerifyArgs, dir: &Path, name: &str) -> Result<u8> {
    let msp = crate::load_msp(dir, name)?;
    cmd_verify(
        &msp,
        &args.identity,
        &args.signature,
        &args.message.read()?,
    )
}

pub fn sign(msp: &IdemixMsp, msg: &[u8]) -> Result<SignReport> {
    let signer = msp
        .default_signing_identity()
        .context("cannot sign with this provider")?;
    let signature = signer.sign(msg).context("signing failed")?;
    Ok(SignReport {
        identity: hex::encode(signer.serialize()),
        signature: hex::encode(signature),
    })
}

/// Verify and report. Malformed input is an error; a signature that does
/// not verify is a `FAIL` with exit code 1.
pub fn cmd_verify(msp: &IdemixMsp, identity_hex: &str, signature_hex: &str, msg: &[u8]) -> Result<u8> {
    let identity = msp
        .deserialize_identity(&decode_hex("identity", identity_hex)?)
        .context("failed to deserialize identity")?;
    let signature = decode_hex("signature", signature_hex)?;

    match identity.verify(msg, &signature) {
        Ok(()) => {
            println!("OK: signature is valid for {}", identity.identifier().id);
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: signature verification failed: {e}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idemix_msp::fixtures;

    #[test]
    fn sign_and_verify_roundtrip() {
        let msp = fixtures::provider("org1MSP", "org1", false, 111).unwrap();
        let report = sign(&msp, b"hello").unwrap();
        assert_eq!(cmd_verify(&msp, &report.identity, &report.signature, b"hello").unwrap(), 0);
        assert_eq!(cmd_verify(&msp, &report.identity, &report.signature, b"hellO").unwrap(), 1);
    }

    #[test]
    fn tampered_signature_fails() {
        let msp = fixtures::provider("org1MSP", "org1", false, 112).unwrap();
        let report = sign(&msp, b"hello").unwrap();
        let mut sig = hex::decode(&report.signature).unwrap();
        let mid = sig.len() / 2;
        sig[mid] ^= 0x01;
        assert_eq!(
            cmd_verify(&msp, &report.identity, &hex::encode(sig), b"hello").unwrap(),
            1
        );
    }

    #[test]
    fn malformed_hex_is_an_error() {
        let msp = fixtures::provider("org1MSP", "org1", false, 113).unwrap();
        let report = sign(&msp, b"hello").unwrap();
        assert!(cmd_verify(&msp, "zz", &report.signature, b"hello").is_err());
        assert!(cmd_verify(&msp, &report.identity, "abc", b"hello").is_err());
    }

    #[test]
    fn verification_only_provider_cannot_sign() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = fixtures::rng(114);
        let key = fixtures::issuer_key(&mut rng).unwrap();
        fixtures::write_config_dir(dir.path(), &key, None).unwrap();
        let msp = crate::load_msp(dir.path(), "org1MSP").unwrap();
        let err = sign(&msp, b"hello").unwrap_err();
        assert!(format!("{err:#}").contains("default signer"));
    }

    #[test]
    fn message_file_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.bin");
        std::fs::write(&path, [0u8, 1, 2, 255]).unwrap();
        let args = MessageArgs {
            message: None,
            message_file: Some(path),
        };
        assert_eq!(args.read().unwrap(), vec![0u8, 1, 2, 255]);
    }
}

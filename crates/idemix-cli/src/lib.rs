//! # idemix-cli — CLI Tool for Anonymous-Credential Providers
//!
//! Provides the `idemix` command-line interface over a provider
//! configuration directory (`<dir>/msp/IssuerPublicKey`, optional
//! `<dir>/user/SignerConfig`).
//!
//! ## Subcommands
//!
//! - `idemix inspect`: Issuer key schema and default signer, as JSON.
//! - `idemix sign`: Sign a message with the default signer.
//! - `idemix verify`: Verify a signature against a serialized identity.
//! - `idemix check-principal`: Evaluate a ROLE, OU, or IDENTITY principal.
//!
//! ```bash
//! idemix --dir ./org1 --name org1MSP sign --message hello
//! idemix --dir ./org1 --name org1MSP verify --identity <HEX> --signature <HEX> --message hello
//! idemix --dir ./org1 --name org1MSP check-principal --identity <HEX> --role admin
//! ```
//!
//! Identities and signatures travel as lowercase hex.

pub mod inspect;
pub mod principal;
pub mod signing;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use idemix_msp::{load_idemix_msp_config, IdemixMsp};

/// Message source shared by `sign` and `verify`.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MessageArgs {
    /// Message given inline.
    #[arg(long)]
    pub message: Option<String>,

    /// Message read from a file, byte for byte.
    #[arg(long, value_name = "FILE")]
    pub message_file: Option<PathBuf>,
}

impl MessageArgs {
    pub fn read(&self) -> Result<Vec<u8>> {
        match (&self.message, &self.message_file) {
            (Some(message), _) => Ok(message.as_bytes().to_vec()),
            (None, Some(path)) => std::fs::read(path)
                .with_context(|| format!("failed to read message file: {}", path.display())),
            (None, None) => anyhow::bail!("either --message or --message-file is required"),
        }
    }
}

/// Load the configuration directory and set up the provider.
pub fn load_msp(dir: &Path, name: &str) -> Result<IdemixMsp> {
    let config = load_idemix_msp_config(dir, name)
        .with_context(|| format!("failed to load provider configuration from {}", dir.display()))?;
    let msp = IdemixMsp::setup(&config)
        .with_context(|| format!("failed to set up provider {name}"))?;
    tracing::info!(msp = %name, dir = %dir.display(), "provider ready");
    Ok(msp)
}

/// Decode a hex argument, naming it in the error.
pub fn decode_hex(what: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).with_context(|| format!("invalid {what} hex"))
}

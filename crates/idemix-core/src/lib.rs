//! # idemix-core — Wire Records for the Anonymous-Credential MSP
//!
//! Defines the byte-level contract shared by every crate in the workspace:
//!
//! - **Protobuf messages** (`proto.rs`): provider configuration, the
//!   serialized identity envelope, the inner pseudonymous identity payload,
//!   the OU and Role records, and the principal envelope.
//! - **Codec** (`codec.rs`): the single decode path, which attaches the name
//!   of the record being decoded to every failure.
//! - **Records** (`model.rs`): typed `OrganizationalUnit` and `Role` values
//!   whose encodings double as the committed credential attributes.
//!
//! ## Security Invariant
//!
//! The encoded OU and Role records are hashed into credential attributes.
//! Encoding is therefore deterministic: fields in tag order, proto3 default
//! values omitted, no unknown fields re-emitted. The same logical record
//! always yields the same bytes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `idemix-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod codec;
pub mod error;
pub mod model;
pub mod proto;

pub use codec::decode;
pub use error::WireError;
pub use model::{OrganizationalUnit, Role, RoleKind};
pub use proto::{
    Classification, IdemixMspConfig, IdemixMspSignerConfig, MspConfig, MspPrincipal, MspRole,
    MspRoleType, OrganizationUnit, ProviderType, SerializedIdemixIdentity, SerializedIdentity,
};

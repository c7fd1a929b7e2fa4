//! # Wire Error Types
//!
//! Failures raised while turning bytes into wire records.

use thiserror::Error;

/// Errors produced by the wire codec.
#[derive(Error, Debug)]
pub enum WireError {
    /// The bytes are not a valid protobuf encoding of the named record.
    #[error("could not decode {what}: {source}")]
    Decode {
        /// Record being decoded (e.g. "SerializedIdentity").
        what: &'static str,
        /// Underlying protobuf error.
        #[source]
        source: prost::DecodeError,
    },

    /// A field required by the record's semantics is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A role enumeration value outside MEMBER/ADMIN.
    #[error("unknown MSP role type {0}")]
    UnknownRoleKind(i32),
}

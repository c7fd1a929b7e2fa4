//! # Codec
//!
//! Encoding is `prost::Message::encode_to_vec`, which cannot fail for
//! in-memory buffers. Decoding goes through [`decode`] so every failure names
//! the record that could not be parsed.

use prost::Message;

use crate::error::WireError;

/// Decode `bytes` as the protobuf record `M`.
///
/// `what` is a human-readable record name used in the error.
pub fn decode<M: Message + Default>(what: &'static str, bytes: &[u8]) -> Result<M, WireError> {
    M::decode(bytes).map_err(|source| WireError::Decode { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::SerializedIdentity;

    #[test]
    fn test_decode_valid_envelope() {
        let envelope = SerializedIdentity {
            mspid: "org1MSP".to_string(),
            id_bytes: vec![1, 2, 3],
        };
        let bytes = envelope.encode_to_vec();
        let decoded: SerializedIdentity = decode("SerializedIdentity", &bytes).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_decode_empty_bytes_yields_defaults() {
        // proto3: an empty buffer is a valid message with every field defaulted.
        let decoded: SerializedIdentity = decode("SerializedIdentity", &[]).unwrap();
        assert!(decoded.mspid.is_empty());
        assert!(decoded.id_bytes.is_empty());
    }

    #[test]
    fn test_decode_truncated_length_delimited_field() {
        // Field 1, wire type 2, declared length 10, only 2 bytes present.
        let result = decode::<SerializedIdentity>("SerializedIdentity", &[0x0a, 0x0a, b'o', b'r']);
        assert!(matches!(
            result,
            Err(WireError::Decode {
                what: "SerializedIdentity",
                ..
            })
        ));
    }
}

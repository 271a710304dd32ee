//! Opaque, type-qualified node identifiers such as `Prayer:7b9330c299577990e03e637e876f0aa3`.
//!
//! The hex payload is the record id (8 bytes, big endian) followed by the first
//! 8 bytes of `SHA-256(secret || type || id)`, so ids cannot be forged by
//! incrementing the visible part.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;

const PAYLOAD_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeIdError {
    #[error("malformed node id")]
    Malformed,
    #[error("expected a {expected} id, got {found}")]
    WrongType { expected: String, found: String },
    #[error("node id checksum mismatch")]
    Checksum,
}

#[derive(Clone)]
pub struct NodeIdCodec {
    secret: Arc<[u8]>,
}

impl NodeIdCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret.as_bytes()),
        }
    }

    pub fn encode(&self, type_name: &str, id: i64) -> String {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[..8].copy_from_slice(&id.to_be_bytes());
        payload[8..].copy_from_slice(&self.checksum(type_name, id));
        format!("{type_name}:{}", hex::encode(payload))
    }

    pub fn decode(&self, expected_type: &str, node_id: &str) -> Result<i64, NodeIdError> {
        let (type_name, payload) = node_id.split_once(':').ok_or(NodeIdError::Malformed)?;
        if type_name != expected_type {
            return Err(NodeIdError::WrongType {
                expected: expected_type.to_string(),
                found: type_name.to_string(),
            });
        }

        let bytes = hex::decode(payload).map_err(|_| NodeIdError::Malformed)?;
        let bytes: [u8; PAYLOAD_LEN] = bytes.try_into().map_err(|_| NodeIdError::Malformed)?;

        let mut id_bytes = [0u8; 8];
        id_bytes.copy_from_slice(&bytes[..8]);
        let id = i64::from_be_bytes(id_bytes);

        if bytes[8..] != self.checksum(type_name, id) {
            return Err(NodeIdError::Checksum);
        }
        Ok(id)
    }

    fn checksum(&self, type_name: &str, id: i64) -> [u8; 8] {
        let digest = Sha256::new()
            .chain_update(&self.secret)
            .chain_update(type_name.as_bytes())
            .chain_update(id.to_be_bytes())
            .finalize();
        let mut out = [0u8; 8];
        out.copy_from_slice(&digest[..8]);
        out
    }
}

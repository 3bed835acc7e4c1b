use super::{sequence, TYPE_SYNC};
use crate::{block::Block, util, wallet::Wallet};
use serde_derive::{Deserialize, Serialize};

/// A committed block pushed to a peer that is behind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMessage {
    #[serde(rename = "type")]
    pub kind: u8,
    pub seq: u64,
    pub origin: String,
    pub block: Block,
    pub sig: String,
}

impl SyncMessage {
    pub fn create(wallet: &Wallet, block: Block) -> serde_json::Result<Self> {
        let seq = sequence();
        let sig = wallet.sign(&Self::payload(TYPE_SYNC, seq, &block)?);
        Ok(Self {
            kind: TYPE_SYNC,
            seq,
            origin: wallet.public_key().to_string(),
            block,
            sig,
        })
    }

    pub fn is_valid(&self) -> bool {
        if self.kind != TYPE_SYNC {
            return false;
        }
        match Self::payload(self.kind, self.seq, &self.block) {
            Ok(payload) => util::verify_signature(&self.origin, &self.sig, &payload),
            Err(_) => false,
        }
    }

    /// `type ∥ seq ∥ serialize(block)`
    fn payload(kind: u8, seq: u64, block: &Block) -> serde_json::Result<String> {
        Ok(format!("{kind},{seq},{}", serde_json::to_string(block)?))
    }
}

use super::{sequence, TYPE_PROPOSAL};
use crate::{block::transaction::Transaction, util, wallet::Wallet};
use serde_derive::{Deserialize, Serialize};

/// A proposer's transaction for the next height
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(rename = "type")]
    pub kind: u8,
    pub seq: u64,
    pub origin: String,
    pub height: u64,
    pub tx: Transaction,
    pub sig: String,
}

impl Proposal {
    pub fn create(wallet: &Wallet, height: u64, tx: Transaction) -> serde_json::Result<Self> {
        let seq = sequence();
        let sig = wallet.sign(&Self::payload(TYPE_PROPOSAL, seq, height, &tx)?);
        Ok(Self {
            kind: TYPE_PROPOSAL,
            seq,
            origin: wallet.public_key().to_string(),
            height,
            tx,
            sig,
        })
    }

    /// Purely a function of the message content
    pub fn is_valid(&self) -> bool {
        if self.kind != TYPE_PROPOSAL {
            return false;
        }
        match Self::payload(self.kind, self.seq, self.height, &self.tx) {
            Ok(payload) => util::verify_signature(&self.origin, &self.sig, &payload),
            Err(_) => false,
        }
    }

    /// `type ∥ seq ∥ height ∥ serialize(tx)`
    fn payload(kind: u8, seq: u64, height: u64, tx: &Transaction) -> serde_json::Result<String> {
        Ok(format!("{kind},{seq},{height},{}", serde_json::to_string(tx)?))
    }
}

use super::{sequence, TYPE_VOTE};
use crate::{
    block::{hash_tx, transaction::Transaction, Vote},
    util,
    wallet::Wallet,
};
use serde_derive::{Deserialize, Serialize};

/// A peer's vote for a transaction set at a height.
///
/// The signature is the block vote signature itself, so an accepted message
/// converts directly into a [`Vote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMessage {
    #[serde(rename = "type")]
    pub kind: u8,
    pub seq: u64,
    pub origin: String,
    pub height: u64,
    pub hash: String,
    pub sig: String,
}

impl VoteMessage {
    pub fn create(wallet: &Wallet, height: u64, tx: &[Transaction]) -> serde_json::Result<Self> {
        let hash = hash_tx(tx)?;
        Ok(Self {
            kind: TYPE_VOTE,
            seq: sequence(),
            origin: wallet.public_key().to_string(),
            height,
            sig: wallet.sign(&Vote::payload_from_hash(height, &hash)),
            hash,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.kind == TYPE_VOTE
            && util::verify_signature(
                &self.origin,
                &self.sig,
                &Vote::payload_from_hash(self.height, &self.hash),
            )
    }

    pub fn to_vote(&self) -> Vote {
        Vote {
            origin: self.origin.clone(),
            sig: self.sig.clone(),
        }
    }
}

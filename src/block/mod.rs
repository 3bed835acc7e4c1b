use crate::{constants::BLOCK_VERSION, util, wallet::Wallet};
use serde_derive::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result};

use self::transaction::Transaction;

pub mod genesis;
pub mod store;
pub mod transaction;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub version: u32,
    pub previous_hash: String,
    pub hash: String,
    pub height: u64,
    pub tx: Vec<Transaction>,
    pub votes: Vec<Vote>,
}

/// Attestation of a (height, transaction set) pair by one peer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vote {
    pub origin: String,
    pub sig: String,
}

impl Block {
    /// Build the successor of `previous` carrying `tx` and `votes`
    pub fn new(previous: &Block, tx: Vec<Transaction>, votes: Vec<Vote>) -> anyhow::Result<Self> {
        let height = previous.height + 1;
        let hash = hash_block(&previous.hash, BLOCK_VERSION, height, &tx)?;
        Ok(Self {
            version: BLOCK_VERSION,
            previous_hash: previous.hash.clone(),
            hash,
            height,
            tx,
            votes,
        })
    }

    /// Recompute the content hash, ignoring the claimed one
    pub fn compute_hash(&self) -> serde_json::Result<String> {
        hash_block(&self.previous_hash, self.version, self.height, &self.tx)
    }
}

/// `H(previousHash ∥ version ∥ height ∥ serialize(tx))`
pub fn hash_block(
    previous_hash: &str,
    version: u32,
    height: u64,
    tx: &[Transaction],
) -> serde_json::Result<String> {
    let tx = serde_json::to_string(tx)?;
    Ok(util::hash(&format!("{previous_hash}{version}{height}{tx}")))
}

impl Vote {
    pub fn create(wallet: &Wallet, height: u64, tx: &[Transaction]) -> serde_json::Result<Self> {
        Ok(Self {
            origin: wallet.public_key().to_string(),
            sig: wallet.sign(&Self::payload(height, tx)?),
        })
    }

    /// `height ∥ H(serialize(tx))`
    pub fn payload(height: u64, tx: &[Transaction]) -> serde_json::Result<String> {
        Ok(Self::payload_from_hash(height, &hash_tx(tx)?))
    }

    pub fn payload_from_hash(height: u64, tx_hash: &str) -> String {
        format!("{height},{tx_hash}")
    }

    pub fn is_valid(&self, height: u64, tx: &[Transaction]) -> bool {
        match Self::payload(height, tx) {
            Ok(payload) => util::verify_signature(&self.origin, &self.sig, &payload),
            Err(_) => false,
        }
    }
}

/// `H(serialize(tx))`, the transaction set digest votes attest to
pub fn hash_tx(tx: &[Transaction]) -> serde_json::Result<String> {
    Ok(util::hash(&serde_json::to_string(tx)?))
}

impl Debug for Block {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "\nBlock {{\n  height: {:?},\n  hash:   {:?},\n  prev:   {:?},\n  tx:     {},\n  votes:  {} }}",
            self.height,
            self.hash,
            self.previous_hash,
            self.tx.len(),
            self.votes.len()
        )
    }
}

use crate::{util, wallet::Wallet};
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub ident: String,
    pub origin: String,
    pub timestamp: u64,
    pub commands: Vec<Command>,
    /// Signature over `ident ∥ timestamp ∥ serialize(commands)`
    pub sig: String,
    /// Block inclusion signature over `height ∥ serialize(commands)`
    pub height_sig: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    AddPeer(AddPeer),
    RemovePeer(RemovePeer),
    ModifyStake(ModifyStake),
    Data(Data),
    Decision(Decision),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPeer {
    pub seq: u64,
    pub host: String,
    pub port: u16,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePeer {
    pub seq: u64,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyStake {
    pub seq: u64,
    pub public_key: String,
    pub ident: String,
    pub stake: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    pub seq: u64,
    pub ns: String,
    pub d: String,
}

/// Decision in namespace `ns`, to be taken no earlier than height `h`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub seq: u64,
    pub ns: String,
    pub h: u64,
    pub d: String,
}

impl Command {
    pub fn data(ns: &str, d: &str) -> Self {
        Self::Data(Data {
            seq: 1,
            ns: ns.to_string(),
            d: d.to_string(),
        })
    }

    pub fn decision(ns: &str, h: u64, d: &str) -> Self {
        Self::Decision(Decision {
            seq: 1,
            ns: ns.to_string(),
            h,
            d: d.to_string(),
        })
    }
}

impl Transaction {
    /// Sign `commands` as a transaction of `wallet` destined for `height`
    pub fn new(
        wallet: &Wallet,
        height: u64,
        ident: &str,
        commands: Vec<Command>,
    ) -> serde_json::Result<Self> {
        let timestamp = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        let commands_json = serde_json::to_string(&commands)?;
        Ok(Self {
            ident: ident.to_string(),
            origin: wallet.public_key().to_string(),
            timestamp,
            sig: wallet.sign(&format!("{ident}{timestamp}{commands_json}")),
            height_sig: wallet.sign(&format!("{height}{commands_json}")),
            commands,
        })
    }

    /// Verify `sig` against the origin's key
    pub fn verify_origin(&self) -> serde_json::Result<bool> {
        let commands = serde_json::to_string(&self.commands)?;
        let payload = format!("{}{}{}", self.ident, self.timestamp, commands);
        Ok(util::verify_signature(&self.origin, &self.sig, &payload))
    }

    /// Verify the block inclusion signature for `height`
    pub fn verify_height(&self, height: u64) -> serde_json::Result<bool> {
        let commands = serde_json::to_string(&self.commands)?;
        Ok(util::verify_signature(
            &self.origin,
            &self.height_sig,
            &format!("{height}{commands}"),
        ))
    }
}

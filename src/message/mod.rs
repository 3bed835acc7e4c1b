//! Signed consensus messages exchanged during a round.

pub mod proposal;
pub mod sync;
pub mod vote;

use crate::error::ValidationFailure;
use serde_json::Value;

pub use self::{proposal::Proposal, sync::SyncMessage, vote::VoteMessage};

pub const TYPE_PROPOSAL: u8 = 1;
pub const TYPE_VOTE: u8 = 2;
pub const TYPE_SYNC: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Proposal,
    Vote,
    Sync,
}

impl TryFrom<u64> for MessageType {
    type Error = ValidationFailure;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            v if v == TYPE_PROPOSAL as u64 => Ok(Self::Proposal),
            v if v == TYPE_VOTE as u64 => Ok(Self::Vote),
            v if v == TYPE_SYNC as u64 => Ok(Self::Sync),
            v => Err(ValidationFailure::UnknownMessageType(v)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Proposal(Proposal),
    Vote(VoteMessage),
    Sync(SyncMessage),
}

impl Message {
    /// Parse a raw message, dispatching on its `type` field
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_u64)
            .ok_or_else(|| anyhow::anyhow!("message without type"))?;
        Ok(match MessageType::try_from(kind)? {
            MessageType::Proposal => Self::Proposal(serde_json::from_value(value)?),
            MessageType::Vote => Self::Vote(serde_json::from_value(value)?),
            MessageType::Sync => Self::Sync(serde_json::from_value(value)?),
        })
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Self::Proposal(p) => serde_json::to_value(p),
            Self::Vote(v) => serde_json::to_value(v),
            Self::Sync(s) => serde_json::to_value(s),
        }
    }

    pub fn kind(&self) -> MessageType {
        match self {
            Self::Proposal(_) => MessageType::Proposal,
            Self::Vote(_) => MessageType::Vote,
            Self::Sync(_) => MessageType::Sync,
        }
    }

    /// Verify the message signature against its embedded origin
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Proposal(p) => p.is_valid(),
            Self::Vote(v) => v.is_valid(),
            Self::Sync(s) => s.is_valid(),
        }
    }

    pub fn origin(&self) -> &str {
        match self {
            Self::Proposal(p) => &p.origin,
            Self::Vote(v) => &v.origin,
            Self::Sync(s) => &s.origin,
        }
    }
}

/// Fresh per-proposer sequence token, milliseconds since the epoch
pub(crate) fn sequence() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(1)
}

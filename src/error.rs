use thiserror::Error;

/// Errors surfaced by the ledger store
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The candidate failed an integrity check and must not be retried at this height
    #[error("rejected block {hash} at height {height}: {reason}")]
    RejectedBlock {
        height: u64,
        hash: String,
        reason: Rejection,
    },
    #[error("not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Chain integrity invariant violated by a candidate block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("invalid signature on transaction {ident} from {origin}")]
    InvalidTransactionSignature { origin: String, ident: String },
    #[error("multiple transactions from origin {0}")]
    DuplicateTransactionOrigin(String),
    #[error("expected height {expected}, got {actual}")]
    HeightMismatch { expected: u64, actual: u64 },
    #[error("previous hash {actual} does not match {expected:?}")]
    PreviousHashMismatch { expected: String, actual: String },
    #[error("block hash does not match its content, expected {expected}")]
    HashMismatch { expected: String },
    #[error("block hash already present in the chain")]
    DuplicateHash,
    #[error("malformed block: {0}")]
    Malformed(String),
}

/// Structural or semantic predicate failed by an inbound message, block or transaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("unknown message type {0}")]
    UnknownMessageType(u64),
    #[error("schema violation: {0}")]
    Schema(String),
    #[error("empty transaction or vote set")]
    EmptyBlock,
    #[error("multiple votes from origin {0}")]
    DuplicateVoteOrigin(String),
    #[error("invalid vote from {0}")]
    InvalidVote(String),
    #[error("multiple transactions from origin {0}")]
    DuplicateTransactionOrigin(String),
    #[error("invalid transaction {ident} from {origin}")]
    InvalidTransaction { origin: String, ident: String },
    #[error("invalid height {0}")]
    InvalidHeight(u64),
    #[error("invalid transaction signature from {0}")]
    InvalidSignature(String),
    #[error("network is full ({0} peers)")]
    NetworkFull(usize),
    #[error("decision {ns} targets height {h} below {height}")]
    StaleDecision { ns: String, h: u64, height: u64 },
    #[error("decision {0} already taken")]
    DecisionTaken(String),
    #[error("unknown command")]
    UnknownCommand,
    #[error("block hash mismatch")]
    HashMismatch,
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ValidationFailure {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

//! Admission checks for inbound messages, blocks and transactions.
//!
//! Every entry point answers with a plain admit/reject boolean. The violated
//! predicate is logged, never propagated.

pub mod schema;

use crate::{
    block::{
        transaction::{Command, Transaction},
        Block, Vote,
    },
    error::ValidationFailure,
    message::MessageType,
    state::StateView,
};
use serde_json::Value;
use std::{collections::HashSet, sync::Arc};
use tracing::debug;

use self::schema::Schemas;

pub struct Validation {
    schemas: Schemas,
    state: Arc<dyn StateView>,
    max_network_size: usize,
}

impl Validation {
    pub fn new(state: Arc<dyn StateView>, max_network_size: usize) -> anyhow::Result<Self> {
        Ok(Self {
            schemas: Schemas::new()?,
            state,
            max_network_size,
        })
    }

    /// Stateless structural check of a raw inbound message
    pub fn validate_message(&self, message: &Value) -> bool {
        report("message", self.check_message(message))
    }

    /// Stateful check of a candidate block
    pub fn validate_block(&self, block: &Block) -> bool {
        report("block", self.check_block(block))
    }

    /// Stateful check of a transaction destined for `height`
    pub fn validate_tx(&self, height: u64, tx: &Transaction) -> bool {
        report("tx", self.check_tx(height, tx))
    }

    fn check_message(&self, message: &Value) -> Result<(), ValidationFailure> {
        let kind = message
            .get("type")
            .and_then(Value::as_u64)
            .ok_or_else(|| ValidationFailure::Schema("missing message type".into()))?;
        let kind = MessageType::try_from(kind)?;
        schema::check(self.schemas.message(kind), message).map_err(ValidationFailure::Schema)
    }

    fn check_block(&self, block: &Block) -> Result<(), ValidationFailure> {
        let Block {
            height, tx, votes, ..
        } = block;
        if tx.is_empty() || votes.is_empty() {
            return Err(ValidationFailure::EmptyBlock);
        }

        let vote_payload = Vote::payload(*height, tx)?;
        let mut origins = HashSet::new();
        for vote in votes {
            if !origins.insert(vote.origin.as_str()) {
                return Err(ValidationFailure::DuplicateVoteOrigin(vote.origin.clone()));
            }
            if !crate::util::verify_signature(&vote.origin, &vote.sig, &vote_payload) {
                return Err(ValidationFailure::InvalidVote(vote.origin.clone()));
            }
        }

        let mut origins = HashSet::new();
        for transaction in tx {
            if !origins.insert(transaction.origin.as_str()) {
                return Err(ValidationFailure::DuplicateTransactionOrigin(
                    transaction.origin.clone(),
                ));
            }
            if let Err(e) = self.check_tx(*height, transaction) {
                debug!("Transaction {} rejected: {e}", transaction.ident);
                return Err(ValidationFailure::InvalidTransaction {
                    origin: transaction.origin.clone(),
                    ident: transaction.ident.clone(),
                });
            }
        }

        if block.compute_hash()? != block.hash {
            return Err(ValidationFailure::HashMismatch);
        }
        Ok(())
    }

    fn check_tx(&self, height: u64, tx: &Transaction) -> Result<(), ValidationFailure> {
        let value = serde_json::to_value(tx)?;
        schema::check(self.schemas.tx(), &value).map_err(ValidationFailure::Schema)?;
        if height == 0 {
            return Err(ValidationFailure::InvalidHeight(height));
        }
        if !tx.verify_height(height)? {
            return Err(ValidationFailure::InvalidSignature(tx.origin.clone()));
        }
        // one inadmissible command rejects the whole transaction
        tx.commands.iter().try_for_each(|command| {
            authorize(command, height, self.state.as_ref(), self.max_network_size)
        })
    }
}

/// Authorization predicate of a single command at `height` against the projected state
pub fn authorize(
    command: &Command,
    height: u64,
    state: &dyn StateView,
    max_network_size: usize,
) -> Result<(), ValidationFailure> {
    match command {
        Command::AddPeer(_) => {
            let peers = state.peer_count();
            if peers < max_network_size {
                Ok(())
            } else {
                Err(ValidationFailure::NetworkFull(peers))
            }
        }
        Command::RemovePeer(_) | Command::ModifyStake(_) | Command::Data(_) => Ok(()),
        Command::Decision(decision) => {
            if decision.h < height {
                Err(ValidationFailure::StaleDecision {
                    ns: decision.ns.clone(),
                    h: decision.h,
                    height,
                })
            } else if state.is_decision_taken(decision) {
                Err(ValidationFailure::DecisionTaken(decision.ns.clone()))
            } else {
                Ok(())
            }
        }
        Command::Unknown => Err(ValidationFailure::UnknownCommand),
    }
}

fn report(what: &str, result: Result<(), ValidationFailure>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!("Validation of {what} failed: {e}");
            false
        }
    }
}

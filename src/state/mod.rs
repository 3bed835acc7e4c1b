//! Derived tables built by replaying committed blocks.

use crate::block::{
    transaction::{Command, Decision},
    Block,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Read/process surface of the state projection consumed by the ledger and validation
pub trait StateView: Send + Sync {
    /// Apply a committed block
    fn process(&self, block: &Block);

    fn peer_count(&self) -> usize;

    fn is_decision_taken(&self, decision: &Decision) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub host: String,
    pub port: u16,
    pub stake: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakenDecision {
    pub height: u64,
    pub h: u64,
    pub d: String,
}

#[derive(Debug, Default)]
struct Tables {
    height: u64,
    peers: BTreeMap<String, Peer>,
    decisions: BTreeMap<String, TakenDecision>,
    data: BTreeMap<String, String>,
}

/// In-memory state projection
#[derive(Debug, Default)]
pub struct State {
    tables: RwLock<Tables>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(&self) -> u64 {
        self.tables.read().height
    }

    pub fn peers(&self) -> BTreeMap<String, Peer> {
        self.tables.read().peers.clone()
    }

    pub fn decision(&self, ns: &str) -> Option<TakenDecision> {
        self.tables.read().decisions.get(ns).cloned()
    }

    pub fn data(&self, ns: &str) -> Option<String> {
        self.tables.read().data.get(ns).cloned()
    }
}

impl StateView for State {
    fn process(&self, block: &Block) {
        let mut tables = self.tables.write();
        if block.height <= tables.height {
            trace!("State already at {}, skipping block {}", tables.height, block.height);
            return;
        }

        for command in block.tx.iter().flat_map(|tx| tx.commands.iter()) {
            match command {
                Command::AddPeer(add) => {
                    tables.peers.insert(
                        add.public_key.clone(),
                        Peer {
                            host: add.host.clone(),
                            port: add.port,
                            stake: 0,
                        },
                    );
                }
                Command::RemovePeer(remove) => {
                    tables.peers.remove(&remove.public_key);
                }
                Command::ModifyStake(modify) => {
                    if let Some(peer) = tables.peers.get_mut(&modify.public_key) {
                        peer.stake = peer.stake.saturating_add(modify.stake);
                    }
                }
                Command::Data(data) => {
                    tables.data.insert(data.ns.clone(), data.d.clone());
                }
                Command::Decision(decision) => {
                    tables
                        .decisions
                        .entry(decision.ns.clone())
                        .or_insert(TakenDecision {
                            height: block.height,
                            h: decision.h,
                            d: decision.d.clone(),
                        });
                }
                Command::Unknown => {}
            }
        }
        tables.height = block.height;
        debug!(
            "State processed block {} ({} peers)",
            block.height,
            tables.peers.len()
        );
    }

    fn peer_count(&self) -> usize {
        self.tables.read().peers.len()
    }

    fn is_decision_taken(&self, decision: &Decision) -> bool {
        self.tables.read().decisions.contains_key(&decision.ns)
    }
}

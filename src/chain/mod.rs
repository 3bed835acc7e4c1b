//! The ledger store: persisted chain, hot window and cached tip.

pub mod verify;

use crate::{
    block::{store::BlockStore, transaction::Transaction, Block},
    error::{LedgerError, LedgerResult},
    state::StateView,
};
use parking_lot::{Mutex, RwLock};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, info, instrument, trace, warn};

/// Cached tip scalars and the window of the most recent blocks
#[derive(Debug)]
pub(crate) struct Tip {
    pub(crate) height: u64,
    pub(crate) latest: Block,
    pub(crate) blocks: BTreeMap<u64, Block>,
    pub(crate) hashes: BTreeMap<u64, String>,
}

pub struct Blockchain<S> {
    store: S,
    state: Arc<dyn StateView>,
    max_blocks_in_memory: usize,
    append_lock: Mutex<()>,
    tip: RwLock<Tip>,
}

impl<S: BlockStore> Blockchain<S> {
    /// Write `genesis` if the store has no block at height 1, replay the chain into the
    /// state projection and load the tip and hot window.
    #[instrument(skip_all)]
    pub fn bootstrap(
        store: S,
        state: Arc<dyn StateView>,
        genesis: Block,
        max_blocks_in_memory: usize,
    ) -> LedgerResult<Self> {
        let max_blocks_in_memory = max_blocks_in_memory.max(1);
        if store.get_block(1)?.is_none() {
            info!("Writing genesis block {}", genesis.hash);
            store.put_block(&genesis)?;
        }

        let latest = store
            .last_block()?
            .ok_or_else(|| anyhow::anyhow!("block store is empty after genesis"))?;
        let height = latest.height;

        // replay in window sized batches
        let batch = max_blocks_in_memory as u64;
        let mut gte = 1;
        while gte <= height {
            let lte = gte.saturating_add(batch - 1).min(height);
            for block in store.get_blocks(gte, lte)? {
                state.process(&block);
            }
            gte = lte + 1;
        }

        let mut blocks = BTreeMap::new();
        let mut hashes = BTreeMap::new();
        let window_start = height.saturating_sub(batch - 1).max(1);
        for block in store.get_blocks(window_start, height)? {
            hashes.insert(block.height, block.hash.clone());
            blocks.insert(block.height, block);
        }

        info!("Chain bootstrapped at height {height}, tip {}", latest.hash);
        Ok(Self {
            store,
            state,
            max_blocks_in_memory,
            append_lock: Mutex::new(()),
            tip: RwLock::new(Tip {
                height,
                latest,
                blocks,
                hashes,
            }),
        })
    }

    /// Verify and append `block`, then hand it to the state projection.
    ///
    /// Appends are serialized against each other. The tip is only write locked for the
    /// final swap, so readers see the parent until the block is persisted.
    pub fn append(&self, block: Block) -> LedgerResult<()> {
        let _append = self.append_lock.lock();
        let verified = verify::verify_block(&self.tip.read(), &block);
        if let Err(reason) = verified {
            warn!("Rejected block {} at height {}: {reason}", block.hash, block.height);
            return Err(LedgerError::RejectedBlock {
                height: block.height,
                hash: block.hash,
                reason,
            });
        }

        self.store.put_block(&block)?;

        let height = block.height;
        {
            let mut tip = self.tip.write();
            tip.height = height;
            tip.hashes.insert(height, block.hash.clone());
            tip.blocks.insert(height, block.clone());
            while tip.blocks.len() > self.max_blocks_in_memory {
                tip.blocks.pop_first();
                tip.hashes.pop_first();
            }
            tip.latest = block.clone();
        }

        self.state.process(&block);
        debug!("Block added at height {height}: {}", block.hash);
        Ok(())
    }

    /// Range mode when `gte` or `lte` is at least 1, limit mode otherwise
    pub fn read(&self, limit: u64, gte: u64, lte: u64) -> LedgerResult<Vec<Block>> {
        if gte >= 1 || lte >= 1 {
            let height = self.height();
            let (gte, lte) = (gte.clamp(1, height), lte.clamp(1, height));
            let (gte, lte) = if gte > lte { (lte, gte) } else { (gte, lte) };
            return self.read_range(gte, lte);
        }

        let limit = limit.clamp(1, self.max_blocks_in_memory as u64) as usize;
        let tip = self.tip.read();
        let skip = tip.blocks.len().saturating_sub(limit);
        Ok(tip.blocks.values().skip(skip).cloned().collect())
    }

    /// Page `page` (1-based) of `size` blocks over the whole chain
    pub fn read_page(&self, page: u64, size: u64) -> LedgerResult<Vec<Block>> {
        let height = self.height();
        let page = page.max(1);
        let size = size.clamp(1, self.max_blocks_in_memory as u64).min(height);

        let mut gte = (page - 1).saturating_mul(size).saturating_add(1);
        let mut lte = page.saturating_mul(size).min(height);
        if gte > height {
            gte = height - size + 1;
            lte = height;
        }
        self.read_range(gte, lte)
    }

    /// Ascending read from persisted storage, truncated to the newest
    /// `max_blocks_in_memory` heights ending at `lte`
    fn read_range(&self, gte: u64, lte: u64) -> LedgerResult<Vec<Block>> {
        let max = self.max_blocks_in_memory as u64;
        let gte = if lte - gte >= max { lte - max + 1 } else { gte };
        trace!("Reading blocks {gte}..={lte}");
        Ok(self.store.get_blocks(gte, lte)?)
    }

    pub fn find_transaction(&self, origin: &str, ident: &str) -> LedgerResult<Transaction> {
        self.store
            .find_transaction(origin, ident)?
            .ok_or(LedgerError::NotFound)
    }

    pub fn latest(&self) -> Block {
        self.tip.read().latest.clone()
    }

    pub fn height(&self) -> u64 {
        self.tip.read().height
    }

    pub fn state(&self) -> &Arc<dyn StateView> {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_blocks_in_memory(&self) -> usize {
        self.max_blocks_in_memory
    }
}

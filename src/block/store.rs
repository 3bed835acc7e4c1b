use super::{transaction::Transaction, Block};

/// Persisted `height -> block` sequence
pub trait BlockStore {
    /// Put the block at its height
    fn put_block(&self, block: &Block) -> anyhow::Result<()>;

    /// Get the block at the given height
    fn get_block(&self, height: u64) -> anyhow::Result<Option<Block>>;

    /// Blocks with heights in `gte..=lte`, ascending
    fn get_blocks(&self, gte: u64, lte: u64) -> anyhow::Result<Vec<Block>>;

    /// The block stored under the highest key
    fn last_block(&self) -> anyhow::Result<Option<Block>>;

    /// First transaction matching `origin` and `ident`, scanning from height 1 upwards
    fn find_transaction(&self, origin: &str, ident: &str) -> anyhow::Result<Option<Transaction>>;
}

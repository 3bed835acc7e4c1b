use crate::{
    block::{store::BlockStore, transaction::Transaction, Block},
    constants::BLOCKS_CF,
};
use rocksdb::{ColumnFamilyDescriptor, Direction, IteratorMode, DB};
use std::path::{Path, PathBuf};
use tracing::trace;

/// RocksDB backed block store, keyed by big-endian height
#[derive(Debug)]
pub struct ChainStore {
    pub db_path: PathBuf,
    pub database: DB,
}

impl ChainStore {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let mut cf_opts = rocksdb::Options::default();
        cf_opts.set_max_write_buffer_number(16);
        let blocks = ColumnFamilyDescriptor::new(BLOCKS_CF, cf_opts);

        let mut database_opts = rocksdb::Options::default();
        database_opts.create_missing_column_families(true);
        database_opts.create_if_missing(true);
        let database = DB::open_cf_descriptors(&database_opts, path, vec![blocks])?;
        Ok(Self {
            db_path: PathBuf::from(path),
            database,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn blocks_cf(&self) -> anyhow::Result<&rocksdb::ColumnFamily> {
        self.database
            .cf_handle(BLOCKS_CF)
            .ok_or_else(|| anyhow::anyhow!("missing column family {BLOCKS_CF}"))
    }

    fn key(height: u64) -> [u8; 8] {
        height.to_be_bytes()
    }
}

impl BlockStore for ChainStore {
    fn put_block(&self, block: &Block) -> anyhow::Result<()> {
        trace!("Putting block {} at height {}", block.hash, block.height);
        let value = serde_json::to_vec(block)?;
        self.database
            .put_cf(self.blocks_cf()?, Self::key(block.height), value)?;
        Ok(())
    }

    fn get_block(&self, height: u64) -> anyhow::Result<Option<Block>> {
        trace!("Getting block at height {height}");
        match self
            .database
            .get_pinned_cf(self.blocks_cf()?, Self::key(height))?
        {
            None => Ok(None),
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        }
    }

    fn get_blocks(&self, gte: u64, lte: u64) -> anyhow::Result<Vec<Block>> {
        trace!("Getting blocks in {gte}..={lte}");
        let mut blocks = vec![];
        if gte > lte {
            return Ok(blocks);
        }

        let start = Self::key(gte);
        let end = Self::key(lte);
        let mode = IteratorMode::From(&start, Direction::Forward);
        for entry in self.database.iterator_cf(self.blocks_cf()?, mode) {
            let (key, value) = entry?;
            if key[..] > end[..] {
                break;
            }
            blocks.push(serde_json::from_slice(&value)?);
        }
        Ok(blocks)
    }

    fn last_block(&self) -> anyhow::Result<Option<Block>> {
        trace!("Getting last block");
        match self
            .database
            .iterator_cf(self.blocks_cf()?, IteratorMode::End)
            .next()
        {
            None => Ok(None),
            Some(entry) => {
                let (_, value) = entry?;
                Ok(Some(serde_json::from_slice(&value)?))
            }
        }
    }

    fn find_transaction(&self, origin: &str, ident: &str) -> anyhow::Result<Option<Transaction>> {
        trace!("Finding transaction {ident} from {origin}");
        for entry in self
            .database
            .iterator_cf(self.blocks_cf()?, IteratorMode::Start)
        {
            let (_, value) = entry?;
            let block: Block = serde_json::from_slice(&value)?;
            if let Some(tx) = block
                .tx
                .into_iter()
                .find(|tx| tx.origin == origin && tx.ident == ident)
            {
                return Ok(Some(tx));
            }
        }
        Ok(None)
    }
}

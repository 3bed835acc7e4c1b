use super::Block;
use crate::constants::GENESIS_JSON;
use std::path::Path;

/// The statically defined block at height 1
pub fn genesis() -> anyhow::Result<Block> {
    let block = serde_json::from_str(GENESIS_JSON)?;
    check(&block, "embedded genesis")?;
    Ok(block)
}

/// Operator supplied genesis block
pub fn parse_file(path: &Path) -> anyhow::Result<Block> {
    let block: Block = serde_json::from_slice(&std::fs::read(path)?)?;
    check(&block, &path.display().to_string())?;
    Ok(block)
}

/// A genesis block is empty, sits at height 1 and carries its own hash
fn check(block: &Block, source: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        block.height == 1,
        "genesis block at {source} has height {}",
        block.height
    );
    anyhow::ensure!(
        block.tx.is_empty() && block.votes.is_empty(),
        "genesis block at {source} carries transactions or votes"
    );
    let computed = block.compute_hash()?;
    anyhow::ensure!(
        computed == block.hash,
        "genesis block at {source} claims hash {} but hashes to {computed}",
        block.hash
    );
    Ok(())
}

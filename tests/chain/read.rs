use crate::helpers::{extend_to, open_chain, setup_new_db_dir, wallets};
use pos_ledger::error::LedgerError;

fn heights(blocks: &[pos_ledger::block::Block]) -> Vec<u64> {
    blocks.iter().map(|b| b.height).collect()
}

#[test]
fn limit_mode() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("read-limit")?;
    let (_, chain) = open_chain(store_dir.path(), 10)?;
    extend_to(&chain, 25)?;

    assert_eq!(heights(&chain.read(50, 0, 0)?), (16..=25).collect::<Vec<_>>());
    assert_eq!(heights(&chain.read(3, 0, 0)?), vec![23, 24, 25]);
    assert_eq!(heights(&chain.read(0, 0, 0)?), vec![25]);
    Ok(())
}

#[test]
fn range_mode() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("read-range")?;
    let (_, chain) = open_chain(store_dir.path(), 10)?;
    extend_to(&chain, 25)?;

    assert_eq!(heights(&chain.read(0, 3, 6)?), vec![3, 4, 5, 6]);
    // inverted bounds are swapped
    assert_eq!(heights(&chain.read(0, 6, 3)?), vec![3, 4, 5, 6]);
    // clamped to the chain
    assert_eq!(heights(&chain.read(0, 22, 99)?), vec![22, 23, 24, 25]);
    // wider than the window keeps the newest entries ending at lte
    assert_eq!(heights(&chain.read(0, 1, 20)?), (11..=20).collect::<Vec<_>>());
    // range mode ignores limit
    assert_eq!(heights(&chain.read(2, 1, 3)?), vec![1, 2, 3]);
    Ok(())
}

#[test]
fn pages() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("read-page")?;
    let (_, chain) = open_chain(store_dir.path(), 1000)?;
    extend_to(&chain, 100)?;

    assert_eq!(heights(&chain.read_page(1, 10)?), (1..=10).collect::<Vec<_>>());
    assert_eq!(heights(&chain.read_page(10, 10)?), (91..=100).collect::<Vec<_>>());
    assert_eq!(heights(&chain.read_page(11, 10)?), (91..=100).collect::<Vec<_>>());
    assert_eq!(heights(&chain.read_page(0, 10)?), (1..=10).collect::<Vec<_>>());
    // size larger than the chain
    assert_eq!(chain.read_page(1, 500)?.len(), 100);
    Ok(())
}

#[test]
fn find_transaction() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("read-tx")?;
    let (_, chain) = open_chain(store_dir.path(), 10)?;
    extend_to(&chain, 15)?;
    let origin = wallets(1)[0].public_key().to_string();

    let tx = chain.find_transaction(&origin, "tx-3")?;
    assert_eq!(tx.ident, "tx-3");
    assert_eq!(tx.origin, origin);

    assert!(matches!(
        chain.find_transaction(&origin, "tx-99"),
        Err(LedgerError::NotFound)
    ));
    assert!(matches!(
        chain.find_transaction("someone-else", "tx-3"),
        Err(LedgerError::NotFound)
    ));
    Ok(())
}

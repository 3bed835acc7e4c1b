use crate::helpers::{block_after, extend_to, open_chain, setup_new_db_dir, wallets};
use pos_ledger::{
    block::{genesis, store::BlockStore, transaction::Command},
    error::LedgerError,
    server::{Node, NodeConfiguration},
    state::StateView,
    store::ChainStore,
};
use tracing_subscriber::filter::LevelFilter;
use pretty_assertions::assert_eq;
use std::path::Path;

#[test]
fn genesis_written_once() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("bootstrap-genesis")?;
    let (_, chain) = open_chain(store_dir.path(), 10)?;

    assert_eq!(chain.height(), 1);
    assert_eq!(chain.latest(), genesis::genesis()?);
    assert_eq!(chain.store().get_block(1)?, Some(genesis::genesis()?));
    Ok(())
}

#[test]
fn reopen_restores_tip_and_state() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("bootstrap-reopen")?;
    let wallets = wallets(3);
    let tip = {
        let (_, chain) = open_chain(store_dir.path(), 4)?;
        extend_to(&chain, 6)?;
        let peer = Command::AddPeer(pos_ledger::block::transaction::AddPeer {
            seq: 1,
            host: "peer.example".into(),
            port: 17168,
            public_key: wallets[2].public_key().to_string(),
        });
        chain.append(block_after(&chain.latest(), &wallets[1], &wallets, vec![peer])?)?;
        chain.latest()
    };

    let (state, chain) = open_chain(store_dir.path(), 4)?;
    assert_eq!(chain.height(), 7);
    assert_eq!(chain.latest(), tip);
    assert_eq!(state.peer_count(), 1);

    let window: Vec<u64> = chain.read(10, 0, 0)?.iter().map(|b| b.height).collect();
    assert_eq!(window, vec![4, 5, 6, 7]);

    // the restored hash window accepts the next block
    extend_to(&chain, 8)?;
    assert_eq!(chain.height(), 8);
    Ok(())
}

fn node_config(data_dir: &Path) -> anyhow::Result<NodeConfiguration> {
    Ok(NodeConfiguration {
        secret: "NODE1".into(),
        data_dir: data_dir.to_path_buf(),
        genesis: genesis::genesis()?,
        max_blocks_in_memory: 10,
        max_network_size: 4,
        log_file: data_dir.join("pos-ledger.log"),
        log_level: LevelFilter::DEBUG,
        log_level_stdout: LevelFilter::INFO,
    })
}

#[test]
fn store_locked_by_first_open() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("bootstrap-locked")?;
    let _first = ChainStore::new(store_dir.path())?;
    assert!(ChainStore::new(store_dir.path()).is_err());
    Ok(())
}

#[test]
fn second_node_on_identity_is_storage_error() -> anyhow::Result<()> {
    let data_dir = setup_new_db_dir("bootstrap-node")?;
    let config = node_config(data_dir.path())?;

    let node = Node::open(&config)?;
    assert!(data_dir.path().join(node.wallet.identity()).is_dir());

    let err = Node::open(&config).err().expect("store is already open");
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Storage(_))
    ));
    Ok(())
}

#[test]
fn unusable_data_dir_is_storage_error() -> anyhow::Result<()> {
    let data_dir = setup_new_db_dir("bootstrap-file")?;
    let file = data_dir.path().join("not-a-dir");
    std::fs::write(&file, b"")?;
    let config = node_config(&file)?;

    let err = Node::open(&config).err().expect("data dir is a file");
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Storage(_))
    ));
    Ok(())
}

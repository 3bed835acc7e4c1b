use crate::helpers::{block_after, wallets};
use pos_ledger::{
    block::{
        genesis,
        transaction::{AddPeer, Command, Transaction},
        Vote,
    },
    state::{State, StateView},
    validation::Validation,
};
use std::sync::Arc;

fn validation(max_network_size: usize) -> anyhow::Result<(Arc<State>, Validation)> {
    let state = Arc::new(State::new());
    let validation = Validation::new(state.clone(), max_network_size)?;
    Ok((state, validation))
}

#[test]
fn valid_block() -> anyhow::Result<()> {
    let (_, validation) = validation(64)?;
    let wallets = wallets(3);
    let block = block_after(
        &genesis::genesis()?,
        &wallets[0],
        &wallets,
        vec![Command::data("ns", "hello")],
    )?;
    assert!(validation.validate_block(&block));
    Ok(())
}

#[test]
fn empty_sets_rejected() -> anyhow::Result<()> {
    let (_, validation) = validation(64)?;
    let wallets = wallets(2);
    let block = block_after(
        &genesis::genesis()?,
        &wallets[0],
        &wallets,
        vec![Command::data("ns", "x")],
    )?;

    let mut no_votes = block.clone();
    no_votes.votes.clear();
    assert!(!validation.validate_block(&no_votes));

    let mut no_tx = block;
    no_tx.tx.clear();
    assert!(!validation.validate_block(&no_tx));
    Ok(())
}

#[test]
fn duplicate_vote_origin_rejected() -> anyhow::Result<()> {
    let (_, validation) = validation(64)?;
    let wallets = wallets(2);
    let mut block = block_after(
        &genesis::genesis()?,
        &wallets[0],
        &wallets,
        vec![Command::data("ns", "x")],
    )?;

    // both copies verify on their own
    let repeated = block.votes[0].clone();
    assert!(repeated.is_valid(block.height, &block.tx));
    block.votes.push(repeated);
    assert!(!validation.validate_block(&block));
    Ok(())
}

#[test]
fn foreign_vote_rejected() -> anyhow::Result<()> {
    let (_, validation) = validation(64)?;
    let wallets = wallets(2);
    let mut block = block_after(
        &genesis::genesis()?,
        &wallets[0],
        &wallets,
        vec![Command::data("ns", "x")],
    )?;

    // vote for another height
    block.votes[1] = Vote::create(&wallets[1], block.height + 1, &block.tx)?;
    assert!(!validation.validate_block(&block));
    Ok(())
}

#[test]
fn tampered_hash_rejected() -> anyhow::Result<()> {
    let (_, validation) = validation(64)?;
    let wallets = wallets(2);
    let genesis = genesis::genesis()?;
    let mut block = block_after(&genesis, &wallets[0], &wallets, vec![Command::data("ns", "x")])?;
    block.hash = genesis.hash;
    assert!(!validation.validate_block(&block));
    Ok(())
}

#[test]
fn taken_decision_rejects_whole_transaction() -> anyhow::Result<()> {
    let (state, validation) = validation(64)?;
    let wallets = wallets(2);
    let decided = block_after(
        &genesis::genesis()?,
        &wallets[0],
        &wallets,
        vec![Command::decision("vote-1", 2, "yes")],
    )?;
    state.process(&decided);

    let mixed = Transaction::new(
        &wallets[1],
        3,
        "mixed",
        vec![
            Command::data("ns", "fine"),
            Command::decision("vote-1", 5, "again"),
        ],
    )?;
    assert!(!validation.validate_tx(3, &mixed));

    let fresh = Transaction::new(
        &wallets[1],
        3,
        "fresh",
        vec![
            Command::data("ns", "fine"),
            Command::decision("vote-2", 5, "yes"),
        ],
    )?;
    assert!(validation.validate_tx(3, &fresh));

    let stale = Transaction::new(
        &wallets[1],
        3,
        "stale",
        vec![Command::decision("vote-3", 2, "late")],
    )?;
    assert!(!validation.validate_tx(3, &stale));

    // the block carrying the mixed transaction is rejected as a whole
    let block = block_after(
        &decided,
        &wallets[1],
        &wallets,
        vec![
            Command::data("ns", "fine"),
            Command::decision("vote-1", 5, "again"),
        ],
    )?;
    assert!(!validation.validate_block(&block));
    Ok(())
}

#[test]
fn add_peer_bounded_by_network_size() -> anyhow::Result<()> {
    let (state, validation) = validation(1)?;
    let wallets = wallets(3);
    let add = |wallet: &pos_ledger::wallet::Wallet| {
        Command::AddPeer(AddPeer {
            seq: 1,
            host: "peer.example".into(),
            port: 17168,
            public_key: wallet.public_key().to_string(),
        })
    };

    let first = Transaction::new(&wallets[0], 2, "add-1", vec![add(&wallets[1])])?;
    assert!(validation.validate_tx(2, &first));

    let genesis = genesis::genesis()?;
    state.process(&block_after(&genesis, &wallets[0], &wallets, vec![add(&wallets[1])])?);
    assert_eq!(state.peer_count(), 1);

    let second = Transaction::new(&wallets[0], 3, "add-2", vec![add(&wallets[2])])?;
    assert!(!validation.validate_tx(3, &second));
    Ok(())
}

#[test]
fn transaction_signature_and_height() -> anyhow::Result<()> {
    let (_, validation) = validation(64)?;
    let wallet = &wallets(1)[0];
    let tx = Transaction::new(wallet, 4, "t", vec![Command::data("ns", "x")])?;

    assert!(validation.validate_tx(4, &tx));
    assert!(!validation.validate_tx(5, &tx));
    assert!(!validation.validate_tx(0, &tx));

    let mut unknown = tx.clone();
    unknown.commands.push(Command::Unknown);
    assert!(!validation.validate_tx(4, &unknown));
    Ok(())
}

use crate::{
    block::{genesis, Block},
    chain::Blockchain,
    constants::{MAX_BLOCKS_IN_MEMORY, MAX_NETWORK_SIZE},
    error::LedgerError,
    message::Message,
    state::{State, StateView},
    store::ChainStore,
    validation::Validation,
    wallet::Wallet,
};
use clap::Args;
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::filter::LevelFilter;

#[derive(Args, Debug, Clone)]
pub struct NodeArgs {
    /// Secret the node key pair is derived from
    #[arg(long, env = "POS_LEDGER_SECRET")]
    secret: String,
    /// Path to directory holding one block store per node identity
    #[arg(short, long, default_value = concat!(env!("HOME"), "/.pos-ledger/blockstore"))]
    data_dir: PathBuf,
    /// Path to a genesis block, the embedded one is used if omitted
    #[arg(short, long)]
    genesis: Option<PathBuf>,
    /// Number of recent blocks kept in memory
    #[arg(long, default_value_t = MAX_BLOCKS_IN_MEMORY)]
    max_blocks_in_memory: usize,
    /// Maximum number of peers in the network
    #[arg(long, default_value_t = MAX_NETWORK_SIZE)]
    max_network_size: usize,
    /// Path to directory for logs
    #[arg(short, long, default_value = concat!(env!("HOME"), "/.pos-ledger/logs"))]
    log_dir: PathBuf,
    /// Max file log level
    #[arg(long, default_value_t = LevelFilter::DEBUG)]
    log_level: LevelFilter,
    /// Max stdout log level
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level_stdout: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct NodeConfiguration {
    pub secret: String,
    pub data_dir: PathBuf,
    pub genesis: Block,
    pub max_blocks_in_memory: usize,
    pub max_network_size: usize,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub log_level_stdout: LevelFilter,
}

#[instrument(skip_all)]
pub fn handle_command_line_arguments(args: NodeArgs) -> anyhow::Result<NodeConfiguration> {
    debug!("Parsing node args");
    let genesis = match &args.genesis {
        Some(path) => genesis::parse_file(path)?,
        None => genesis::genesis()?,
    };
    anyhow::ensure!(
        args.max_blocks_in_memory > 0,
        "max-blocks-in-memory must be positive"
    );
    anyhow::ensure!(
        args.max_network_size > 0,
        "max-network-size must be positive"
    );

    Ok(NodeConfiguration {
        secret: args.secret,
        data_dir: args.data_dir,
        genesis,
        max_blocks_in_memory: args.max_blocks_in_memory,
        max_network_size: args.max_network_size,
        log_file: args.log_dir.join("pos-ledger.log"),
        log_level: args.log_level,
        log_level_stdout: args.log_level_stdout,
    })
}

/// Ledger, state projection and validation of one node identity
pub struct Node {
    pub wallet: Wallet,
    pub state: Arc<State>,
    pub chain: Blockchain<ChainStore>,
    pub validation: Validation,
}

impl Node {
    /// Open the block store of this identity and bootstrap the chain
    pub fn open(config: &NodeConfiguration) -> anyhow::Result<Self> {
        let wallet = Wallet::from_secret(&config.secret);
        let store_dir = config.data_dir.join(wallet.identity());
        std::fs::create_dir_all(&store_dir).map_err(|e| LedgerError::Storage(e.into()))?;
        info!("Opening block store at {}", store_dir.display());

        let store = ChainStore::new(&store_dir).map_err(LedgerError::Storage)?;
        let state = Arc::new(State::new());
        let view: Arc<dyn StateView> = state.clone();
        let chain = Blockchain::bootstrap(
            store,
            view.clone(),
            config.genesis.clone(),
            config.max_blocks_in_memory,
        )?;
        let validation = Validation::new(view, config.max_network_size)?;
        Ok(Self {
            wallet,
            state,
            chain,
            validation,
        })
    }

    /// Run an inbound message through the pipeline, appending any synced block.
    ///
    /// Returns whether the message was admitted. Only storage failures are errors.
    pub fn handle_message(&self, raw: Value) -> anyhow::Result<bool> {
        if !self.validation.validate_message(&raw) {
            return Ok(false);
        }
        let message = match Message::from_value(raw) {
            Ok(message) => message,
            Err(e) => {
                debug!("Dropping unparsable message: {e}");
                return Ok(false);
            }
        };
        if !message.is_valid() {
            debug!(
                "Dropping {:?} with invalid signature from {}",
                message.kind(),
                message.origin()
            );
            return Ok(false);
        }

        match message {
            Message::Proposal(proposal) => {
                Ok(self.validation.validate_tx(proposal.height, &proposal.tx))
            }
            Message::Vote(_) => Ok(true),
            Message::Sync(sync) => {
                if !self.validation.validate_block(&sync.block) {
                    return Ok(false);
                }
                match self.chain.append(sync.block) {
                    Ok(()) => Ok(true),
                    Err(LedgerError::RejectedBlock { .. }) => Ok(false),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

/// Bootstrap the node and keep the store open until interrupted
pub async fn run(config: NodeConfiguration) -> anyhow::Result<()> {
    info!("Starting pos-ledger node");
    let node = Node::open(&config)?;
    let latest = node.chain.latest();
    info!(
        "Node {} at height {} with {} peers, tip {}",
        node.wallet.identity(),
        latest.height,
        node.state.peer_count(),
        latest.hash
    );

    let signal = Shutdown::listen()?.wait().await;
    warn!("Received {signal}, shutting down");
    Ok(())
}

/// SIGINT and SIGTERM listeners, registered up front so no signal is missed
pub struct Shutdown {
    interrupt: Signal,
    terminate: Signal,
}

impl Shutdown {
    pub fn listen() -> anyhow::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Name of the first signal received
    pub async fn wait(mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}

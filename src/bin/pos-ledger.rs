use clap::{Parser, Subcommand};
use pos_ledger::{
    error::LedgerError,
    server::{self, handle_command_line_arguments, Node, NodeArgs},
};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "pos-ledger", author, version, about, long_about = Some("pos-ledger\n\n\
Permissioned ledger node: block store and validation pipeline"))]
struct Cli {
    #[command(subcommand)]
    command: LedgerCommand,
}

#[derive(Subcommand, Debug)]
enum LedgerCommand {
    /// Run the node until interrupted
    Node(NodeArgs),
    /// Print blocks of a stopped node as JSON
    Blocks {
        #[command(flatten)]
        node: NodeArgs,
        /// Number of most recent blocks
        #[arg(long, default_value_t = 0)]
        limit: u64,
        /// Lowest height of a range
        #[arg(long, default_value_t = 0)]
        gte: u64,
        /// Highest height of a range
        #[arg(long, default_value_t = 0)]
        lte: u64,
        /// Page number, takes precedence over limit and range
        #[arg(long)]
        page: Option<u64>,
        /// Page size
        #[arg(long, default_value_t = 0)]
        size: u64,
    },
    /// Print a transaction of a stopped node as JSON
    Tx {
        #[command(flatten)]
        node: NodeArgs,
        #[arg(long)]
        origin: String,
        #[arg(long)]
        ident: String,
    },
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        LedgerCommand::Node(args) => {
            let config = handle_command_line_arguments(args)?;

            // setup tracing
            if let Some(parent) = config.log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let log_file = std::fs::File::create(config.log_file.clone())?;
            let file_layer = tracing_subscriber::fmt::layer().with_writer(log_file);

            let stdout_layer = tracing_subscriber::fmt::layer();
            tracing_subscriber::registry()
                .with(stdout_layer.with_filter(config.log_level_stdout))
                .with(file_layer.with_filter(config.log_level))
                .init();

            server::run(config).await
        }
        LedgerCommand::Blocks {
            node,
            limit,
            gte,
            lte,
            page,
            size,
        } => {
            let node = Node::open(&handle_command_line_arguments(node)?)?;
            let blocks = match page {
                Some(page) => node.chain.read_page(page, size)?,
                None => node.chain.read(limit, gte, lte)?,
            };
            println!("{}", serde_json::to_string_pretty(&blocks)?);
            Ok(())
        }
        LedgerCommand::Tx {
            node,
            origin,
            ident,
        } => {
            let node = Node::open(&handle_command_line_arguments(node)?)?;
            match node.chain.find_transaction(&origin, &ident) {
                Ok(tx) => {
                    println!("{}", serde_json::to_string_pretty(&tx)?);
                    Ok(())
                }
                Err(LedgerError::NotFound) => {
                    anyhow::bail!("no transaction {ident} from {origin}")
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

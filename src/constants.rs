/// Version stamped into every block this node proposes
pub const BLOCK_VERSION: u32 = 1;

/// Default size of the hot window of recent blocks kept in memory
pub const MAX_BLOCKS_IN_MEMORY: usize = 1000;

/// Default upper bound on the number of peers in the network
pub const MAX_NETWORK_SIZE: usize = 64;

/// Column family holding `height -> block`
pub const BLOCKS_CF: &str = "blocks";

pub const GENESIS_JSON: &str = include_str!("../config/genesis.json");

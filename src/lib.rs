pub mod block;
pub mod chain;
pub mod constants;
pub mod error;
pub mod message;
pub mod server;
pub mod state;
pub mod store;
pub mod util;
pub mod validation;
pub mod wallet;

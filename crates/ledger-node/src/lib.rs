pub mod api;
pub mod config;
pub mod constants;
pub mod peer_client;

pub use api::{router, AppState};
pub use config::{Args, NodeConfig};
pub use peer_client::HttpPeerClient;

use std::sync::Arc;

use clap::Parser;
use ledger_core::{Ledger, MinerReward, PeerClient, PeerSet, Reconciler};
use ledger_node::{router, AppState, Args, HttpPeerClient, NodeConfig};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = NodeConfig::from_args(Args::parse())?;
    let node_id = uuid::Uuid::new_v4().simple().to_string();

    let ledger = Ledger::new(config.pow())
        .with_peers(PeerSet::with_self(&config.public_addr)?)
        .with_reward(MinerReward::new(node_id.clone(), config.reward_to.clone()));
    for peer in &config.peers {
        if let Err(err) = ledger.add_peer(peer) {
            warn!(%peer, error = %err, "skipping configured peer");
        }
    }

    let client: Arc<dyn PeerClient> = Arc::new(HttpPeerClient::new(config.peer_timeout)?);
    let reconciler = Reconciler::new(client).with_timeout(config.peer_timeout);
    let app = router(AppState::new(ledger, reconciler));

    info!(
        %node_id,
        difficulty = config.difficulty,
        "ledger-node listening on http://{}",
        config.listen
    );
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

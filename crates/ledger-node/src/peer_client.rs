use std::time::Duration;

use async_trait::async_trait;
use ledger_core::{ChainSnapshot, PeerClient, PeerError};
use reqwest::Client;

use crate::constants::CHAIN_PATH;

/// Pulls `GET http://{peer}/get_chain` from other nodes.
#[derive(Clone, Debug)]
pub struct HttpPeerClient {
    http: Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, PeerError> {
        let res = self
            .http
            .get(format!("http://{peer}{CHAIN_PATH}"))
            .send()
            .await
            .map_err(|err| PeerError::Unreachable {
                peer: peer.to_string(),
                reason: err.to_string(),
            })?;
        let status = res.status();
        if !status.is_success() {
            return Err(PeerError::Status {
                peer: peer.to_string(),
                status: status.as_u16(),
            });
        }
        res.json::<ChainSnapshot>()
            .await
            .map_err(|err| PeerError::Malformed {
                peer: peer.to_string(),
                reason: err.to_string(),
            })
    }
}

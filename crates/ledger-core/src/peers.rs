use std::collections::BTreeSet;

use url::Url;

use crate::error::{LedgerError, Result};

/// Reduces a URI-like address to its `host[:port]` authority.
/// A bare `host:port` is read as if it carried an `http://` scheme. A port written in
/// the input is kept even when it is the scheme's default.
pub fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let invalid = || LedgerError::InvalidPeerAddress(address.to_string());
    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    let port = if names_port(&with_scheme) {
        url.port_or_known_default()
    } else {
        url.port()
    };
    Ok(match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

// `Url::port` hides a port equal to the scheme default, so look at the raw authority.
fn names_port(with_scheme: &str) -> bool {
    let rest = with_scheme.split_once("://").map_or("", |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit_once('@').map_or(authority, |(_, a)| a);
    authority
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}

/// Deduplicated set of peer identities, optionally aware of the local node's own address.
#[derive(Clone, Debug, Default)]
pub struct PeerSet {
    local: Option<String>,
    peers: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set that silently ignores the node's own address.
    ///
    /// Matching is on the normalized `host[:port]` text only: an alias such as
    /// `localhost:5000` for `127.0.0.1:5000` is not recognized as self.
    pub fn with_self(local_address: &str) -> Result<Self> {
        Ok(Self {
            local: Some(normalize_address(local_address)?),
            peers: BTreeSet::new(),
        })
    }

    /// Returns `true` if the peer was not already known.
    pub fn insert(&mut self, address: &str) -> Result<bool> {
        let peer = normalize_address(address)?;
        if self.local.as_deref() == Some(peer.as_str()) {
            return Ok(false);
        }
        Ok(self.peers.insert(peer))
    }

    pub fn contains(&self, peer: &str) -> bool {
        self.peers.contains(peer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.peers.iter()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

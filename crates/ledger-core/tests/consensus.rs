mod helpers;

use std::time::{Duration, Instant};

use helpers::{ledger_with_len, Reply, StubPeers};
use ledger_core::{ChainSnapshot, Reconciler};

#[tokio::test]
async fn equal_length_peer_chain_is_not_adopted() {
    let local = ledger_with_len(3);
    let peer = ledger_with_len(3);
    local.add_peer("http://peer-a:5001").unwrap();

    let reconciler = Reconciler::new(StubPeers::default().with_chain("peer-a:5001", peer.chain()));
    let before = local.chain();
    assert!(!reconciler.reconcile(&local).await);
    assert_eq!(local.chain(), before);
}

#[tokio::test]
async fn longer_valid_peer_chain_is_adopted() {
    let local = ledger_with_len(3);
    let peer = ledger_with_len(5);
    local.add_peer("http://peer-a:5001").unwrap();

    let reconciler = Reconciler::new(StubPeers::default().with_chain("peer-a:5001", peer.chain()));
    assert!(reconciler.reconcile(&local).await);
    assert_eq!(local.len(), 5);
    assert_eq!(local.chain(), peer.chain());
    assert!(local.is_chain_valid());
}

#[tokio::test]
async fn longer_invalid_peer_chain_is_rejected() {
    let local = ledger_with_len(3);
    let mut forged = ledger_with_len(5).chain();
    forged[3].transactions.clear();
    local.add_peer("http://peer-a:5001").unwrap();

    let reconciler = Reconciler::new(StubPeers::default().with_chain("peer-a:5001", forged));
    let before = local.chain();
    assert!(!reconciler.reconcile(&local).await);
    assert_eq!(local.chain(), before);
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let local = ledger_with_len(2);
    let peer = ledger_with_len(4);
    local.add_peer("peer-a:5001").unwrap();

    let reconciler = Reconciler::new(StubPeers::default().with_chain("peer-a:5001", peer.chain()));
    assert!(reconciler.reconcile(&local).await);
    let after_first = local.chain();
    assert!(!reconciler.reconcile(&local).await);
    assert_eq!(local.chain(), after_first);
}

#[tokio::test]
async fn longest_of_several_peers_wins() {
    let local = ledger_with_len(2);
    let short = ledger_with_len(4);
    let long = ledger_with_len(6);
    let middle = ledger_with_len(5);
    for peer in ["peer-a:1", "peer-b:1", "peer-c:1"] {
        local.add_peer(peer).unwrap();
    }

    let stub = StubPeers::default()
        .with_chain("peer-a:1", short.chain())
        .with_chain("peer-b:1", long.chain())
        .with_chain("peer-c:1", middle.chain());
    assert!(Reconciler::new(stub).reconcile(&local).await);
    assert_eq!(local.chain(), long.chain());
}

#[tokio::test]
async fn failing_peers_do_not_abort_the_scan() {
    let local = ledger_with_len(2);
    let peer = ledger_with_len(4);
    for p in ["down:1", "good:1", "liar:1", "unknown:1"] {
        local.add_peer(p).unwrap();
    }

    let mut lying = ChainSnapshot::new(ledger_with_len(3).chain());
    lying.length = 50;
    let stub = StubPeers::default()
        .with("down:1", Reply::Fail)
        .with_chain("good:1", peer.chain())
        .with("liar:1", Reply::Chain(lying));
    assert!(Reconciler::new(stub).reconcile(&local).await);
    assert_eq!(local.len(), 4);
}

#[tokio::test]
async fn slow_peer_is_timed_out() {
    let local = ledger_with_len(2);
    let peer = ledger_with_len(3);
    local.add_peer("slow:1").unwrap();
    local.add_peer("fast:1").unwrap();

    let stub = StubPeers::default()
        .with("slow:1", Reply::Hang)
        .with_chain("fast:1", peer.chain());
    let reconciler = Reconciler::new(stub).with_timeout(Duration::from_millis(100));

    let started = Instant::now();
    assert!(reconciler.reconcile(&local).await);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(local.len(), 3);
}

#[tokio::test]
async fn no_peers_means_no_change() {
    let local = ledger_with_len(2);
    assert!(!Reconciler::new(StubPeers::default()).reconcile(&local).await);
    assert_eq!(local.len(), 2);
}

#[tokio::test]
async fn pending_transactions_survive_replacement() {
    let local = ledger_with_len(2);
    local.add_transaction("carol", "dave", 9.0);
    local.add_peer("peer-a:1").unwrap();

    let stub = StubPeers::default().with_chain("peer-a:1", ledger_with_len(4).chain());
    assert!(Reconciler::new(stub).reconcile(&local).await);
    assert_eq!(local.pending_transactions().len(), 1);
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ledger_core::{Block, ChainSnapshot, Ledger, LedgerError, PeerClient, Reconciler};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::constants::CHAIN_PATH;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub reconciler: Arc<Reconciler<Arc<dyn PeerClient>>>,
}

impl AppState {
    pub fn new(ledger: Ledger, reconciler: Reconciler<Arc<dyn PeerClient>>) -> Self {
        Self {
            ledger: Arc::new(ledger),
            reconciler: Arc::new(reconciler),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("mining task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(_) | ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Mined {
    message: &'static str,
    #[serde(flatten)]
    block: Block,
}

#[derive(Serialize)]
struct Validity {
    valid: bool,
    message: &'static str,
}

#[derive(Deserialize)]
struct TxIn {
    sender: Option<String>,
    #[serde(alias = "reciever")]
    receiver: Option<String>,
    amount: Option<f64>,
}

#[derive(Serialize)]
struct TxAccepted {
    message: String,
    index: u64,
}

#[derive(Deserialize)]
struct ConnectIn {
    nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
struct Connected {
    message: &'static str,
    total_nodes: Vec<String>,
    rejected: Vec<String>,
}

#[derive(Serialize)]
struct Reconciled {
    message: &'static str,
    replaced: bool,
    chain: Vec<Block>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/mine_block", get(mine_block))
        .route(CHAIN_PATH, get(get_chain))
        .route("/is_valid", get(is_valid))
        .route("/add_transaction", post(add_transaction))
        .route("/connect_node", post(connect_node))
        .route("/replace_chain", get(replace_chain))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn mine_block(State(state): State<AppState>) -> Result<Json<Mined>, ApiError> {
    let ledger = Arc::clone(&state.ledger);
    let block = tokio::task::spawn_blocking(move || ledger.mine()).await??;
    Ok(Json(Mined {
        message: "New block has been mined.",
        block,
    }))
}

async fn get_chain(State(state): State<AppState>) -> Json<ChainSnapshot> {
    Json(ChainSnapshot::new(state.ledger.chain()))
}

async fn is_valid(State(state): State<AppState>) -> Json<Validity> {
    let valid = state.ledger.is_chain_valid();
    let message = if valid {
        "Blockchain is valid."
    } else {
        "Blockchain is invalid."
    };
    Json(Validity { valid, message })
}

async fn add_transaction(
    State(state): State<AppState>,
    Json(tx): Json<TxIn>,
) -> Result<(StatusCode, Json<TxAccepted>), ApiError> {
    let (Some(sender), Some(receiver), Some(amount)) = (tx.sender, tx.receiver, tx.amount) else {
        return Err(ApiError::BadRequest(
            "Some transaction elements missing.".into(),
        ));
    };
    let index = state.ledger.add_transaction(sender, receiver, amount);
    Ok((
        StatusCode::CREATED,
        Json(TxAccepted {
            message: format!("This transaction will be added to block {index}."),
            index,
        }),
    ))
}

async fn connect_node(
    State(state): State<AppState>,
    Json(body): Json<ConnectIn>,
) -> Result<(StatusCode, Json<Connected>), ApiError> {
    let nodes = body
        .nodes
        .ok_or_else(|| ApiError::BadRequest("No node.".into()))?;
    let mut rejected = Vec::new();
    for node in nodes {
        if let Err(err) = state.ledger.add_peer(&node) {
            warn!(%node, error = %err, "ignoring peer address");
            rejected.push(node);
        }
    }
    Ok((
        StatusCode::CREATED,
        Json(Connected {
            message: "All nodes are connected.",
            total_nodes: state.ledger.peers(),
            rejected,
        }),
    ))
}

async fn replace_chain(State(state): State<AppState>) -> Json<Reconciled> {
    let replaced = state.reconciler.reconcile(&*state.ledger).await;
    info!(replaced, length = state.ledger.len(), "reconciliation finished");
    let message = if replaced {
        "Chain has been replaced by the longest one."
    } else {
        "Chain is already the longest one."
    };
    Json(Reconciled {
        message,
        replaced,
        chain: state.ledger.chain(),
    })
}

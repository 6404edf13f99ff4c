use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "CLI client for the proof-of-work ledger node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:5000)
    #[arg(long, global = true, default_value = "http://127.0.0.1:5000")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a transaction
    Submit {
        /// Sender
        #[arg(long)]
        sender: String,
        /// Receiver
        #[arg(long)]
        receiver: String,
        /// Amount
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
    },
    /// Mine the pending transactions into a new block
    Mine,
    /// Print the node's full chain
    Chain,
    /// Ask the node to validate its own chain
    Validate,
    /// Register peers with the node
    Connect {
        /// Peer address, e.g. http://127.0.0.1:5001 (repeatable)
        #[arg(required = true)]
        nodes: Vec<String>,
    },
    /// Run longest-chain reconciliation on the node
    Reconcile,
}

#[derive(Serialize)]
struct Tx {
    sender: String,
    receiver: String,
    amount: f64,
}

#[derive(Serialize)]
struct Nodes {
    nodes: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let base = cli.node.trim_end_matches('/');
    let client = reqwest::Client::new();
    let req = match cli.cmd {
        Command::Submit {
            sender,
            receiver,
            amount,
        } => client
            .post(format!("{base}/add_transaction"))
            .json(&Tx {
                sender,
                receiver,
                amount,
            }),
        Command::Mine => client.get(format!("{base}/mine_block")),
        Command::Chain => client.get(format!("{base}/get_chain")),
        Command::Validate => client.get(format!("{base}/is_valid")),
        Command::Connect { nodes } => client
            .post(format!("{base}/connect_node"))
            .json(&Nodes { nodes }),
        Command::Reconcile => client.get(format!("{base}/replace_chain")),
    };
    debug!(?req, "sending request");

    let res = req.send().await?;
    let status = res.status();
    let body = res.text().await?;
    println!("status: {}", status);
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{body}"),
    }
    Ok(())
}

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tokio::sync::RwLock;

use advisor::Advisor;
use api_types::user::Welcome;
use engine::Ledger;

use crate::{accounts, analysis, transactions};

#[derive(Clone)]
pub struct ServerState {
    /// One lock around the whole ledger; every financial operation holds the
    /// write guard across its check-then-adjust-then-append sequence.
    pub ledger: Arc<RwLock<Ledger>>,
    /// Absent when no API key was configured at startup.
    pub advisor: Option<Arc<Advisor>>,
}

impl ServerState {
    pub fn new(ledger: Ledger, advisor: Option<Advisor>) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            advisor: advisor.map(Arc::new),
        }
    }
}

async fn root() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the Multi-User Bank API.".to_string(),
    })
}

pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/authenticate", post(accounts::authenticate))
        .route("/create-user", post(accounts::create_user))
        .route("/balance/{username}", get(accounts::balance))
        .route("/users", get(accounts::users))
        .route("/deposit", post(transactions::deposit))
        .route("/withdraw", post(transactions::withdraw))
        .route("/transfer", post(transactions::transfer))
        .route("/transactions/{username}", get(transactions::history))
        .route("/spending-summary/{username}", get(analysis::spending_summary))
        .route("/analyze-transaction", post(analysis::analyze))
        .with_state(state)
}

pub async fn run(state: ServerState) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:8000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

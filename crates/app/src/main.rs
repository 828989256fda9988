mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "minibank={level},server={level},engine={level},advisor={level}",
            level = settings.app.level
        ))
        .init();

    // The advisor key is checked once here so a missing configuration shows
    // up at startup; the API then runs with AI analysis disabled instead of
    // failing financial operations.
    let advisor = match advisor::Advisor::from_env() {
        Ok(advisor) => Some(advisor),
        Err(err) => {
            tracing::warn!("AI analysis disabled: {err}");
            None
        }
    };

    let state = server::ServerState::new(engine::Ledger::new(), advisor);

    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

use rust_forum::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (settings, state) = config::init::init().await?;
    let app = config::routes::config_routes(state);

    let listener = tokio::net::TcpListener::bind(settings.addr.as_str()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

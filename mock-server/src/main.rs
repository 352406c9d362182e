use mock_server::ServerConfig;
use tokio::net::TcpListener;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = ServerConfig::from_env()?;
    let dataset = config.dataset();
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        comments = dataset.comments.len(),
        users = dataset.users.len(),
        unavailable = dataset.unavailable,
        "mock data source listening"
    );
    mock_server::run_with(listener, dataset).await
}

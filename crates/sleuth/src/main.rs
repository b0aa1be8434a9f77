use sleuth::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("SLEUTH_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let server = Server::bind(&addr).await?;
    server.run().await?;
    Ok(())
}

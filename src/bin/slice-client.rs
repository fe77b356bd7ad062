use anyhow::Context;
use slice_rpc::{logging, script, ClientConfig, SliceClient};
use tokio::time::Instant;
use tracing::{error, info};

async fn run(config: &ClientConfig) -> anyhow::Result<()> {
    let deadline = Instant::now() + config.call_timeout;
    let mut client = SliceClient::connect_until(config.server_addr.as_str(), deadline)
        .await
        .with_context(|| format!("connecting to {}", config.server_addr))?;
    info!("connected to {}", config.server_addr);

    script::run(&mut client).await.context("running call script")?;
    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init();

    let config = ClientConfig::default();
    if let Err(e) = run(&config).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

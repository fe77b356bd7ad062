use slice_rpc::{logging, service, Server, ServerConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init();

    let config = ServerConfig::default();
    let mut server = Server::new();
    service::register(&mut server, &config);

    info!("starting slice service on {}", config.listen_addr);
    if let Err(e) = server.serve_tcp(config.listen_addr.as_str()).await {
        error!("server failed: {e}");
        std::process::exit(1);
    }
}

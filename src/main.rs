use clap::Parser;

use claimboard::config::Config;
use claimboard::server::Server;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    let server = Server::new(config.rows, config.cols, config.players);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("failed to bind");

    tracing::info!(
        addr = %config.bind_addr(),
        players = config.players,
        rows = config.rows,
        cols = config.cols,
        "claimboard listening"
    );

    tokio::select! {
        () = server.serve(listener) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutting down");
        }
    }
}

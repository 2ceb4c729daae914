use backoff_breaker_demo::{FlakyState, cli::ServerArgs, logging, router};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = ServerArgs::parse();

    let app = router(Arc::new(FlakyState::new(args.failure_rate)));
    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!(addr = %args.addr, failure_rate = args.failure_rate, "flaky server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

use backoff_breaker::{Breaker, CancellationToken};
use backoff_breaker_demo::{HttpFetch, cli::ClientArgs, logging};
use clap::Parser;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = ClientArgs::parse();

    let fetch = HttpFetch::new(&args.url, args.timeout())?;
    let breaker = Breaker::builder(fetch.url().to_string())
        .failure_threshold(args.threshold)
        .on_open(|name| warn!(circuit = name, "breaker tripped"))
        .on_close(|name| info!(circuit = name, "breaker recovered"))
        .build(fetch);

    let ctx = CancellationToken::new();
    tokio::spawn({
        let ctx = ctx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctx.cancel();
            }
        }
    });

    for i in 0..args.iterations {
        match breaker.call(ctx.child_token()).await {
            Ok(body) => println!("[{}] response: {:?}", i, body),
            Err(e) => println!("[{}] response: {:?}, error: {}", i, "", e),
        }

        tokio::select! {
            _ = ctx.cancelled() => break,
            _ = tokio::time::sleep(args.interval()) => {}
        }
    }

    Ok(())
}

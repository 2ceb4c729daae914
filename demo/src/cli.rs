//! Command-line configuration for the demo binaries

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Poll a flaky endpoint through a circuit breaker
#[derive(Debug, Parser)]
#[command(name = "breaker-client")]
pub struct ClientArgs {
    /// Endpoint to GET on every iteration
    #[arg(short, long, default_value = "http://localhost:8081/hello")]
    pub url: String,

    /// Consecutive failures tolerated before the circuit opens
    #[arg(short, long, default_value_t = 2)]
    pub threshold: u32,

    /// Number of calls to make
    #[arg(short = 'n', long, default_value_t = 30)]
    pub iterations: usize,

    /// Delay between calls in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Per-request HTTP timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,
}

impl ClientArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// HTTP server whose endpoint fails at random
#[derive(Debug, Parser)]
#[command(name = "flaky-server")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8081")]
    pub addr: SocketAddr,

    /// Probability (0.0-1.0) that a request is answered with 500
    #[arg(short, long, default_value_t = 0.5, value_parser = parse_probability)]
    pub failure_rate: f64,
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let p: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{} is not a probability between 0.0 and 1.0", s))
    }
}

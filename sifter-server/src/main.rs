#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use clap::Parser;
use sifter::EngineConfig;
use sifter_http::{serve, ServerConfig};

#[derive(Parser)]
#[command(name = "sifter", version, about = "Search service over Elasticsearch")]
struct Cli {
    #[arg(long, env = "SIFTER_BIND_ADDR", default_value = sifter_http::server::DEFAULT_BIND_ADDR)]
    bind_addr: String,
    /// Required `Authorization` header value; unset leaves the API open.
    #[arg(long, env = "TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Engine node URL; overrides ELASTIC_NODE.
    #[arg(long)]
    node: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut engine = EngineConfig::from_env();
    if let Some(node) = cli.node {
        engine.node = node;
    }

    serve(ServerConfig {
        bind_addr: cli.bind_addr,
        token: cli.token,
        engine,
    })
    .await
}

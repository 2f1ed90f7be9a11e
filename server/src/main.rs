use clap::Parser;
use cryptconv::{telemetry, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    telemetry::init(&config.log);
    cryptconv::run(config).await
}

use clap::Parser;
use editor_bridge_lib::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    editor_bridge_lib::init_tracing();
    editor_bridge_lib::run(Config::parse()).await
}

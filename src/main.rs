use anyhow::Context;
use clap::Parser;
use log::{debug, error};

use tangle_rpc::cli::Cli;
use tangle_rpc::config::{load_configuration, load_node_settings};
use tangle_rpc::http::{Command, NodeClient};
use tangle_rpc::log::init_logging;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging()?;

    let cfg = load_configuration(&cli.config)?;
    let mut settings = load_node_settings(&cfg)?;
    settings.apply_node(&cli.node);

    let endpoint = settings
        .endpoint()
        .with_context(|| format!("Invalid node url: {}", settings.url))?;
    let client = match settings.timeout() {
        Some(timeout) => NodeClient::with_timeout(endpoint, timeout)?,
        None => NodeClient::new(endpoint)?,
    };
    debug!(endpoint = &*client.get_address(); "Node client ready");

    let command = Command::from(cli.command);
    let response = match client.call(&command).await {
        Ok(response) => response,
        Err(e) => {
            error!(error:% = &e; "Command failed");
            return Err(e.into());
        },
    };

    println!("{}", serde_json::to_string_pretty(response.as_map())?);
    Ok(())
}

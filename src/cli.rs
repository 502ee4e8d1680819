use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::http::Command;

#[derive(Parser)]
#[command(name = "tangle-rpc")]
#[command(about = "Command line client for a Tangle node's command API", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Path to the configuration file",
        default_value = "data/config.toml"
    )]
    pub config: PathBuf,
    #[command(flatten)]
    pub node: NodeArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NodeArgs {
    #[arg(short = 'u', long, global = true, help = "Node endpoint, overriding the configuration file")]
    pub node_url: Option<String>,
    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show information about the node
    GetNodeInfo,
    /// List connected neighbors and their activity counters
    GetNeighbors,
    /// Temporarily add neighbors (udp://host:port)
    AddNeighbors {
        #[arg(required = true, help = "Neighbor URIs")]
        uris: Vec<String>,
    },
    /// Temporarily remove neighbors (udp://host:port)
    RemoveNeighbors {
        #[arg(required = true, help = "Neighbor URIs")]
        uris: Vec<String>,
    },
    /// List the hashes of the current tips
    GetTips,
    /// Find transactions by address
    FindTransactions {
        #[arg(required = true, help = "Addresses to search for")]
        addresses: Vec<String>,
    },
    /// Fetch the raw trytes of transactions
    GetTrytes {
        #[arg(required = true, help = "Transaction hashes")]
        hashes: Vec<String>,
    },
    /// Check whether transactions are confirmed by the given tips
    GetInclusionStates {
        #[arg(short, long = "transaction", required = true, help = "Transaction hash. Can be specified multiple times.")]
        transactions: Vec<String>,
        #[arg(short = 'p', long = "tip", required = true, help = "Tip or milestone hash. Can be specified multiple times.")]
        tips: Vec<String>,
    },
    /// Show confirmed balances of addresses
    GetBalances {
        #[arg(required = true, help = "Addresses")]
        addresses: Vec<String>,
        #[arg(long, help = "Confirmation threshold", default_value_t = 100)]
        threshold: u32,
    },
    /// Select a trunk and branch transaction to approve
    GetTransactionsToApprove {
        #[arg(short, long, help = "Milestone depth for tip selection", default_value_t = 3)]
        depth: u32,
    },
    /// Do proof of work on transaction trytes
    AttachToTangle {
        #[arg(long, help = "Trunk transaction hash")]
        trunk_transaction: String,
        #[arg(long, help = "Branch transaction hash")]
        branch_transaction: String,
        #[arg(long, help = "Proof of work difficulty", default_value_t = 18)]
        min_weight_magnitude: u32,
        #[arg(required = true, help = "Transaction trytes")]
        trytes: Vec<String>,
    },
    /// Abort a running proof of work
    InterruptAttachingToTangle,
    /// Send attached transactions to all neighbors
    BroadcastTransactions {
        #[arg(required = true, help = "Attached transaction trytes")]
        trytes: Vec<String>,
    },
    /// Store attached transactions on the node
    StoreTransactions {
        #[arg(required = true, help = "Attached transaction trytes")]
        trytes: Vec<String>,
    },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::GetNodeInfo => Command::GetNodeInfo,
            Commands::GetNeighbors => Command::GetNeighbors,
            Commands::AddNeighbors { uris } => Command::AddNeighbors { uris },
            Commands::RemoveNeighbors { uris } => Command::RemoveNeighbors { uris },
            Commands::GetTips => Command::GetTips,
            Commands::FindTransactions { addresses } => Command::FindTransactions { addresses },
            Commands::GetTrytes { hashes } => Command::GetTrytes { hashes },
            Commands::GetInclusionStates { transactions, tips } => Command::GetInclusionStates { transactions, tips },
            Commands::GetBalances { addresses, threshold } => Command::GetBalances { addresses, threshold },
            Commands::GetTransactionsToApprove { depth } => Command::GetTransactionsToApprove { depth },
            Commands::AttachToTangle {
                trunk_transaction,
                branch_transaction,
                min_weight_magnitude,
                trytes,
            } => Command::AttachToTangle {
                trunk_transaction,
                branch_transaction,
                min_weight_magnitude,
                trytes,
            },
            Commands::InterruptAttachingToTangle => Command::InterruptAttachingToTangle,
            Commands::BroadcastTransactions { trytes } => Command::BroadcastTransactions { trytes },
            Commands::StoreTransactions { trytes } => Command::StoreTransactions { trytes },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_get_balances_arguments() {
        let cli = Cli::try_parse_from(["tangle-rpc", "-u", "http://node:14265", "get-balances", "ADDR1", "ADDR2"]).unwrap();

        assert_eq!(cli.node.node_url.as_deref(), Some("http://node:14265"));
        assert_eq!(
            Command::from(cli.command),
            Command::GetBalances {
                addresses: vec!["ADDR1".to_string(), "ADDR2".to_string()],
                threshold: 100,
            }
        );
    }

    #[test]
    fn test_inclusion_states_take_repeated_flags() {
        let cli = Cli::try_parse_from([
            "tangle-rpc",
            "get-inclusion-states",
            "-t",
            "TX1",
            "-t",
            "TX2",
            "--tip",
            "MILESTONE",
        ])
        .unwrap();

        assert_eq!(
            Command::from(cli.command),
            Command::GetInclusionStates {
                transactions: vec!["TX1".to_string(), "TX2".to_string()],
                tips: vec!["MILESTONE".to_string()],
            }
        );
    }

    #[test]
    fn test_list_commands_require_items() {
        assert!(Cli::try_parse_from(["tangle-rpc", "add-neighbors"]).is_err());
    }
}

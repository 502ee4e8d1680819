//! The closed set of node commands.
//!
//! Every remote operation the node exposes is described here once: its wire
//! name, the parameters it takes (in the order they are written to the request
//! body) and the response fields a successful reply is guaranteed to carry.
//! Nothing in this module performs I/O.

use std::fmt::Display;

use serde_json::Value;

/// Identifies one kind of node command independently of its parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    GetNodeInfo,
    GetNeighbors,
    AddNeighbors,
    RemoveNeighbors,
    GetTips,
    FindTransactions,
    GetTrytes,
    GetInclusionStates,
    GetBalances,
    GetTransactionsToApprove,
    AttachToTangle,
    InterruptAttachingToTangle,
    BroadcastTransactions,
    StoreTransactions,
}

impl CommandKind {
    /// Every command kind, in registry order.
    pub const ALL: [CommandKind; 14] = [
        CommandKind::GetNodeInfo,
        CommandKind::GetNeighbors,
        CommandKind::AddNeighbors,
        CommandKind::RemoveNeighbors,
        CommandKind::GetTips,
        CommandKind::FindTransactions,
        CommandKind::GetTrytes,
        CommandKind::GetInclusionStates,
        CommandKind::GetBalances,
        CommandKind::GetTransactionsToApprove,
        CommandKind::AttachToTangle,
        CommandKind::InterruptAttachingToTangle,
        CommandKind::BroadcastTransactions,
        CommandKind::StoreTransactions,
    ];

    /// The protocol string sent in the `command` key.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::GetNodeInfo => "getNodeInfo",
            CommandKind::GetNeighbors => "getNeighbors",
            CommandKind::AddNeighbors => "addNeighbors",
            CommandKind::RemoveNeighbors => "removeNeighbors",
            CommandKind::GetTips => "getTips",
            CommandKind::FindTransactions => "findTransactions",
            CommandKind::GetTrytes => "getTrytes",
            CommandKind::GetInclusionStates => "getInclusionStates",
            CommandKind::GetBalances => "getBalances",
            CommandKind::GetTransactionsToApprove => "getTransactionsToApprove",
            CommandKind::AttachToTangle => "attachToTangle",
            CommandKind::InterruptAttachingToTangle => "interruptAttachingToTangle",
            CommandKind::BroadcastTransactions => "broadcastTransactions",
            CommandKind::StoreTransactions => "storeTransactions",
        }
    }

    /// Parameter keys in the order they appear in the request body.
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            CommandKind::GetNodeInfo
            | CommandKind::GetNeighbors
            | CommandKind::GetTips
            | CommandKind::InterruptAttachingToTangle => &[],
            CommandKind::AddNeighbors | CommandKind::RemoveNeighbors => &["uris"],
            CommandKind::FindTransactions => &["addresses"],
            CommandKind::GetTrytes => &["hashes"],
            CommandKind::GetInclusionStates => &["transactions", "tips"],
            CommandKind::GetBalances => &["addresses", "threshold"],
            CommandKind::GetTransactionsToApprove => &["depth"],
            CommandKind::AttachToTangle => &[
                "trunkTransaction",
                "branchTransaction",
                "minWeightMagnitude",
                "trytes",
            ],
            CommandKind::BroadcastTransactions | CommandKind::StoreTransactions => &["trytes"],
        }
    }

    /// Fields a successful response to this command carries.
    pub fn response_fields(&self) -> &'static [&'static str] {
        match self {
            CommandKind::GetNodeInfo => &[
                "appName",
                "appVersion",
                "jreAvailableProcessors",
                "jreFreeMemory",
                "jreMaxMemory",
                "jreTotalMemory",
                "latestMilestone",
                "latestMilestoneIndex",
                "latestSolidSubtangleMilestone",
                "latestSolidSubtangleMilestoneIndex",
                "milestoneStartIndex",
                "neighbors",
                "packetsQueueSize",
                "time",
                "tips",
                "transactionsToRequest",
                "coordinatorAddress",
                "features",
                "duration",
            ],
            CommandKind::GetNeighbors => &["neighbors"],
            CommandKind::AddNeighbors => &["addedNeighbors", "duration"],
            CommandKind::RemoveNeighbors => &["removedNeighbors", "duration"],
            CommandKind::GetTips | CommandKind::FindTransactions => &["hashes", "duration"],
            CommandKind::GetTrytes | CommandKind::AttachToTangle => &["trytes"],
            CommandKind::GetInclusionStates => &["states", "duration"],
            CommandKind::GetBalances => &["balances", "references", "milestoneIndex", "duration"],
            CommandKind::GetTransactionsToApprove => &["trunkTransaction", "branchTransaction", "duration"],
            CommandKind::InterruptAttachingToTangle => &[],
            CommandKind::BroadcastTransactions | CommandKind::StoreTransactions => &["duration"],
        }
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A node command together with its parameter values.
///
/// Each variant carries exactly the parameters its command accepts, so a
/// command with a missing or an extra parameter cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GetNodeInfo,
    GetNeighbors,
    AddNeighbors {
        uris: Vec<String>,
    },
    RemoveNeighbors {
        uris: Vec<String>,
    },
    GetTips,
    /// Only lookup by address is supported.
    FindTransactions {
        addresses: Vec<String>,
    },
    GetTrytes {
        hashes: Vec<String>,
    },
    GetInclusionStates {
        transactions: Vec<String>,
        tips: Vec<String>,
    },
    GetBalances {
        addresses: Vec<String>,
        threshold: u32,
    },
    GetTransactionsToApprove {
        depth: u32,
    },
    /// The node rejects a `min_weight_magnitude` below its configured minimum;
    /// the client forwards whatever it is given.
    AttachToTangle {
        trunk_transaction: String,
        branch_transaction: String,
        min_weight_magnitude: u32,
        trytes: Vec<String>,
    },
    InterruptAttachingToTangle,
    BroadcastTransactions {
        trytes: Vec<String>,
    },
    StoreTransactions {
        trytes: Vec<String>,
    },
}

/// A borrowed parameter value as it is carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter<'a> {
    /// Encoded as a JSON array with one string element per item.
    List(&'a [String]),
    Text(&'a str),
    Integer(u32),
}

impl Parameter<'_> {
    pub fn to_value(&self) -> Value {
        match self {
            Parameter::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Parameter::Text(text) => Value::String((*text).to_string()),
            Parameter::Integer(number) => Value::from(*number),
        }
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::GetNodeInfo => CommandKind::GetNodeInfo,
            Command::GetNeighbors => CommandKind::GetNeighbors,
            Command::AddNeighbors { .. } => CommandKind::AddNeighbors,
            Command::RemoveNeighbors { .. } => CommandKind::RemoveNeighbors,
            Command::GetTips => CommandKind::GetTips,
            Command::FindTransactions { .. } => CommandKind::FindTransactions,
            Command::GetTrytes { .. } => CommandKind::GetTrytes,
            Command::GetInclusionStates { .. } => CommandKind::GetInclusionStates,
            Command::GetBalances { .. } => CommandKind::GetBalances,
            Command::GetTransactionsToApprove { .. } => CommandKind::GetTransactionsToApprove,
            Command::AttachToTangle { .. } => CommandKind::AttachToTangle,
            Command::InterruptAttachingToTangle => CommandKind::InterruptAttachingToTangle,
            Command::BroadcastTransactions { .. } => CommandKind::BroadcastTransactions,
            Command::StoreTransactions { .. } => CommandKind::StoreTransactions,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Parameters paired with their wire keys, in declared order.
    pub fn parameters(&self) -> Vec<(&'static str, Parameter<'_>)> {
        match self {
            Command::GetNodeInfo | Command::GetNeighbors | Command::GetTips | Command::InterruptAttachingToTangle => {
                Vec::new()
            },
            Command::AddNeighbors { uris } | Command::RemoveNeighbors { uris } => vec![("uris", Parameter::List(uris))],
            Command::FindTransactions { addresses } => vec![("addresses", Parameter::List(addresses))],
            Command::GetTrytes { hashes } => vec![("hashes", Parameter::List(hashes))],
            Command::GetInclusionStates { transactions, tips } => vec![
                ("transactions", Parameter::List(transactions)),
                ("tips", Parameter::List(tips)),
            ],
            Command::GetBalances { addresses, threshold } => vec![
                ("addresses", Parameter::List(addresses)),
                ("threshold", Parameter::Integer(*threshold)),
            ],
            Command::GetTransactionsToApprove { depth } => vec![("depth", Parameter::Integer(*depth))],
            Command::AttachToTangle {
                trunk_transaction,
                branch_transaction,
                min_weight_magnitude,
                trytes,
            } => vec![
                ("trunkTransaction", Parameter::Text(trunk_transaction)),
                ("branchTransaction", Parameter::Text(branch_transaction)),
                ("minWeightMagnitude", Parameter::Integer(*min_weight_magnitude)),
                ("trytes", Parameter::List(trytes)),
            ],
            Command::BroadcastTransactions { trytes } | Command::StoreTransactions { trytes } => {
                vec![("trytes", Parameter::List(trytes))]
            },
        }
    }
}

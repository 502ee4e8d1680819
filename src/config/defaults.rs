use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::cli::NodeArgs;

/// Connection settings for the node, read from the `[node]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeSettings {
    pub url: String,
    /// No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:14265".to_string(),
            timeout_secs: None,
        }
    }
}

impl NodeSettings {
    /// The config file key holding these settings.
    pub fn main_key_prefix() -> &'static str {
        "node"
    }

    /// Applies command line overrides on top of file and environment values.
    pub fn apply_node(&mut self, args: &NodeArgs) {
        if let Some(url) = &args.node_url {
            self.url = url.clone();
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.timeout_secs = Some(timeout_secs);
        }
    }

    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

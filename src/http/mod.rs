//! HTTP client module for the node command API.
//!
//! This module provides everything needed to call a node: a closed registry
//! of commands, a request encoder, a pluggable transport, a response decoder
//! and one typed response per command, composed by [`NodeClient`].
//!
//! # Architecture
//!
//! - [`Command`] / [`CommandKind`] - the command registry
//! - [`encode_request`] - command to canonical JSON body
//! - [`Transport`] / [`HttpTransport`] - a single POST to the node
//! - [`RawResponse`] - syntactic JSON decoding and field access
//! - Typed responses ([`NodeInfoResponse`], [`TipsResponse`], [`BalancesResponse`], ...)
//! - [`NodeClient`] - one method per command
//!
//! # Example
//!
//! ```rust,no_run
//! use url::Url;
//! use tangle_rpc::http::NodeClient;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let client = NodeClient::new(Url::parse("http://localhost:14265")?)?;
//!
//! let balances = client.get_balances(["ADDRESS9"], 100).await?;
//! println!("balance {:?} at milestone {}", balances.balances(), balances.milestone_index());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Every [`NodeClient`] method returns [`NodeError`], which tells apart:
//!
//! - Network failures and non-success statuses
//! - Bodies that are not JSON objects
//! - Errors reported by the node itself
//! - Responses missing a field, or holding one of the wrong type

mod command;
mod encoder;
mod error;
mod http_client;
mod node_client;
mod response;
mod types;

pub use command::{Command, CommandKind, Parameter};
pub use encoder::{COMMAND_KEY, encode_request, request_object};
pub use error::{NodeError, TransportError};
pub use http_client::{API_VERSION, API_VERSION_HEADER, HttpTransport, REQUEST_HEADERS, Transport};
pub use node_client::NodeClient;
pub use response::{RawResponse, ViewError};
pub use types::{
    AddNeighborsResponse, AttachToTangleResponse, BalancesResponse, BroadcastTransactionsResponse, CommandResponse,
    FindTransactionsResponse, InclusionStatesResponse, InterruptAttachingResponse, Neighbor, NeighborsResponse,
    NodeInfoResponse, RemoveNeighborsResponse, StoreTransactionsResponse, TipsResponse,
    TransactionsToApproveResponse, TrytesResponse,
};

//! High-level client for the node command API.
//!
//! This module provides the [`NodeClient`] struct, the single entry point for
//! calling a node. Each method builds one [`Command`], sends it through the
//! client's [`Transport`] and returns the matching typed response.
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
//! let info = client.get_node_info().await?;
//! println!("{} {} at milestone {}", info.app_name(), info.app_version(), info.latest_milestone_index());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::{debug, info, warn};
use url::Url;

use super::command::Command;
use super::encoder::encode_request;
use super::error::{NodeError, TransportError};
use super::http_client::{HttpTransport, REQUEST_HEADERS, Transport};
use super::response::RawResponse;
use super::types::{
    AddNeighborsResponse, AttachToTangleResponse, BalancesResponse, BroadcastTransactionsResponse, CommandResponse,
    FindTransactionsResponse, InclusionStatesResponse, InterruptAttachingResponse, NeighborsResponse,
    NodeInfoResponse, RemoveNeighborsResponse, StoreTransactionsResponse, TipsResponse,
    TransactionsToApproveResponse, TrytesResponse,
};
use crate::log::mask_string;

/// Client for one node endpoint.
///
/// The endpoint is fixed at construction and the client holds no other state,
/// so one instance can serve any number of calls, including concurrent ones.
/// Every call performs exactly one request; nothing is retried or cached.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use url::Url;
/// use tangle_rpc::http::NodeClient;
///
/// # async fn example() -> Result<(), anyhow::Error> {
/// let client = NodeClient::with_timeout(Url::parse("http://localhost:14265")?, Duration::from_secs(120))?;
///
/// let tips = client.get_transactions_to_approve(3).await?;
/// println!("trunk {} branch {}", tips.trunk_transaction(), tips.branch_transaction());
/// # Ok(())
/// # }
/// ```
pub struct NodeClient<T = HttpTransport> {
    endpoint: Url,
    transport: T,
}

impl NodeClient<HttpTransport> {
    /// Creates a client over HTTP. Requests never time out on the client side.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized (e.g. TLS
    /// backend initialization failure).
    pub fn new(endpoint: Url) -> Result<Self, TransportError> {
        Ok(Self::with_transport(endpoint, HttpTransport::new()?))
    }

    /// Creates a client over HTTP with a custom request timeout.
    ///
    /// Proof-of-work through `attachToTangle` can take far longer than other
    /// commands; size the timeout for the slowest command you intend to call.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self::with_transport(endpoint, HttpTransport::with_timeout(timeout)?))
    }
}

impl<T: Transport> NodeClient<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(endpoint: Url, transport: T) -> Self {
        Self { endpoint, transport }
    }

    /// Returns the node address as a string, for logging and display.
    pub fn get_address(&self) -> String {
        self.endpoint.to_string()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `command` and returns the decoded response.
    ///
    /// Performs the whole round trip except building a typed view:
    /// encode, send once, decode, and classify node-reported errors.
    ///
    /// # Errors
    ///
    /// - [`NodeError::Transport`] if the node is unreachable or answers with a
    ///   non-success status whose body is not a node error
    /// - [`NodeError::Decode`] if the body is not a JSON object
    /// - [`NodeError::RemoteCommand`] if the body carries `error` or `exception`
    pub async fn call(&self, command: &Command) -> Result<RawResponse, NodeError> {
        let name = command.name();
        let body = encode_request(command).map_err(|source| NodeError::Encode {
            command: name,
            endpoint: self.get_address(),
            source,
        })?;

        debug!(command = name, bytes = body.len(); "HTTP: Sending node command");

        let bytes = match self.transport.send(&self.endpoint, &REQUEST_HEADERS, body).await {
            Ok(bytes) => bytes,
            // The node reports bad requests with a 4xx status and an error body.
            Err(TransportError::ServerError { status, body }) => match RawResponse::decode(body.as_bytes()) {
                Ok(response) if response.error_message().is_some() => {
                    debug!(command = name, status = status.as_u16(); "HTTP: Node rejected command");
                    body.into_bytes()
                },
                _ => {
                    return Err(self.transport_error(name, TransportError::ServerError { status, body }));
                },
            },
            Err(source) => return Err(self.transport_error(name, source)),
        };

        let response = RawResponse::decode(&bytes).map_err(|source| NodeError::Decode {
            command: name,
            endpoint: self.get_address(),
            source,
        })?;

        if let Some(message) = response.error_message() {
            warn!(command = name, reason = &*message; "HTTP: Node reported an error");
            return Err(NodeError::RemoteCommand {
                command: name,
                endpoint: self.get_address(),
                message,
            });
        }

        Ok(response)
    }

    async fn dispatch<V: CommandResponse>(&self, command: Command) -> Result<V, NodeError> {
        debug_assert_eq!(command.kind(), V::KIND);
        let response = self.call(&command).await?;
        V::from_response(response).map_err(|e| NodeError::from_view(command.name(), self.get_address(), e))
    }

    fn transport_error(&self, command: &'static str, source: TransportError) -> NodeError {
        warn!(command = command, error:% = &source; "HTTP: Node request failed");
        NodeError::Transport {
            command,
            endpoint: self.get_address(),
            source,
        }
    }

    /// Checks whether the node answers `getNodeInfo` successfully.
    pub async fn is_online(&self) -> bool {
        match self.get_node_info().await {
            Ok(_) => {
                debug!("Node is online");
                true
            },
            Err(e) => {
                warn!(
                    error:? = e;
                    "Node is offline"
                );
                false
            },
        }
    }

    /// Returns information about the node: software, memory, milestones and
    /// neighbor counts.
    pub async fn get_node_info(&self) -> Result<NodeInfoResponse, NodeError> {
        self.dispatch(Command::GetNodeInfo).await
    }

    /// Returns the connected neighbors and their activity counters.
    pub async fn get_neighbors(&self) -> Result<NeighborsResponse, NodeError> {
        self.dispatch(Command::GetNeighbors).await
    }

    /// Temporarily adds neighbors, given as `udp://host:port` URIs.
    ///
    /// Added neighbors are dropped when the node restarts.
    pub async fn add_neighbors<I, S>(&self, uris: I) -> Result<AddNeighborsResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(Command::AddNeighbors { uris: owned(uris) }).await
    }

    /// Temporarily removes neighbors, given as `udp://host:port` URIs.
    pub async fn remove_neighbors<I, S>(&self, uris: I) -> Result<RemoveNeighborsResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(Command::RemoveNeighbors { uris: owned(uris) }).await
    }

    /// Returns the hashes of the node's current tips.
    pub async fn get_tips(&self) -> Result<TipsResponse, NodeError> {
        self.dispatch(Command::GetTips).await
    }

    /// Finds the hashes of transactions touching any of `addresses`.
    pub async fn find_transactions<I, S>(&self, addresses: I) -> Result<FindTransactionsResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let addresses = owned(addresses);
        if let Some(first) = addresses.first() {
            debug!(first = &*mask_string(first), count = addresses.len(); "HTTP: Finding transactions");
        }
        self.dispatch(Command::FindTransactions { addresses }).await
    }

    /// Returns the raw trytes of the transactions with the given hashes.
    pub async fn get_trytes<I, S>(&self, hashes: I) -> Result<TrytesResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(Command::GetTrytes { hashes: owned(hashes) }).await
    }

    /// Returns whether each of `transactions` is confirmed by any of `tips`.
    pub async fn get_inclusion_states<I, S, J, U>(
        &self,
        transactions: I,
        tips: J,
    ) -> Result<InclusionStatesResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = U>,
        U: Into<String>,
    {
        self.dispatch(Command::GetInclusionStates {
            transactions: owned(transactions),
            tips: owned(tips),
        })
        .await
    }

    /// Returns the confirmed balances of `addresses` at the latest milestone.
    ///
    /// `threshold` is the confirmation threshold; the node expects `100`.
    pub async fn get_balances<I, S>(&self, addresses: I, threshold: u32) -> Result<BalancesResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let addresses = owned(addresses);
        if let Some(first) = addresses.first() {
            debug!(first = &*mask_string(first), count = addresses.len(); "HTTP: Requesting balances");
        }
        self.dispatch(Command::GetBalances { addresses, threshold }).await
    }

    /// Runs tip selection and returns a trunk and branch transaction to approve.
    ///
    /// `depth` is how many milestones back the random walk starts.
    pub async fn get_transactions_to_approve(&self, depth: u32) -> Result<TransactionsToApproveResponse, NodeError> {
        self.dispatch(Command::GetTransactionsToApprove { depth }).await
    }

    /// Performs proof of work on `trytes`, referencing the given trunk and branch.
    ///
    /// The node rejects a `min_weight_magnitude` below its minimum (18 on
    /// mainnet) with a [`NodeError::RemoteCommand`].
    pub async fn attach_to_tangle<I, S>(
        &self,
        trunk_transaction: impl Into<String>,
        branch_transaction: impl Into<String>,
        min_weight_magnitude: u32,
        trytes: I,
    ) -> Result<AttachToTangleResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = Command::AttachToTangle {
            trunk_transaction: trunk_transaction.into(),
            branch_transaction: branch_transaction.into(),
            min_weight_magnitude,
            trytes: owned(trytes),
        };
        info!(target: "audit", min_weight_magnitude = min_weight_magnitude; "HTTP: Attaching transactions");
        self.dispatch(command).await
    }

    /// Aborts a running `attachToTangle`.
    pub async fn interrupt_attaching_to_tangle(&self) -> Result<InterruptAttachingResponse, NodeError> {
        self.dispatch(Command::InterruptAttachingToTangle).await
    }

    /// Sends attached transactions to all neighbors.
    pub async fn broadcast_transactions<I, S>(&self, trytes: I) -> Result<BroadcastTransactionsResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let trytes = owned(trytes);
        info!(target: "audit", count = trytes.len(); "HTTP: Broadcasting transactions");
        self.dispatch(Command::BroadcastTransactions { trytes }).await
    }

    /// Stores attached transactions in the node's local storage.
    pub async fn store_transactions<I, S>(&self, trytes: I) -> Result<StoreTransactionsResponse, NodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let trytes = owned(trytes);
        info!(target: "audit", count = trytes.len(); "HTTP: Storing transactions");
        self.dispatch(Command::StoreTransactions { trytes }).await
    }
}

fn owned<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

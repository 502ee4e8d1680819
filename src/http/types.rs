// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Typed views over node responses, one per command.
//!
//! A view is built from a [`RawResponse`] only when the response carries
//! every field its command guarantees; it then exposes exactly those fields.
//! The full JSON object stays available through
//! [`CommandResponse::json_response`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::command::CommandKind;
use super::response::{RawResponse, ViewError};

/// A typed projection of the response to one [`CommandKind`].
pub trait CommandResponse: Sized {
    const KIND: CommandKind;

    /// Reads the command's fields from a response that is not an error body.
    fn from_fields(response: RawResponse) -> Result<Self, ViewError>;

    fn raw_response(&self) -> &RawResponse;

    /// Builds the view, reporting a node error body before any missing field.
    fn from_response(response: RawResponse) -> Result<Self, ViewError> {
        if let Some(message) = response.error_message() {
            return Err(ViewError::Remote(message));
        }
        Self::from_fields(response)
    }

    /// The complete JSON object the node returned.
    fn json_response(&self) -> &Map<String, Value> {
        self.raw_response().as_map()
    }
}

/// Response to `getNodeInfo`.
#[derive(Debug, Clone)]
pub struct NodeInfoResponse {
    app_name: String,
    app_version: String,
    jre_available_processors: u64,
    jre_free_memory: u64,
    jre_max_memory: u64,
    jre_total_memory: u64,
    latest_milestone: String,
    latest_milestone_index: u64,
    latest_solid_subtangle_milestone: String,
    latest_solid_subtangle_milestone_index: u64,
    milestone_start_index: u64,
    neighbors: u64,
    packets_queue_size: u64,
    time: u64,
    tips: u64,
    transactions_to_request: u64,
    coordinator_address: String,
    features: Vec<String>,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for NodeInfoResponse {
    const KIND: CommandKind = CommandKind::GetNodeInfo;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            app_name: response.required("appName")?,
            app_version: response.required("appVersion")?,
            jre_available_processors: response.required("jreAvailableProcessors")?,
            jre_free_memory: response.required("jreFreeMemory")?,
            jre_max_memory: response.required("jreMaxMemory")?,
            jre_total_memory: response.required("jreTotalMemory")?,
            latest_milestone: response.required("latestMilestone")?,
            latest_milestone_index: response.required("latestMilestoneIndex")?,
            latest_solid_subtangle_milestone: response.required("latestSolidSubtangleMilestone")?,
            latest_solid_subtangle_milestone_index: response.required("latestSolidSubtangleMilestoneIndex")?,
            milestone_start_index: response.required("milestoneStartIndex")?,
            neighbors: response.required("neighbors")?,
            packets_queue_size: response.required("packetsQueueSize")?,
            time: response.required("time")?,
            tips: response.required("tips")?,
            transactions_to_request: response.required("transactionsToRequest")?,
            coordinator_address: response.required("coordinatorAddress")?,
            features: response.required("features")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl NodeInfoResponse {
    /// Name of the node software (e.g. `IRI`).
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    pub fn jre_available_processors(&self) -> u64 {
        self.jre_available_processors
    }

    pub fn jre_free_memory(&self) -> u64 {
        self.jre_free_memory
    }

    pub fn jre_max_memory(&self) -> u64 {
        self.jre_max_memory
    }

    pub fn jre_total_memory(&self) -> u64 {
        self.jre_total_memory
    }

    /// Latest milestone signed off by the coordinator.
    pub fn latest_milestone(&self) -> &str {
        &self.latest_milestone
    }

    pub fn latest_milestone_index(&self) -> u64 {
        self.latest_milestone_index
    }

    /// Latest milestone whose whole subtangle the node holds.
    pub fn latest_solid_subtangle_milestone(&self) -> &str {
        &self.latest_solid_subtangle_milestone
    }

    pub fn latest_solid_subtangle_milestone_index(&self) -> u64 {
        self.latest_solid_subtangle_milestone_index
    }

    pub fn milestone_start_index(&self) -> u64 {
        self.milestone_start_index
    }

    /// Number of directly connected neighbors.
    pub fn neighbors(&self) -> u64 {
        self.neighbors
    }

    pub fn packets_queue_size(&self) -> u64 {
        self.packets_queue_size
    }

    /// Node clock as a UNIX timestamp in milliseconds.
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn tips(&self) -> u64 {
        self.tips
    }

    pub fn transactions_to_request(&self) -> u64 {
        self.transactions_to_request
    }

    pub fn coordinator_address(&self) -> &str {
        &self.coordinator_address
    }

    /// Optional node features that are enabled.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// One connected peer and its activity counters.
///
/// The counters reset when the node restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighbor {
    pub address: String,
    /// Every transaction received from this peer: valid, invalid and already seen.
    pub number_of_all_transactions: u64,
    pub number_of_invalid_transactions: u64,
    pub number_of_new_transactions: u64,
}

/// Response to `getNeighbors`.
#[derive(Debug, Clone)]
pub struct NeighborsResponse {
    neighbors: Vec<Neighbor>,
    response: RawResponse,
}

impl CommandResponse for NeighborsResponse {
    const KIND: CommandKind = CommandKind::GetNeighbors;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            neighbors: response.required("neighbors")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl NeighborsResponse {
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }
}

/// Response to `addNeighbors`.
#[derive(Debug, Clone)]
pub struct AddNeighborsResponse {
    added_neighbors: u64,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for AddNeighborsResponse {
    const KIND: CommandKind = CommandKind::AddNeighbors;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            added_neighbors: response.required("addedNeighbors")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl AddNeighborsResponse {
    /// How many of the given URIs were added. Additions last until the node restarts.
    pub fn added_neighbors(&self) -> u64 {
        self.added_neighbors
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Response to `removeNeighbors`.
#[derive(Debug, Clone)]
pub struct RemoveNeighborsResponse {
    removed_neighbors: u64,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for RemoveNeighborsResponse {
    const KIND: CommandKind = CommandKind::RemoveNeighbors;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            removed_neighbors: response.required("removedNeighbors")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl RemoveNeighborsResponse {
    pub fn removed_neighbors(&self) -> u64 {
        self.removed_neighbors
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Response to `getTips`.
#[derive(Debug, Clone)]
pub struct TipsResponse {
    hashes: Vec<String>,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for TipsResponse {
    const KIND: CommandKind = CommandKind::GetTips;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            hashes: response.required("hashes")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl TipsResponse {
    pub fn hashes(&self) -> &[String] {
        &self.hashes
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Response to `findTransactions`.
#[derive(Debug, Clone)]
pub struct FindTransactionsResponse {
    hashes: Vec<String>,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for FindTransactionsResponse {
    const KIND: CommandKind = CommandKind::FindTransactions;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            hashes: response.required("hashes")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl FindTransactionsResponse {
    /// Hashes of the transactions touching the queried addresses.
    pub fn hashes(&self) -> &[String] {
        &self.hashes
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Response to `getTrytes`.
#[derive(Debug, Clone)]
pub struct TrytesResponse {
    trytes: Vec<String>,
    response: RawResponse,
}

impl CommandResponse for TrytesResponse {
    const KIND: CommandKind = CommandKind::GetTrytes;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            trytes: response.required("trytes")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl TrytesResponse {
    /// Raw transaction data, in the order the hashes were requested.
    pub fn trytes(&self) -> &[String] {
        &self.trytes
    }
}

/// Response to `getInclusionStates`.
#[derive(Debug, Clone)]
pub struct InclusionStatesResponse {
    states: Vec<bool>,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for InclusionStatesResponse {
    const KIND: CommandKind = CommandKind::GetInclusionStates;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            states: response.required("states")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl InclusionStatesResponse {
    /// One flag per queried transaction, in request order: `true` when confirmed.
    pub fn states(&self) -> &[bool] {
        &self.states
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// A balance as the node encodes it: a JSON number or a decimal string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireBalance {
    Number(u64),
    Text(String),
}

/// Response to `getBalances`.
#[derive(Debug, Clone)]
pub struct BalancesResponse {
    balances: Vec<u64>,
    references: Vec<String>,
    milestone_index: u64,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for BalancesResponse {
    const KIND: CommandKind = CommandKind::GetBalances;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        let balances = response
            .required::<Vec<WireBalance>>("balances")?
            .into_iter()
            .map(|balance| match balance {
                WireBalance::Number(value) => Ok(value),
                WireBalance::Text(text) => text.parse().map_err(|_| ViewError::UnexpectedFieldType {
                    field: "balances",
                    reason: format!("`{text}` is not a balance"),
                }),
            })
            .collect::<Result<Vec<u64>, ViewError>>()?;

        Ok(Self {
            balances,
            references: response.required("references")?,
            milestone_index: response.required("milestoneIndex")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl BalancesResponse {
    /// Confirmed balances, in the same order as the requested addresses.
    pub fn balances(&self) -> &[u64] {
        &self.balances
    }

    /// Tips the balances were computed against.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn milestone_index(&self) -> u64 {
        self.milestone_index
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Response to `getTransactionsToApprove`.
#[derive(Debug, Clone)]
pub struct TransactionsToApproveResponse {
    trunk_transaction: String,
    branch_transaction: String,
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for TransactionsToApproveResponse {
    const KIND: CommandKind = CommandKind::GetTransactionsToApprove;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            trunk_transaction: response.required("trunkTransaction")?,
            branch_transaction: response.required("branchTransaction")?,
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl TransactionsToApproveResponse {
    pub fn trunk_transaction(&self) -> &str {
        &self.trunk_transaction
    }

    pub fn branch_transaction(&self) -> &str {
        &self.branch_transaction
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Response to `attachToTangle`.
#[derive(Debug, Clone)]
pub struct AttachToTangleResponse {
    trytes: Vec<String>,
    response: RawResponse,
}

impl CommandResponse for AttachToTangleResponse {
    const KIND: CommandKind = CommandKind::AttachToTangle;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            trytes: response.required("trytes")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl AttachToTangleResponse {
    /// Trytes with trunk, branch and nonce filled in, ready for
    /// `broadcastTransactions` and `storeTransactions`.
    pub fn trytes(&self) -> &[String] {
        &self.trytes
    }
}

/// Response to `interruptAttachingToTangle`. Carries no fields.
#[derive(Debug, Clone)]
pub struct InterruptAttachingResponse {
    response: RawResponse,
}

impl CommandResponse for InterruptAttachingResponse {
    const KIND: CommandKind = CommandKind::InterruptAttachingToTangle;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self { response })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

/// Response to `broadcastTransactions`.
#[derive(Debug, Clone)]
pub struct BroadcastTransactionsResponse {
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for BroadcastTransactionsResponse {
    const KIND: CommandKind = CommandKind::BroadcastTransactions;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl BroadcastTransactionsResponse {
    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Response to `storeTransactions`.
#[derive(Debug, Clone)]
pub struct StoreTransactionsResponse {
    duration: u64,
    response: RawResponse,
}

impl CommandResponse for StoreTransactionsResponse {
    const KIND: CommandKind = CommandKind::StoreTransactions;

    fn from_fields(response: RawResponse) -> Result<Self, ViewError> {
        Ok(Self {
            duration: response.required("duration")?,
            response,
        })
    }

    fn raw_response(&self) -> &RawResponse {
        &self.response
    }
}

impl StoreTransactionsResponse {
    pub fn duration(&self) -> u64 {
        self.duration
    }
}

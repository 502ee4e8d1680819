use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tangle_rpc::http::{
    CommandKind, CommandResponse, NodeClient, NodeError, Transport, TransportError,
};
use url::Url;

const NODE_URL: &str = "http://node.test:14265/";

#[derive(Debug, Clone)]
struct SentRequest {
    url: Url,
    headers: Vec<(String, String)>,
    body: Value,
}

/// Answers every request with the same body and records what was sent.
struct FixtureTransport {
    reply: Vec<u8>,
    sent: Arc<Mutex<Vec<SentRequest>>>,
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn send(&self, url: &Url, headers: &[(&str, &str)], body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            url: url.clone(),
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: serde_json::from_slice(&body).unwrap(),
        });
        Ok(self.reply.clone())
    }
}

struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _: &Url, _: &[(&str, &str)], _: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::Other("connection reset".to_string()))
    }
}

fn client_with_bytes(reply: &[u8]) -> (NodeClient<FixtureTransport>, Arc<Mutex<Vec<SentRequest>>>) {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let transport = FixtureTransport {
        reply: reply.to_vec(),
        sent: sent.clone(),
    };
    (NodeClient::with_transport(Url::parse(NODE_URL).unwrap(), transport), sent)
}

fn client_with(reply: Value) -> (NodeClient<FixtureTransport>, Arc<Mutex<Vec<SentRequest>>>) {
    client_with_bytes(reply.to_string().as_bytes())
}

fn last_body(sent: &Arc<Mutex<Vec<SentRequest>>>) -> Value {
    sent.lock().unwrap().last().unwrap().body.clone()
}

/// Calls every facade method once and keeps only the outcome.
async fn run_every_command<T: Transport>(client: &NodeClient<T>) -> Vec<(CommandKind, Result<(), NodeError>)> {
    vec![
        (CommandKind::GetNodeInfo, client.get_node_info().await.map(drop)),
        (CommandKind::GetNeighbors, client.get_neighbors().await.map(drop)),
        (
            CommandKind::AddNeighbors,
            client.add_neighbors(["udp://1.2.3.4:14600"]).await.map(drop),
        ),
        (
            CommandKind::RemoveNeighbors,
            client.remove_neighbors(["udp://1.2.3.4:14600"]).await.map(drop),
        ),
        (CommandKind::GetTips, client.get_tips().await.map(drop)),
        (
            CommandKind::FindTransactions,
            client.find_transactions(["ADDR1"]).await.map(drop),
        ),
        (CommandKind::GetTrytes, client.get_trytes(["HASH1"]).await.map(drop)),
        (
            CommandKind::GetInclusionStates,
            client.get_inclusion_states(["TX1"], ["TIP1"]).await.map(drop),
        ),
        (CommandKind::GetBalances, client.get_balances(["ADDR1"], 100).await.map(drop)),
        (
            CommandKind::GetTransactionsToApprove,
            client.get_transactions_to_approve(3).await.map(drop),
        ),
        (
            CommandKind::AttachToTangle,
            client.attach_to_tangle("TRUNK", "BRANCH", 18, ["TRYTES"]).await.map(drop),
        ),
        (
            CommandKind::InterruptAttachingToTangle,
            client.interrupt_attaching_to_tangle().await.map(drop),
        ),
        (
            CommandKind::BroadcastTransactions,
            client.broadcast_transactions(["TRYTES"]).await.map(drop),
        ),
        (
            CommandKind::StoreTransactions,
            client.store_transactions(["TRYTES"]).await.map(drop),
        ),
    ]
}

#[tokio::test]
async fn test_every_command_is_covered() {
    let (client, sent) = client_with(json!({}));
    let outcomes = run_every_command(&client).await;

    let kinds: Vec<_> = outcomes.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds, CommandKind::ALL);

    let names: Vec<String> = sent
        .lock()
        .unwrap()
        .iter()
        .map(|request| request.body["command"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<&str> = CommandKind::ALL.iter().map(|kind| kind.name()).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_requests_carry_protocol_headers_and_endpoint() {
    let (client, sent) = client_with(json!({"hashes": [], "duration": 0}));
    client.get_tips().await.unwrap();

    let request = sent.lock().unwrap()[0].clone();
    assert_eq!(request.url.as_str(), NODE_URL);
    assert!(request.headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
    assert!(request.headers.contains(&("X-IOTA-API-Version".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_error_body_is_remote_for_every_command() {
    let (client, _) = client_with(json!({"error": "Command failed on node"}));

    for (kind, outcome) in run_every_command(&client).await {
        match outcome {
            Err(NodeError::RemoteCommand { command, message, .. }) => {
                assert_eq!(command, kind.name());
                assert_eq!(message, "Command failed on node");
            },
            other => panic!("{kind}: expected RemoteCommand, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_exception_body_is_remote_for_every_command() {
    let (client, _) = client_with(json!({"exception": "java.lang.NullPointerException"}));

    for (kind, outcome) in run_every_command(&client).await {
        assert!(
            matches!(outcome, Err(NodeError::RemoteCommand { .. })),
            "{kind}: {outcome:?}"
        );
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error_for_every_command() {
    let (client, _) = client_with_bytes(b"<html><body>502 Bad Gateway</body></html>");

    for (kind, outcome) in run_every_command(&client).await {
        match outcome {
            Err(err @ NodeError::Decode { .. }) => {
                assert_eq!(err.command(), kind.name());
                assert_eq!(err.endpoint(), NODE_URL);
            },
            other => panic!("{kind}: expected Decode, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_empty_success_body_is_missing_field_except_interrupt() {
    let (client, _) = client_with(json!({}));

    for (kind, outcome) in run_every_command(&client).await {
        if kind == CommandKind::InterruptAttachingToTangle {
            assert!(outcome.is_ok());
            continue;
        }
        match outcome {
            Err(NodeError::MissingField { field, .. }) => {
                assert!(kind.response_fields().contains(&field), "{kind}: {field}");
            },
            other => panic!("{kind}: expected MissingField, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_transport_failure_is_reported_for_every_command() {
    let client = NodeClient::with_transport(Url::parse(NODE_URL).unwrap(), FailingTransport);

    for (kind, outcome) in run_every_command(&client).await {
        assert!(
            matches!(outcome, Err(NodeError::Transport { command, .. }) if command == kind.name()),
            "{kind}"
        );
    }
}

#[tokio::test]
async fn test_get_node_info() {
    let fixture = json!({
        "appName": "IRI",
        "appVersion": "1.4.2.4",
        "jreAvailableProcessors": 8,
        "jreFreeMemory": 1_843_937_584u64,
        "jreMaxMemory": 7_635_730_432u64,
        "jreTotalMemory": 2_571_108_352u64,
        "latestMilestone": "VBVEUQYE99LFWHDZRFKTGFHYGDFEAMAEBGUBTTJRFKHCFBRTXFAJQ9XIUEZQCJOQTZNOOHKUQIKOY9999",
        "latestMilestoneIndex": 418_810,
        "latestSolidSubtangleMilestone": "VBVEUQYE99LFWHDZRFKTGFHYGDFEAMAEBGUBTTJRFKHCFBRTXFAJQ9XIUEZQCJOQTZNOOHKUQIKOY9999",
        "latestSolidSubtangleMilestoneIndex": 418_809,
        "milestoneStartIndex": 338_000,
        "neighbors": 7,
        "packetsQueueSize": 0,
        "time": 1_527_596_592_003u64,
        "tips": 6_227,
        "transactionsToRequest": 14,
        "coordinatorAddress": "KPWCHICGJZXKE9GSUDXZYUAPLHAKAHYHDXNPHENTERYMMBQOPSQIDENXKLKCEYCPVTZQLEEJVYJZV9BWU",
        "features": ["snapshotPruning", "dnsRefresher", "tipSolidification"],
        "duration": 1
    });
    let (client, sent) = client_with(fixture.clone());

    let info = client.get_node_info().await.unwrap();

    assert_eq!(last_body(&sent), json!({"command": "getNodeInfo"}));
    assert_eq!(info.app_name(), "IRI");
    assert_eq!(info.app_version(), "1.4.2.4");
    assert_eq!(info.jre_available_processors(), 8);
    assert_eq!(info.jre_free_memory(), 1_843_937_584);
    assert_eq!(info.jre_max_memory(), 7_635_730_432);
    assert_eq!(info.jre_total_memory(), 2_571_108_352);
    assert_eq!(info.latest_milestone(), fixture["latestMilestone"]);
    assert_eq!(info.latest_milestone_index(), 418_810);
    assert_eq!(info.latest_solid_subtangle_milestone(), fixture["latestSolidSubtangleMilestone"]);
    assert_eq!(info.latest_solid_subtangle_milestone_index(), 418_809);
    assert_eq!(info.milestone_start_index(), 338_000);
    assert_eq!(info.neighbors(), 7);
    assert_eq!(info.packets_queue_size(), 0);
    assert_eq!(info.time(), 1_527_596_592_003);
    assert_eq!(info.tips(), 6_227);
    assert_eq!(info.transactions_to_request(), 14);
    assert_eq!(info.coordinator_address(), fixture["coordinatorAddress"]);
    assert_eq!(info.features(), ["snapshotPruning", "dnsRefresher", "tipSolidification"]);
    assert_eq!(info.duration(), 1);
    assert_eq!(Value::Object(info.json_response().clone()), fixture);
}

#[tokio::test]
async fn test_get_neighbors() {
    let (client, sent) = client_with(json!({
        "neighbors": [
            {
                "address": "/8.8.8.8:14265",
                "numberOfAllTransactions": 922,
                "numberOfInvalidTransactions": 0,
                "numberOfNewTransactions": 19
            },
            {
                "address": "/8.8.8.8:5000",
                "numberOfAllTransactions": 925,
                "numberOfInvalidTransactions": 1,
                "numberOfNewTransactions": 20
            }
        ],
        "duration": 37
    }));

    let response = client.get_neighbors().await.unwrap();

    assert_eq!(last_body(&sent), json!({"command": "getNeighbors"}));
    let neighbors = response.neighbors();
    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0].address, "/8.8.8.8:14265");
    assert_eq!(neighbors[0].number_of_all_transactions, 922);
    assert_eq!(neighbors[0].number_of_invalid_transactions, 0);
    assert_eq!(neighbors[0].number_of_new_transactions, 19);
    assert_eq!(neighbors[1].address, "/8.8.8.8:5000");
    assert_eq!(neighbors[1].number_of_invalid_transactions, 1);
}

#[tokio::test]
async fn test_add_neighbors() {
    let (client, sent) = client_with(json!({"addedNeighbors": 2, "duration": 2}));

    let response = client
        .add_neighbors(["udp://8.8.8.8:14265", "udp://8.8.8.5:14265"])
        .await
        .unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "addNeighbors", "uris": ["udp://8.8.8.8:14265", "udp://8.8.8.5:14265"]})
    );
    assert_eq!(response.added_neighbors(), 2);
    assert_eq!(response.duration(), 2);
}

#[tokio::test]
async fn test_remove_neighbors() {
    let (client, sent) = client_with(json!({"removedNeighbors": 1, "duration": 3}));

    let response = client.remove_neighbors(vec!["udp://8.8.8.8:14265".to_string()]).await.unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "removeNeighbors", "uris": ["udp://8.8.8.8:14265"]})
    );
    assert_eq!(response.removed_neighbors(), 1);
    assert_eq!(response.duration(), 3);
}

#[tokio::test]
async fn test_get_tips() {
    let (client, sent) = client_with(json!({"hashes": ["A999...", "B999..."], "duration": 23}));

    let response = client.get_tips().await.unwrap();

    assert_eq!(last_body(&sent), json!({"command": "getTips"}));
    assert_eq!(response.hashes(), ["A999...", "B999..."]);
    assert_eq!(response.duration(), 23);
}

#[tokio::test]
async fn test_find_transactions() {
    let (client, sent) = client_with(json!({"hashes": ["HASH9A", "HASH9B", "HASH9C"], "duration": 9}));

    let response = client.find_transactions(["ADDR9A", "ADDR9B"]).await.unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "findTransactions", "addresses": ["ADDR9A", "ADDR9B"]})
    );
    assert_eq!(response.hashes(), ["HASH9A", "HASH9B", "HASH9C"]);
    assert_eq!(response.duration(), 9);
}

#[tokio::test]
async fn test_get_trytes() {
    let (client, sent) = client_with(json!({"trytes": ["TRYTES9A", "TRYTES9B"]}));

    let response = client.get_trytes(["HASH9A", "HASH9B"]).await.unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "getTrytes", "hashes": ["HASH9A", "HASH9B"]})
    );
    assert_eq!(response.trytes(), ["TRYTES9A", "TRYTES9B"]);
}

#[tokio::test]
async fn test_get_inclusion_states() {
    let (client, sent) = client_with(json!({"states": [true, false], "duration": 91}));

    let response = client
        .get_inclusion_states(["TX9A", "TX9B"], ["MILESTONE9"])
        .await
        .unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "getInclusionStates", "transactions": ["TX9A", "TX9B"], "tips": ["MILESTONE9"]})
    );
    assert_eq!(response.states(), [true, false]);
    assert_eq!(response.duration(), 91);
}

#[tokio::test]
async fn test_get_balances() {
    let (client, sent) = client_with(json!({
        "balances": [114_544_444],
        "references": ["INRTUYSZCWBHGFGGXXPWRWBZACYAFGVRRP9VYEQJOHYD9URMELKWAFYFMNTSP9MCHLXRGAFMBOZPZ9999"],
        "milestoneIndex": 128,
        "duration": 30
    }));

    let response = client.get_balances(["ADDR1"], 100).await.unwrap();

    assert_eq!(
        serde_json::to_string(&last_body(&sent)).unwrap(),
        r#"{"command":"getBalances","addresses":["ADDR1"],"threshold":100}"#
    );
    assert_eq!(response.balances(), [114_544_444]);
    assert_eq!(
        response.references(),
        ["INRTUYSZCWBHGFGGXXPWRWBZACYAFGVRRP9VYEQJOHYD9URMELKWAFYFMNTSP9MCHLXRGAFMBOZPZ9999"]
    );
    assert_eq!(response.milestone_index(), 128);
    assert_eq!(response.duration(), 30);
}

#[tokio::test]
async fn test_get_transactions_to_approve() {
    let (client, sent) = client_with(json!({
        "trunkTransaction": "TKGDZ9GEI9CPNQGHEATIISAKYPPPSXVCXBSR9EIWCTHHSSEQCD9YLDPEXYERCNJVASRGWMAVKFQTC9999",
        "branchTransaction": "TKGDZ9GEI9CPNQGHEATIISAKYPPPSXVCXBSR9EIWCTHHSSEQCD9YLDPEXYERCNJVASRGWMAVKFQTC9999",
        "duration": 936
    }));

    let response = client.get_transactions_to_approve(27).await.unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "getTransactionsToApprove", "depth": 27})
    );
    assert_eq!(
        response.trunk_transaction(),
        "TKGDZ9GEI9CPNQGHEATIISAKYPPPSXVCXBSR9EIWCTHHSSEQCD9YLDPEXYERCNJVASRGWMAVKFQTC9999"
    );
    assert_eq!(response.branch_transaction(), response.trunk_transaction());
    assert_eq!(response.duration(), 936);
}

#[tokio::test]
async fn test_attach_to_tangle() {
    let (client, sent) = client_with(json!({"trytes": ["ATTACHED9A", "ATTACHED9B"]}));

    let response = client
        .attach_to_tangle("TRUNK9", "BRANCH9", 18, ["RAW9A", "RAW9B"])
        .await
        .unwrap();

    assert_eq!(
        last_body(&sent),
        json!({
            "command": "attachToTangle",
            "trunkTransaction": "TRUNK9",
            "branchTransaction": "BRANCH9",
            "minWeightMagnitude": 18,
            "trytes": ["RAW9A", "RAW9B"]
        })
    );
    assert_eq!(response.trytes(), ["ATTACHED9A", "ATTACHED9B"]);
}

#[tokio::test]
async fn test_attach_to_tangle_low_weight_is_rejected_by_node() {
    let (client, sent) = client_with(json!({"error": "Invalid minWeightMagnitude"}));

    let err = client
        .attach_to_tangle("TRUNK9", "BRANCH9", 10, ["RAW9A"])
        .await
        .unwrap_err();

    assert_eq!(last_body(&sent)["minWeightMagnitude"], json!(10));
    assert!(matches!(
        err,
        NodeError::RemoteCommand { ref message, .. } if message == "Invalid minWeightMagnitude"
    ));
}

#[tokio::test]
async fn test_interrupt_attaching_to_tangle() {
    let (client, sent) = client_with(json!({"duration": 0}));

    let response = client.interrupt_attaching_to_tangle().await.unwrap();

    assert_eq!(last_body(&sent), json!({"command": "interruptAttachingToTangle"}));
    assert_eq!(response.json_response()["duration"], json!(0));
}

#[tokio::test]
async fn test_broadcast_transactions() {
    let (client, sent) = client_with(json!({"duration": 567}));

    let response = client.broadcast_transactions(["ATTACHED9A"]).await.unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "broadcastTransactions", "trytes": ["ATTACHED9A"]})
    );
    assert_eq!(response.duration(), 567);
}

#[tokio::test]
async fn test_store_transactions() {
    let (client, sent) = client_with(json!({"duration": 982}));

    let response = client.store_transactions(["ATTACHED9A", "ATTACHED9B"]).await.unwrap();

    assert_eq!(
        last_body(&sent),
        json!({"command": "storeTransactions", "trytes": ["ATTACHED9A", "ATTACHED9B"]})
    );
    assert_eq!(response.duration(), 982);
}

#[tokio::test]
async fn test_empty_lists_are_sent_as_empty_arrays() {
    let (client, sent) = client_with(json!({"error": "nothing to do"}));
    let none: [&str; 0] = [];

    let _ = client.add_neighbors(none).await;
    let _ = client.remove_neighbors(none).await;
    let _ = client.find_transactions(none).await;
    let _ = client.get_trytes(none).await;
    let _ = client.get_inclusion_states(none, none).await;
    let _ = client.get_balances(none, 100).await;
    let _ = client.attach_to_tangle("T", "B", 18, none).await;
    let _ = client.broadcast_transactions(none).await;
    let _ = client.store_transactions(none).await;

    for request in sent.lock().unwrap().iter() {
        let body = request.body.as_object().unwrap();
        let kind = CommandKind::ALL
            .into_iter()
            .find(|kind| kind.name() == body["command"])
            .unwrap();
        for key in kind.parameter_names() {
            let value = &body[*key];
            assert!(value.is_array() || value.is_number() || value.is_string(), "{kind}.{key}");
            if value.is_array() {
                assert_eq!(value, &json!([]), "{kind}.{key}");
            }
        }
    }
    assert_eq!(sent.lock().unwrap().len(), 9);
}

#[tokio::test]
async fn test_wrong_field_type_is_reported() {
    let (client, _) = client_with(json!({"hashes": "A999", "duration": 23}));

    let err = client.get_tips().await.unwrap_err();

    assert!(matches!(err, NodeError::UnexpectedFieldType { field: "hashes", .. }));
}

#[tokio::test]
async fn test_client_is_reusable_across_concurrent_calls() {
    let (client, sent) = client_with(json!({"hashes": ["A999"], "duration": 1}));

    let (first, second) = tokio::join!(client.get_tips(), client.get_tips());

    assert_eq!(first.unwrap().hashes(), second.unwrap().hashes());
    assert_eq!(sent.lock().unwrap().len(), 2);
}

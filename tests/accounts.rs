// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Integration tests for entity façades against scripted provider and
//! transport collaborators.

use std::sync::{Arc, Mutex};

use ahash::AHashMap;
use async_trait::async_trait;
use movefeed::{
    FeedError, Network, ObjectId, PermissionKind, ProgramContext,
    accounts::{
        AggregatorAccount, JobAccount, OracleQueueAccount, PermissionAccount,
        aggregator::{
            AggregatorInitParams, AggregatorSaveResultParams, AggregatorSetConfigParams,
            CreateFeedParams, create_feed, create_feed_call,
        },
        job::JobInitParams,
        permission::PermissionSetParams,
        queue::OracleQueueSetConfigsParams,
    },
    config::FeedClientConfig,
    provider::{
        ChildPage, CreatedObject, ExecutionStatus, LedgerTransport, RawRecord, ReadProvider,
        TransactionReceipt,
    },
    tx::{CallArg, MoveCall, PureArg},
};
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use ustr::Ustr;

#[derive(Default)]
struct ScriptedProvider {
    records: AHashMap<ObjectId, Value>,
}

impl ScriptedProvider {
    fn with_record(mut self, id: &str, content: Value) -> Self {
        self.records
            .insert(ObjectId::new_unchecked(id), content);
        self
    }
}

#[async_trait]
impl ReadProvider for ScriptedProvider {
    async fn get_record(&self, id: &ObjectId) -> Result<Option<RawRecord>, FeedError> {
        Ok(self.records.get(id).map(|content| RawRecord {
            object_id: *id,
            type_tag: Ustr::from("0xpkg::aggregator::Aggregator"),
            content: content.clone(),
        }))
    }

    async fn list_children(
        &self,
        _parent: &ObjectId,
        _cursor: Option<String>,
    ) -> Result<ChildPage, FeedError> {
        Ok(ChildPage::default())
    }
}

struct RecordingTransport {
    submitted: Mutex<Vec<MoveCall>>,
    created: Vec<CreatedObject>,
}

impl RecordingTransport {
    fn new() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            created: Vec::new(),
        }
    }

    fn with_created(mut self, object_id: &str, type_tag: &str) -> Self {
        self.created.push(CreatedObject {
            object_id: ObjectId::new_unchecked(object_id),
            type_tag: type_tag.to_string(),
        });
        self
    }

    fn submitted(&self) -> Vec<MoveCall> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerTransport for RecordingTransport {
    async fn submit(&self, call: &MoveCall) -> Result<TransactionReceipt, FeedError> {
        self.submitted.lock().unwrap().push(call.clone());
        Ok(TransactionReceipt {
            digest: "0xdigest".to_string(),
            status: ExecutionStatus::Success,
            created: self.created.clone(),
        })
    }

    fn sender(&self) -> ObjectId {
        ObjectId::new_unchecked("0xsender")
    }
}

fn context(
    provider: ScriptedProvider,
    transport: RecordingTransport,
) -> (ProgramContext, Arc<RecordingTransport>) {
    let transport = Arc::new(transport);
    let config = FeedClientConfig {
        network: Network::Testnet,
        program_id: Some(ObjectId::new_unchecked("0xprog")),
        coin_type: None,
    };
    (
        ProgramContext::new(Arc::new(provider), transport.clone(), &config),
        transport,
    )
}

fn aggregator_content() -> Value {
    json!({
        "name": "BTC/USD",
        "authority": "0xauth",
        "queue_addr": "0xqueue",
        "batch_size": "3",
        "min_oracle_results": "2",
        "min_job_results": "1",
        "min_update_delay_seconds": "30",
        "variance_threshold": {
            "type": "0xpkg::decimal::Decimal",
            "fields": { "mantissa": "5", "scale": 2, "neg": false },
        },
        "force_report_period": "18446744073709551615",
        "disable_crank": false,
        "history_size": "0",
        "read_charge": "0",
        "reward_escrow": "0xauth",
        "read_whitelist": [],
        "limit_reads_to_whitelist": false,
        "update_data": {
            "type": "0xpkg::aggregator::Update",
            "fields": {
                "latest_result": {
                    "type": "0xpkg::decimal::Decimal",
                    "fields": { "mantissa": "100", "scale": 0, "neg": false },
                },
                "latest_timestamp": "1700000000",
            },
        },
        "job_keys": ["0xjob1", "0xjob2"],
    })
}

fn init_params() -> AggregatorInitParams {
    AggregatorInitParams {
        authority: ObjectId::new_unchecked("0xauth"),
        name: "BTC/USD".to_string(),
        queue: ObjectId::new_unchecked("0xqueue"),
        batch_size: 3,
        min_oracle_results: 2,
        min_job_results: 1,
        min_update_delay_seconds: 30,
        variance_threshold: Some(dec!(0.05)),
        force_report_period: None,
        disable_crank: None,
        history_size: None,
        read_charge: None,
        reward_escrow: None,
        read_whitelist: vec![],
        limit_reads_to_whitelist: None,
    }
}

fn pure(call: &MoveCall, idx: usize) -> &PureArg {
    match &call.args[idx] {
        CallArg::Pure(p) => p,
        other => panic!("expected pure arg at {idx}, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_create_feed_pads_to_fixed_job_arity() {
    let (ctx, transport) = context(ScriptedProvider::default(), RecordingTransport::new());
    let params = CreateFeedParams {
        init: init_params(),
        jobs: vec![JobInitParams {
            name: "job-a".to_string(),
            data: vec![1, 2, 3],
            weight: Some(2),
        }],
        load_coin: ObjectId::new_unchecked("0xcoin"),
        initial_load_amount: 1000,
    };

    let call = create_feed_call(&ctx, &params).unwrap();
    assert_eq!(call.target, "0xprog::create_feed_action::run");
    // 19 leading args plus 8 job slots of (name, data, weight).
    assert_eq!(call.args.len(), 43);

    assert_eq!(*pure(&call, 19), PureArg::Bytes(b"job-a".to_vec()));
    assert_eq!(*pure(&call, 20), PureArg::Bytes(vec![1, 2, 3]));
    assert_eq!(*pure(&call, 21), PureArg::U64(2));

    // Remaining slots are inert placeholders.
    for slot in 1..8 {
        let base = 19 + slot * 3;
        assert_eq!(*pure(&call, base), PureArg::Bytes(vec![]));
        assert_eq!(*pure(&call, base + 1), PureArg::Bytes(vec![]));
        assert_eq!(*pure(&call, base + 2), PureArg::U64(1));
    }
    assert!(transport.submitted().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_create_feed_rejects_ninth_job_before_any_submission() {
    let (ctx, transport) = context(ScriptedProvider::default(), RecordingTransport::new());
    let jobs: Vec<JobInitParams> = (0..9)
        .map(|i| JobInitParams {
            name: format!("job-{i}"),
            data: vec![],
            weight: None,
        })
        .collect();
    let params = CreateFeedParams {
        init: init_params(),
        jobs,
        load_coin: ObjectId::new_unchecked("0xcoin"),
        initial_load_amount: 1000,
    };

    let result = create_feed(ctx, &params).await;
    assert!(matches!(
        result,
        Err(FeedError::LimitExceeded {
            supplied: 9,
            max: 8
        })
    ));
    assert!(transport.submitted().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_init_scans_receipt_for_created_aggregator() {
    let transport = RecordingTransport::new()
        .with_created("0xescrow", "0xpkg::escrow::Escrow")
        .with_created("0xnewfeed", "0xpkg::aggregator::Aggregator");
    let (ctx, transport) = context(ScriptedProvider::default(), transport);

    let (account, receipt) = AggregatorAccount::init(ctx, &init_params()).await.unwrap();
    assert_eq!(account.address().as_str(), "0xnewfeed");
    assert!(receipt.is_success());
    assert_eq!(transport.submitted().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_set_config_falls_back_to_stored_values() {
    let provider = ScriptedProvider::default().with_record("0xfeed", aggregator_content());
    let (ctx, transport) = context(provider, RecordingTransport::new());
    let account = AggregatorAccount::new(ctx, ObjectId::new_unchecked("0xfeed"));

    let params = AggregatorSetConfigParams {
        batch_size: Some(5),
        ..Default::default()
    };
    account.set_config(&params).await.unwrap();

    let call = &transport.submitted()[0];
    assert_eq!(call.target, "0xprog::aggregator_set_configs_action::run");
    // Supplied field wins; everything else defaults from the stored state.
    assert_eq!(*pure(call, 1), PureArg::Bytes(b"BTC/USD".to_vec()));
    assert_eq!(*pure(call, 3), PureArg::U64(5));
    assert_eq!(*pure(call, 4), PureArg::U64(2));
    // The stored variance threshold triple (5, 2, false) is re-encoded.
    assert_eq!(*pure(call, 7), PureArg::U128(5));
    assert_eq!(*pure(call, 8), PureArg::U8(2));
}

#[rstest]
#[tokio::test]
async fn test_set_config_reencodes_supplied_variance_threshold() {
    let provider = ScriptedProvider::default().with_record("0xfeed", aggregator_content());
    let (ctx, transport) = context(provider, RecordingTransport::new());
    let account = AggregatorAccount::new(ctx, ObjectId::new_unchecked("0xfeed"));

    let params = AggregatorSetConfigParams {
        variance_threshold: Some(dec!(0.125)),
        ..Default::default()
    };
    account.set_config(&params).await.unwrap();

    let call = &transport.submitted()[0];
    assert_eq!(*pure(call, 7), PureArg::U128(125));
    assert_eq!(*pure(call, 8), PureArg::U8(3));
}

#[rstest]
#[tokio::test]
async fn test_save_result_encodes_signed_triple() {
    let (ctx, transport) = context(ScriptedProvider::default(), RecordingTransport::new());
    let account = AggregatorAccount::new(ctx, ObjectId::new_unchecked("0xfeed"));

    let params = AggregatorSaveResultParams {
        oracle: ObjectId::new_unchecked("0xoracle"),
        oracle_idx: 4,
        queue: ObjectId::new_unchecked("0xqueue"),
        value: dec!(-1234.5),
    };
    account.save_result(&params).await.unwrap();

    let call = &transport.submitted()[0];
    assert_eq!(call.target, "0xprog::aggregator_save_result_action::run");
    assert_eq!(
        call.args[0],
        CallArg::Object(ObjectId::new_unchecked("0xoracle"))
    );
    assert_eq!(*pure(call, 1), PureArg::U64(4));
    assert_eq!(*pure(call, 4), PureArg::U128(12345));
    assert_eq!(*pure(call, 5), PureArg::U8(1));
    assert_eq!(*pure(call, 6), PureArg::Bool(true));
    assert_eq!(call.args[7], CallArg::Clock);
    assert_eq!(call.type_args, vec!["0x2::sui::SUI".to_string()]);
}

#[rstest]
#[tokio::test]
async fn test_open_interval_reads_queue_from_stored_state() {
    let provider = ScriptedProvider::default().with_record("0xfeed", aggregator_content());
    let (ctx, transport) = context(provider, RecordingTransport::new());
    let account = AggregatorAccount::new(ctx, ObjectId::new_unchecked("0xfeed"));

    account
        .open_interval(ObjectId::new_unchecked("0xcoin"))
        .await
        .unwrap();

    let call = &transport.submitted()[0];
    assert_eq!(call.target, "0xprog::aggregator_open_interval_action::run");
    assert_eq!(
        call.args,
        vec![
            CallArg::Object(ObjectId::new_unchecked("0xqueue")),
            CallArg::Object(ObjectId::new_unchecked("0xfeed")),
            CallArg::Object(ObjectId::new_unchecked("0xcoin")),
        ]
    );
    assert_eq!(call.type_args, vec!["0x2::sui::SUI".to_string()]);
}

#[rstest]
#[tokio::test]
async fn test_set_authority_uses_supplied_capability_object() {
    let (ctx, transport) = context(ScriptedProvider::default(), RecordingTransport::new());
    let account = AggregatorAccount::new(ctx, ObjectId::new_unchecked("0xfeed"));

    account
        .set_authority(
            ObjectId::new_unchecked("0xcap"),
            ObjectId::new_unchecked("0xnewauth"),
        )
        .await
        .unwrap();

    let call = &transport.submitted()[0];
    assert_eq!(call.target, "0xprog::aggregator_set_authority_action::run");
    assert_eq!(
        call.args,
        vec![
            CallArg::Object(ObjectId::new_unchecked("0xfeed")),
            CallArg::Object(ObjectId::new_unchecked("0xcap")),
            CallArg::Pure(PureArg::Address(ObjectId::new_unchecked("0xnewauth"))),
        ]
    );
    assert!(call.type_args.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_should_report_from_stored_state() {
    let provider = ScriptedProvider::default().with_record("0xfeed", aggregator_content());
    let (ctx, _) = context(provider, RecordingTransport::new());
    let account = AggregatorAccount::new(ctx, ObjectId::new_unchecked("0xfeed"));

    // Stored value 100, threshold 0.05, force period effectively infinite.
    assert!(!account.should_report(dec!(104), 1_700_000_001).await.unwrap());
    assert!(account.should_report(dec!(90), 1_700_000_001).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_job_definition_decodes_base64_payload() {
    let provider = ScriptedProvider::default().with_record(
        "0xjob",
        json!({ "name": "job-a", "data": "AQID" }),
    );
    let (ctx, _) = context(provider, RecordingTransport::new());
    let job = JobAccount::new(ctx, ObjectId::new_unchecked("0xjob"));

    assert_eq!(job.definition().await.unwrap(), vec![1, 2, 3]);
}

#[rstest]
#[tokio::test]
async fn test_queue_find_oracle_idx() {
    let provider = ScriptedProvider::default().with_record(
        "0xqueue",
        json!({ "data": ["0xoracle1", "0xoracle2", "0xoracle3"] }),
    );
    let (ctx, _) = context(provider, RecordingTransport::new());
    let queue = OracleQueueAccount::new(ctx, ObjectId::new_unchecked("0xqueue"));

    assert_eq!(
        queue
            .find_oracle_idx(ObjectId::new_unchecked("0xoracle2"))
            .await
            .unwrap(),
        Some(1)
    );
    assert_eq!(
        queue
            .find_oracle_idx(ObjectId::new_unchecked("0xghost"))
            .await
            .unwrap(),
        None
    );
}

#[rstest]
#[tokio::test]
async fn test_queue_set_configs_falls_back_to_stored_values() {
    let provider = ScriptedProvider::default().with_record(
        "0xqueue",
        json!({
            "name": "main-queue",
            "authority": "0xauth",
            "oracle_timeout": "180",
            "reward": "100",
            "unpermissioned_feeds_enabled": true,
            "lock_lease_funding": false,
        }),
    );
    let (ctx, transport) = context(provider, RecordingTransport::new());
    let queue = OracleQueueAccount::new(ctx, ObjectId::new_unchecked("0xqueue"));

    let params = OracleQueueSetConfigsParams {
        reward: Some(250),
        ..Default::default()
    };
    queue.set_configs(&params).await.unwrap();

    let call = &transport.submitted()[0];
    assert_eq!(call.target, "0xprog::oracle_queue_set_configs_action::run");
    assert_eq!(*pure(call, 1), PureArg::Bytes(b"main-queue".to_vec()));
    assert_eq!(*pure(call, 3), PureArg::U64(180));
    assert_eq!(*pure(call, 4), PureArg::U64(250));
    assert_eq!(*pure(call, 5), PureArg::Bool(true));
}

#[rstest]
#[tokio::test]
async fn test_permission_set_encodes_kind_discriminant() {
    let (ctx, transport) = context(ScriptedProvider::default(), RecordingTransport::new());

    let params = PermissionSetParams {
        authority: ObjectId::new_unchecked("0xauth"),
        granter: ObjectId::new_unchecked("0xqueue"),
        grantee: ObjectId::new_unchecked("0xoracle"),
        kind: PermissionKind::PermitOracleHeartbeat,
        enable: true,
    };
    PermissionAccount::set(&ctx, &params).await.unwrap();

    let call = &transport.submitted()[0];
    assert_eq!(call.target, "0xprog::permission_set_action::run");
    assert_eq!(
        *pure(call, 0),
        PureArg::Address(ObjectId::new_unchecked("0xauth"))
    );
    assert_eq!(*pure(call, 3), PureArg::U8(0));
    assert_eq!(*pure(call, 4), PureArg::Bool(true));
}

#[rstest]
#[tokio::test]
async fn test_remote_failure_surfaces_as_error() {
    struct FailingTransport;

    #[async_trait]
    impl LedgerTransport for FailingTransport {
        async fn submit(&self, _call: &MoveCall) -> Result<TransactionReceipt, FeedError> {
            Ok(TransactionReceipt {
                digest: "0xdigest".to_string(),
                status: ExecutionStatus::Failure("MoveAbort(3)".to_string()),
                created: vec![],
            })
        }

        fn sender(&self) -> ObjectId {
            ObjectId::new_unchecked("0xsender")
        }
    }

    let config = FeedClientConfig {
        network: Network::Testnet,
        program_id: Some(ObjectId::new_unchecked("0xprog")),
        coin_type: None,
    };
    let ctx = ProgramContext::new(
        Arc::new(ScriptedProvider::default()),
        Arc::new(FailingTransport),
        &config,
    );
    let account = AggregatorAccount::new(ctx, ObjectId::new_unchecked("0xfeed"));

    let result = account
        .remove_job(ObjectId::new_unchecked("0xjob"))
        .await;
    assert!(matches!(result, Err(FeedError::RemoteExecution(_))));
}

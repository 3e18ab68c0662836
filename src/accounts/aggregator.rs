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

//! The aggregator (feed) façade.

use derive_builder::Builder;
use rust_decimal::Decimal;

use crate::{
    accounts::{
        ProgramContext,
        job::{JobAccount, JobInitParams},
    },
    admission::{self, AdmissionState},
    common::{
        consts::MAX_CREATE_FEED_JOBS, decimal::LedgerDecimal, enums::EntityKind, types::ObjectId,
    },
    error::FeedError,
    events::{EventFilter, EventSource, EventSubscription},
    provider::TransactionReceipt,
    snapshot::{Snapshot, materialize::materialize},
    tx::MoveCall,
};

/// Parameters for initializing an aggregator.
#[derive(Clone, Debug, Builder)]
#[builder(setter(into, strip_option), derive(Debug))]
pub struct AggregatorInitParams {
    /// Owner of the aggregator.
    pub authority: ObjectId,
    pub name: String,
    pub queue: ObjectId,
    pub batch_size: u64,
    pub min_oracle_results: u64,
    pub min_job_results: u64,
    pub min_update_delay_seconds: u64,
    #[builder(default)]
    pub variance_threshold: Option<Decimal>,
    #[builder(default)]
    pub force_report_period: Option<u64>,
    #[builder(default)]
    pub disable_crank: Option<bool>,
    #[builder(default)]
    pub history_size: Option<u64>,
    #[builder(default)]
    pub read_charge: Option<u64>,
    #[builder(default)]
    pub reward_escrow: Option<ObjectId>,
    #[builder(default)]
    pub read_whitelist: Vec<ObjectId>,
    #[builder(default)]
    pub limit_reads_to_whitelist: Option<bool>,
}

/// Partial update of aggregator configuration; unset fields fall back to the
/// currently stored values.
#[derive(Clone, Debug, Default, Builder)]
#[builder(default, setter(into, strip_option), derive(Debug))]
pub struct AggregatorSetConfigParams {
    pub name: Option<String>,
    pub queue: Option<ObjectId>,
    pub batch_size: Option<u64>,
    pub min_oracle_results: Option<u64>,
    pub min_job_results: Option<u64>,
    pub min_update_delay_seconds: Option<u64>,
    pub variance_threshold: Option<Decimal>,
    pub force_report_period: Option<u64>,
    pub disable_crank: Option<bool>,
    pub history_size: Option<u64>,
    pub read_charge: Option<u64>,
    pub reward_escrow: Option<ObjectId>,
    pub read_whitelist: Option<Vec<ObjectId>>,
    pub limit_reads_to_whitelist: Option<bool>,
}

/// Parameters for reporting an oracle observation into the aggregator.
#[derive(Clone, Debug)]
pub struct AggregatorSaveResultParams {
    pub oracle: ObjectId,
    pub oracle_idx: u64,
    pub queue: ObjectId,
    pub value: Decimal,
}

/// Parameters for attaching an existing job to the aggregator.
#[derive(Clone, Debug)]
pub struct AddJobParams {
    pub job: ObjectId,
    pub weight: Option<u64>,
}

/// Parameters for funding the aggregator's reward escrow.
#[derive(Clone, Debug)]
pub struct EscrowDepositParams {
    pub load_coin: ObjectId,
    pub amount: u64,
}

/// Parameters for withdrawing from the aggregator's reward escrow.
#[derive(Clone, Debug)]
pub struct EscrowWithdrawParams {
    pub amount: u64,
}

/// Parameters for creating a feed together with its jobs and initial escrow
/// load in one transaction.
#[derive(Clone, Debug)]
pub struct CreateFeedParams {
    pub init: AggregatorInitParams,
    pub jobs: Vec<JobInitParams>,
    pub load_coin: ObjectId,
    pub initial_load_amount: u64,
}

/// Typed view of a materialized aggregator snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatorData {
    pub name: String,
    pub authority: ObjectId,
    pub queue: ObjectId,
    pub batch_size: u64,
    pub min_oracle_results: u64,
    pub min_job_results: u64,
    pub min_update_delay_seconds: u64,
    pub variance_threshold: LedgerDecimal,
    pub force_report_period: u64,
    pub disable_crank: bool,
    pub history_size: u64,
    pub read_charge: u64,
    pub reward_escrow: ObjectId,
    pub read_whitelist: Vec<ObjectId>,
    pub limit_reads_to_whitelist: bool,
    pub latest_result: LedgerDecimal,
    pub latest_timestamp: u64,
    pub job_keys: Vec<ObjectId>,
}

impl AggregatorData {
    /// Decodes the typed view from a materialized snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is absent or malformed.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, FeedError> {
        let update_data = Snapshot::new(snapshot.get_map("update_data")?.clone());
        Ok(Self {
            name: snapshot.get_str("name")?.to_string(),
            authority: snapshot.get_id("authority")?,
            queue: snapshot.get_id("queue_addr")?,
            batch_size: snapshot.get_u64("batch_size")?,
            min_oracle_results: snapshot.get_u64("min_oracle_results")?,
            min_job_results: snapshot.get_u64("min_job_results")?,
            min_update_delay_seconds: snapshot.get_u64("min_update_delay_seconds")?,
            variance_threshold: snapshot.get_decimal("variance_threshold")?,
            force_report_period: snapshot.get_u64("force_report_period")?,
            disable_crank: snapshot.get_bool("disable_crank")?,
            history_size: snapshot.get_u64("history_size")?,
            read_charge: snapshot.get_u64("read_charge")?,
            reward_escrow: snapshot.get_id("reward_escrow")?,
            read_whitelist: snapshot.get_id_list("read_whitelist")?,
            limit_reads_to_whitelist: snapshot.get_bool("limit_reads_to_whitelist")?,
            latest_result: LedgerDecimal::from_fields(
                update_data.get_map("latest_result")?,
            )?,
            latest_timestamp: update_data.get_u64("latest_timestamp")?,
            job_keys: snapshot.get_id_list("job_keys")?,
        })
    }
}

/// Façade over one on-chain aggregator (feed) entity.
#[derive(Clone, Debug)]
pub struct AggregatorAccount {
    ctx: ProgramContext,
    address: ObjectId,
}

impl AggregatorAccount {
    /// Creates a façade over an existing aggregator.
    pub fn new(ctx: ProgramContext, address: ObjectId) -> Self {
        Self { ctx, address }
    }

    /// The aggregator's on-chain identifier.
    pub fn address(&self) -> ObjectId {
        self.address
    }

    /// Materializes the aggregator's current on-chain state.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregator or any child record cannot be read.
    pub async fn load(&self) -> Result<Snapshot, FeedError> {
        materialize(self.ctx.provider(), &self.address).await
    }

    /// Loads and decodes the typed aggregator view.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or decoded.
    pub async fn data(&self) -> Result<AggregatorData, FeedError> {
        AggregatorData::from_snapshot(&self.load().await?)
    }

    /// The most recently stored aggregate value.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or decoded.
    pub async fn latest_value(&self) -> Result<Decimal, FeedError> {
        self.data().await?.latest_result.to_decimal()
    }

    /// Façades over every job currently attached to this aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or decoded.
    pub async fn load_jobs(&self) -> Result<Vec<JobAccount>, FeedError> {
        Ok(self
            .data()
            .await?
            .job_keys
            .into_iter()
            .map(|key| JobAccount::new(self.ctx.clone(), key))
            .collect())
    }

    /// Builds the aggregator init call.
    pub fn init_call(ctx: &ProgramContext, params: &AggregatorInitParams) -> MoveCall {
        let vt = LedgerDecimal::from_decimal(params.variance_threshold.unwrap_or_default());
        MoveCall::builder(&ctx.program(), "aggregator_init_action", "run")
            .pure(params.name.clone().into_bytes())
            .object(params.queue)
            .pure(params.batch_size)
            .pure(params.min_oracle_results)
            .pure(params.min_job_results)
            .pure(params.min_update_delay_seconds)
            .pure(vt.mantissa)
            .pure(vt.scale)
            .pure(params.force_report_period.unwrap_or(0))
            .pure(params.disable_crank.unwrap_or(false))
            .pure(params.history_size.unwrap_or(0))
            .pure(params.read_charge.unwrap_or(0))
            .pure(params.reward_escrow.unwrap_or_else(|| ctx.sender()))
            .pure(params.read_whitelist.clone())
            .pure(params.limit_reads_to_whitelist.unwrap_or(false))
            .clock()
            .pure(params.authority)
            .type_arg(ctx.coin_type())
            .build()
    }

    /// Initializes a new aggregator and returns its façade.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the receipt carries no
    /// aggregator identifier.
    pub async fn init(
        ctx: ProgramContext,
        params: &AggregatorInitParams,
    ) -> Result<(Self, TransactionReceipt), FeedError> {
        let call = Self::init_call(&ctx, params);
        let receipt = ctx.submit(&call).await?;
        let address = receipt.created_id(EntityKind::Aggregator.type_suffix())?;
        Ok((Self::new(ctx, address), receipt))
    }

    /// Builds the config-update call by overlaying supplied fields onto the
    /// currently stored configuration.
    ///
    /// Caller-supplied values win; the variance threshold triple is
    /// re-encoded from whichever plain value won the merge, never reused
    /// from a stale encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored variance threshold cannot be decoded.
    pub fn set_config_call(
        &self,
        current: &AggregatorData,
        params: &AggregatorSetConfigParams,
    ) -> Result<MoveCall, FeedError> {
        let variance_threshold = match params.variance_threshold {
            Some(value) => value,
            None => current.variance_threshold.to_decimal()?,
        };
        let vt = LedgerDecimal::from_decimal(variance_threshold);
        let name = params.name.clone().unwrap_or_else(|| current.name.clone());
        let read_whitelist = params
            .read_whitelist
            .clone()
            .unwrap_or_else(|| current.read_whitelist.clone());

        Ok(
            MoveCall::builder(&self.ctx.program(), "aggregator_set_configs_action", "run")
                .object(self.address)
                .pure(name.into_bytes())
                .pure(params.queue.unwrap_or(current.queue))
                .pure(params.batch_size.unwrap_or(current.batch_size))
                .pure(
                    params
                        .min_oracle_results
                        .unwrap_or(current.min_oracle_results),
                )
                .pure(params.min_job_results.unwrap_or(current.min_job_results))
                .pure(
                    params
                        .min_update_delay_seconds
                        .unwrap_or(current.min_update_delay_seconds),
                )
                .pure(vt.mantissa)
                .pure(vt.scale)
                .pure(
                    params
                        .force_report_period
                        .unwrap_or(current.force_report_period),
                )
                .pure(params.disable_crank.unwrap_or(current.disable_crank))
                .pure(params.history_size.unwrap_or(current.history_size))
                .pure(params.read_charge.unwrap_or(current.read_charge))
                .pure(params.reward_escrow.unwrap_or(current.reward_escrow))
                .pure(read_whitelist)
                .pure(
                    params
                        .limit_reads_to_whitelist
                        .unwrap_or(current.limit_reads_to_whitelist),
                )
                .type_arg(self.ctx.coin_type())
                .build(),
        )
    }

    /// Applies a partial configuration update, defaulting unset fields from
    /// a freshly materialized snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or submission fails.
    pub async fn set_config(
        &self,
        params: &AggregatorSetConfigParams,
    ) -> Result<TransactionReceipt, FeedError> {
        let current = self.data().await?;
        let call = self.set_config_call(&current, params)?;
        self.ctx.submit(&call).await
    }

    /// Builds the add-job call.
    pub fn add_job_call(&self, params: &AddJobParams) -> MoveCall {
        MoveCall::builder(&self.ctx.program(), "aggregator_add_job_action", "run")
            .object(self.address)
            .object(params.job)
            .pure(params.weight.unwrap_or(1))
            .build()
    }

    /// Attaches an existing job to this aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    pub async fn add_job(&self, params: &AddJobParams) -> Result<TransactionReceipt, FeedError> {
        self.ctx.submit(&self.add_job_call(params)).await
    }

    /// Builds a call that creates a job and attaches it in one step.
    pub fn create_and_add_job_call(&self, params: &JobInitParams) -> MoveCall {
        MoveCall::builder(&self.ctx.program(), "create_and_add_job_action", "run")
            .object(self.address)
            .pure(params.name.clone().into_bytes())
            .pure(params.data.clone())
            .pure(params.weight.unwrap_or(1))
            .clock()
            .build()
    }

    /// Builds the remove-job call.
    pub fn remove_job_call(&self, job: ObjectId) -> MoveCall {
        MoveCall::builder(&self.ctx.program(), "aggregator_remove_job_action", "run")
            .object(self.address)
            .object(job)
            .build()
    }

    /// Detaches a job from this aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    pub async fn remove_job(&self, job: ObjectId) -> Result<TransactionReceipt, FeedError> {
        self.ctx.submit(&self.remove_job_call(job)).await
    }

    /// Builds the save-result call, encoding the observation as a triple.
    pub fn save_result_call(&self, params: &AggregatorSaveResultParams) -> MoveCall {
        let value = LedgerDecimal::from_decimal(params.value);
        MoveCall::builder(&self.ctx.program(), "aggregator_save_result_action", "run")
            .object(params.oracle)
            .pure(params.oracle_idx)
            .object(self.address)
            .object(params.queue)
            .pure(value.mantissa)
            .pure(value.scale)
            .pure(value.neg)
            .clock()
            .type_arg(self.ctx.coin_type())
            .build()
    }

    /// Reports an oracle observation into the aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    pub async fn save_result(
        &self,
        params: &AggregatorSaveResultParams,
    ) -> Result<TransactionReceipt, FeedError> {
        self.ctx.submit(&self.save_result_call(params)).await
    }

    /// Deposits into the aggregator's reward escrow.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or submission fails.
    pub async fn extend(
        &self,
        params: &EscrowDepositParams,
    ) -> Result<TransactionReceipt, FeedError> {
        let queue = self.data().await?.queue;
        let call = MoveCall::builder(
            &self.ctx.program(),
            "aggregator_escrow_deposit_action",
            "run",
        )
        .object(queue)
        .object(self.address)
        .object(params.load_coin)
        .pure(params.amount)
        .type_arg(self.ctx.coin_type())
        .build();
        self.ctx.submit(&call).await
    }

    /// Withdraws from the aggregator's reward escrow.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or submission fails.
    pub async fn withdraw(
        &self,
        params: &EscrowWithdrawParams,
    ) -> Result<TransactionReceipt, FeedError> {
        let queue = self.data().await?.queue;
        let call = MoveCall::builder(
            &self.ctx.program(),
            "aggregator_escrow_withdraw_action",
            "run",
        )
        .object(queue)
        .object(self.address)
        .pure(params.amount)
        .type_arg(self.ctx.coin_type())
        .build();
        self.ctx.submit(&call).await
    }

    /// Builds the open-interval call for the given queue.
    pub fn open_interval_call(&self, queue: ObjectId, load_coin: ObjectId) -> MoveCall {
        MoveCall::builder(&self.ctx.program(), "aggregator_open_interval_action", "run")
            .object(queue)
            .object(self.address)
            .object(load_coin)
            .type_arg(self.ctx.coin_type())
            .build()
    }

    /// Opens a new update interval on the aggregator's queue, funded from
    /// `load_coin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or submission fails.
    pub async fn open_interval(
        &self,
        load_coin: ObjectId,
    ) -> Result<TransactionReceipt, FeedError> {
        let queue = self.data().await?.queue;
        self.ctx
            .submit(&self.open_interval_call(queue, load_coin))
            .await
    }

    /// Builds the set-authority call.
    ///
    /// The authority capability object is caller-supplied: locating it
    /// requires enumerating the current authority's owned objects, which is
    /// outside the read-provider boundary.
    pub fn set_authority_call(
        &self,
        authority_object: ObjectId,
        new_authority: ObjectId,
    ) -> MoveCall {
        MoveCall::builder(&self.ctx.program(), "aggregator_set_authority_action", "run")
            .object(self.address)
            .object(authority_object)
            .pure(new_authority)
            .build()
    }

    /// Transfers the aggregator's authority to `new_authority`.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    pub async fn set_authority(
        &self,
        authority_object: ObjectId,
        new_authority: ObjectId,
    ) -> Result<TransactionReceipt, FeedError> {
        self.ctx
            .submit(&self.set_authority_call(authority_object, new_authority))
            .await
    }

    /// Builds the crank-push call for the aggregator's queue.
    pub fn crank_push_call(&self, queue: ObjectId) -> MoveCall {
        MoveCall::builder(&self.ctx.program(), "crank_push_action", "run")
            .object(queue)
            .object(self.address)
            .type_arg(self.ctx.coin_type())
            .build()
    }

    /// Decides whether `candidate` should be published, given the currently
    /// stored aggregate state.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or the decision
    /// cannot be computed.
    pub async fn should_report(
        &self,
        candidate: Decimal,
        now_secs: u64,
    ) -> Result<bool, FeedError> {
        let snapshot = self.load().await?;
        let state = AdmissionState::from_snapshot(&snapshot)?;
        admission::should_report(candidate, now_secs, &state)
    }

    /// Watches for aggregator update events emitted by the program.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription cannot be established.
    pub async fn watch<F, H>(
        source: &dyn EventSource,
        program: ObjectId,
        callback: F,
        on_error: H,
    ) -> Result<EventSubscription, FeedError>
    where
        F: FnMut(crate::events::LedgerEvent) -> Result<(), FeedError> + Send + 'static,
        H: FnMut(FeedError) + Send + 'static,
    {
        let filter = EventFilter::new()
            .program(program)
            .module("aggregator_save_result_action")
            .event_type(format!("{program}::events::AggregatorUpdateEvent"));
        EventSubscription::spawn(source, filter, callback, on_error).await
    }
}

/// Builds the combined create-feed call: aggregator init, job creation and
/// the initial escrow load in one transaction.
///
/// The remote entry point's arity is fixed at [`MAX_CREATE_FEED_JOBS`] job
/// slots; fewer supplied jobs are padded with inert placeholders.
///
/// # Errors
///
/// Returns [`FeedError::LimitExceeded`] if more than [`MAX_CREATE_FEED_JOBS`]
/// jobs are supplied; no I/O occurs in that case.
pub fn create_feed_call(
    ctx: &ProgramContext,
    params: &CreateFeedParams,
) -> Result<MoveCall, FeedError> {
    if params.jobs.len() > MAX_CREATE_FEED_JOBS {
        return Err(FeedError::LimitExceeded {
            supplied: params.jobs.len(),
            max: MAX_CREATE_FEED_JOBS,
        });
    }
    let init = &params.init;
    let vt = LedgerDecimal::from_decimal(init.variance_threshold.unwrap_or_default());

    let mut builder = MoveCall::builder(&ctx.program(), "create_feed_action", "run")
        .pure(init.authority)
        .clock()
        .pure(init.name.clone().into_bytes())
        .object(init.queue)
        .pure(init.batch_size)
        .pure(init.min_oracle_results)
        .pure(init.min_job_results)
        .pure(init.min_update_delay_seconds)
        .pure(vt.mantissa)
        .pure(vt.scale)
        .pure(init.force_report_period.unwrap_or(0))
        .pure(init.disable_crank.unwrap_or(false))
        .pure(init.history_size.unwrap_or(0))
        .pure(init.read_charge.unwrap_or(0))
        .pure(init.reward_escrow.unwrap_or(init.authority))
        .pure(init.read_whitelist.clone())
        .pure(init.limit_reads_to_whitelist.unwrap_or(false))
        .object(params.load_coin)
        .pure(params.initial_load_amount);

    for slot in 0..MAX_CREATE_FEED_JOBS {
        let job = params.jobs.get(slot);
        let (name, data, weight) = match job {
            Some(job) => (
                job.name.clone().into_bytes(),
                job.data.clone(),
                job.weight.unwrap_or(1),
            ),
            // Inert placeholder filling the fixed arity.
            None => (Vec::new(), Vec::new(), 1),
        };
        builder = builder.pure(name).pure(data).pure(weight);
    }

    Ok(builder.type_arg(ctx.coin_type()).build())
}

/// Creates a feed with its jobs and initial escrow load, returning the new
/// aggregator façade.
///
/// # Errors
///
/// Returns an error if the job cap is exceeded, submission fails, or the
/// receipt carries no aggregator identifier.
pub async fn create_feed(
    ctx: ProgramContext,
    params: &CreateFeedParams,
) -> Result<(AggregatorAccount, TransactionReceipt), FeedError> {
    let call = create_feed_call(&ctx, params)?;
    let receipt = ctx.submit(&call).await?;
    let address = receipt.created_id(EntityKind::Aggregator.type_suffix())?;
    Ok((AggregatorAccount::new(ctx, address), receipt))
}

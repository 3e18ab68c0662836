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

//! The oracle-queue façade: the roster oracles register on and feeds draw
//! from.

use derive_builder::Builder;

use crate::{
    accounts::ProgramContext,
    common::{enums::EntityKind, types::ObjectId},
    error::FeedError,
    provider::TransactionReceipt,
    snapshot::{Snapshot, materialize::materialize},
    tx::MoveCall,
};

/// Parameters for initializing an oracle queue.
#[derive(Clone, Debug, Builder)]
#[builder(setter(into, strip_option), derive(Debug))]
pub struct OracleQueueInitParams {
    pub authority: ObjectId,
    pub name: String,
    /// Seconds after which a silent oracle is considered stale.
    pub oracle_timeout: u64,
    pub reward: u64,
    pub unpermissioned_feeds_enabled: bool,
    pub lock_lease_funding: bool,
    #[builder(default = "100")]
    pub max_size: u64,
}

/// Partial update of queue configuration; unset fields fall back to the
/// currently stored values.
#[derive(Clone, Debug, Default, Builder)]
#[builder(default, setter(into, strip_option), derive(Debug))]
pub struct OracleQueueSetConfigsParams {
    pub name: Option<String>,
    pub authority: Option<ObjectId>,
    pub oracle_timeout: Option<u64>,
    pub reward: Option<u64>,
    pub unpermissioned_feeds_enabled: Option<bool>,
    pub lock_lease_funding: Option<bool>,
}

/// Façade over one on-chain oracle queue entity.
#[derive(Clone, Debug)]
pub struct OracleQueueAccount {
    ctx: ProgramContext,
    address: ObjectId,
}

impl OracleQueueAccount {
    /// Creates a façade over an existing queue.
    pub fn new(ctx: ProgramContext, address: ObjectId) -> Self {
        Self { ctx, address }
    }

    /// The queue's on-chain identifier.
    pub fn address(&self) -> ObjectId {
        self.address
    }

    /// Materializes the queue's current on-chain state.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be read.
    pub async fn load(&self) -> Result<Snapshot, FeedError> {
        materialize(self.ctx.provider(), &self.address).await
    }

    /// Builds the queue init call.
    pub fn init_call(ctx: &ProgramContext, params: &OracleQueueInitParams) -> MoveCall {
        MoveCall::builder(&ctx.program(), "oracle_queue_init_action", "run")
            .pure(params.authority)
            .pure(params.name.clone().into_bytes())
            .pure(params.oracle_timeout)
            .pure(params.reward)
            .pure(params.unpermissioned_feeds_enabled)
            .pure(params.lock_lease_funding)
            .pure(params.max_size)
            .clock()
            .type_arg(ctx.coin_type())
            .build()
    }

    /// Initializes a new queue and returns its façade.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the receipt carries no queue
    /// identifier.
    pub async fn init(
        ctx: ProgramContext,
        params: &OracleQueueInitParams,
    ) -> Result<(Self, TransactionReceipt), FeedError> {
        let call = Self::init_call(&ctx, params);
        let receipt = ctx.submit(&call).await?;
        let address = receipt.created_id(EntityKind::Queue.type_suffix())?;
        Ok((Self::new(ctx, address), receipt))
    }

    /// Builds the config-update call by overlaying supplied fields onto the
    /// currently stored configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a fallback field is absent or malformed.
    pub fn set_configs_call(
        &self,
        current: &Snapshot,
        params: &OracleQueueSetConfigsParams,
    ) -> Result<MoveCall, FeedError> {
        let name = match &params.name {
            Some(name) => name.clone(),
            None => current.get_str("name")?.to_string(),
        };
        let authority = match params.authority {
            Some(authority) => authority,
            None => current.get_id("authority")?,
        };
        let oracle_timeout = match params.oracle_timeout {
            Some(v) => v,
            None => current.get_u64("oracle_timeout")?,
        };
        let reward = match params.reward {
            Some(v) => v,
            None => current.get_u64("reward")?,
        };
        let unpermissioned = match params.unpermissioned_feeds_enabled {
            Some(v) => v,
            None => current.get_bool("unpermissioned_feeds_enabled")?,
        };
        let lock_lease_funding = match params.lock_lease_funding {
            Some(v) => v,
            None => current.get_bool("lock_lease_funding")?,
        };

        Ok(
            MoveCall::builder(&self.ctx.program(), "oracle_queue_set_configs_action", "run")
                .object(self.address)
                .pure(name.into_bytes())
                .pure(authority)
                .pure(oracle_timeout)
                .pure(reward)
                .pure(unpermissioned)
                .pure(lock_lease_funding)
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
    pub async fn set_configs(
        &self,
        params: &OracleQueueSetConfigsParams,
    ) -> Result<TransactionReceipt, FeedError> {
        let current = self.load().await?;
        let call = self.set_configs_call(&current, params)?;
        self.ctx.submit(&call).await
    }

    /// Finds the position of `oracle` in the queue's roster, or `None` if it
    /// is not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or decoded.
    pub async fn find_oracle_idx(&self, oracle: ObjectId) -> Result<Option<usize>, FeedError> {
        let snapshot = self.load().await?;
        let roster = snapshot.get_id_list("data")?;
        Ok(roster.iter().position(|id| *id == oracle))
    }
}

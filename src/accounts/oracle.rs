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

//! The oracle façade: a reporting participant registered on a queue.

use crate::{
    accounts::ProgramContext,
    common::{enums::EntityKind, types::ObjectId},
    error::FeedError,
    provider::TransactionReceipt,
    snapshot::{Snapshot, materialize::materialize},
    tx::MoveCall,
};

/// Parameters for registering an oracle.
#[derive(Clone, Debug)]
pub struct OracleInitParams {
    pub name: String,
    pub authority: ObjectId,
    pub queue: ObjectId,
}

/// Parameters for registering an oracle and funding its escrow in one
/// transaction.
#[derive(Clone, Debug)]
pub struct CreateOracleParams {
    pub init: OracleInitParams,
    pub load_coin: ObjectId,
    pub load_amount: u64,
}

/// Façade over one on-chain oracle entity.
#[derive(Clone, Debug)]
pub struct OracleAccount {
    ctx: ProgramContext,
    address: ObjectId,
}

impl OracleAccount {
    /// Creates a façade over an existing oracle.
    pub fn new(ctx: ProgramContext, address: ObjectId) -> Self {
        Self { ctx, address }
    }

    /// The oracle's on-chain identifier.
    pub fn address(&self) -> ObjectId {
        self.address
    }

    /// Materializes the oracle's current on-chain state.
    ///
    /// # Errors
    ///
    /// Returns an error if the oracle cannot be read.
    pub async fn load(&self) -> Result<Snapshot, FeedError> {
        materialize(self.ctx.provider(), &self.address).await
    }

    /// Builds the oracle init call.
    pub fn init_call(ctx: &ProgramContext, params: &OracleInitParams) -> MoveCall {
        MoveCall::builder(&ctx.program(), "oracle_init_action", "run")
            .pure(params.name.clone().into_bytes())
            .pure(params.authority)
            .object(params.queue)
            .type_arg(ctx.coin_type())
            .build()
    }

    /// Registers a new oracle and returns its façade.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the receipt carries no oracle
    /// identifier.
    pub async fn init(
        ctx: ProgramContext,
        params: &OracleInitParams,
    ) -> Result<(Self, TransactionReceipt), FeedError> {
        let call = Self::init_call(&ctx, params);
        let receipt = ctx.submit(&call).await?;
        let address = receipt.created_id(EntityKind::Oracle.type_suffix())?;
        Ok((Self::new(ctx, address), receipt))
    }

    /// Builds the combined register-and-fund call.
    pub fn create_call(ctx: &ProgramContext, params: &CreateOracleParams) -> MoveCall {
        MoveCall::builder(&ctx.program(), "create_oracle_action", "run")
            .pure(params.init.name.clone().into_bytes())
            .pure(params.init.authority)
            .object(params.init.queue)
            .object(params.load_coin)
            .pure(params.load_amount)
            .clock()
            .type_arg(ctx.coin_type())
            .build()
    }

    /// Registers a new oracle and funds its escrow in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the receipt carries no oracle
    /// identifier.
    pub async fn create(
        ctx: ProgramContext,
        params: &CreateOracleParams,
    ) -> Result<(Self, TransactionReceipt), FeedError> {
        let call = Self::create_call(&ctx, params);
        let receipt = ctx.submit(&call).await?;
        let address = receipt.created_id(EntityKind::Oracle.type_suffix())?;
        Ok((Self::new(ctx, address), receipt))
    }

    /// Builds the heartbeat call.
    pub fn heartbeat_call(&self, queue: ObjectId) -> MoveCall {
        MoveCall::builder(&self.ctx.program(), "oracle_heartbeat_action", "run")
            .object(self.address)
            .object(queue)
            .clock()
            .type_arg(self.ctx.coin_type())
            .build()
    }

    /// Signals liveness on the oracle's queue.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    pub async fn heartbeat(&self, queue: ObjectId) -> Result<TransactionReceipt, FeedError> {
        self.ctx.submit(&self.heartbeat_call(queue)).await
    }

    /// Withdraws from the oracle's reward escrow.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or submission fails.
    pub async fn withdraw(&self, amount: u64) -> Result<TransactionReceipt, FeedError> {
        let queue = self.load().await?.get_id("queue_addr")?;
        let call = MoveCall::builder(&self.ctx.program(), "oracle_escrow_withdraw_action", "run")
            .object(queue)
            .object(self.address)
            .pure(amount)
            .type_arg(self.ctx.coin_type())
            .build();
        self.ctx.submit(&call).await
    }
}

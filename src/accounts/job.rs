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

//! The job façade: a named, weighted task definition attached to a feed.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    accounts::ProgramContext,
    common::{enums::EntityKind, types::ObjectId},
    error::FeedError,
    provider::TransactionReceipt,
    snapshot::{Snapshot, materialize::materialize},
    tx::MoveCall,
};

/// Parameters for creating a job.
#[derive(Clone, Debug)]
pub struct JobInitParams {
    pub name: String,
    /// Serialized task definition, stored opaquely on-chain.
    pub data: Vec<u8>,
    pub weight: Option<u64>,
}

/// Façade over one on-chain job entity.
#[derive(Clone, Debug)]
pub struct JobAccount {
    ctx: ProgramContext,
    address: ObjectId,
}

impl JobAccount {
    /// Creates a façade over an existing job.
    pub fn new(ctx: ProgramContext, address: ObjectId) -> Self {
        Self { ctx, address }
    }

    /// The job's on-chain identifier.
    pub fn address(&self) -> ObjectId {
        self.address
    }

    /// Materializes the job's current on-chain state.
    ///
    /// # Errors
    ///
    /// Returns an error if the job cannot be read.
    pub async fn load(&self) -> Result<Snapshot, FeedError> {
        materialize(self.ctx.provider(), &self.address).await
    }

    /// Builds the job init call.
    pub fn init_call(ctx: &ProgramContext, params: &JobInitParams) -> MoveCall {
        MoveCall::builder(&ctx.program(), "job_init_action", "run")
            .pure(params.name.clone().into_bytes())
            .pure(params.data.clone())
            .clock()
            .build()
    }

    /// Initializes a new job and returns its façade.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the receipt carries no job
    /// identifier.
    pub async fn init(
        ctx: ProgramContext,
        params: &JobInitParams,
    ) -> Result<(Self, TransactionReceipt), FeedError> {
        let call = Self::init_call(&ctx, params);
        let receipt = ctx.submit(&call).await?;
        let address = receipt.created_id(EntityKind::Job.type_suffix())?;
        Ok((Self::new(ctx, address), receipt))
    }

    /// Decodes the stored task definition bytes.
    ///
    /// The provider surfaces the opaque payload as base64 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not valid base64.
    pub async fn definition(&self) -> Result<Vec<u8>, FeedError> {
        let snapshot = self.load().await?;
        let encoded = snapshot.get_str("data")?;
        STANDARD
            .decode(encoded)
            .map_err(|e| FeedError::decode(format!("job data is not valid base64: {e}")))
    }
}

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

//! Entity façades: one thin account type per on-chain entity kind.
//!
//! Each façade holds an entity reference and a [`ProgramContext`]; it reads
//! state through the snapshot materializer and mutates state only by
//! submitting named program calls. No façade method embeds decision logic of
//! its own.

pub mod aggregator;
pub mod job;
pub mod oracle;
pub mod permission;
pub mod queue;

use std::{fmt::Debug, sync::Arc};

use log::debug;

use crate::{
    common::types::ObjectId,
    config::FeedClientConfig,
    error::FeedError,
    provider::{LedgerTransport, ReadProvider, TransactionReceipt},
    tx::MoveCall,
};

pub use crate::accounts::{
    aggregator::AggregatorAccount, job::JobAccount, oracle::OracleAccount,
    permission::PermissionAccount, queue::OracleQueueAccount,
};

/// Shared handle to the collaborators and program namespace every façade
/// operates against.
#[derive(Clone)]
pub struct ProgramContext {
    provider: Arc<dyn ReadProvider>,
    transport: Arc<dyn LedgerTransport>,
    program: ObjectId,
    coin_type: String,
}

impl Debug for ProgramContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(ProgramContext))
            .field("program", &self.program)
            .field("coin_type", &self.coin_type)
            .finish_non_exhaustive()
    }
}

impl ProgramContext {
    /// Creates a new context from a configuration and collaborator handles.
    pub fn new(
        provider: Arc<dyn ReadProvider>,
        transport: Arc<dyn LedgerTransport>,
        config: &FeedClientConfig,
    ) -> Self {
        Self {
            provider,
            transport,
            program: config.program_id(),
            coin_type: config.coin_type(),
        }
    }

    /// The read provider handle.
    pub fn provider(&self) -> &dyn ReadProvider {
        self.provider.as_ref()
    }

    /// The transaction transport handle.
    pub fn transport(&self) -> &dyn LedgerTransport {
        self.transport.as_ref()
    }

    /// The program namespace operations are defined under.
    pub fn program(&self) -> ObjectId {
        self.program
    }

    /// The coin type argument for escrow and reward operations.
    pub fn coin_type(&self) -> &str {
        &self.coin_type
    }

    /// The transport's signing address.
    pub fn sender(&self) -> ObjectId {
        self.transport.sender()
    }

    /// Submits a call and maps a failed remote status to an error.
    pub(crate) async fn submit(&self, call: &MoveCall) -> Result<TransactionReceipt, FeedError> {
        debug!("submitting {}", call.target);
        let receipt = self.transport.submit(call).await?;
        receipt.ensure_success()?;
        Ok(receipt)
    }
}

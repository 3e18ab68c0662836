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

//! Client SDK for the Movefeed decentralized oracle program on Move-based
//! ledgers.
//!
//! The `movefeed` crate provides typed façades over the program's on-chain
//! entities (aggregators, jobs, oracles, queues and permissions), a snapshot
//! materializer that merges partial-record reads into flat point-in-time
//! views, the fixed-triple decimal codec used on the wire, and the
//! update-admission decision feeds apply before publishing.
//!
//! Network access is injected: implement [`provider::ReadProvider`] for
//! record reads, [`provider::LedgerTransport`] for transaction submission
//! and [`events::EventSource`] for event subscriptions. The SDK itself
//! performs no I/O, signs nothing and retries nothing.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod accounts;
pub mod admission;
pub mod common;
pub mod config;
pub mod error;
pub mod events;
pub mod provider;
pub mod snapshot;
pub mod tx;

// Re-exports
pub use crate::{
    accounts::{
        AggregatorAccount, JobAccount, OracleAccount, OracleQueueAccount, PermissionAccount,
        ProgramContext,
    },
    common::{
        decimal::LedgerDecimal,
        enums::{EntityKind, Network, PermissionKind},
        types::ObjectId,
    },
    config::FeedClientConfig,
    error::{FeedError, FeedResult},
    provider::{LedgerTransport, ReadProvider, TransactionReceipt},
    snapshot::Snapshot,
    tx::MoveCall,
};

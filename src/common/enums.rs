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

use std::env;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Represents the target network for the Movefeed program.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    /// Loads the network from the `MOVEFEED_NET` environment variable.
    ///
    /// Defaults to `Mainnet` if not set or invalid.
    pub fn from_env() -> Self {
        match env::var("MOVEFEED_NET")
            .unwrap_or_else(|_| "mainnet".to_string())
            .to_lowercase()
            .as_str()
        {
            "testnet" | "test" => Network::Testnet,
            "devnet" | "dev" => Network::Devnet,
            _ => Network::Mainnet,
        }
    }
}

/// Represents a capability a queue grants to an oracle or aggregator.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionKind {
    /// Permit an oracle to heartbeat on the queue.
    PermitOracleHeartbeat,
    /// Permit an aggregator to request updates from the queue.
    PermitOracleQueueUsage,
}

impl PermissionKind {
    /// The discriminant encoded into permission transaction arguments.
    pub fn discriminant(&self) -> u8 {
        match self {
            Self::PermitOracleHeartbeat => 0,
            Self::PermitOracleQueueUsage => 1,
        }
    }
}

/// Represents the kind of on-chain entity managed by this SDK.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Aggregator,
    Job,
    Oracle,
    Queue,
    Permission,
}

impl EntityKind {
    /// The type-tag suffix used to locate a freshly created entity of this
    /// kind in a transaction receipt.
    pub fn type_suffix(&self) -> &'static str {
        match self {
            Self::Aggregator => "aggregator::Aggregator",
            Self::Job => "job::Job",
            Self::Oracle => "oracle::Oracle",
            Self::Queue => "oracle_queue::OracleQueue",
            Self::Permission => "permission::Permission",
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

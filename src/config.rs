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

//! Configuration structures for the Movefeed client.

use crate::common::{
    consts::{DEFAULT_COIN_TYPE, program_address},
    enums::Network,
    types::ObjectId,
};

/// Configuration for a Movefeed client.
#[derive(Clone, Debug)]
pub struct FeedClientConfig {
    /// The target network.
    pub network: Network,
    /// Override for the published program address.
    pub program_id: Option<ObjectId>,
    /// Override for the coin type used by escrow operations.
    pub coin_type: Option<String>,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            program_id: None,
            coin_type: None,
        }
    }
}

impl FeedClientConfig {
    /// Creates a new configuration for the given network.
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Creates a configuration from the `MOVEFEED_NET` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Network::from_env())
    }

    /// Returns the program address, respecting the override.
    #[must_use]
    pub fn program_id(&self) -> ObjectId {
        self.program_id
            .unwrap_or_else(|| ObjectId::new_unchecked(program_address(self.network)))
    }

    /// Returns the coin type, respecting the override.
    #[must_use]
    pub fn coin_type(&self) -> String {
        self.coin_type
            .clone()
            .unwrap_or_else(|| DEFAULT_COIN_TYPE.to_string())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

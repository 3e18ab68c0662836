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

use crate::common::enums::Network;

/// The well-known shared clock object passed to time-dependent operations.
pub const CLOCK_OBJECT_ID: &str = "0x6";

/// Default coin type argument for escrow and reward operations.
pub const DEFAULT_COIN_TYPE: &str = "0x2::sui::SUI";

/// The `create_feed_action` entry point has a fixed arity and accepts
/// exactly this many job slots per call.
pub const MAX_CREATE_FEED_JOBS: usize = 8;

// Published program addresses per network
pub const MOVEFEED_MAINNET_ADDRESS: &str =
    "0xfd2e0f4383df3ec9106326dcd9a20510cdce72146754296deed15403fcd3df8b";
pub const MOVEFEED_TESTNET_ADDRESS: &str =
    "0x271beaa1f36bf8812a778f0df5a7a9f67a757008512096862a128c42036ac4c3";
pub const MOVEFEED_DEVNET_ADDRESS: &str =
    "0x98670585d87954e378e714f93536b9ee5ea6e0572fd2afa2257158eb7916ce49";

/// Gets the published Movefeed program address for the specified network.
pub fn program_address(network: Network) -> &'static str {
    match network {
        Network::Mainnet => MOVEFEED_MAINNET_ADDRESS,
        Network::Testnet => MOVEFEED_TESTNET_ADDRESS,
        Network::Devnet => MOVEFEED_DEVNET_ADDRESS,
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

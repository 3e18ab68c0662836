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

//! Identifier types for on-chain entities.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::error::FeedError;

/// An opaque on-chain object identifier (address).
///
/// Interned for cheap copies and comparisons; the SDK never interprets the
/// address beyond passing it back to the ledger.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Ustr);

impl ObjectId {
    /// Creates a new [`ObjectId`] from the given address string.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty or not `0x`-prefixed.
    pub fn new(address: &str) -> Result<Self, FeedError> {
        if address.is_empty() || !address.starts_with("0x") {
            return Err(FeedError::decode(format!(
                "invalid object id `{address}`: expected 0x-prefixed address"
            )));
        }
        Ok(Self(Ustr::from(address)))
    }

    /// Creates a new [`ObjectId`] without validating the address shape.
    ///
    /// Intended for well-known constants such as the clock object.
    pub fn new_unchecked(address: &str) -> Self {
        Self(Ustr::from(address))
    }

    /// The address string backing this identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

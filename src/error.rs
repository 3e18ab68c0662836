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

use thiserror::Error;

use crate::common::types::ObjectId;

/// Error type covering every fallible operation in the Movefeed SDK.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A required field was absent from an externally supplied record or triple.
    #[error("missing field `{0}` in ledger record")]
    MissingField(String),

    /// The primary record does not exist or is inaccessible.
    #[error("object `{0}` not found")]
    NotFound(ObjectId),

    /// A child record fetch failed, so no snapshot was produced.
    #[error("partial read: {0}")]
    PartialRead(String),

    /// More sub-entities were supplied than the fixed remote arity allows.
    #[error("job limit exceeded: {supplied} supplied, maximum {max}")]
    LimitExceeded { supplied: usize, max: usize },

    /// The submitted transaction failed on the remote side.
    #[error("remote execution failed: {0}")]
    RemoteExecution(String),

    /// No created object of the expected type appeared in the receipt.
    #[error("no created object matching `{0}` in receipt")]
    CreatedObjectMissing(String),

    /// A numeric operation (division, overflow) could not be computed.
    #[error("numeric error: {0}")]
    Numeric(String),

    /// A record field had an unexpected shape or encoding.
    #[error("decode error: {0}")]
    Decode(String),

    /// Transport layer errors (network, connection issues).
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization errors.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FeedError {
    /// Create a missing-field error.
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }

    /// Create a partial-read error.
    pub fn partial_read(msg: impl Into<String>) -> Self {
        Self::PartialRead(msg.into())
    }

    /// Create a remote-execution error.
    pub fn remote_execution(msg: impl Into<String>) -> Self {
        Self::RemoteExecution(msg.into())
    }

    /// Create a numeric error.
    pub fn numeric(msg: impl Into<String>) -> Self {
        Self::Numeric(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Result type alias for Movefeed SDK operations.
pub type FeedResult<T> = std::result::Result<T, FeedError>;

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

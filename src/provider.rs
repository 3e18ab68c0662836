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

//! Abstract collaborator boundary: the read provider and the transaction
//! transport. The SDK performs no network I/O of its own; concrete
//! implementations of these traits own connections, signing and retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ustr::Ustr;

use crate::{
    common::types::ObjectId,
    error::FeedError,
    snapshot::{FieldMap, FieldValue},
    tx::MoveCall,
};

/// A raw typed record as surfaced by the read provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawRecord {
    /// The record's own identifier.
    pub object_id: ObjectId,
    /// The declared type tag of the record.
    pub type_tag: Ustr,
    /// JSON-shaped record content; field names and shapes are discovered at
    /// read time.
    pub content: Value,
}

impl RawRecord {
    /// Converts the record content into an unwrapped field map.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not an object.
    pub fn field_map(&self) -> Result<FieldMap, FeedError> {
        FieldValue::map_from_json(&self.content)
    }
}

/// A reference to a child record attached to a primary record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChildRef {
    /// The child record's identifier.
    pub object_id: ObjectId,
    /// The provider-assigned name of the attachment, when exposed.
    pub name: Option<String>,
}

/// One page of a provider-paginated child enumeration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChildPage {
    /// Child references in provider enumeration order.
    pub refs: Vec<ChildRef>,
    /// Cursor for the next page, or `None` when enumeration is complete.
    pub next_cursor: Option<String>,
}

/// Read access to ledger records.
#[async_trait]
pub trait ReadProvider: Send + Sync {
    /// Fetches the typed content of a record, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot complete the read.
    async fn get_record(&self, id: &ObjectId) -> Result<Option<RawRecord>, FeedError>;

    /// Enumerates one page of child records attached to `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot complete the enumeration.
    async fn list_children(
        &self,
        parent: &ObjectId,
        cursor: Option<String>,
    ) -> Result<ChildPage, FeedError>;
}

/// Execution status reported for a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Success,
    /// The remote program aborted; the message is surfaced verbatim.
    Failure(String),
}

/// An entity created by a successful transaction, tagged by declared type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedObject {
    pub object_id: ObjectId,
    pub type_tag: String,
}

/// The transport's view of a submitted transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Transaction digest assigned by the ledger.
    pub digest: String,
    /// Remote execution status.
    pub status: ExecutionStatus,
    /// Entities created by the transaction, in ledger order.
    pub created: Vec<CreatedObject>,
}

impl TransactionReceipt {
    /// Returns `true` when the transaction executed successfully.
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// Maps a failed status to [`FeedError::RemoteExecution`].
    ///
    /// # Errors
    ///
    /// Returns the remote failure message verbatim.
    pub fn ensure_success(&self) -> Result<(), FeedError> {
        match &self.status {
            ExecutionStatus::Success => Ok(()),
            ExecutionStatus::Failure(msg) => Err(FeedError::remote_execution(msg.clone())),
        }
    }

    /// Finds the first created object whose type tag ends with `type_suffix`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::CreatedObjectMissing`] if no created object
    /// matches.
    pub fn created_id(&self, type_suffix: &str) -> Result<ObjectId, FeedError> {
        self.created
            .iter()
            .find(|obj| obj.type_tag.ends_with(type_suffix))
            .map(|obj| obj.object_id)
            .ok_or_else(|| FeedError::CreatedObjectMissing(type_suffix.to_string()))
    }
}

/// Submits signed transactions to the ledger.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Submits the call and waits for the ledger's receipt.
    ///
    /// Idempotence of submission is a transport property; the SDK performs
    /// no internal retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot deliver the transaction.
    async fn submit(&self, call: &MoveCall) -> Result<TransactionReceipt, FeedError>;

    /// The address transactions are signed and sent from.
    fn sender(&self) -> ObjectId;
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

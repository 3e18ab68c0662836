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

//! Materializes an entity's split on-chain state into one [`Snapshot`].
//!
//! The ledger stores an entity as a primary record plus an open-ended set of
//! child records. Materialization fetches the primary, drains the provider's
//! child enumeration eagerly, fetches all children concurrently, and merges
//! the field maps with the primary record's own fields applied last.

use futures_util::future::try_join_all;
use log::debug;

use crate::{
    common::types::ObjectId,
    error::FeedError,
    provider::{ChildRef, ReadProvider},
    snapshot::{FieldMap, MergePrecedence, Snapshot, merge_field_maps},
};

/// Materializes a consistent snapshot of the entity identified by `primary`.
///
/// The merge holds the fixed precedence contract: child field maps are folded
/// in provider enumeration order (later children overwrite earlier ones on
/// key collision), then the primary record's own fields override everything.
///
/// # Errors
///
/// - [`FeedError::NotFound`] if the primary record does not exist.
/// - [`FeedError::PartialRead`] if any child fetch fails; no best-effort
///   snapshot is returned.
/// - Provider errors from the primary fetch or enumeration are surfaced
///   unchanged.
pub async fn materialize(
    provider: &dyn ReadProvider,
    primary: &ObjectId,
) -> Result<Snapshot, FeedError> {
    let record = provider
        .get_record(primary)
        .await?
        .ok_or(FeedError::NotFound(*primary))?;

    let refs = list_all_children(provider, primary).await?;
    debug!("materializing {primary}: {} child records", refs.len());

    let fetches = refs.iter().map(|child| fetch_child(provider, child));
    let children: Vec<FieldMap> = try_join_all(fetches).await?;

    let merged = merge_field_maps(record.field_map()?, children, MergePrecedence::PrimaryWins);
    Ok(Snapshot::new(merged))
}

/// Drains the provider's paginated child enumeration to completion,
/// preserving enumeration order.
async fn list_all_children(
    provider: &dyn ReadProvider,
    parent: &ObjectId,
) -> Result<Vec<ChildRef>, FeedError> {
    let mut refs = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = provider.list_children(parent, cursor).await?;
        refs.extend(page.refs);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(refs)
}

async fn fetch_child(
    provider: &dyn ReadProvider,
    child: &ChildRef,
) -> Result<FieldMap, FeedError> {
    let record = provider
        .get_record(&child.object_id)
        .await
        .map_err(|e| FeedError::partial_read(format!("child {}: {e}", child.object_id)))?
        .ok_or_else(|| {
            FeedError::partial_read(format!("child {} does not exist", child.object_id))
        })?;
    record.field_map()
}

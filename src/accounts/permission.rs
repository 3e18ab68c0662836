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

//! The permission façade: granter-to-grantee capability grants.

use crate::{
    accounts::ProgramContext,
    common::{
        enums::{EntityKind, PermissionKind},
        types::ObjectId,
    },
    error::FeedError,
    provider::TransactionReceipt,
    tx::MoveCall,
};

/// Parameters for creating a permission record.
#[derive(Clone, Debug)]
pub struct PermissionInitParams {
    pub authority: ObjectId,
    pub granter: ObjectId,
    pub grantee: ObjectId,
}

/// Parameters for granting or revoking one permission kind.
#[derive(Clone, Debug)]
pub struct PermissionSetParams {
    pub authority: ObjectId,
    pub granter: ObjectId,
    pub grantee: ObjectId,
    pub kind: PermissionKind,
    pub enable: bool,
}

/// Façade over one on-chain permission entity.
#[derive(Clone, Debug)]
pub struct PermissionAccount {
    ctx: ProgramContext,
    address: ObjectId,
}

impl PermissionAccount {
    /// Creates a façade over an existing permission record.
    pub fn new(ctx: ProgramContext, address: ObjectId) -> Self {
        Self { ctx, address }
    }

    /// The permission record's on-chain identifier.
    pub fn address(&self) -> ObjectId {
        self.address
    }

    /// Builds the permission init call.
    pub fn init_call(ctx: &ProgramContext, params: &PermissionInitParams) -> MoveCall {
        MoveCall::builder(&ctx.program(), "permission_init_action", "run")
            .pure(params.authority)
            .pure(params.granter)
            .pure(params.grantee)
            .build()
    }

    /// Creates a new permission record and returns its façade.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the receipt carries no
    /// permission identifier.
    pub async fn init(
        ctx: ProgramContext,
        params: &PermissionInitParams,
    ) -> Result<(Self, TransactionReceipt), FeedError> {
        let call = Self::init_call(&ctx, params);
        let receipt = ctx.submit(&call).await?;
        let address = receipt.created_id(EntityKind::Permission.type_suffix())?;
        Ok((Self::new(ctx, address), receipt))
    }

    /// Builds the permission set call.
    pub fn set_call(ctx: &ProgramContext, params: &PermissionSetParams) -> MoveCall {
        MoveCall::builder(&ctx.program(), "permission_set_action", "run")
            .pure(params.authority)
            .pure(params.granter)
            .pure(params.grantee)
            .pure(params.kind.discriminant())
            .pure(params.enable)
            .build()
    }

    /// Grants or revokes one permission kind on the (granter, grantee) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    pub async fn set(
        ctx: &ProgramContext,
        params: &PermissionSetParams,
    ) -> Result<TransactionReceipt, FeedError> {
        ctx.submit(&Self::set_call(ctx, params)).await
    }
}
